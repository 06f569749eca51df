//! Bounded single-line text input
//!
//! Accepts `[A-Za-z0-9-_.]` only. Anything else is dropped without moving
//! the cursor. Input beyond `max_len` is ignored. Enter commits the current
//! text (possibly empty); Escape cancels, which is distinct from an empty
//! commit. `q` is ordinary input here.

use super::{InputResult, Interactive};
use crate::catalog::is_profile_name_char;
use crate::theme::Styles;
use crate::ui::{Direction, Key, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    x: u16,
    y: u16,
    prompt: String,
    max_len: usize,
    value: String,
    /// Char index in `0..=value.len()`
    cursor: usize,
}

impl TextField {
    pub fn new(x: u16, y: u16, prompt: impl Into<String>, max_len: usize) -> Self {
        Self {
            x,
            y,
            prompt: prompt.into(),
            max_len,
            value: String::new(),
            cursor: 0,
        }
    }

    /// Start with `initial`, filtered and truncated like typed input, with
    /// the cursor at the end
    pub fn with_initial(mut self, initial: &str) -> Self {
        for c in initial.chars() {
            self.insert(c);
        }
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, c: char) {
        if !is_profile_name_char(c) || self.value.len() >= self.max_len {
            return;
        }
        // Allowed characters are ASCII, so char and byte indices agree
        self.value.insert(self.cursor, c);
        self.cursor += 1;
    }
}

impl Interactive for TextField {
    type Output = String;

    fn render(&self, screen: &mut dyn Screen) {
        screen.write_at(self.x, self.y, &self.prompt, Styles::text());
        let field_x = self.x + self.prompt.chars().count() as u16 + 1;

        let mut shown = self.value.clone();
        while shown.len() < self.max_len {
            shown.push('_');
        }
        screen.write_at(field_x, self.y, &shown, Styles::input());

        let under_cursor = self
            .value
            .get(self.cursor..self.cursor + 1)
            .unwrap_or("_");
        screen.write_at(field_x + self.cursor as u16, self.y, under_cursor, Styles::cursor());

        screen.write_at(
            self.x,
            self.y + 1,
            &format!(
                "Up to {} characters: letters, digits, '-', '_' and '.'",
                self.max_len
            ),
            Styles::nav_hint(),
        );
    }

    fn handle_key(&mut self, key: Key) -> InputResult<String> {
        match key {
            Key::Enter => return InputResult::Confirm(self.value.clone()),
            Key::Escape => return InputResult::Cancel,
            Key::Char(c) => self.insert(c),
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.value.remove(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.value.len() {
                    self.value.remove(self.cursor);
                }
            }
            Key::Arrow(Direction::Left) => self.cursor = self.cursor.saturating_sub(1),
            Key::Arrow(Direction::Right) => {
                if self.cursor < self.value.len() {
                    self.cursor += 1;
                }
            }
            Key::Arrow(_) => {}
        }
        InputResult::Continue
    }

    fn hint(&self) -> &'static str {
        "Type to edit  ←/→ move  Backspace/Del erase  Enter accept  Esc back"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(field: &mut TextField, keys: &[Key]) -> InputResult<String> {
        let mut last = InputResult::Continue;
        for key in keys {
            last = field.handle_key(*key);
        }
        last
    }

    fn typed(text: &str) -> Vec<Key> {
        text.chars().map(Key::Char).collect()
    }

    #[test]
    fn test_typing_and_commit() {
        let mut field = TextField::new(0, 0, "Name:", 30);
        feed(&mut field, &typed("pixel_7"));
        assert_eq!(field.handle_key(Key::Enter), InputResult::Confirm("pixel_7".into()));
    }

    #[test]
    fn test_rejected_chars_do_not_move_cursor() {
        let mut field = TextField::new(0, 0, "Name:", 30);
        feed(&mut field, &typed("a b/c!"));
        assert_eq!(field.value(), "abc");
        assert_eq!(field.cursor(), 3);
    }

    #[test]
    fn test_max_len_enforced() {
        let mut field = TextField::new(0, 0, "Name:", 4);
        feed(&mut field, &typed("abcdefg"));
        assert_eq!(field.value(), "abcd");
    }

    #[test]
    fn test_cursor_editing() {
        let mut field = TextField::new(0, 0, "Name:", 30);
        feed(&mut field, &typed("abd"));
        feed(&mut field, &[Key::LEFT, Key::Char('c')]);
        assert_eq!(field.value(), "abcd");

        feed(&mut field, &[Key::LEFT, Key::LEFT, Key::LEFT, Key::LEFT, Key::LEFT]);
        assert_eq!(field.cursor(), 0);
        feed(&mut field, &[Key::Backspace, Key::Delete]);
        assert_eq!(field.value(), "bcd");

        feed(&mut field, &[Key::RIGHT; 10]);
        assert_eq!(field.cursor(), 3);
        feed(&mut field, &[Key::Delete, Key::Backspace]);
        assert_eq!(field.value(), "bc");
    }

    #[test]
    fn test_escape_is_not_empty_commit() {
        let mut field = TextField::new(0, 0, "Name:", 30);
        assert_eq!(field.handle_key(Key::Escape), InputResult::Cancel);
        assert_eq!(field.handle_key(Key::Enter), InputResult::Confirm(String::new()));
    }

    #[test]
    fn test_q_is_input() {
        let mut field = TextField::new(0, 0, "Name:", 30);
        assert_eq!(field.handle_key(Key::Char('q')), InputResult::Continue);
        assert_eq!(field.value(), "q");
    }

    #[test]
    fn test_initial_value_is_filtered() {
        let field = TextField::new(0, 0, "Name:", 5).with_initial("my avd!!long");
        assert_eq!(field.value(), "myavd");
        assert_eq!(field.cursor(), 5);
    }
}
