//! Paginated selection list
//!
//! Options are shown `page_size` at a time, numbered 1..9 within the page.
//! Up/Down move the highlight and cross page boundaries, Left/Right jump a
//! whole page, a digit picks that row of the current page, Enter picks the
//! highlighted row. Escape and `q` cancel.

use super::{drive, Chrome, InputResult, Interactive, MessageBox, MessageKind};
use crate::error::Result;
use crate::theme::Styles;
use crate::ui::{Direction, Key, Screen};

/// Label shown to the user and the value handed back when picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption<V> {
    pub label: String,
    pub value: V,
}

impl<V> SelectOption<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Rows that can be picked by digit
const MAX_DIGIT: usize = 9;

#[derive(Debug, Clone)]
pub struct SelectList<V> {
    x: u16,
    y: u16,
    title: String,
    options: Vec<SelectOption<V>>,
    page_size: usize,
    highlight: usize,
}

impl<V: Clone> SelectList<V> {
    pub fn new(
        x: u16,
        y: u16,
        title: impl Into<String>,
        options: Vec<SelectOption<V>>,
        page_size: usize,
    ) -> Self {
        Self {
            x,
            y,
            title: title.into(),
            options,
            page_size: page_size.max(1),
            highlight: 0,
        }
    }

    /// Start with `index` highlighted (clamped)
    pub fn with_highlight(mut self, index: usize) -> Self {
        self.highlight = index.min(self.options.len().saturating_sub(1));
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.options.len().div_ceil(self.page_size)
    }

    /// Zero-based page holding the highlight
    pub fn page(&self) -> usize {
        self.highlight / self.page_size
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    fn page_range(&self) -> std::ops::Range<usize> {
        let start = self.page() * self.page_size;
        start..(start + self.page_size).min(self.options.len())
    }

    fn pick(&self, index: usize) -> InputResult<V> {
        match self.options.get(index) {
            Some(option) => InputResult::Confirm(option.value.clone()),
            None => InputResult::Continue,
        }
    }
}

impl<V: Clone> Interactive for SelectList<V> {
    type Output = V;

    fn render(&self, screen: &mut dyn Screen) {
        screen.write_at(self.x, self.y, &self.title, Styles::title());

        let range = self.page_range();
        let first = range.start;
        for (row, option) in self.options[range].iter().enumerate() {
            let index = first + row;
            let number = if row < MAX_DIGIT {
                format!("[{}]", row + 1)
            } else {
                "   ".to_string()
            };
            let (marker, style) = if index == self.highlight {
                (">", Styles::selected())
            } else {
                (" ", Styles::unselected())
            };
            screen.write_at(
                self.x,
                self.y + 2 + row as u16,
                &format!("{} {} {}", marker, number, option.label),
                style,
            );
        }

        let footer_y = self.y + 3 + self.page_size.min(self.options.len()) as u16;
        screen.write_at(
            self.x,
            footer_y,
            &format!(
                "Page {}/{}  ({} options)",
                self.page() + 1,
                self.page_count().max(1),
                self.options.len()
            ),
            Styles::nav_hint(),
        );
    }

    fn handle_key(&mut self, key: Key) -> InputResult<V> {
        if self.options.is_empty() {
            return InputResult::Cancel;
        }
        let last = self.options.len() - 1;

        match key {
            Key::Enter => return self.pick(self.highlight),
            k if k.is_cancel() => return InputResult::Cancel,
            Key::Arrow(Direction::Up) => self.highlight = self.highlight.saturating_sub(1),
            Key::Arrow(Direction::Down) => self.highlight = (self.highlight + 1).min(last),
            Key::Arrow(Direction::Left) => {
                if self.page() > 0 {
                    self.highlight = (self.page() - 1) * self.page_size;
                }
            }
            Key::Arrow(Direction::Right) => {
                if self.page() + 1 < self.page_count() {
                    self.highlight = (self.page() + 1) * self.page_size;
                }
            }
            Key::Char(_) => {
                if let Some(d) = key.digit().filter(|d| (1..=MAX_DIGIT).contains(d)) {
                    if d <= self.page_size {
                        let index = self.page() * self.page_size + d - 1;
                        return self.pick(index);
                    }
                }
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn hint(&self) -> &'static str {
        "↑/↓ move  ←/→ page  1-9 pick  Enter select  Esc/q back"
    }
}

/// Run a selection list. An empty list shows an error and returns `None`
/// without waiting for a choice.
pub fn select<V: Clone>(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    mut list: SelectList<V>,
) -> Result<Option<V>> {
    if list.is_empty() {
        tracing::warn!(title = %list.title, "selection list has no options");
        MessageBox::new(&list.title, vec!["No options available.".to_string()])
            .kind(MessageKind::Error)
            .show(screen)?;
        return Ok(None);
    }
    drive(screen, chrome, &mut list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize, page_size: usize) -> SelectList<usize> {
        let options = (0..n)
            .map(|i| SelectOption::new(format!("item {}", i), i * 10))
            .collect();
        SelectList::new(0, 0, "Pick", options, page_size)
    }

    #[test]
    fn test_page_count() {
        assert_eq!(numbered(0, 5).page_count(), 0);
        assert_eq!(numbered(5, 5).page_count(), 1);
        assert_eq!(numbered(6, 5).page_count(), 2);
        assert_eq!(numbered(3, 0).page_count(), 3);
    }

    #[test]
    fn test_enter_returns_highlighted_value() {
        let mut list = numbered(4, 10);
        list.handle_key(Key::DOWN);
        list.handle_key(Key::DOWN);
        assert_eq!(list.handle_key(Key::Enter), InputResult::Confirm(20));
    }

    #[test]
    fn test_down_crosses_page_boundary() {
        let mut list = numbered(7, 3);
        for _ in 0..3 {
            list.handle_key(Key::DOWN);
        }
        assert_eq!(list.page(), 1);
        assert_eq!(list.handle_key(Key::Char('1')), InputResult::Confirm(30));
    }

    #[test]
    fn test_highlight_is_bounded() {
        let mut list = numbered(2, 5);
        list.handle_key(Key::UP);
        assert_eq!(list.highlight(), 0);
        for _ in 0..5 {
            list.handle_key(Key::DOWN);
        }
        assert_eq!(list.highlight(), 1);
    }

    #[test]
    fn test_page_jumps() {
        let mut list = numbered(10, 4);
        list.handle_key(Key::RIGHT);
        assert_eq!(list.highlight(), 4);
        list.handle_key(Key::RIGHT);
        assert_eq!(list.highlight(), 8);
        list.handle_key(Key::RIGHT);
        assert_eq!(list.highlight(), 8);
        list.handle_key(Key::LEFT);
        assert_eq!(list.highlight(), 4);
        assert_eq!(list.handle_key(Key::Char('2')), InputResult::Confirm(50));
    }

    #[test]
    fn test_digit_out_of_range_ignored() {
        let mut list = numbered(10, 4);
        list.handle_key(Key::RIGHT);
        list.handle_key(Key::RIGHT);
        // Last page holds two items
        assert_eq!(list.handle_key(Key::Char('3')), InputResult::Continue);
        assert_eq!(list.handle_key(Key::Char('0')), InputResult::Continue);
        assert_eq!(list.handle_key(Key::Char('2')), InputResult::Confirm(90));
    }

    #[test]
    fn test_digit_beyond_page_size_ignored() {
        let mut list = numbered(10, 2);
        assert_eq!(list.handle_key(Key::Char('3')), InputResult::Continue);
    }

    #[test]
    fn test_cancel_keys() {
        assert_eq!(numbered(3, 3).handle_key(Key::Escape), InputResult::Cancel);
        assert_eq!(numbered(3, 3).handle_key(Key::Char('q')), InputResult::Cancel);
        assert_eq!(numbered(3, 3).handle_key(Key::Char('Q')), InputResult::Cancel);
    }

    #[test]
    fn test_with_highlight_clamps() {
        let list = numbered(3, 2).with_highlight(99);
        assert_eq!(list.highlight(), 2);
        assert_eq!(list.page(), 1);
    }
}
