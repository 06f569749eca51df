//! Key decoding and key sources
//!
//! Widgets consume [`Key`] values, never raw terminal events. A
//! [`KeySource`] produces them: [`TerminalKeys`] reads the real terminal,
//! [`ScriptedKeys`] replays a fixed sequence for tests.

use crate::error::{AvidiaError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::VecDeque;
use std::time::Duration;

/// Arrow key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A decoded keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Arrow(Direction),
    Enter,
    Escape,
    Backspace,
    Delete,
}

impl Key {
    pub const UP: Key = Key::Arrow(Direction::Up);
    pub const DOWN: Key = Key::Arrow(Direction::Down);
    pub const LEFT: Key = Key::Arrow(Direction::Left);
    pub const RIGHT: Key = Key::Arrow(Direction::Right);

    /// Map a crossterm key event.
    ///
    /// Returns `None` for release/repeat events, for keys no widget reacts to
    /// (Tab, function keys, Home/End) and for Alt+char.
    ///
    /// # Escape disambiguation
    ///
    /// crossterm decodes each read from the tty as a unit: a lone ESC byte
    /// with nothing else pending in the same read is `Esc`; `ESC [` and
    /// `ESC O` sequences within the read decode to arrows and other
    /// navigation keys; ESC followed by a printable character in the same
    /// read decodes to that character with the ALT modifier. That last case
    /// is reported here as no event rather than as Escape then the character.
    pub fn from_crossterm(event: &KeyEvent) -> Option<Key> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        if event.modifiers.contains(KeyModifiers::ALT) {
            return None;
        }

        match event.code {
            // Ctrl+letter combos are not input
            KeyCode::Char(_) if event.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Key::Char(c)),
            KeyCode::Up => Some(Key::UP),
            KeyCode::Down => Some(Key::DOWN),
            KeyCode::Left => Some(Key::LEFT),
            KeyCode::Right => Some(Key::RIGHT),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc => Some(Key::Escape),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            _ => None,
        }
    }

    /// Digit value of `Char('0'..='9')`
    pub fn digit(self) -> Option<usize> {
        match self {
            Key::Char(c) => c.to_digit(10).map(|d| d as usize),
            _ => None,
        }
    }

    /// Escape, `q` or `Q`
    pub fn is_cancel(self) -> bool {
        matches!(self, Key::Escape | Key::Char('q') | Key::Char('Q'))
    }
}

fn is_ctrl_c(event: &KeyEvent) -> bool {
    event.kind == KeyEventKind::Press
        && event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(event.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Raw mode disables the tty's own SIGINT, so a Ctrl+C keystroke is turned
/// back into the signal for the process-wide handler.
fn raise_interrupt() {
    tracing::info!("Ctrl+C pressed, raising SIGINT");
    if let Err(e) = nix::sys::signal::raise(nix::sys::signal::Signal::SIGINT) {
        tracing::error!(error = %e, "failed to raise SIGINT");
    }
}

/// Source of keystrokes for the screen surface
pub trait KeySource {
    /// Wait up to one tick for a key. `Ok(None)` means no event.
    fn next_key(&mut self) -> Result<Option<Key>>;

    /// Non-blocking check for a user interrupt during a long operation
    fn interrupt_requested(&mut self) -> Result<bool> {
        Ok(false)
    }
}

/// Keys read from the real terminal via crossterm
#[derive(Debug, Clone)]
pub struct TerminalKeys {
    tick: Duration,
}

impl TerminalKeys {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        if !event::poll(self.tick)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if is_ctrl_c(&key) => {
                raise_interrupt();
                Ok(None)
            }
            Event::Key(key) => Ok(Key::from_crossterm(&key)),
            // Resize: the next render re-queries the size
            _ => Ok(None),
        }
    }

    fn interrupt_requested(&mut self) -> Result<bool> {
        // Typing while a tool streams is discarded
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_ctrl_c(&key) {
                    raise_interrupt();
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

/// A fixed key sequence. `None` entries stand for poll timeouts.
///
/// Running out of keys is a terminal error so a test that under-scripts a
/// widget fails instead of spinning forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    queue: VecDeque<Option<Key>>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one key
    pub fn key(mut self, key: Key) -> Self {
        self.queue.push_back(Some(key));
        self
    }

    /// Append the same key `n` times
    pub fn repeat(mut self, key: Key, n: usize) -> Self {
        for _ in 0..n {
            self.queue.push_back(Some(key));
        }
        self
    }

    /// Append one `Char` per character of `text`
    pub fn text(mut self, text: &str) -> Self {
        self.queue.extend(text.chars().map(|c| Some(Key::Char(c))));
        self
    }

    /// Append a poll timeout
    pub fn idle(mut self) -> Self {
        self.queue.push_back(None);
        self
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl FromIterator<Key> for ScriptedKeys {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().map(Some).collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<Option<Key>> {
        self.queue
            .pop_front()
            .ok_or_else(|| AvidiaError::terminal("scripted key source exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_from_crossterm_maps_navigation() {
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Up, KeyModifiers::NONE)),
            Some(Key::UP)
        );
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Key::Escape)
        );
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Char('x'), KeyModifiers::SHIFT)),
            Some(Key::Char('x'))
        );
    }

    #[test]
    fn test_alt_char_is_no_event() {
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Char('a'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_release_is_no_event() {
        let mut event = press(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(Key::from_crossterm(&event), None);
    }

    #[test]
    fn test_unmapped_keys_are_no_event() {
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Tab, KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            Key::from_crossterm(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_digit_and_cancel() {
        assert_eq!(Key::Char('7').digit(), Some(7));
        assert_eq!(Key::Char('x').digit(), None);
        assert!(Key::Char('q').is_cancel());
        assert!(Key::Escape.is_cancel());
        assert!(!Key::Enter.is_cancel());
    }

    #[test]
    fn test_scripted_keys_replay_then_exhaust() {
        let mut keys = ScriptedKeys::new().text("ab").idle().key(Key::Enter);
        assert_eq!(keys.next_key().unwrap(), Some(Key::Char('a')));
        assert_eq!(keys.next_key().unwrap(), Some(Key::Char('b')));
        assert_eq!(keys.next_key().unwrap(), None);
        assert_eq!(keys.next_key().unwrap(), Some(Key::Enter));
        assert!(keys.next_key().is_err());
    }
}
