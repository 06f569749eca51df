//! Yes/No confirmation prompt
//!
//! Left/Right toggle the highlight, `y`/`n` answer directly, Enter takes the
//! highlight. Escape and `q` always answer No, whatever is highlighted.

use super::{drive, Chrome, InputResult, Interactive};
use crate::error::Result;
use crate::theme::Styles;
use crate::ui::{Direction, Key, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YesNoPrompt {
    x: u16,
    y: u16,
    question: String,
    /// Lines shown above the question (summaries, warnings)
    details: Vec<String>,
    yes_highlighted: bool,
}

impl YesNoPrompt {
    pub fn new(x: u16, y: u16, question: impl Into<String>) -> Self {
        Self {
            x,
            y,
            question: question.into(),
            details: Vec::new(),
            yes_highlighted: true,
        }
    }

    pub fn details(mut self, lines: Vec<String>) -> Self {
        self.details = lines;
        self
    }

    /// Highlight No initially, for destructive actions
    pub fn default_no(mut self) -> Self {
        self.yes_highlighted = false;
        self
    }

    pub fn yes_highlighted(&self) -> bool {
        self.yes_highlighted
    }
}

impl Interactive for YesNoPrompt {
    type Output = bool;

    fn render(&self, screen: &mut dyn Screen) {
        for (i, line) in self.details.iter().enumerate() {
            screen.write_at(self.x, self.y + i as u16, line, Styles::text_secondary());
        }
        let question_y = self.y
            + if self.details.is_empty() {
                0
            } else {
                self.details.len() as u16 + 1
            };
        screen.write_at(self.x, question_y, &self.question, Styles::text());

        let (yes_style, no_style) = if self.yes_highlighted {
            (Styles::selected(), Styles::unselected())
        } else {
            (Styles::unselected(), Styles::selected())
        };
        screen.write_at(self.x + 2, question_y + 2, "  Yes  ", yes_style);
        screen.write_at(self.x + 11, question_y + 2, "  No  ", no_style);
    }

    fn handle_key(&mut self, key: Key) -> InputResult<bool> {
        match key {
            Key::Arrow(Direction::Left) | Key::Arrow(Direction::Right) => {
                self.yes_highlighted = !self.yes_highlighted;
                InputResult::Continue
            }
            Key::Char('y') | Key::Char('Y') => InputResult::Confirm(true),
            Key::Char('n') | Key::Char('N') => InputResult::Confirm(false),
            Key::Enter => InputResult::Confirm(self.yes_highlighted),
            k if k.is_cancel() => InputResult::Confirm(false),
            _ => InputResult::Continue,
        }
    }

    fn hint(&self) -> &'static str {
        "←/→ choose  y/n answer  Enter confirm  Esc/q no"
    }
}

/// Ask and wait for an answer
pub fn confirm(screen: &mut dyn Screen, chrome: &Chrome, mut prompt: YesNoPrompt) -> Result<bool> {
    Ok(drive(screen, chrome, &mut prompt)?.unwrap_or(false))
}
