//! Single-page menu with wrapping navigation
//!
//! Up/Down wrap around the ends; a digit activates that item directly; Enter
//! activates the highlighted one. Escape and `q` leave the menu.

use super::{InputResult, Interactive};
use crate::theme::Styles;
use crate::ui::{Direction, Key, Screen};

/// Label and the action it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub label: String,
    pub action: A,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuList<A> {
    x: u16,
    y: u16,
    title: String,
    items: Vec<MenuItem<A>>,
    selected: usize,
}

impl<A: Clone> MenuList<A> {
    pub fn new(x: u16, y: u16, title: impl Into<String>, items: Vec<MenuItem<A>>) -> Self {
        Self {
            x,
            y,
            title: title.into(),
            items,
            selected: 0,
        }
    }

    /// Restore a previous highlight (clamped)
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self
    }

    /// Highlighted index, also after the menu returned
    pub fn selected(&self) -> usize {
        self.selected
    }
}

impl<A: Clone> Interactive for MenuList<A> {
    type Output = A;

    fn render(&self, screen: &mut dyn Screen) {
        screen.write_at(self.x, self.y, &self.title, Styles::title());
        for (i, item) in self.items.iter().enumerate() {
            let style = if i == self.selected {
                Styles::selected()
            } else {
                Styles::unselected()
            };
            screen.write_at(
                self.x,
                self.y + 2 + i as u16,
                &format!(" [{}] {} ", i + 1, item.label),
                style,
            );
        }
    }

    fn handle_key(&mut self, key: Key) -> InputResult<A> {
        let count = self.items.len();
        if count == 0 {
            return InputResult::Cancel;
        }
        match key {
            Key::Arrow(Direction::Up) => {
                self.selected = (self.selected + count - 1) % count;
                InputResult::Continue
            }
            Key::Arrow(Direction::Down) => {
                self.selected = (self.selected + 1) % count;
                InputResult::Continue
            }
            Key::Enter => InputResult::Confirm(self.items[self.selected].action.clone()),
            k if k.is_cancel() => InputResult::Cancel,
            k => match k.digit() {
                Some(d) if d >= 1 && d <= count => {
                    self.selected = d - 1;
                    InputResult::Confirm(self.items[self.selected].action.clone())
                }
                _ => InputResult::Continue,
            },
        }
    }

    fn hint(&self) -> &'static str {
        "↑/↓ move  1-9 jump  Enter select  Esc/q quit"
    }
}
