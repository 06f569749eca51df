//! Widget library
//!
//! Each widget is a state struct with a pure `handle_key` and a `render`
//! against a `Screen`. [`drive`] is the one event loop: render, refresh,
//! poll, dispatch. A poll timeout is never input, so widgets only redraw.

pub mod header;
pub mod menu_list;
pub mod message_box;
pub mod output_view;
pub mod select_list;
pub mod text_field;
pub mod yes_no;

pub use header::Chrome;
pub use menu_list::{MenuItem, MenuList};
pub use message_box::{MessageBox, MessageKind};
pub use output_view::OutputView;
pub use select_list::{select, SelectList, SelectOption};
pub use text_field::TextField;
pub use yes_no::{confirm, YesNoPrompt};

use crate::error::Result;
use crate::ui::{Key, Screen};

/// Outcome of feeding one key to a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult<T> {
    /// Value committed
    Confirm(T),
    /// User backed out
    Cancel,
    /// Keep going
    Continue,
}

/// A widget that can be driven by keys
pub trait Interactive {
    type Output;

    /// Stage the widget on `screen`
    fn render(&self, screen: &mut dyn Screen);

    /// Apply one key
    fn handle_key(&mut self, key: Key) -> InputResult<Self::Output>;

    /// Key help shown in the footer
    fn hint(&self) -> &'static str {
        ""
    }
}

/// Run `widget` until it confirms or cancels. `None` means cancelled.
pub fn drive<W: Interactive + ?Sized>(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    widget: &mut W,
) -> Result<Option<W::Output>> {
    loop {
        screen.clear()?;
        chrome.render(screen, widget.hint());
        widget.render(screen);
        screen.refresh()?;

        let Some(key) = screen.poll_key()? else {
            continue;
        };
        match widget.handle_key(key) {
            InputResult::Confirm(value) => return Ok(Some(value)),
            InputResult::Cancel => return Ok(None),
            InputResult::Continue => {}
        }
    }
}
