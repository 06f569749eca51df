//! Screen surface: terminal lifecycle, staged drawing and key input
//!
//! Everything above this module talks to a `&mut dyn Screen` and never to
//! crossterm directly, which is what lets widgets and wizards run against
//! ratatui's `TestBackend` with scripted keys.

pub mod keys;
pub mod session;
pub mod surface;

pub use keys::{Direction, Key, KeySource, ScriptedKeys, TerminalKeys};
pub use session::{install_panic_hook, restore_terminal, TerminalSession};
pub use surface::{render_widget, Screen, Surface};
