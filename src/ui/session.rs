//! Raw-mode terminal lifecycle
//!
//! `TerminalSession` owns raw mode and the alternate screen. Restoration is
//! idempotent and reachable from three places: `Drop`, the panic hook and the
//! signal handler thread.

use crate::error::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the terminal is currently in raw mode on our behalf
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII guard over raw mode and the alternate screen
#[derive(Debug)]
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen and hide the cursor
    pub fn acquire() -> Result<Self> {
        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        if let Err(e) = execute!(stdout(), EnterAlternateScreen, Hide) {
            restore_terminal();
            return Err(e.into());
        }
        tracing::debug!("terminal session acquired");
        Ok(Self { active: true })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn release(&mut self) {
        if self.active {
            restore_terminal();
            self.active = false;
            tracing::debug!("terminal session released");
        }
    }

    /// Re-enter raw mode after `release`
    pub fn reacquire(&mut self) -> Result<()> {
        if !self.active {
            *self = Self::acquire()?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Leave raw mode and the alternate screen if we entered them.
///
/// Errors are ignored: this runs on the way out of a panic or a signal.
pub fn restore_terminal() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
    }
}

/// Chain a panic hook that restores the terminal before the default report
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_without_session_is_noop() {
        restore_terminal();
        restore_terminal();
        assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
    }

    #[test]
    fn test_released_session_drops_quietly() {
        let mut session = TerminalSession { active: false };
        session.release();
        assert!(!session.is_active());
    }
}
