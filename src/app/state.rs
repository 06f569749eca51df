//! Navigation state definitions
//!
//! Contains the main-menu state machine: which screen is active, what the
//! user last chose, and how the previous wizard ended.

use crate::error::AvidiaError;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// The guided flows reachable from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum WizardKind {
    List,
    Create,
    Start,
    Stop,
    Delete,
    Install,
    Info,
}

impl WizardKind {
    /// Main menu label
    pub fn label(self) -> &'static str {
        match self {
            WizardKind::List => "List Virtual Devices",
            WizardKind::Create => "Create New Device",
            WizardKind::Start => "Start Virtual Device",
            WizardKind::Stop => "Stop Virtual Device",
            WizardKind::Delete => "Remove Virtual Device",
            WizardKind::Install => "Install System Image",
            WizardKind::Info => "System Information",
        }
    }

    /// Title band text while the wizard runs
    pub fn title(self) -> &'static str {
        match self {
            WizardKind::List => "Virtual Devices",
            WizardKind::Create => "Create New Virtual Device",
            WizardKind::Start => "Start Virtual Device",
            WizardKind::Stop => "Stop Virtual Device",
            WizardKind::Delete => "Remove Virtual Device",
            WizardKind::Install => "Install System Image",
            WizardKind::Info => "System Information",
        }
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// What a main menu entry does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Open(WizardKind),
    Exit,
}

/// Main menu entries in display order
pub fn main_menu_actions() -> Vec<(&'static str, MenuAction)> {
    WizardKind::iter()
        .map(|kind| (kind.label(), MenuAction::Open(kind)))
        .chain(std::iter::once(("Exit to Shell", MenuAction::Exit)))
        .collect()
}

/// How a wizard ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    /// Ran to the end (including "nothing to do")
    Completed,
    /// The user backed out; no tool was launched after the point of exit
    Cancelled,
    /// A tool could not be started or reported failure
    Failed(String),
}

/// Current application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    MainMenu,
    InWizard(WizardKind),
    Terminated,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::MainMenu => write!(f, "main menu"),
            AppMode::InWizard(kind) => write!(f, "wizard '{}'", kind),
            AppMode::Terminated => write!(f, "terminated"),
        }
    }
}

/// Errors that can occur during mode transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Wizards are only opened from the main menu
    #[error("Cannot open {wizard} from {from}")]
    NotInMainMenu { from: AppMode, wizard: WizardKind },

    /// Only a running wizard can finish
    #[error("No wizard is running (mode is {from})")]
    NoActiveWizard { from: AppMode },

    /// Exit is only reachable from the main menu
    #[error("Cannot exit from {from}")]
    CannotTerminate { from: AppMode },
}

impl From<NavigationError> for AvidiaError {
    fn from(err: NavigationError) -> Self {
        AvidiaError::General(err.to_string())
    }
}

/// Main application state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Current application mode
    pub mode: AppMode,
    /// Main menu highlight, kept across wizard visits
    pub main_menu_selection: usize,
    /// How the most recent wizard ended
    pub last_outcome: Option<(WizardKind, WizardOutcome)>,
}

impl AppState {
    /// MainMenu -> InWizard
    pub fn enter_wizard(&mut self, kind: WizardKind) -> Result<(), NavigationError> {
        if self.mode != AppMode::MainMenu {
            return Err(NavigationError::NotInMainMenu {
                from: self.mode,
                wizard: kind,
            });
        }
        tracing::info!(wizard = %kind, "entering wizard");
        self.mode = AppMode::InWizard(kind);
        Ok(())
    }

    /// InWizard -> MainMenu, whatever the outcome
    pub fn finish_wizard(&mut self, outcome: WizardOutcome) -> Result<(), NavigationError> {
        let AppMode::InWizard(kind) = self.mode else {
            return Err(NavigationError::NoActiveWizard { from: self.mode });
        };
        tracing::info!(wizard = %kind, ?outcome, "wizard finished");
        self.last_outcome = Some((kind, outcome));
        self.mode = AppMode::MainMenu;
        Ok(())
    }

    /// MainMenu -> Terminated
    pub fn terminate(&mut self) -> Result<(), NavigationError> {
        if self.mode != AppMode::MainMenu {
            return Err(NavigationError::CannotTerminate { from: self.mode });
        }
        self.mode = AppMode::Terminated;
        Ok(())
    }

    /// One-line summary of the last wizard for the main menu
    pub fn status_line(&self) -> Option<String> {
        self.last_outcome.as_ref().map(|(kind, outcome)| match outcome {
            WizardOutcome::Completed => format!("{}: done", kind),
            WizardOutcome::Cancelled => format!("{}: cancelled", kind),
            WizardOutcome::Failed(reason) => format!("{}: failed ({})", kind, reason),
        })
    }
}
