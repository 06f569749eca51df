//! Application module
//!
//! The navigation controller: shows the main menu, opens one wizard at a
//! time and comes back to the menu whatever the wizard's outcome.

mod context;
mod state;

pub use context::AppContext;
pub use state::{
    main_menu_actions, AppMode, AppState, MenuAction, NavigationError, WizardKind, WizardOutcome,
};

use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{drive, Chrome, MenuItem, MenuList};
use crate::error::Result;
use crate::ui::Screen;
use crate::wizards;

/// Main application
pub struct App<'a> {
    ctx: &'a AppContext,
    state: AppState,
}

impl<'a> App<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Main loop: menu, wizard, menu, ... until Exit, `q` or Escape
    pub fn run(&mut self, screen: &mut dyn Screen) -> Result<()> {
        tracing::info!("Starting main application loop");
        while self.state.mode != AppMode::Terminated {
            match self.main_menu(screen)? {
                Some(MenuAction::Open(kind)) => {
                    self.open(screen, kind)?;
                }
                Some(MenuAction::Exit) | None => self.state.terminate()?,
            }
        }
        tracing::info!("Main loop finished");
        Ok(())
    }

    /// Show the main menu once. `None` means the user quit.
    fn main_menu(&mut self, screen: &mut dyn Screen) -> Result<Option<MenuAction>> {
        // Rebuilt on every visit
        let items = main_menu_actions()
            .into_iter()
            .map(|(label, action)| MenuItem::new(label, action))
            .collect();
        let mut menu = MenuList::new(BODY_LEFT, BODY_TOP, "Main Menu", items)
            .with_selected(self.state.main_menu_selection);

        let mut chrome = Chrome::new("Android Virtual Device Manager");
        if let Some(status) = self.state.status_line() {
            chrome = chrome.with_subtitle(status);
        }
        let choice = drive(screen, &chrome, &mut menu)?;
        self.state.main_menu_selection = menu.selected();
        Ok(choice)
    }

    /// Run one wizard from the main menu and record how it ended
    pub fn open(&mut self, screen: &mut dyn Screen, kind: WizardKind) -> Result<WizardOutcome> {
        self.state.enter_wizard(kind)?;
        match wizards::run(kind, screen, self.ctx) {
            Ok(outcome) => {
                self.state.finish_wizard(outcome.clone())?;
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(wizard = %kind, error = %e, "wizard aborted");
                self.state
                    .finish_wizard(WizardOutcome::Failed(e.to_string()))?;
                Err(e)
            }
        }
    }

    /// Run the Create wizard with a prefilled name, as `avidia create <name>`
    pub fn open_create(&mut self, screen: &mut dyn Screen, name: &str) -> Result<WizardOutcome> {
        self.state.enter_wizard(WizardKind::Create)?;
        let outcome = wizards::create::run(screen, self.ctx, Some(name));
        let recorded = match &outcome {
            Ok(outcome) => outcome.clone(),
            Err(e) => WizardOutcome::Failed(e.to_string()),
        };
        self.state.finish_wizard(recorded)?;
        outcome
    }
}
