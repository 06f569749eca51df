//! Screen chrome: title band and key-hint footer
//!
//! Every screen shares the same frame: a ruled title band on the first three
//! rows and the active widget's key hints on the last row. Widgets start at
//! [`BODY_TOP`].

use crate::theme::{Colors, Styles};
use crate::ui::Screen;
use ratatui::style::Style;

/// Application name shown in every title band
pub const APP_NAME: &str = "Avidia";

/// First row available to widgets
pub const BODY_TOP: u16 = 4;

/// Left margin for widgets
pub const BODY_LEFT: u16 = 2;

/// Title band and footer around a widget
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chrome {
    pub title: String,
    /// Shown right of the title, e.g. a wizard step counter
    pub subtitle: Option<String>,
}

impl Chrome {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Stage the band and footer. An empty title draws nothing.
    pub fn render(&self, screen: &mut dyn Screen, hint: &str) {
        if self.title.is_empty() {
            return;
        }
        let area = screen.area();
        let rule = "=".repeat(area.width as usize);
        let rule_style = Style::default().fg(Colors::PRIMARY);

        screen.write_at(0, 0, &rule, rule_style);
        let heading = match &self.subtitle {
            Some(sub) => format!(" {} | {} ({})", APP_NAME, self.title, sub),
            None => format!(" {} | {}", APP_NAME, self.title),
        };
        screen.write_at(0, 1, &heading, Styles::title());
        screen.write_at(0, 2, &rule, rule_style);

        if !hint.is_empty() && area.height > BODY_TOP + 1 {
            screen.write_at(0, area.height - 1, &format!(" {}", hint), Styles::nav_hint());
        }
    }
}
