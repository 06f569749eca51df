//! Show existing virtual devices

use super::{fail, notice};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::components::MessageBox;
use crate::error::Result;
use crate::inventory;
use crate::ui::Screen;

/// Lines shown for `names`, at most `limit` of them
pub fn listing_lines(names: &[String], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = names
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, name)| format!("[{}] {}", i + 1, name))
        .collect();
    if names.len() > limit {
        lines.push(String::new());
        lines.push(format!(
            "Showing first {} devices of {}",
            limit,
            names.len()
        ));
    }
    lines
}

pub fn run(screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    let title = WizardKind::List.title();
    let names = match inventory::installed_profiles(&ctx.sdk) {
        Ok(names) => names,
        Err(e) => return fail(screen, "Cannot List Devices", e.to_string()),
    };
    if names.is_empty() {
        return notice(
            screen,
            title,
            vec![
                "No virtual devices found.".to_string(),
                "Create one from the main menu.".to_string(),
            ],
        );
    }
    MessageBox::new(title, listing_lines(&names, ctx.settings.page_size)).show(screen)?;
    Ok(WizardOutcome::Completed)
}
