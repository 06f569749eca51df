//! Remove a virtual device profile, stopping it first if it is running

use super::stop::stop_running;
use super::{fail, notice, pick_profile, report, stream_tool};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{confirm, Chrome, OutputView, YesNoPrompt};
use crate::error::Result;
use crate::inventory;
use crate::tool_traits::ToolArgs;
use crate::tools::avdmanager::DeleteProfileArgs;
use crate::ui::Screen;

const KIND: WizardKind = WizardKind::Delete;

pub fn run(screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    let chrome = Chrome::new(KIND.title());
    let names = match inventory::installed_profiles(&ctx.sdk) {
        Ok(names) => names,
        Err(e) => return fail(screen, "Cannot List Devices", e.to_string()),
    };
    if names.is_empty() {
        return notice(
            screen,
            "No Virtual Devices",
            vec!["There are no virtual devices to remove.".to_string()],
        );
    }
    let Some(name) = pick_profile(screen, &chrome, ctx, "Select device to remove:", &names)? else {
        return Ok(WizardOutcome::Cancelled);
    };

    // A failed process scan only loses the warning
    let running = inventory::find_running(&ctx.sdk, &name).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not check whether the device is running");
        None
    });

    let mut details = vec![
        format!("Device:     {}", name),
        String::new(),
        "This permanently deletes the device and all its data.".to_string(),
    ];
    if running.is_some() {
        details.push("WARNING: this device is running and will be stopped first.".to_string());
    }
    let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Remove this virtual device?")
        .details(details)
        .default_no();
    if !confirm(screen, &chrome, prompt)? {
        return Ok(WizardOutcome::Cancelled);
    }

    let mut view = OutputView::new(chrome);
    if let Some(profile) = &running {
        view.note(format!("Stopping running device '{}' ...", name));
        view.draw(screen)?;
        if !stop_running(profile, ctx.settings.stop_grace()) {
            return fail(
                screen,
                "Remove Failed",
                format!("Virtual device '{}' could not be stopped", name),
            );
        }
    }

    view.note(format!("Removing virtual device '{}' ...", name));
    let args = DeleteProfileArgs { name: name.clone() };
    let result = stream_tool(screen, &mut view, args.to_spec(&ctx.sdk))?;
    report(
        screen,
        &mut view,
        "Device removal",
        &result,
        &format!("Virtual device '{}' removed.", name),
    )
}
