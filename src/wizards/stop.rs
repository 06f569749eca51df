//! Stop a running emulator

use super::{fail, notice};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::catalog::RunningProfile;
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{confirm, select, Chrome, SelectList, SelectOption, YesNoPrompt};
use crate::error::Result;
use crate::inventory;
use crate::process_guard::terminate_process;
use crate::ui::Screen;
use std::time::Duration;

const KIND: WizardKind = WizardKind::Stop;

/// SIGTERM every process serving `profile`, SIGKILL what survives the
/// grace period. True when all of them are gone.
pub fn stop_running(profile: &RunningProfile, grace: Duration) -> bool {
    tracing::info!(name = %profile.name, pids = ?profile.pids, "stopping emulator");
    profile
        .pids
        .iter()
        .map(|&pid| terminate_process(pid, grace))
        .fold(true, |all, gone| all && gone)
}

pub fn run(screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    let chrome = Chrome::new(KIND.title());
    let running = match inventory::running_profiles(&ctx.sdk) {
        Ok(running) => running,
        Err(e) => return fail(screen, "Cannot Read Process Table", e.to_string()),
    };
    if running.is_empty() {
        return notice(
            screen,
            "No Running Devices",
            vec!["No virtual devices are currently running.".to_string()],
        );
    }

    let options = running
        .iter()
        .map(|profile| {
            let pids: Vec<String> = profile.pids.iter().map(u32::to_string).collect();
            SelectOption::new(
                format!("{} (pid {})", profile.name, pids.join(", ")),
                profile.clone(),
            )
        })
        .collect();
    let list = SelectList::new(
        BODY_LEFT,
        BODY_TOP,
        "Select device to stop:",
        options,
        ctx.settings.page_size,
    );
    let Some(profile) = select(screen, &chrome, list)? else {
        return Ok(WizardOutcome::Cancelled);
    };

    let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Are you sure you want to stop this device?")
        .details(vec![
            format!("Device:     {}", profile.name),
            "All unsaved data in the device will be lost.".to_string(),
        ])
        .default_no();
    if !confirm(screen, &chrome, prompt)? {
        return Ok(WizardOutcome::Cancelled);
    }

    if stop_running(&profile, ctx.settings.stop_grace()) {
        notice(
            screen,
            "Device Stopped",
            vec![format!("Virtual device '{}' has been stopped.", profile.name)],
        )
    } else {
        fail(
            screen,
            "Stop Failed",
            format!("Virtual device '{}' is still running", profile.name),
        )
    }
}
