//! Environment summary

use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::components::MessageBox;
use crate::error::Result;
use crate::inventory;
use crate::sanity::verify_environment;
use crate::ui::Screen;

/// Lines describing the SDK, the hardware and what is installed
pub fn info_lines(ctx: &AppContext) -> Vec<String> {
    let check = verify_environment(&ctx.sdk);
    let mut lines = vec![format!("SDK root:        {}", ctx.sdk.root.display())];
    for (tool, _path, status) in &check.tools {
        lines.push(format!("{:<16} {}", format!("{}:", tool), status));
    }
    lines.push(format!("KVM:             {}", ctx.hardware.kvm));
    lines.push(format!(
        "Acceleration:    {}",
        ctx.hardware.acceleration().gpu_mode()
    ));

    let count = |n: Result<usize>| match n {
        Ok(n) => n.to_string(),
        Err(_) => "unknown".to_string(),
    };
    lines.push(format!(
        "Devices:         {}",
        count(inventory::installed_profiles(&ctx.sdk).map(|p| p.len()))
    ));
    lines.push(format!(
        "Running:         {}",
        count(inventory::running_profiles(&ctx.sdk).map(|p| p.len()))
    ));
    lines.push(format!(
        "Catalog:         {} versions, {} device models",
        ctx.catalog.api_levels.len(),
        ctx.catalog.devices.len()
    ));
    lines
}

pub fn run(screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    MessageBox::new(WizardKind::Info.title(), info_lines(ctx)).show(screen)?;
    Ok(WizardOutcome::Completed)
}
