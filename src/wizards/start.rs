//! Boot a virtual device with the terminal handed to the emulator

use super::{fail, notice, pick_profile};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{confirm, Chrome, YesNoPrompt};
use crate::error::Result;
use crate::inventory;
use crate::process_runner::{run_foreground, ProcessOutcome, ProcessResult};
use crate::tool_traits::ToolArgs;
use crate::tools::emulator::{Acceleration, LaunchProfileArgs};
use crate::ui::Screen;

const KIND: WizardKind = WizardKind::Start;

/// Launch arguments for `name` on this machine
pub fn launch_args(ctx: &AppContext, name: &str) -> LaunchProfileArgs {
    LaunchProfileArgs {
        name: name.to_string(),
        acceleration: ctx.hardware.acceleration(),
        memory_mb: ctx.settings.emulator_memory_mb,
    }
}

/// Banner printed on the plain terminal before the emulator takes over
pub fn print_launch_banner(args: &LaunchProfileArgs) {
    println!("Starting virtual device: {}", args.name);
    match args.acceleration {
        Acceleration::Hardware => println!("KVM acceleration enabled"),
        Acceleration::Software => {
            println!("KVM not available, using software rendering (slow)")
        }
    }
    println!("Press Ctrl+C to stop the emulator");
    println!();
}

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
            vec!["No virtual devices found. Create one first.".to_string()],
        );
    }
    let Some(name) = pick_profile(screen, &chrome, ctx, "Select device to start:", &names)? else {
        return Ok(WizardOutcome::Cancelled);
    };

    let args = launch_args(ctx, &name);
    let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Start this virtual device?").details(vec![
        format!("Device:     {}", name),
        format!("KVM:        {}", ctx.hardware.kvm),
        format!("GPU:        {}", args.acceleration.gpu_mode()),
        format!("Memory:     {} MB", args.memory_mb),
        String::new(),
        "The emulator takes over this terminal until it exits.".to_string(),
    ]);
    if !confirm(screen, &chrome, prompt)? {
        return Ok(WizardOutcome::Cancelled);
    }

    let spec = args.to_spec(&ctx.sdk);
    let mut result: Option<Result<ProcessResult>> = None;
    screen.suspend(&mut || {
        print_launch_banner(&args);
        result = Some(run_foreground(spec.clone()));
    })?;

    let result = match result {
        Some(result) => result?,
        None => return fail(screen, "Start Failed", "The emulator was not launched"),
    };
    match result.outcome {
        ProcessOutcome::Exited(0) | ProcessOutcome::Terminated(_) => notice(
            screen,
            "Emulator Closed",
            vec![format!("Virtual device '{}' has stopped.", name)],
        ),
        _ => fail(
            screen,
            "Start Failed",
            format!("Emulator for '{}' {}", name, result.describe()),
        ),
    }
}
