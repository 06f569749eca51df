//! Live queries against the SDK tools
//!
//! What exists on this machine right now: created profiles, running
//! emulators, installed packages. Each query runs one tool to completion
//! and parses its output with the matchers in [`crate::catalog`].

use crate::catalog::{
    output_mentions_package, parse_profile_list, parse_running_profiles, PackageId,
    RunningProfile,
};
use crate::error::{AvidiaError, Result};
use crate::process_runner::{run_captured, CapturedOutput, ProcessOutcome};
use crate::tool_traits::ToolArgs;
use crate::tools::emulator::ListProfilesArgs;
use crate::tools::ps::ProcessTableArgs;
use crate::tools::sdkmanager::ListInstalledArgs;
use crate::tools::SdkLayout;

/// Run a listing tool; anything but a clean exit is an error
fn listing<A: ToolArgs>(args: &A, sdk: &SdkLayout) -> Result<CapturedOutput> {
    let spec = args.to_spec(sdk);
    let name = spec.program_name();
    let output = run_captured(spec)?;
    match &output.result.outcome {
        ProcessOutcome::Exited(0) => Ok(output),
        _ => Err(AvidiaError::process(format!(
            "{} {}",
            name,
            output.result.describe()
        ))),
    }
}

/// Profile names known to the device runtime
pub fn installed_profiles(sdk: &SdkLayout) -> Result<Vec<String>> {
    let output = listing(&ListProfilesArgs, sdk)?;
    // Warnings go to stderr and must not be mistaken for names
    let stdout: Vec<&str> = output.stdout_lines().collect();
    let profiles = parse_profile_list(&stdout.join("\n"));
    tracing::debug!(count = profiles.len(), "profiles listed");
    Ok(profiles)
}

/// Emulators currently running, from the process table
pub fn running_profiles(sdk: &SdkLayout) -> Result<Vec<RunningProfile>> {
    let output = listing(&ProcessTableArgs, sdk)?;
    let stdout: Vec<&str> = output.stdout_lines().collect();
    let running = parse_running_profiles(&stdout.join("\n"));
    tracing::debug!(count = running.len(), "running emulators found");
    Ok(running)
}

/// The running emulator serving `name`, if any
pub fn find_running(sdk: &SdkLayout, name: &str) -> Result<Option<RunningProfile>> {
    Ok(running_profiles(sdk)?.into_iter().find(|p| p.name == name))
}

/// Whether the package installer lists `package` as installed
pub fn is_package_installed(sdk: &SdkLayout, package: &PackageId) -> Result<bool> {
    let output = listing(&ListInstalledArgs, sdk)?;
    let installed = output_mentions_package(&output.text(), package);
    tracing::info!(package = %package, installed, "pre-flight package check");
    Ok(installed)
}
