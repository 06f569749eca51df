//! Headless command verbs
//!
//! `list`, `start`, `stop` and `delete` run without the full-screen
//! interface and report on plain stdout/stderr. Failures come back as
//! errors for the binary to print and turn into exit status 1.

use crate::config::Settings;
use crate::error::{AvidiaError, Result};
use crate::hardware::HardwareInfo;
use crate::inventory;
use crate::process_runner::{run_foreground, run_streaming, ProcessOutcome, Stream};
use crate::tool_traits::ToolArgs;
use crate::tools::avdmanager::DeleteProfileArgs;
use crate::tools::SdkLayout;
use crate::wizards::start::print_launch_banner;
use crate::wizards::stop::stop_running;
use std::io::{BufRead, Write};

/// Fail unless `name` is an existing profile
fn require_profile(sdk: &SdkLayout, name: &str) -> Result<()> {
    let names = inventory::installed_profiles(sdk)?;
    if names.iter().any(|n| n == name) {
        Ok(())
    } else {
        Err(AvidiaError::general(format!(
            "No virtual device named '{}'",
            name
        )))
    }
}

/// Print the numbered profile list
pub fn list(sdk: &SdkLayout, out: &mut dyn Write) -> Result<()> {
    let names = inventory::installed_profiles(sdk)?;
    writeln!(out, "Available Virtual Devices:")?;
    writeln!(out, "==========================")?;
    if names.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (i, name) in names.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, name)?;
    }
    Ok(())
}

/// Boot `name` in this terminal and wait for the emulator to exit
pub fn start(sdk: &SdkLayout, settings: &Settings, hardware: &HardwareInfo, name: &str) -> Result<()> {
    require_profile(sdk, name)?;
    let args = crate::tools::emulator::LaunchProfileArgs {
        name: name.to_string(),
        acceleration: hardware.acceleration(),
        memory_mb: settings.emulator_memory_mb,
    };
    print_launch_banner(&args);
    let result = run_foreground(args.to_spec(sdk))?;
    match result.outcome {
        ProcessOutcome::Exited(0) | ProcessOutcome::Terminated(_) => {
            println!("✓ Virtual device '{}' has stopped", name);
            Ok(())
        }
        _ => Err(AvidiaError::process(format!(
            "Emulator {}",
            result.describe()
        ))),
    }
}

/// Stop every emulator process serving `name`
pub fn stop(sdk: &SdkLayout, settings: &Settings, name: &str) -> Result<()> {
    let Some(profile) = inventory::find_running(sdk, name)? else {
        return Err(AvidiaError::general(format!(
            "Virtual device '{}' is not running",
            name
        )));
    };
    if stop_running(&profile, settings.stop_grace()) {
        println!("✓ Virtual device '{}' stopped", name);
        Ok(())
    } else {
        Err(AvidiaError::process(format!(
            "Virtual device '{}' is still running",
            name
        )))
    }
}

/// Ask a y/N question on `input`; anything but y/yes is No
pub fn ask_yes_no(question: &str, input: &mut dyn BufRead) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Delete `name`, stopping it first if it is running.
///
/// Without `assume_yes` the user is asked on `input`; declining is not an
/// error.
pub fn delete(
    sdk: &SdkLayout,
    settings: &Settings,
    name: &str,
    assume_yes: bool,
    input: &mut dyn BufRead,
) -> Result<()> {
    require_profile(sdk, name)?;
    if !assume_yes
        && !ask_yes_no(
            &format!("Delete virtual device '{}' and all its data?", name),
            input,
        )?
    {
        println!("Cancelled.");
        return Ok(());
    }

    if let Some(profile) = inventory::find_running(sdk, name)? {
        println!("Stopping running device '{}'...", name);
        if !stop_running(&profile, settings.stop_grace()) {
            return Err(AvidiaError::process(format!(
                "Virtual device '{}' could not be stopped",
                name
            )));
        }
    }

    let args = DeleteProfileArgs {
        name: name.to_string(),
    };
    let result = run_streaming(args.to_spec(sdk), |line| match line.stream {
        Stream::Stdout => println!("{}", line.text),
        Stream::Stderr => eprintln!("{}", line.text),
    })?;
    if result.success() {
        println!("✓ Virtual device '{}' deleted", name);
        Ok(())
    } else {
        Err(AvidiaError::process(format!(
            "Device removal failed: avdmanager {}",
            result.describe()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn script(path: &Path, body: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn sdk_with_profiles(dir: &TempDir) -> SdkLayout {
        let sdk = SdkLayout::new(dir.path());
        script(&sdk.emulator, "echo Pixel_7\necho Tablet");
        sdk
    }

    #[test]
    fn test_list_numbers_profiles() {
        let dir = TempDir::new().unwrap();
        let sdk = sdk_with_profiles(&dir);
        let mut out = Vec::new();
        list(&sdk, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  [1] Pixel_7\n"));
        assert!(text.contains("  [2] Tablet\n"));
    }

    #[test]
    fn test_yes_no_answers() {
        assert!(ask_yes_no("Sure?", &mut Cursor::new("y\n")).unwrap());
        assert!(ask_yes_no("Sure?", &mut Cursor::new("YES\n")).unwrap());
        assert!(!ask_yes_no("Sure?", &mut Cursor::new("\n")).unwrap());
        assert!(!ask_yes_no("Sure?", &mut Cursor::new("")).unwrap());
    }

    #[test]
    fn test_delete_unknown_profile_is_error() {
        let dir = TempDir::new().unwrap();
        let sdk = sdk_with_profiles(&dir);
        let err = delete(&sdk, &Settings::default(), "Nope", true, &mut Cursor::new(""))
            .unwrap_err();
        assert!(err.to_string().contains("No virtual device named 'Nope'"));
    }

    #[test]
    fn test_delete_declined_runs_nothing() {
        let dir = TempDir::new().unwrap();
        let sdk = sdk_with_profiles(&dir);
        let marker = dir.path().join("deleted");
        script(&sdk.avdmanager, &format!("touch {}", marker.display()));

        delete(&sdk, &Settings::default(), "Tablet", false, &mut Cursor::new("n\n")).unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn test_delete_answers_yes_to_tool() {
        let dir = TempDir::new().unwrap();
        let sdk = sdk_with_profiles(&dir);
        let answer = dir.path().join("answer");
        script(
            &sdk.avdmanager,
            &format!("read reply\necho \"$*:$reply\" > {}", answer.display()),
        );

        delete(&sdk, &Settings::default(), "Tablet", true, &mut Cursor::new("")).unwrap();
        assert_eq!(
            fs::read_to_string(&answer).unwrap().trim(),
            "delete avd -n Tablet:yes"
        );
    }

    #[test]
    fn test_stop_not_running_is_error() {
        let dir = TempDir::new().unwrap();
        let sdk = sdk_with_profiles(&dir);
        assert!(stop(&sdk, &Settings::default(), "Pixel_7").is_err());
    }
}
