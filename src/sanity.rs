//! Pre-flight sanity checks for the runtime environment
//!
//! This module verifies the SDK before the TUI starts:
//! - The base directory exists
//! - The package enumerator, profile manager and runtime are executable
//!
//! If any check fails, the program exits with a clear error message
//! before the TUI is initialized.

use crate::tools::{SdkLayout, Tool, SDK_ENV};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// State of one required executable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Ready,
    Missing,
    NotExecutable,
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolStatus::Ready => write!(f, "ready"),
            ToolStatus::Missing => write!(f, "missing"),
            ToolStatus::NotExecutable => write!(f, "not executable"),
        }
    }
}

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub sdk_root: PathBuf,
    pub root_exists: bool,
    pub tools: Vec<(Tool, PathBuf, ToolStatus)>,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.root_exists
            && self
                .tools
                .iter()
                .all(|(_, _, status)| *status == ToolStatus::Ready)
    }

    /// Tools that failed their check
    pub fn problems(&self) -> impl Iterator<Item = &(Tool, PathBuf, ToolStatus)> {
        self.tools
            .iter()
            .filter(|(_, _, status)| *status != ToolStatus::Ready)
    }
}

/// Classify a path as a usable executable
pub fn tool_status(path: &Path) -> ToolStatus {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.permissions().mode() & 0o111 != 0 => ToolStatus::Ready,
        Ok(_) => ToolStatus::NotExecutable,
        Err(_) => ToolStatus::Missing,
    }
}

/// Perform all sanity checks and return the result
pub fn verify_environment(sdk: &SdkLayout) -> SanityCheckResult {
    let tools = Tool::iter()
        .filter(|tool| tool.is_sdk_tool())
        .map(|tool| {
            let path = sdk.program(tool);
            let status = tool_status(&path);
            (tool, path, status)
        })
        .collect();

    let result = SanityCheckResult {
        sdk_root: sdk.root.clone(),
        root_exists: sdk.root.is_dir(),
        tools,
    };
    tracing::info!(sdk_root = %result.sdk_root.display(), ok = result.is_ok(), "environment verified");
    result
}

/// Print a pretty error message to stderr and exit
/// This is called before TUI initialization, so we can safely print to stderr
pub fn print_error_and_exit(result: &SanityCheckResult) -> ! {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════════╗");
    eprintln!("║                 Avidia - Pre-flight Check Failed                 ║");
    eprintln!("╚══════════════════════════════════════════════════════════════════╝");
    eprintln!();

    if !result.root_exists {
        eprintln!("❌ ERROR: Android SDK directory not found");
        eprintln!("   {}", result.sdk_root.display());
        eprintln!();
        eprintln!("   Solution: point {} at your SDK installation:", SDK_ENV);
        eprintln!("     export {}=$HOME/Android/Sdk", SDK_ENV);
        eprintln!();
    } else {
        let problems: Vec<_> = result.problems().collect();
        if !problems.is_empty() {
            eprintln!("❌ ERROR: Required SDK tools are not usable");
            eprintln!();
            for (tool, path, status) in problems {
                eprintln!("   • {} ({}): {}", tool, status, path.display());
            }
            eprintln!();
            eprintln!("   Solution: install the missing SDK components:");
            eprintln!("     sdkmanager \"cmdline-tools;latest\" emulator");
            eprintln!();
        }
    }

    eprintln!("╔══════════════════════════════════════════════════════════════════╗");
    eprintln!("║  Fix the above issues and try again.                             ║");
    eprintln!("╚══════════════════════════════════════════════════════════════════╝");
    eprintln!();

    std::process::exit(1);
}

/// Main entry point: verify environment and exit if checks fail
/// Call this before initializing the TUI
pub fn run_preflight_checks(sdk: &SdkLayout) {
    let result = verify_environment(sdk);
    if !result.is_ok() {
        print_error_and_exit(&result);
    }
}
