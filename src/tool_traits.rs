//! Type-safe tool argument contracts.
//!
//! This module provides the `ToolArgs` trait for ensuring compile-time
//! correctness of SDK tool invocations. Instead of raw string vectors, Rust
//! structs implement this trait to produce the exact arguments, environment
//! and stdin plan each tool expects.
//!
//! # Design Goals
//!
//! 1. **Compile-Time Safety**: flag mistakes (`-name` vs `-n`, `--list-installed`
//!    vs `--list_installed`) are caught by the struct definitions and their tests.
//! 2. **Single Source of Truth**: The struct definition IS the contract.
//! 3. **Interactive Contracts**: The answers a tool will prompt for are part of
//!    its args, not improvised at the call site.

use crate::process_runner::{ProcessSpec, StdinPlan};
use crate::tools::{SdkLayout, Tool};

/// Trait for typed tool arguments.
///
/// # Contract
///
/// - `tool()`: Which executable runs. The path is resolved against the
///   `SdkLayout` at execution time.
/// - `to_cli_args()`: Arguments exactly as the tool's parser expects them.
/// - `get_env_vars()`: Environment overlay. Defaults to the SDK variables.
/// - `stdin_plan()`: How the tool's prompts are answered.
///
/// # Example
///
/// ```ignore
/// use avidia::tools::avdmanager::DeleteProfileArgs;
///
/// let args = DeleteProfileArgs { name: "pixel_test".into() };
///
/// let cli_args = args.to_cli_args(); // ["delete", "avd", "-n", "pixel_test"]
/// let stdin = args.stdin_plan();     // Scripted(["yes"])
/// ```
pub trait ToolArgs {
    /// The executable this invocation runs
    fn tool(&self) -> Tool;

    /// Convert struct fields to CLI arguments.
    fn to_cli_args(&self) -> Vec<String>;

    /// Environment variables added on top of the inherited environment.
    fn get_env_vars(&self, sdk: &SdkLayout) -> Vec<(String, String)> {
        sdk.env_overlay()
    }

    /// How stdin is fed. Tools that never prompt get `/dev/null`.
    fn stdin_plan(&self) -> StdinPlan {
        StdinPlan::Null
    }

    /// Assemble the full spec for the process runner
    fn to_spec(&self, sdk: &SdkLayout) -> ProcessSpec {
        ProcessSpec::new(sdk.program(self.tool()))
            .args(self.to_cli_args())
            .envs(self.get_env_vars(sdk))
            .stdin(self.stdin_plan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl ToolArgs for Probe {
        fn tool(&self) -> Tool {
            Tool::Emulator
        }

        fn to_cli_args(&self) -> Vec<String> {
            vec!["-version".to_string()]
        }
    }

    #[test]
    fn test_default_spec_carries_sdk_environment() {
        let sdk = SdkLayout::new("/opt/sdk");
        let spec = Probe.to_spec(&sdk);

        assert_eq!(spec.program, sdk.program(Tool::Emulator));
        assert_eq!(spec.args, vec!["-version"]);
        assert_eq!(spec.stdin, StdinPlan::Null);
        assert!(spec
            .env
            .contains(&("ANDROID_HOME".to_string(), "/opt/sdk".to_string())));
        assert!(spec
            .env
            .contains(&("ANDROID_SDK_ROOT".to_string(), "/opt/sdk".to_string())));
    }
}
