//! Type-safe arguments for the device runtime.
//!
//! - `ListProfilesArgs` for `emulator -list-avds`
//! - `LaunchProfileArgs` for `emulator -avd <name> ...`

use crate::process_runner::{ProcessSpec, StdinPlan};
use crate::tool_traits::ToolArgs;
use crate::tools::{SdkLayout, Tool};

/// Existing virtual device profiles
#[derive(Debug, Clone, Copy, Default)]
pub struct ListProfilesArgs;

impl ToolArgs for ListProfilesArgs {
    fn tool(&self) -> Tool {
        Tool::Emulator
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["-list-avds".to_string()]
    }
}

/// How the emulated CPU and GPU run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceleration {
    /// KVM plus host GPU
    Hardware,
    /// Software GPU, no KVM
    Software,
}

impl Acceleration {
    pub fn gpu_mode(self) -> &'static str {
        match self {
            Acceleration::Hardware => "host",
            Acceleration::Software => "swiftshader_indirect",
        }
    }
}

/// Boot a profile with the terminal handed over to the emulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchProfileArgs {
    pub name: String,
    pub acceleration: Acceleration,
    pub memory_mb: u32,
}

impl ToolArgs for LaunchProfileArgs {
    fn tool(&self) -> Tool {
        Tool::Emulator
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-avd".into(),
            self.name.clone(),
            "-gpu".into(),
            self.acceleration.gpu_mode().into(),
            "-memory".into(),
            self.memory_mb.to_string(),
            "-no-snapshot-load".into(),
            "-netdelay".into(),
            "none".into(),
            "-netspeed".into(),
            "full".into(),
        ];
        // -qemu swallows everything after it
        if self.acceleration == Acceleration::Hardware {
            args.extend(["-qemu".into(), "-enable-kvm".into()]);
        }
        args
    }

    fn stdin_plan(&self) -> StdinPlan {
        StdinPlan::Inherit
    }

    fn to_spec(&self, sdk: &SdkLayout) -> ProcessSpec {
        ProcessSpec::new(sdk.program(self.tool()))
            .args(self.to_cli_args())
            .envs(self.get_env_vars(sdk))
            .foreground()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_runner::StdioMode;

    #[test]
    fn test_hardware_launch_ends_with_qemu_flags() {
        let args = LaunchProfileArgs {
            name: "Pixel_7".to_string(),
            acceleration: Acceleration::Hardware,
            memory_mb: 4096,
        };
        let cli = args.to_cli_args();
        assert_eq!(&cli[..4], &["-avd", "Pixel_7", "-gpu", "host"]);
        assert!(cli.windows(2).any(|w| w == ["-memory", "4096"]));
        assert_eq!(&cli[cli.len() - 2..], &["-qemu", "-enable-kvm"]);
    }

    #[test]
    fn test_software_launch() {
        let args = LaunchProfileArgs {
            name: "slow".to_string(),
            acceleration: Acceleration::Software,
            memory_mb: 2048,
        };
        let cli = args.to_cli_args();
        assert!(cli.contains(&"swiftshader_indirect".to_string()));
        assert!(!cli.contains(&"-qemu".to_string()));
    }

    #[test]
    fn test_launch_spec_is_foreground() {
        let sdk = SdkLayout::new("/opt/sdk");
        let spec = LaunchProfileArgs {
            name: "x".to_string(),
            acceleration: Acceleration::Software,
            memory_mb: 1024,
        }
        .to_spec(&sdk);
        assert_eq!(spec.stdio, StdioMode::Inherit);
        assert_eq!(spec.stdin, StdinPlan::Inherit);
        assert_eq!(ListProfilesArgs.to_cli_args(), vec!["-list-avds"]);
    }
}
