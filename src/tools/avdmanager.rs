//! Type-safe arguments for the profile manager.
//!
//! - `ListDevicesArgs` for `avdmanager list device`
//! - `CreateProfileArgs` for `avdmanager create avd`
//! - `DeleteProfileArgs` for `avdmanager delete avd`
//!
//! # Prompts
//!
//! `create avd` asks "Do you wish to create a custom hardware profile? [no]"
//! and `delete avd` may ask for confirmation. Both answers are written once
//! right after launch and stdin is then closed, so a prompt the tool did not
//! ask simply reads end of input.

use crate::catalog::PackageId;
use crate::process_runner::StdinPlan;
use crate::tool_traits::ToolArgs;
use crate::tools::Tool;

/// Hardware profiles the profile manager can base a device on
#[derive(Debug, Clone, Copy, Default)]
pub struct ListDevicesArgs;

impl ToolArgs for ListDevicesArgs {
    fn tool(&self) -> Tool {
        Tool::AvdManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["list".to_string(), "device".to_string()]
    }
}

/// Create a virtual device profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProfileArgs {
    pub name: String,
    pub package: PackageId,
    /// Device model id (`pixel_5`)
    pub device: String,
    /// SD card size; `None` leaves the tool's default
    pub sdcard_mb: Option<u32>,
}

impl ToolArgs for CreateProfileArgs {
    fn tool(&self) -> Tool {
        Tool::AvdManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            "avd".to_string(),
            "-n".to_string(),
            self.name.clone(),
            "-k".to_string(),
            self.package.to_string(),
            "-d".to_string(),
            self.device.clone(),
        ];
        if let Some(mb) = self.sdcard_mb {
            args.push("-c".to_string());
            args.push(format!("{}M", mb));
        }
        args
    }

    fn stdin_plan(&self) -> StdinPlan {
        StdinPlan::scripted("no")
    }
}

/// Delete a virtual device profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProfileArgs {
    pub name: String,
}

impl ToolArgs for DeleteProfileArgs {
    fn tool(&self) -> Tool {
        Tool::AvdManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![
            "delete".to_string(),
            "avd".to_string(),
            "-n".to_string(),
            self.name.clone(),
        ]
    }

    fn stdin_plan(&self) -> StdinPlan {
        StdinPlan::scripted("yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Abi, ImageType};

    #[test]
    fn test_create_args() {
        let args = CreateProfileArgs {
            name: "pixel_test".to_string(),
            package: PackageId::new("34", ImageType::GoogleApis, Abi::X86_64),
            device: "pixel_5".to_string(),
            sdcard_mb: Some(512),
        };
        assert_eq!(
            args.to_cli_args(),
            vec![
                "create",
                "avd",
                "-n",
                "pixel_test",
                "-k",
                "system-images;android-34;google_apis;x86_64",
                "-d",
                "pixel_5",
                "-c",
                "512M",
            ]
        );
        assert_eq!(args.stdin_plan(), StdinPlan::Scripted(vec!["no".into()]));
    }

    #[test]
    fn test_create_without_sdcard() {
        let args = CreateProfileArgs {
            name: "bare".to_string(),
            package: PackageId::new("30", ImageType::Aosp, Abi::X86),
            device: "Nexus_5".to_string(),
            sdcard_mb: None,
        };
        assert!(!args.to_cli_args().contains(&"-c".to_string()));
    }

    #[test]
    fn test_delete_args() {
        let args = DeleteProfileArgs {
            name: "old".to_string(),
        };
        assert_eq!(args.to_cli_args(), vec!["delete", "avd", "-n", "old"]);
        assert_eq!(args.stdin_plan(), StdinPlan::Scripted(vec!["yes".into()]));
        assert_eq!(ListDevicesArgs.to_cli_args(), vec!["list", "device"]);
    }
}
