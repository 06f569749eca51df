//! Type-safe arguments for the package enumerator.
//!
//! - `ListPackagesArgs` for `sdkmanager --list`
//! - `ListInstalledArgs` for `sdkmanager --list_installed`
//! - `InstallPackageArgs` for `sdkmanager <package>`
//!
//! # License prompts
//!
//! Installing a system image asks to accept one or more licenses, each with a
//! `(y/N)` prompt. The number of prompts is not known in advance, so the
//! answer is written on an interval for as long as the installer runs.

use std::time::Duration;

use crate::catalog::PackageId;
use crate::process_runner::StdinPlan;
use crate::tool_traits::ToolArgs;
use crate::tools::{SdkLayout, Tool};

/// Every package the SDK knows about, installed or not
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPackagesArgs;

impl ToolArgs for ListPackagesArgs {
    fn tool(&self) -> Tool {
        Tool::SdkManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["--list".to_string()]
    }
}

/// Installed packages only
#[derive(Debug, Clone, Copy, Default)]
pub struct ListInstalledArgs;

impl ToolArgs for ListInstalledArgs {
    fn tool(&self) -> Tool {
        Tool::SdkManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["--list_installed".to_string()]
    }
}

/// Download and install one system-image package
#[derive(Debug, Clone)]
pub struct InstallPackageArgs {
    pub package: PackageId,
    /// Written to each license prompt
    pub answer: String,
    pub interval: Duration,
}

impl ToolArgs for InstallPackageArgs {
    fn tool(&self) -> Tool {
        Tool::SdkManager
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec![self.package.to_string()]
    }

    /// The installer re-invokes sibling tools by name, so their directory
    /// goes on `PATH`
    fn get_env_vars(&self, sdk: &SdkLayout) -> Vec<(String, String)> {
        let mut vars = sdk.env_overlay();
        vars.push(("PATH".to_string(), sdk.path_with_tools()));
        vars
    }

    fn stdin_plan(&self) -> StdinPlan {
        StdinPlan::auto_answer(self.answer.clone(), self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Abi, ImageType};

    #[test]
    fn test_list_args() {
        assert_eq!(ListPackagesArgs.to_cli_args(), vec!["--list"]);
        assert_eq!(ListInstalledArgs.to_cli_args(), vec!["--list_installed"]);
        assert_eq!(ListInstalledArgs.stdin_plan(), StdinPlan::Null);
    }

    #[test]
    fn test_install_spec() {
        let sdk = SdkLayout::new("/opt/sdk");
        let args = InstallPackageArgs {
            package: PackageId::new("34", ImageType::PlayStore, Abi::X86_64),
            answer: "y".to_string(),
            interval: Duration::from_millis(1000),
        };
        let spec = args.to_spec(&sdk);

        assert_eq!(spec.program, sdk.sdkmanager);
        assert_eq!(
            spec.args,
            vec!["system-images;android-34;google_apis_playstore;x86_64"]
        );
        assert_eq!(
            spec.stdin,
            StdinPlan::auto_answer("y", Duration::from_secs(1))
        );
        let path = spec
            .env
            .iter()
            .find(|(k, _)| k == "PATH")
            .map(|(_, v)| v.clone())
            .expect("PATH overlay");
        assert!(path.ends_with("/opt/sdk/cmdline-tools/latest/bin"));
    }
}
