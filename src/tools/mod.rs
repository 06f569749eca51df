//! Type-safe SDK tool invocations.
//!
//! This module contains the SDK directory layout and, per tool, the structs
//! that implement `ToolArgs`. Each struct maps Rust fields to the exact flags,
//! environment and prompt answers the corresponding tool expects.

pub mod avdmanager;
pub mod emulator;
pub mod ps;
pub mod sdkmanager;

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the SDK base directory
pub const SDK_ENV: &str = "ANDROID_HOME";

/// SDK base directory when `ANDROID_HOME` is unset
pub const DEFAULT_SDK_ROOT: &str = "/usr/share/android";

/// External executables the front-end drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Tool {
    /// Package enumerator and installer
    SdkManager,
    /// Profile manager
    AvdManager,
    /// Device runtime
    Emulator,
    /// System process table
    Ps,
}

impl Tool {
    /// Tools that live under the SDK directory
    pub fn is_sdk_tool(self) -> bool {
        !matches!(self, Tool::Ps)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::SdkManager => write!(f, "sdkmanager"),
            Tool::AvdManager => write!(f, "avdmanager"),
            Tool::Emulator => write!(f, "emulator"),
            Tool::Ps => write!(f, "ps"),
        }
    }
}

/// Where the SDK tools live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLayout {
    pub root: PathBuf,
    pub sdkmanager: PathBuf,
    pub avdmanager: PathBuf,
    pub emulator: PathBuf,
}

impl SdkLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let bin = root.join("cmdline-tools").join("latest").join("bin");
        Self {
            sdkmanager: bin.join("sdkmanager"),
            avdmanager: bin.join("avdmanager"),
            emulator: root.join("emulator").join("emulator"),
            root,
        }
    }

    /// `ANDROID_HOME`, or `/usr/share/android` when unset or empty
    pub fn from_env() -> Self {
        let root = std::env::var_os(SDK_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SDK_ROOT));
        Self::new(root)
    }

    /// Directory holding the command-line tools
    pub fn tool_dir(&self) -> &Path {
        self.sdkmanager.parent().unwrap_or(&self.root)
    }

    /// Executable path for a tool
    pub fn program(&self, tool: Tool) -> PathBuf {
        match tool {
            Tool::SdkManager => self.sdkmanager.clone(),
            Tool::AvdManager => self.avdmanager.clone(),
            Tool::Emulator => self.emulator.clone(),
            Tool::Ps => PathBuf::from("ps"),
        }
    }

    /// Variables every SDK tool gets
    pub fn env_overlay(&self) -> Vec<(String, String)> {
        let root = self.root.display().to_string();
        vec![
            ("ANDROID_HOME".to_string(), root.clone()),
            ("ANDROID_SDK_ROOT".to_string(), root),
        ]
    }

    /// The current `PATH` with the tool directory appended
    pub fn path_with_tools(&self) -> String {
        let tools = self.tool_dir().display().to_string();
        match std::env::var("PATH") {
            Ok(path) if !path.is_empty() => format!("{}:{}", path, tools),
            _ => tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let sdk = SdkLayout::new("/opt/android");
        assert_eq!(
            sdk.sdkmanager,
            PathBuf::from("/opt/android/cmdline-tools/latest/bin/sdkmanager")
        );
        assert_eq!(
            sdk.avdmanager,
            PathBuf::from("/opt/android/cmdline-tools/latest/bin/avdmanager")
        );
        assert_eq!(sdk.emulator, PathBuf::from("/opt/android/emulator/emulator"));
        assert_eq!(
            sdk.tool_dir(),
            Path::new("/opt/android/cmdline-tools/latest/bin")
        );
        assert_eq!(sdk.program(Tool::Ps), PathBuf::from("ps"));
    }

    #[test]
    fn test_path_with_tools_appends() {
        let sdk = SdkLayout::new("/opt/android");
        let path = sdk.path_with_tools();
        assert!(path.ends_with("/opt/android/cmdline-tools/latest/bin"));
    }

    #[test]
    fn test_tool_display() {
        assert_eq!(Tool::AvdManager.to_string(), "avdmanager");
        assert!(Tool::Emulator.is_sdk_tool());
        assert!(!Tool::Ps.is_sdk_tool());
    }
}
