//! Avidia Library
//!
//! A terminal front-end for the Android SDK tools: a small widget engine on
//! top of ratatui and a process runner that answers the tools' interactive
//! prompts while streaming their output.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod hardware;
pub mod inventory;
pub mod process_guard;
pub mod process_runner;
pub mod sanity;
pub mod theme;
pub mod tool_traits;
pub mod tools;
pub mod ui;
pub mod wizards;

// Re-export main types for convenience
pub use app::{App, AppContext, AppMode, AppState, WizardKind, WizardOutcome};
pub use catalog::{Abi, ApiLevel, Catalog, DeviceModel, ImageType, PackageId};
pub use config::Settings;
pub use error::{AvidiaError, Result};
pub use hardware::{HardwareInfo, KvmState};
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use process_runner::{
    run_captured, run_foreground, run_streaming, LaunchFailure, LaunchFailureKind, ProcessOutcome,
    ProcessResult, ProcessSpec, StdinPlan,
};
pub use tool_traits::ToolArgs;
pub use tools::{SdkLayout, Tool};
