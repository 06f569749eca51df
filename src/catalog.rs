//! Enumeration tables and tool-output matchers
//!
//! The catalog holds the choices the wizards offer: platform versions and
//! device models come from the SDK tools when they answer, with built-in
//! defaults when they don't. ABIs and image flavors are fixed.
//!
//! All parsers here are line-oriented and tolerant: lines they do not
//! recognize are skipped, never an error.

use crate::process_runner::run_captured;
use crate::tool_traits::ToolArgs;
use crate::tools::avdmanager::ListDevicesArgs;
use crate::tools::sdkmanager::ListPackagesArgs;
use crate::tools::SdkLayout;
use std::collections::BTreeMap;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Marker preceding the API level in a system-image package id
const SYSTEM_IMAGE_PREFIX: &str = "system-images;android-";

/// Highest API level without Play Store system images
const LAST_LEGACY_API: u32 = 23;

/// Characters accepted in profile names
pub fn is_profile_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

pub fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_profile_name_char)
}

// =============================================================================
// FIXED TABLES
// =============================================================================

/// CPU architecture of a system image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Abi {
    X86_64,
    X86,
    Arm64V8a,
}

impl Abi {
    /// Tag used in package ids
    pub fn tag(self) -> &'static str {
        match self {
            Abi::X86_64 => "x86_64",
            Abi::X86 => "x86",
            Abi::Arm64V8a => "arm64-v8a",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Abi::X86_64 => "x86_64 (Intel/AMD 64-bit, recommended)",
            Abi::X86 => "x86 (Intel/AMD 32-bit)",
            Abi::Arm64V8a => "arm64-v8a (ARM 64-bit, slower emulation)",
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// System image flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ImageType {
    PlayStore,
    GoogleApis,
    Aosp,
}

impl ImageType {
    /// Tag used in package ids
    pub fn tag(self) -> &'static str {
        match self {
            ImageType::PlayStore => "google_apis_playstore",
            ImageType::GoogleApis => "google_apis",
            ImageType::Aosp => "default",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageType::PlayStore => "Google Play Store (Recommended for app testing)",
            ImageType::GoogleApis => "Google APIs (No Play Store, with Google Services)",
            ImageType::Aosp => "AOSP (Android Open Source Project, no Google services)",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// =============================================================================
// DISCOVERED TABLES
// =============================================================================

/// A platform version offered for system images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiLevel {
    /// As it appears in package ids: usually a number, sometimes a codename
    pub level: String,
    pub label: String,
}

impl ApiLevel {
    pub fn new(level: impl Into<String>) -> Self {
        let level = level.into();
        Self {
            label: format!("Android API {}", level),
            level,
        }
    }

    pub fn with_label(level: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            label: label.into(),
        }
    }

    pub fn number(&self) -> Option<u32> {
        self.level.parse().ok()
    }

    /// Too old for Play Store images. Codenames are treated as recent.
    pub fn is_legacy(&self) -> bool {
        self.number().is_some_and(|n| n <= LAST_LEGACY_API)
    }
}

/// A hardware profile known to the profile manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceModel {
    pub id: String,
    pub name: String,
}

impl DeviceModel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A system-image package id: `system-images;android-<api>;<tag>;<abi>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId {
    pub api: String,
    pub image: ImageType,
    pub abi: Abi,
}

impl PackageId {
    pub fn new(api: impl Into<String>, image: ImageType, abi: Abi) -> Self {
        Self {
            api: api.into(),
            image,
            abi,
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{};{};{}",
            SYSTEM_IMAGE_PREFIX,
            self.api,
            self.image.tag(),
            self.abi.tag()
        )
    }
}

/// An emulator instance found in the process table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProfile {
    pub name: String,
    /// Launcher and engine processes serving this profile
    pub pids: Vec<u32>,
}

// =============================================================================
// PARSERS
// =============================================================================

/// API levels from `sdkmanager --list`, deduplicated, newest first.
/// Codenames sort after numbered levels.
pub fn parse_api_levels(output: &str) -> Vec<ApiLevel> {
    let mut levels: Vec<String> = Vec::new();
    for line in output.lines() {
        let Some((_, rest)) = line.split_once(SYSTEM_IMAGE_PREFIX) else {
            continue;
        };
        let level = rest.split(';').next().unwrap_or("").trim();
        // The table's own column separator may follow a truncated id
        let level = level.split_whitespace().next().unwrap_or("");
        if !level.is_empty() && !levels.iter().any(|l| l == level) {
            levels.push(level.to_string());
        }
    }

    levels.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    levels.into_iter().map(ApiLevel::new).collect()
}

/// Device models from `avdmanager list device`.
///
/// Entries look like `id: 12 or "pixel_5"` followed by `Name: Pixel 5`; the
/// quoted id is preferred since it is stable across SDK releases. A blank line
/// ends an entry.
pub fn parse_devices(output: &str) -> Vec<DeviceModel> {
    let mut devices = Vec::new();
    let mut current_id: Option<String> = None;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            current_id = None;
        } else if let Some(rest) = line.strip_prefix("id:") {
            current_id = parse_device_id(rest);
        } else if let Some(name) = line.strip_prefix("Name:") {
            if let Some(id) = current_id.take() {
                devices.push(DeviceModel::new(id, name.trim()));
            }
        }
    }
    devices
}

fn parse_device_id(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let quoted = rest
        .split_once('"')
        .and_then(|(_, tail)| tail.split_once('"'))
        .map(|(id, _)| id.trim())
        .filter(|id| !id.is_empty());
    match quoted {
        Some(id) => Some(id.to_string()),
        None => rest.split_whitespace().next().map(str::to_string),
    }
}

/// Profile names from `emulator -list-avds`. Log chatter is skipped.
pub fn parse_profile_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| is_valid_profile_name(line))
        .map(str::to_string)
        .collect()
}

/// Running emulators from `ps -eo pid=,args=`, grouped by profile name in
/// order of first appearance
pub fn parse_running_profiles(output: &str) -> Vec<RunningProfile> {
    let mut order: Vec<String> = Vec::new();
    let mut pids: BTreeMap<String, Vec<u32>> = BTreeMap::new();

    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let Some(pid) = fields.next().and_then(|p| p.parse::<u32>().ok()) else {
            continue;
        };
        let args: Vec<&str> = fields.collect();
        let is_emulator = args
            .first()
            .is_some_and(|cmd| cmd.contains("emulator") || cmd.contains("qemu-system"));
        if !is_emulator {
            continue;
        }
        let Some(name) = args
            .windows(2)
            .find(|pair| pair[0] == "-avd")
            .map(|pair| pair[1].to_string())
        else {
            continue;
        };

        if !pids.contains_key(&name) {
            order.push(name.clone());
        }
        pids.entry(name).or_default().push(pid);
    }

    order
        .into_iter()
        .map(|name| {
            let pids = pids.remove(&name).unwrap_or_default();
            RunningProfile { name, pids }
        })
        .collect()
}

/// Whether any line of `output` mentions `package` as a whole id.
///
/// The id must be followed by end of line, whitespace or `|`, so `...;x86`
/// does not match `...;x86_64`.
pub fn output_mentions_package(output: &str, package: &PackageId) -> bool {
    let needle = package.to_string();
    output.lines().any(|line| {
        line.match_indices(needle.as_str()).any(|(start, _)| {
            line[start + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| c.is_whitespace() || c == '|')
        })
    })
}

/// Whether installer output reports the package as already present
pub fn output_says_already_installed(output: &str) -> bool {
    output.to_ascii_lowercase().contains("already installed")
}

// =============================================================================
// CATALOG
// =============================================================================

/// Choices offered by the wizards, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub api_levels: Vec<ApiLevel>,
    pub devices: Vec<DeviceModel>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            api_levels: default_api_levels(),
            devices: default_devices(),
        }
    }
}

impl Catalog {
    /// Ask the SDK tools, falling back to defaults per table when a tool
    /// fails or lists nothing
    pub fn load(sdk: &SdkLayout) -> Self {
        let api_levels = match run_captured(ListPackagesArgs.to_spec(sdk)) {
            Ok(output) if output.result.success() => parse_api_levels(&output.text()),
            Ok(output) => {
                tracing::warn!(outcome = %output.result.describe(), "sdkmanager --list failed");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "sdkmanager --list failed");
                Vec::new()
            }
        };

        let devices = match run_captured(ListDevicesArgs.to_spec(sdk)) {
            Ok(output) if output.result.success() => parse_devices(&output.text()),
            Ok(output) => {
                tracing::warn!(outcome = %output.result.describe(), "avdmanager list device failed");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "avdmanager list device failed");
                Vec::new()
            }
        };

        Self::from_discovered(api_levels, devices)
    }

    /// Use discovered tables, substituting defaults for empty ones
    pub fn from_discovered(api_levels: Vec<ApiLevel>, devices: Vec<DeviceModel>) -> Self {
        let api_levels = if api_levels.is_empty() {
            tracing::info!("no platform versions discovered, using defaults");
            default_api_levels()
        } else {
            api_levels
        };
        let devices = if devices.is_empty() {
            tracing::info!("no device models discovered, using defaults");
            default_devices()
        } else {
            devices
        };
        tracing::info!(
            api_levels = api_levels.len(),
            devices = devices.len(),
            "catalog ready"
        );
        Self {
            api_levels,
            devices,
        }
    }

    pub fn abis(&self) -> Vec<Abi> {
        Abi::iter().collect()
    }

    /// Image flavors available for `api`
    pub fn image_types_for(&self, api: &ApiLevel) -> Vec<ImageType> {
        ImageType::iter()
            .filter(|image| !(api.is_legacy() && *image == ImageType::PlayStore))
            .collect()
    }
}

fn default_api_levels() -> Vec<ApiLevel> {
    vec![
        ApiLevel::with_label("34", "Android API 34 (Latest stable)"),
        ApiLevel::new("33"),
        ApiLevel::new("32"),
        ApiLevel::new("31"),
        ApiLevel::new("30"),
    ]
}

fn default_devices() -> Vec<DeviceModel> {
    vec![
        DeviceModel::new("pixel_7", "Google Pixel 7"),
        DeviceModel::new("pixel_6", "Google Pixel 6"),
        DeviceModel::new("pixel_5", "Google Pixel 5 (Recommended)"),
        DeviceModel::new("pixel_4", "Google Pixel 4"),
        DeviceModel::new("Nexus_6P", "Nexus 6P"),
        DeviceModel::new("Nexus_5X", "Nexus 5X"),
        DeviceModel::new("Nexus_5", "Nexus 5"),
    ]
}
