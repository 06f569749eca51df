//! Hardware acceleration detection
//!
//! Detects whether KVM is usable, which decides the emulator's GPU mode and
//! whether `-enable-kvm` is passed. Detection is a path check, no shelling out.
//!
//! # Integration
//!
//! Call `HardwareInfo::detect()` once at startup; the result lives in the
//! `AppContext` and is shown by the Start and Info wizards.

use crate::tools::emulator::Acceleration;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

/// Default KVM device node
pub const KVM_DEVICE: &str = "/dev/kvm";

/// State of the KVM device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KvmState {
    /// Present and openable read-write by this user
    Available,
    /// Present but this user may not open it (usually not in the `kvm` group)
    NoPermission,
    Absent,
}

impl KvmState {
    /// Probe a device node
    pub fn probe(path: &Path) -> Self {
        if !path.exists() {
            return KvmState::Absent;
        }
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(_) => KvmState::Available,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "KVM device not openable");
                KvmState::NoPermission
            }
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, KvmState::Available)
    }
}

impl fmt::Display for KvmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvmState::Available => write!(f, "Available"),
            KvmState::NoPermission => write!(f, "Present, no permission"),
            KvmState::Absent => write!(f, "Not available"),
        }
    }
}

/// Hardware facts gathered at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareInfo {
    pub kvm: KvmState,
}

impl HardwareInfo {
    pub fn detect() -> Self {
        let info = Self {
            kvm: KvmState::probe(Path::new(KVM_DEVICE)),
        };
        tracing::info!(kvm = %info.kvm, "hardware detected");
        info
    }

    /// Emulator acceleration to request
    pub fn acceleration(&self) -> Acceleration {
        if self.kvm.is_available() {
            Acceleration::Hardware
        } else {
            Acceleration::Software
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_absent_device() {
        let dir = TempDir::new().unwrap();
        assert_eq!(KvmState::probe(&dir.path().join("kvm")), KvmState::Absent);
    }

    #[test]
    fn test_openable_node_is_available() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(KvmState::probe(file.path()), KvmState::Available);
    }

    #[test]
    fn test_acceleration_follows_kvm() {
        let fast = HardwareInfo {
            kvm: KvmState::Available,
        };
        assert_eq!(fast.acceleration(), Acceleration::Hardware);

        let slow = HardwareInfo {
            kvm: KvmState::NoPermission,
        };
        assert_eq!(slow.acceleration(), Acceleration::Software);
        assert_eq!(slow.kvm.to_string(), "Present, no permission");
    }
}
