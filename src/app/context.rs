//! Immutable run context
//!
//! Built once before the UI starts and passed by reference to the
//! navigation controller and every wizard. Nothing in it changes mid-run.

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::hardware::HardwareInfo;
use crate::tools::SdkLayout;

#[derive(Debug, Clone)]
pub struct AppContext {
    pub sdk: SdkLayout,
    pub catalog: Catalog,
    pub settings: Settings,
    pub hardware: HardwareInfo,
}

impl AppContext {
    pub fn new(sdk: SdkLayout, catalog: Catalog, settings: Settings, hardware: HardwareInfo) -> Self {
        Self {
            sdk,
            catalog,
            settings,
            hardware,
        }
    }

    /// Query the SDK for the catalog and probe the hardware
    pub fn discover(sdk: SdkLayout, settings: Settings) -> Self {
        let catalog = Catalog::load(&sdk);
        let hardware = HardwareInfo::detect();
        Self::new(sdk, catalog, settings, hardware)
    }
}
