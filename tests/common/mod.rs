//! Shared fixtures: a fake SDK made of shell scripts and a test surface
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use avidia::app::AppContext;
use avidia::catalog::Catalog;
use avidia::config::Settings;
use avidia::hardware::{HardwareInfo, KvmState};
use avidia::tools::{SdkLayout, Tool};
use avidia::ui::{ScriptedKeys, Surface};
use ratatui::backend::TestBackend;
use tempfile::TempDir;

/// Package the default catalog's first choices resolve to
pub const FIRST_PACKAGE: &str = "system-images;android-34;google_apis_playstore;x86_64";

/// An SDK directory whose tools are `#!/bin/sh` scripts
pub struct FakeSdk {
    pub dir: TempDir,
    pub sdk: SdkLayout,
}

impl FakeSdk {
    /// Tools that succeed and do nothing: no profiles, nothing installed
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let sdk = SdkLayout::new(dir.path());
        let fake = Self { dir, sdk };
        fake.script(Tool::SdkManager, "exit 0");
        fake.script(Tool::AvdManager, "exit 0");
        fake.script(Tool::Emulator, "exit 0");
        fake
    }

    /// Replace a tool with `body`
    pub fn script(&self, tool: Tool, body: &str) {
        let path = self.sdk.program(tool);
        fs::create_dir_all(path.parent().expect("tool dir")).expect("mkdir");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    /// Remove a tool so launching it fails
    pub fn remove(&self, tool: Tool) {
        let _ = fs::remove_file(self.sdk.program(tool));
    }

    /// A file path inside the SDK dir that scripts can write to
    pub fn marker(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Emulator that lists `names` for `-list-avds` and records any other
    /// invocation in the `emulator.args` marker
    pub fn with_profiles(&self, names: &[&str]) {
        let listing: String = names.iter().map(|n| format!("echo {}\n", n)).collect();
        self.script(
            Tool::Emulator,
            &format!(
                "if [ \"$1\" = \"-list-avds\" ]; then\n{}exit 0\nfi\necho \"$*\" > {}",
                listing,
                self.marker("emulator.args").display()
            ),
        );
    }

    /// Package manager whose `--list_installed` mentions `package`
    pub fn with_installed(&self, package: &str) {
        self.script(
            Tool::SdkManager,
            &format!(
                "if [ \"$1\" = \"--list_installed\" ]; then\necho 'Installed packages:'\necho '  {} | 1 | Image | installed'\nfi",
                package
            ),
        );
    }

    /// Profile manager recording `args|first stdin line` then exiting with `code`
    pub fn recording_avdmanager(&self, code: i32) {
        self.script(
            Tool::AvdManager,
            &format!(
                "read reply\necho \"$*|$reply\" > {}\necho 'working...'\nexit {}",
                self.marker("avdmanager.args").display(),
                code
            ),
        );
    }

    pub fn read_marker(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.marker(name))
            .ok()
            .map(|s| s.trim().to_string())
    }

    pub fn context(&self) -> AppContext {
        self.context_with(Settings::default())
    }

    pub fn context_with(&self, settings: Settings) -> AppContext {
        AppContext::new(
            self.sdk.clone(),
            Catalog::default(),
            settings,
            HardwareInfo {
                kvm: KvmState::Absent,
            },
        )
    }
}

pub type TestSurface = Surface<TestBackend, ScriptedKeys>;

pub fn surface(keys: ScriptedKeys) -> TestSurface {
    Surface::new(TestBackend::new(100, 32), keys).expect("surface")
}

/// Everything currently painted, row by row
pub fn screen_text(surface: &TestSurface) -> String {
    let buffer = surface.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                text.push_str(cell.symbol());
            }
        }
        text.push('\n');
    }
    text
}
