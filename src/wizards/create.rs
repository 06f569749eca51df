//! Create a virtual device profile
//!
//! name → platform version → ABI → image flavor → device model → SD card
//! → pre-flight package check (offering an install) → summary → create.

use super::{
    fail, install, pick_abi, pick_api_level, pick_image, report, step_chrome, stream_tool,
};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::catalog::{Abi, ApiLevel, DeviceModel, ImageType, PackageId};
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{
    confirm, drive, select, Chrome, MessageBox, MessageKind, OutputView, SelectList, SelectOption,
    TextField, YesNoPrompt,
};
use crate::error::Result;
use crate::inventory;
use crate::tool_traits::ToolArgs;
use crate::tools::avdmanager::CreateProfileArgs;
use crate::ui::Screen;

const KIND: WizardKind = WizardKind::Create;
const STEPS: usize = 7;

/// Longest accepted profile name
pub const NAME_MAX_LEN: usize = 30;

/// Longest SD card size input, in digits
const SDCARD_MAX_LEN: usize = 6;

/// Everything needed to create a profile. Only built once every step
/// has an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: String,
    pub api: ApiLevel,
    pub abi: Abi,
    pub image: ImageType,
    pub device: DeviceModel,
    pub sdcard_mb: u32,
}

impl CreateRequest {
    pub fn package(&self) -> PackageId {
        PackageId::new(self.api.level.clone(), self.image, self.abi)
    }

    pub fn to_args(&self) -> CreateProfileArgs {
        CreateProfileArgs {
            name: self.name.clone(),
            package: self.package(),
            device: self.device.id.clone(),
            sdcard_mb: Some(self.sdcard_mb),
        }
    }

    fn summary(&self) -> Vec<String> {
        vec![
            format!("Name:       {}", self.name),
            format!("Android:    {}", self.api.label),
            format!("ABI:        {}", self.abi),
            format!("Image:      {}", self.image.label()),
            format!("Device:     {} ({})", self.device.name, self.device.id),
            format!("SD card:    {} MB", self.sdcard_mb),
            format!("Package:    {}", self.package()),
        ]
    }
}

/// Parse the SD card field; empty, non-numeric and zero fall back to
/// `default`
pub fn parse_sdcard_mb(input: &str, default: u32) -> u32 {
    match input.trim().parse::<u32>() {
        Ok(mb) if mb > 0 => mb,
        _ => default,
    }
}

/// Run the wizard. `initial_name` prefills the name field.
pub fn run(
    screen: &mut dyn Screen,
    ctx: &AppContext,
    initial_name: Option<&str>,
) -> Result<WizardOutcome> {
    let Some(name) = ask_name(screen, initial_name)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(api) = pick_api_level(screen, &step_chrome(KIND, 2, STEPS), ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(abi) = pick_abi(screen, &step_chrome(KIND, 3, STEPS), ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(image) = pick_image(screen, &step_chrome(KIND, 4, STEPS), ctx, &api)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(device) = pick_device(screen, ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(sdcard_mb) = ask_sdcard(screen, ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };

    let request = CreateRequest {
        name,
        api,
        abi,
        image,
        device,
        sdcard_mb,
    };
    tracing::info!(?request, "create request collected");

    let package = request.package();
    let installed = match inventory::is_package_installed(&ctx.sdk, &package) {
        Ok(installed) => installed,
        Err(e) => return fail(screen, "Pre-flight Check Failed", e.to_string()),
    };
    if !installed {
        let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Install it now?").details(vec![
            "The required system image is not installed:".to_string(),
            format!("  {}", package),
            String::new(),
            "The download can take several minutes.".to_string(),
        ]);
        if !confirm(screen, &Chrome::new(KIND.title()), prompt)? {
            return Ok(WizardOutcome::Cancelled);
        }
        let outcome = install::install_package(screen, ctx, &package)?;
        if outcome != WizardOutcome::Completed {
            return Ok(outcome);
        }
    }

    let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Create this virtual device?")
        .details(request.summary());
    if !confirm(screen, &step_chrome(KIND, 7, STEPS), prompt)? {
        return Ok(WizardOutcome::Cancelled);
    }

    let mut view = OutputView::new(Chrome::new(KIND.title()));
    view.note(format!("Creating virtual device '{}' ...", request.name));
    let result = stream_tool(screen, &mut view, request.to_args().to_spec(&ctx.sdk))?;
    report(
        screen,
        &mut view,
        "Device creation",
        &result,
        &format!(
            "Device '{}' created. Start it with: avidia start {}",
            request.name, request.name
        ),
    )
}

/// Name step; an empty name is refused and asked again
fn ask_name(screen: &mut dyn Screen, initial: Option<&str>) -> Result<Option<String>> {
    let chrome = step_chrome(KIND, 1, STEPS);
    let mut field = TextField::new(BODY_LEFT, BODY_TOP, "Device name:", NAME_MAX_LEN)
        .with_initial(initial.unwrap_or_default());
    loop {
        match drive(screen, &chrome, &mut field)? {
            None => return Ok(None),
            Some(name) if name.is_empty() => {
                MessageBox::new(
                    "Invalid Name",
                    vec![
                        "Device name cannot be empty.".to_string(),
                        "Use letters, digits, '-', '_' and '.'.".to_string(),
                    ],
                )
                .kind(MessageKind::Warning)
                .show(screen)?;
            }
            Some(name) => return Ok(Some(name)),
        }
    }
}

fn pick_device(screen: &mut dyn Screen, ctx: &AppContext) -> Result<Option<DeviceModel>> {
    let options = ctx
        .catalog
        .devices
        .iter()
        .map(|device| {
            SelectOption::new(format!("{} ({})", device.name, device.id), device.clone())
        })
        .collect();
    let list = SelectList::new(
        BODY_LEFT,
        BODY_TOP,
        "Select device model:",
        options,
        ctx.settings.page_size,
    );
    select(screen, &step_chrome(KIND, 5, STEPS), list)
}

fn ask_sdcard(screen: &mut dyn Screen, ctx: &AppContext) -> Result<Option<u32>> {
    let default = ctx.settings.default_sdcard_mb;
    let mut field = TextField::new(
        BODY_LEFT,
        BODY_TOP,
        format!("SD card size in MB [{}]:", default),
        SDCARD_MAX_LEN,
    );
    Ok(drive(screen, &step_chrome(KIND, 6, STEPS), &mut field)?
        .map(|input| parse_sdcard_mb(&input, default)))
}
