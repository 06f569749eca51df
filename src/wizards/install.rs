//! Install a system image
//!
//! version → flavor → ABI → summary → install with license auto-answer.

use super::{pick_abi, pick_api_level, pick_image, report, step_chrome, stream_tool_observed};
use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::catalog::{output_says_already_installed, Abi, ApiLevel, ImageType, PackageId};
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{confirm, drive, Chrome, OutputView, YesNoPrompt};
use crate::error::Result;
use crate::theme::Styles;
use crate::tool_traits::ToolArgs;
use crate::tools::sdkmanager::InstallPackageArgs;
use crate::ui::Screen;

const KIND: WizardKind = WizardKind::Install;
const STEPS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub api: ApiLevel,
    pub image: ImageType,
    pub abi: Abi,
}

impl InstallRequest {
    pub fn package(&self) -> PackageId {
        PackageId::new(self.api.level.clone(), self.image, self.abi)
    }
}

pub fn run(screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    let Some(api) = pick_api_level(screen, &step_chrome(KIND, 1, STEPS), ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(image) = pick_image(screen, &step_chrome(KIND, 2, STEPS), ctx, &api)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let Some(abi) = pick_abi(screen, &step_chrome(KIND, 3, STEPS), ctx)? else {
        return Ok(WizardOutcome::Cancelled);
    };
    let request = InstallRequest { api, image, abi };
    let package = request.package();

    let prompt = YesNoPrompt::new(BODY_LEFT, BODY_TOP, "Install this system image?").details(vec![
        format!("Android:    {}", request.api.label),
        format!("Image:      {}", request.image.label()),
        format!("ABI:        {}", request.abi),
        format!("Package:    {}", package),
        String::new(),
        "Licenses will be accepted automatically.".to_string(),
    ]);
    if !confirm(screen, &step_chrome(KIND, 4, STEPS), prompt)? {
        return Ok(WizardOutcome::Cancelled);
    }

    install_package(screen, ctx, &package)
}

/// Stream the installer for `package`, answering license prompts.
///
/// A failed exit is tolerated when the installer says the package is
/// already there.
pub(crate) fn install_package(
    screen: &mut dyn Screen,
    ctx: &AppContext,
    package: &PackageId,
) -> Result<WizardOutcome> {
    let args = InstallPackageArgs {
        package: package.clone(),
        answer: ctx.settings.license_answer.clone(),
        interval: ctx.settings.license_interval(),
    };

    let mut view = OutputView::new(Chrome::new(KIND.title()));
    view.note(format!("Installing {} ...", package));
    // Checked per line: the view drops old lines on a long install
    let mut already_installed = false;
    let result = stream_tool_observed(screen, &mut view, args.to_spec(&ctx.sdk), |line| {
        already_installed |= output_says_already_installed(&line.text);
    })?;
    tracing::info!(package = %package, answers = result.answers_written, outcome = %result.describe(), "install finished");

    if already_installed && result.exit_code().is_some_and(|code| code != 0) {
        tracing::info!(package = %package, "package was already installed");
        view.finish("Package already installed.", Styles::success());
        drive(screen, &Chrome::default(), &mut view)?;
        return Ok(WizardOutcome::Completed);
    }

    report(
        screen,
        &mut view,
        "System image installation",
        &result,
        &format!("Installed {}", package),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_request_package() {
        let request = InstallRequest {
            api: ApiLevel::new("33"),
            image: ImageType::PlayStore,
            abi: Abi::Arm64V8a,
        };
        assert_eq!(
            request.package().to_string(),
            "system-images;android-33;google_apis_playstore;arm64-v8a"
        );
    }
}
