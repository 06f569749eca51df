//! Guided flows
//!
//! Each wizard is a fixed sequence of widgets ending in one tool run. A
//! cancel at any step returns [`WizardOutcome::Cancelled`] before anything
//! is launched. Tool failures are shown to the user and reported as
//! [`WizardOutcome::Failed`]; only terminal I/O errors propagate.

pub mod create;
pub mod delete;
pub mod info;
pub mod install;
pub mod list;
pub mod start;
pub mod stop;

use crate::app::{AppContext, WizardKind, WizardOutcome};
use crate::catalog::{Abi, ApiLevel, ImageType};
use crate::components::header::{BODY_LEFT, BODY_TOP};
use crate::components::{
    drive, select, Chrome, MessageBox, MessageKind, OutputView, SelectList, SelectOption,
};
use crate::error::Result;
use crate::process_runner::{self, LineEvent, OutputLine, ProcessResult, ProcessSpec};
use crate::theme::Styles;
use crate::ui::Screen;
use std::time::{Duration, Instant};

/// How long the output view waits for a line before redrawing
const STREAM_TICK: Duration = Duration::from_millis(100);

/// Run the wizard for `kind` from its first step
pub fn run(kind: WizardKind, screen: &mut dyn Screen, ctx: &AppContext) -> Result<WizardOutcome> {
    match kind {
        WizardKind::List => list::run(screen, ctx),
        WizardKind::Create => create::run(screen, ctx, None),
        WizardKind::Start => start::run(screen, ctx),
        WizardKind::Stop => stop::run(screen, ctx),
        WizardKind::Delete => delete::run(screen, ctx),
        WizardKind::Install => install::run(screen, ctx),
        WizardKind::Info => info::run(screen, ctx),
    }
}

/// Title band showing the step counter
pub(crate) fn step_chrome(kind: WizardKind, step: usize, total: usize) -> Chrome {
    Chrome::new(kind.title()).with_subtitle(format!("Step {} of {}", step, total))
}

/// Show an error box and report the wizard as failed
pub(crate) fn fail(
    screen: &mut dyn Screen,
    title: &str,
    message: impl Into<String>,
) -> Result<WizardOutcome> {
    let message = message.into();
    tracing::error!(%title, %message, "wizard failed");
    MessageBox::new(title, vec![message.clone()])
        .kind(MessageKind::Error)
        .show(screen)?;
    Ok(WizardOutcome::Failed(message))
}

/// Informational box; the wizard completed with nothing to do
pub(crate) fn notice(
    screen: &mut dyn Screen,
    title: &str,
    lines: Vec<String>,
) -> Result<WizardOutcome> {
    MessageBox::new(title, lines).show(screen)?;
    Ok(WizardOutcome::Completed)
}

/// Run `spec`, tailing its output in `view` until it exits.
///
/// A launch failure is returned as a `LaunchFailed` result. The view is
/// left showing the last lines; the caller finishes it.
pub(crate) fn stream_tool(
    screen: &mut dyn Screen,
    view: &mut OutputView,
    spec: ProcessSpec,
) -> Result<ProcessResult> {
    stream_tool_observed(screen, view, spec, |_| {})
}

/// [`stream_tool`], handing every line to `observe` before the view gets it.
///
/// The view only keeps the most recent lines; `observe` sees all of them.
/// Ctrl+C is polled at least once per [`STREAM_TICK`] however fast the
/// tool prints.
pub(crate) fn stream_tool_observed<F>(
    screen: &mut dyn Screen,
    view: &mut OutputView,
    spec: ProcessSpec,
    mut observe: F,
) -> Result<ProcessResult>
where
    F: FnMut(&OutputLine),
{
    view.set_status(format!("Running {} ...", spec.program_name()), Styles::info());
    view.draw(screen)?;
    tracing::info!(command = %spec.command_line(), "streaming tool");

    let mut process = match process_runner::start(spec) {
        Ok(process) => process,
        Err(failure) => {
            tracing::error!(error = %failure, "tool could not be started");
            return Ok(ProcessResult::launch_failed(&failure));
        }
    };

    let mut last_check = Instant::now();
    loop {
        let event = process.next_line_timeout(STREAM_TICK);
        if matches!(event, LineEvent::Timeout) || last_check.elapsed() >= STREAM_TICK {
            last_check = Instant::now();
            if screen.interrupt_requested()? {
                // The signal handler tears down the child and exits
                view.set_status("Interrupted, stopping ...", Styles::warning());
            }
        }
        match event {
            LineEvent::Line(line) => {
                observe(&line);
                view.push(line);
            }
            LineEvent::Timeout => {}
            LineEvent::Eof => break,
        }
        view.draw(screen)?;
    }
    process.wait(|line| {
        observe(&line);
        view.push(line);
    })
}

/// Show the result of a streamed run and wait for Enter.
///
/// `operation` names what was attempted, e.g. "Device creation".
pub(crate) fn report(
    screen: &mut dyn Screen,
    view: &mut OutputView,
    operation: &str,
    result: &ProcessResult,
    success_text: &str,
) -> Result<WizardOutcome> {
    if let process_runner::ProcessOutcome::LaunchFailed(..) = result.outcome {
        return fail(
            screen,
            "Launch Failed",
            format!("{} {}", operation, result.describe()),
        );
    }
    let outcome = if result.success() {
        view.finish(success_text, Styles::success());
        WizardOutcome::Completed
    } else {
        let message = format!("{} failed: tool {}", operation, result.describe());
        view.finish(message.clone(), Styles::error());
        WizardOutcome::Failed(message)
    };
    drive(screen, &Chrome::default(), view)?;
    Ok(outcome)
}

/// Pick a platform version from the catalog
pub(crate) fn pick_api_level(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    ctx: &AppContext,
) -> Result<Option<ApiLevel>> {
    let options = ctx
        .catalog
        .api_levels
        .iter()
        .map(|api| SelectOption::new(api.label.clone(), api.clone()))
        .collect();
    let list = SelectList::new(
        BODY_LEFT,
        BODY_TOP,
        "Select Android version:",
        options,
        ctx.settings.page_size,
    );
    select(screen, chrome, list)
}

pub(crate) fn pick_abi(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    ctx: &AppContext,
) -> Result<Option<Abi>> {
    let options = ctx
        .catalog
        .abis()
        .into_iter()
        .map(|abi| SelectOption::new(abi.label(), abi))
        .collect();
    let list = SelectList::new(
        BODY_LEFT,
        BODY_TOP,
        "Select CPU architecture:",
        options,
        ctx.settings.page_size,
    );
    select(screen, chrome, list)
}

/// Pick an image flavor offered for `api`
pub(crate) fn pick_image(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    ctx: &AppContext,
    api: &ApiLevel,
) -> Result<Option<ImageType>> {
    let options = ctx
        .catalog
        .image_types_for(api)
        .into_iter()
        .map(|image| SelectOption::new(image.label(), image))
        .collect();
    let list = SelectList::new(
        BODY_LEFT,
        BODY_TOP,
        "Select system image type:",
        options,
        ctx.settings.page_size,
    );
    select(screen, chrome, list)
}

/// Pick one of `names`
pub(crate) fn pick_profile(
    screen: &mut dyn Screen,
    chrome: &Chrome,
    ctx: &AppContext,
    title: &str,
    names: &[String],
) -> Result<Option<String>> {
    let options = names
        .iter()
        .map(|name| SelectOption::new(name.clone(), name.clone()))
        .collect();
    let list = SelectList::new(BODY_LEFT, BODY_TOP, title, options, ctx.settings.page_size);
    select(screen, chrome, list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Key, ScriptedKeys, Surface};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use ratatui::style::Style;

    /// Surface that counts Ctrl+C polls
    struct CountingScreen {
        inner: Surface<TestBackend, ScriptedKeys>,
        interrupt_checks: usize,
    }

    impl CountingScreen {
        fn new() -> Self {
            Self {
                inner: Surface::new(TestBackend::new(80, 24), ScriptedKeys::new()).unwrap(),
                interrupt_checks: 0,
            }
        }
    }

    impl Screen for CountingScreen {
        fn clear(&mut self) -> Result<()> {
            self.inner.clear()
        }

        fn write_at(&mut self, x: u16, y: u16, text: &str, style: Style) {
            self.inner.write_at(x, y, text, style)
        }

        fn area(&self) -> Rect {
            self.inner.area()
        }

        fn buffer_mut(&mut self) -> &mut Buffer {
            self.inner.buffer_mut()
        }

        fn refresh(&mut self) -> Result<()> {
            self.inner.refresh()
        }

        fn poll_key(&mut self) -> Result<Option<Key>> {
            self.inner.poll_key()
        }

        fn size(&self) -> Result<(u16, u16)> {
            self.inner.size()
        }

        fn suspend(&mut self, f: &mut dyn FnMut()) -> Result<()> {
            self.inner.suspend(f)
        }

        fn interrupt_requested(&mut self) -> Result<bool> {
            self.interrupt_checks += 1;
            Ok(false)
        }
    }

    fn sh(script: &str) -> ProcessSpec {
        ProcessSpec::new("sh").args(["-c", script])
    }

    #[test]
    fn test_ctrl_c_polled_while_tool_prints_steadily() {
        let mut screen = CountingScreen::new();
        let mut view = OutputView::new(Chrome::new("Test"));
        let started = Instant::now();

        // A line every 50ms never lets a 100ms read time out
        let result = stream_tool(
            &mut screen,
            &mut view,
            sh("i=0; while [ $i -lt 20 ]; do echo line $i; sleep 0.05; i=$((i+1)); done"),
        )
        .unwrap();

        assert!(result.success());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(900));
        // At least one poll per elapsed tick, give or take scheduling
        let expected = (elapsed.as_millis() / STREAM_TICK.as_millis()) as usize / 2;
        assert!(
            screen.interrupt_checks >= expected.max(3),
            "{} interrupt checks in {:?}",
            screen.interrupt_checks,
            elapsed
        );
    }

    #[test]
    fn test_observer_sees_lines_the_view_dropped() {
        let mut screen = CountingScreen::new();
        let mut view = OutputView::new(Chrome::new("Test"));
        let mut seen = Vec::new();

        let result = stream_tool_observed(
            &mut screen,
            &mut view,
            sh("echo first; i=0; while [ $i -lt 700 ]; do echo noise $i; i=$((i+1)); done"),
            |line| seen.push(line.text.clone()),
        )
        .unwrap();

        assert!(result.success());
        assert_eq!(seen.len(), 701);
        assert_eq!(seen[0], "first");
        assert!(view.lines().all(|l| l.text != "first"));
    }

    #[test]
    fn test_launch_failure_is_a_result() {
        let mut screen = CountingScreen::new();
        let mut view = OutputView::new(Chrome::new("Test"));
        let result = stream_tool(
            &mut screen,
            &mut view,
            ProcessSpec::new("/nonexistent/avidia/avdmanager"),
        )
        .unwrap();
        assert!(matches!(
            result.outcome,
            process_runner::ProcessOutcome::LaunchFailed(..)
        ));
    }
}
