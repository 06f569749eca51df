//! Live tail of tool output
//!
//! The caller appends lines as a tool streams and redraws after each one.
//! Only the most recent lines that fit are shown. Once finished, the view
//! becomes interactive and waits for Enter so the result can be read.

use super::header::{Chrome, BODY_LEFT, BODY_TOP};
use super::{InputResult, Interactive};
use crate::error::Result;
use crate::process_runner::{OutputLine, Stream};
use crate::theme::{Colors, Styles};
use crate::ui::{Key, Screen};
use ratatui::style::Style;
use std::collections::VecDeque;

/// Lines kept for display
const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct OutputView {
    chrome: Chrome,
    lines: VecDeque<OutputLine>,
    capacity: usize,
    status: String,
    status_style: Style,
    finished: bool,
}

impl OutputView {
    pub fn new(chrome: Chrome) -> Self {
        Self {
            chrome,
            lines: VecDeque::new(),
            capacity: DEFAULT_CAPACITY,
            status: String::new(),
            status_style: Styles::info(),
            finished: false,
        }
    }

    pub fn push(&mut self, line: OutputLine) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Append a line of our own (progress notes between tool runs)
    pub fn note(&mut self, text: impl Into<String>) {
        self.push(OutputLine {
            stream: Stream::Stdout,
            text: text.into(),
        });
    }

    pub fn set_status(&mut self, status: impl Into<String>, style: Style) {
        self.status = status.into();
        self.status_style = style;
    }

    /// Final status; the view now waits for Enter when driven
    pub fn finish(&mut self, status: impl Into<String>, style: Style) {
        self.set_status(status, style);
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    pub fn render(&self, screen: &mut dyn Screen) {
        self.chrome.render(screen, Interactive::hint(self));
        let area = screen.area();

        screen.write_at(BODY_LEFT, BODY_TOP - 1, &self.status, self.status_style);

        // Rows between the status line and the footer
        let rows = area.height.saturating_sub(BODY_TOP + 2) as usize;
        let skip = self.lines.len().saturating_sub(rows);
        for (i, line) in self.lines.iter().skip(skip).enumerate() {
            let style = match line.stream {
                Stream::Stdout => Styles::text_secondary(),
                Stream::Stderr => Style::default().fg(Colors::STDERR),
            };
            screen.write_at(BODY_LEFT, BODY_TOP + 1 + i as u16, &line.text, style);
        }
    }

    /// Clear, render and refresh
    pub fn draw(&self, screen: &mut dyn Screen) -> Result<()> {
        screen.clear()?;
        self.render(screen);
        screen.refresh()
    }
}

impl Interactive for OutputView {
    type Output = ();

    fn render(&self, screen: &mut dyn Screen) {
        OutputView::render(self, screen);
    }

    fn handle_key(&mut self, key: Key) -> InputResult<()> {
        match key {
            Key::Enter | Key::Escape if self.finished => InputResult::Confirm(()),
            _ => InputResult::Continue,
        }
    }

    fn hint(&self) -> &'static str {
        if self.finished {
            "Enter continue"
        } else {
            "Ctrl+C abort"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{ScriptedKeys, Surface};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_capacity_drops_oldest() {
        let mut view = OutputView::new(Chrome::new("Install"));
        view.capacity = 3;
        for i in 0..5 {
            view.note(format!("line {}", i));
        }
        let texts: Vec<_> = view.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_draw_shows_tail() {
        let mut surface = Surface::new(TestBackend::new(40, 10), ScriptedKeys::new()).unwrap();
        let mut view = OutputView::new(Chrome::new("Install"));
        for i in 0..20 {
            view.note(format!("progress {}", i));
        }
        view.set_status("Installing...", Styles::info());
        view.draw(&mut surface).unwrap();

        let text: String = surface
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("progress 19"));
        assert!(!text.contains("progress 0 "));
        assert!(text.contains("Installing..."));
    }

    #[test]
    fn test_finished_view_waits_for_enter() {
        let keys = ScriptedKeys::new().key(Key::Char('x')).key(Key::Enter);
        let mut surface = Surface::new(TestBackend::new(50, 10), keys).unwrap();
        let mut view = OutputView::new(Chrome::new("Install"));
        view.note("Done.");
        view.finish("Failed (exit code 1)", Styles::error());
        assert!(view.is_finished());

        let result = crate::components::drive(&mut surface, &Chrome::default(), &mut view).unwrap();
        assert_eq!(result, Some(()));
        assert_eq!(surface.keys().remaining(), 0);
    }

    #[test]
    fn test_running_view_ignores_enter() {
        let mut view = OutputView::new(Chrome::new("Install"));
        assert_eq!(view.handle_key(Key::Enter), InputResult::Continue);
    }
}
