//! Modal message box, dismissed with Enter or Escape

use super::{drive, Chrome, InputResult, Interactive};
use crate::error::Result;
use crate::theme::{Colors, Styles};
use crate::ui::{render_widget, Key, Screen};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Severity, which picks the border color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl MessageKind {
    fn color(self) -> Color {
        match self {
            MessageKind::Info => Colors::PRIMARY,
            MessageKind::Success => Colors::SUCCESS,
            MessageKind::Warning => Colors::WARNING,
            MessageKind::Error => Colors::ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    title: String,
    lines: Vec<String>,
    kind: MessageKind,
}

impl MessageBox {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            kind: MessageKind::Info,
        }
    }

    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Display until dismissed
    pub fn show(mut self, screen: &mut dyn Screen) -> Result<()> {
        drive(screen, &Chrome::default(), &mut self)?;
        Ok(())
    }

    /// Centered box sized to the content, clipped to the screen
    fn frame(&self, area: Rect) -> Rect {
        let content_width = self
            .lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(self.title.chars().count() + 2))
            .max()
            .unwrap_or(0) as u16;
        let width = (content_width + 4).max(20).min(area.width);
        let inner = width.saturating_sub(2).max(1) as usize;
        let rows: usize = self.lines.iter().map(|l| wrapped_rows(l, inner)).sum();
        // Border, blank, wrapped lines, blank, dismiss hint, border
        let height = (rows as u16).saturating_add(5).min(area.height);
        Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        )
    }
}

/// Rows `line` occupies when word-wrapped to `width` columns
fn wrapped_rows(line: &str, width: usize) -> usize {
    let mut rows = 1;
    let mut used = 0;
    for word in line.split(' ') {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= width {
            used = needed;
            continue;
        }
        if used > 0 {
            rows += 1;
        }
        // Words longer than the row are broken across rows
        rows += len.saturating_sub(1) / width;
        used = match len % width {
            0 if len > 0 => width,
            rem => rem,
        };
    }
    rows
}

impl Interactive for MessageBox {
    type Output = ();

    fn render(&self, screen: &mut dyn Screen) {
        let frame = self.frame(screen.area());
        let color = self.kind.color();

        let mut text: Vec<Line> = vec![Line::from("")];
        text.extend(
            self.lines
                .iter()
                .map(|l| Line::styled(l.clone(), Styles::text())),
        );
        text.push(Line::from(""));
        text.push(Line::styled("Press Enter to continue", Styles::nav_hint()));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(color));

        render_widget(screen, Clear, frame);
        render_widget(
            screen,
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            frame,
        );
    }

    fn handle_key(&mut self, key: Key) -> InputResult<()> {
        match key {
            Key::Enter | Key::Escape => InputResult::Confirm(()),
            _ => InputResult::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{ScriptedKeys, Surface};
    use ratatui::backend::TestBackend;

    fn screen_text(surface: &Surface<TestBackend, ScriptedKeys>) -> String {
        let buffer = surface.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_shows_lines_until_enter() {
        let keys = ScriptedKeys::new().key(Key::Char('x')).idle().key(Key::Enter);
        let mut surface = Surface::new(TestBackend::new(60, 12), keys).unwrap();
        MessageBox::new("Done", vec!["Device created".to_string()])
            .kind(MessageKind::Success)
            .show(&mut surface)
            .unwrap();

        let text = screen_text(&surface);
        assert!(text.contains("Done"));
        assert!(text.contains("Device created"));
        assert_eq!(surface.keys().remaining(), 0);
    }

    #[test]
    fn test_escape_dismisses() {
        let keys = ScriptedKeys::new().key(Key::Escape);
        let mut surface = Surface::new(TestBackend::new(40, 10), keys).unwrap();
        assert!(MessageBox::new("Error", vec!["boom".into()]).show(&mut surface).is_ok());
    }

    #[test]
    fn test_frame_fits_small_screen() {
        let mb = MessageBox::new("T", vec!["x".repeat(200)]);
        let frame = mb.frame(Rect::new(0, 0, 30, 4));
        assert!(frame.width <= 30);
        assert!(frame.height <= 4);
    }

    #[test]
    fn test_wrapped_message_keeps_dismiss_hint_visible() {
        let long = "the emulator could not start because the selected system image is missing"
            .to_string();
        let mb = MessageBox::new("Error", vec![long.clone()]);
        let frame = mb.frame(Rect::new(0, 0, 30, 24));
        let rows = wrapped_rows(&long, frame.width as usize - 2);
        assert!(rows > 1);
        assert_eq!(frame.height as usize, rows + 5);

        let keys = ScriptedKeys::new().key(Key::Enter);
        let mut surface = Surface::new(TestBackend::new(30, 24), keys).unwrap();
        mb.show(&mut surface).unwrap();
        let text = screen_text(&surface);
        assert!(text.contains("Press Enter to continue"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn test_wrapped_rows_counts() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("short", 10), 1);
        assert_eq!(wrapped_rows("aaaa bbbb cccc", 9), 2);
        assert_eq!(wrapped_rows(&"x".repeat(25), 10), 3);
    }
}
