//! Staged drawing surface
//!
//! Widgets write into a staging buffer; `refresh` paints it in a single
//! ratatui draw so the terminal only receives the diff.

use super::keys::{Key, KeySource};
use super::session::TerminalSession;
use crate::error::Result;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use ratatui::Terminal;

/// The drawing and input surface every widget renders against
pub trait Screen {
    /// Blank the staging buffer, resized to the current terminal size
    fn clear(&mut self) -> Result<()>;

    /// Stage `text` at `(x, y)`, clipped to the staging area
    fn write_at(&mut self, x: u16, y: u16, text: &str, style: Style);

    /// Area of the staging buffer as of the last `clear`
    fn area(&self) -> Rect;

    /// Direct access to the staging buffer for ratatui widgets
    fn buffer_mut(&mut self) -> &mut Buffer;

    /// Paint the staging buffer
    fn refresh(&mut self) -> Result<()>;

    /// Next key, or `None` when the poll timed out
    fn poll_key(&mut self) -> Result<Option<Key>>;

    /// Current terminal size as `(columns, rows)`
    fn size(&self) -> Result<(u16, u16)>;

    /// Hand the terminal to `f` (a foreground child), then take it back
    /// and repaint everything
    fn suspend(&mut self, f: &mut dyn FnMut()) -> Result<()>;

    /// Non-blocking check for Ctrl+C while a tool is running
    fn interrupt_requested(&mut self) -> Result<bool>;
}

/// Render a ratatui widget into the staging buffer, clipped to its area
pub fn render_widget<W: Widget>(screen: &mut dyn Screen, widget: W, area: Rect) {
    let area = area.intersection(screen.area());
    if area.is_empty() {
        return;
    }
    widget.render(area, screen.buffer_mut());
}

/// `Screen` over a ratatui terminal and a key source
pub struct Surface<B: Backend, K: KeySource> {
    terminal: Terminal<B>,
    keys: K,
    staging: Buffer,
    session: Option<TerminalSession>,
}

impl<B: Backend, K: KeySource> Surface<B, K> {
    pub fn new(backend: B, keys: K) -> Result<Self> {
        let terminal = Terminal::new(backend)?;
        let size = terminal.size()?;
        Ok(Self {
            terminal,
            keys,
            staging: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
            session: None,
        })
    }

    /// Attach the raw-mode session so `suspend` can release it
    pub fn with_session(mut self, session: TerminalSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }
}

impl<B: Backend, K: KeySource> Screen for Surface<B, K> {
    fn clear(&mut self) -> Result<()> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if self.staging.area == area {
            self.staging.reset();
        } else {
            self.staging = Buffer::empty(area);
        }
        Ok(())
    }

    fn write_at(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let area = self.staging.area;
        if x >= area.width || y >= area.height {
            return;
        }
        let max_width = (area.width - x) as usize;
        self.staging.set_stringn(x, y, text, max_width, style);
    }

    fn area(&self) -> Rect {
        self.staging.area
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.staging
    }

    fn refresh(&mut self) -> Result<()> {
        let staging = &self.staging;
        self.terminal.draw(|frame| {
            let buf = frame.buffer_mut();
            // The terminal may have been resized since the last clear
            let area = buf.area.intersection(staging.area);
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let (Some(dst), Some(src)) = (buf.cell_mut((x, y)), staging.cell((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<Key>> {
        self.keys.next_key()
    }

    fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    fn suspend(&mut self, f: &mut dyn FnMut()) -> Result<()> {
        if let Some(session) = self.session.as_mut() {
            session.release();
        }
        f();
        if let Some(session) = self.session.as_mut() {
            session.reacquire()?;
        }
        // The child drew over everything; forget the previous frame
        self.terminal.clear()?;
        Ok(())
    }

    fn interrupt_requested(&mut self) -> Result<bool> {
        self.keys.interrupt_requested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::keys::ScriptedKeys;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::{Block, Borders};

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_write_then_refresh_paints_backend() {
        let mut surface = Surface::new(TestBackend::new(20, 3), ScriptedKeys::new()).unwrap();
        surface.clear().unwrap();
        surface.write_at(2, 1, "hello", Style::default());
        surface.refresh().unwrap();

        let buffer = surface.backend().buffer();
        assert_eq!(row_text(buffer, 1).trim_end(), "  hello");
    }

    #[test]
    fn test_write_is_clipped() {
        let mut surface = Surface::new(TestBackend::new(8, 2), ScriptedKeys::new()).unwrap();
        surface.clear().unwrap();
        surface.write_at(5, 0, "overflowing", Style::default());
        surface.write_at(0, 5, "off screen", Style::default());
        surface.write_at(20, 0, "far right", Style::default());
        surface.refresh().unwrap();

        assert_eq!(row_text(surface.backend().buffer(), 0), "     ove");
    }

    #[test]
    fn test_clear_blanks_previous_frame() {
        let mut surface = Surface::new(TestBackend::new(10, 1), ScriptedKeys::new()).unwrap();
        surface.clear().unwrap();
        surface.write_at(0, 0, "first", Style::default());
        surface.refresh().unwrap();
        surface.clear().unwrap();
        surface.refresh().unwrap();

        assert_eq!(row_text(surface.backend().buffer(), 0).trim(), "");
    }

    #[test]
    fn test_render_widget_clips_to_area() {
        let mut surface = Surface::new(TestBackend::new(6, 3), ScriptedKeys::new()).unwrap();
        surface.clear().unwrap();
        render_widget(&mut surface, Block::default().borders(Borders::ALL), Rect::new(0, 0, 40, 40));
        surface.refresh().unwrap();

        assert_eq!(row_text(surface.backend().buffer(), 0), "┌────┐");
    }

    #[test]
    fn test_size_and_poll() {
        let keys = ScriptedKeys::new().key(Key::Enter);
        let mut surface = Surface::new(TestBackend::new(30, 7), keys).unwrap();
        assert_eq!(surface.size().unwrap(), (30, 7));
        assert_eq!(surface.poll_key().unwrap(), Some(Key::Enter));
    }

    #[test]
    fn test_suspend_without_session_runs_closure() {
        let mut surface = Surface::new(TestBackend::new(10, 2), ScriptedKeys::new()).unwrap();
        let mut ran = false;
        surface.suspend(&mut || ran = true).unwrap();
        assert!(ran);
    }
}
