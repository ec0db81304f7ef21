use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::buffer::{Buffer, Cell};
use crate::layout::Rect;
use crate::render::render_to_buffer;
use crate::scene::Scene;
use crate::text::char_width;

/// Raw-mode, alternate-screen terminal with mouse capture. Restored on drop.
pub struct Terminal {
    stdout: io::Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.current.width(), self.current.height())
    }

    /// The scene viewport matching the terminal size.
    pub fn viewport(&self) -> Rect {
        let (width, height) = self.size();
        Rect::from_size(width as f32, height as f32)
    }

    /// Wait up to `timeout` for input, then drain whatever else is pending.
    pub fn poll(&self, timeout: Duration) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    /// Draw the scene's last layout and write only the cells that changed.
    /// Returns true if the terminal was resized since the last draw.
    pub fn draw(&mut self, scene: &Scene) -> io::Result<bool> {
        let (width, height) = terminal::size()?;
        let resized = width != self.current.width() || height != self.current.height();
        if resized {
            log::debug!("[terminal] resized to {width}x{height}");
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        render_to_buffer(scene, &mut self.current);
        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(resized)
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last: Option<(u16, u16)> = None;
        let mut pen = Cell::default();

        queue!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(rgb(pen.fg)),
            SetBackgroundColor(rgb(pen.bg))
        )?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            // The wide character to the left already covers this column
            if cell.continuation {
                continue;
            }

            let sequential = last.is_some_and(|(lx, ly)| ly == y && lx == x);
            if !sequential {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }

            if cell.fg != pen.fg {
                queue!(self.stdout, SetForegroundColor(rgb(cell.fg)))?;
            }
            if cell.bg != pen.bg {
                queue!(self.stdout, SetBackgroundColor(rgb(cell.bg)))?;
            }
            if cell.style != pen.style {
                // Bold and dim share one reset, so rebuild the attributes
                queue!(
                    self.stdout,
                    SetAttribute(Attribute::Reset),
                    SetForegroundColor(rgb(cell.fg)),
                    SetBackgroundColor(rgb(cell.bg))
                )?;
                if cell.style.bold {
                    queue!(self.stdout, SetAttribute(Attribute::Bold))?;
                }
                if cell.style.dim {
                    queue!(self.stdout, SetAttribute(Attribute::Dim))?;
                }
                if cell.style.italic {
                    queue!(self.stdout, SetAttribute(Attribute::Italic))?;
                }
                if cell.style.underline {
                    queue!(self.stdout, SetAttribute(Attribute::Underlined))?;
                }
            }
            pen = *cell;

            write!(self.stdout, "{}", cell.symbol)?;
            last = Some((x + char_width(cell.symbol).max(1) as u16, y));
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

fn rgb(color: crate::types::Rgb) -> CtColor {
    CtColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
