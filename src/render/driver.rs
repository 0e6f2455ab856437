//! Crossterm terminal presenter.
//!
//! `TerminalDriver` paints each frame pixel as one terminal cell (a space with
//! the pixel's background color). Only pixels that changed since the previous
//! frame are written. The driver does NOT enter the alternate screen on
//! creation; call `enter_alt_screen` explicitly.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::pixels::{PixelBuffer, PixelUpdate};
use super::software::Presenter;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::Size;

pub struct TerminalDriver {
    writer: BufWriter<Stdout>,
    previous: Option<PixelBuffer>,
}

impl TerminalDriver {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            previous: None,
        })
    }

    /// Enter alternate screen, enable raw mode and hide the cursor.
    pub fn enter_alt_screen(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        self.previous = None;
        Ok(())
    }

    /// Leave alternate screen, disable raw mode and show the cursor.
    pub fn leave_alt_screen(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Terminal size in cells, as a window size.
    pub fn terminal_size() -> io::Result<Size> {
        let (cols, rows) = terminal::size()?;
        Ok(Size::new(cols.into(), rows.into()))
    }

    /// Forget the previous frame so the next present repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    fn apply_updates(&mut self, updates: &[PixelUpdate]) -> io::Result<()> {
        for update in updates {
            queue!(
                self.writer,
                cursor::MoveTo(update.x, update.y),
                SetBackgroundColor(to_terminal_color(update.color)),
                Print(' '),
                ResetColor
            )?;
        }
        self.writer.flush()
    }
}

impl Presenter for TerminalDriver {
    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        let updates = match &self.previous {
            Some(previous) => frame.diff(previous),
            None => frame.diff(&PixelBuffer::transparent(Size::zero())),
        };
        log::trace!("presenting {} changed cells", updates.len());
        self.apply_updates(&updates)?;
        self.previous = Some(frame.clone());
        Ok(())
    }
}

/// Convert a pixel to a crossterm color. Fully transparent maps to the
/// terminal default.
pub fn to_terminal_color(color: Color) -> style::Color {
    if color.is_transparent() {
        style::Color::Reset
    } else {
        style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}
