//! Text measurement and rendering capabilities consumed by the sampler.

use std::io::Write;

use anyhow::{Context, Result};
use unicode_width::UnicodeWidthStr;

/// Drawing target for the overlay text.
///
/// `measure_text` must return the same width for the same text for as long
/// as the surface lives; labels cache the value.
pub trait TextSurface {
    fn measure_text(&self, text: &str) -> Result<u32>;

    /// Replace the visible text. `width` is the sum of the kept label
    /// widths, i.e. the extent of the region to draw.
    fn render(&mut self, text: &str, width: u32) -> Result<()>;
}

impl<T: TextSurface + ?Sized> TextSurface for &mut T {
    fn measure_text(&self, text: &str) -> Result<u32> {
        (**self).measure_text(text)
    }

    fn render(&mut self, text: &str, width: u32) -> Result<()> {
        (**self).render(text, width)
    }
}

/// Single terminal line. Widths are measured in display columns.
pub struct ConsoleSurface<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TextSurface for ConsoleSurface<W> {
    fn measure_text(&self, text: &str) -> Result<u32> {
        Ok(u32::try_from(text.width()).unwrap_or(u32::MAX))
    }

    fn render(&mut self, text: &str, _width: u32) -> Result<()> {
        // carriage return + erase to end of line
        write!(self.out, "\r{text}\x1b[K").context("write overlay line")?;
        self.out.flush().context("flush overlay line")
    }
}
