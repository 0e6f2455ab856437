//! Text: the font interface, the font cache, and the built-in block font.
//!
//! Gadgets never load fonts themselves. They ask the [`FontCache`] passed to
//! them during layout, which memoises fonts by name and point size and
//! delegates loading to a [`FontProvider`].

mod block_font;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::color::Color;
use crate::error::Result;
use crate::geometry::Size;
use crate::render::PixelBuffer;

pub use block_font::{BlockFont, BuiltinFonts, BLOCK_FONT};

/// Whole-font vertical metrics, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontMetrics {
    pub ascent: i32,
    /// Distance below the baseline, as a non-negative value.
    pub descent: i32,
    pub line_height: i32,
}

/// Per-glyph bounding box relative to the pen position on the baseline.
/// `y` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub advance: i32,
}

/// Rasterization quality, mirroring the usual TTF render modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Antialiased over a transparent background.
    #[default]
    Blended,
    /// Antialiased over an opaque background color.
    Shaded,
    /// No antialiasing, transparent background.
    Solid,
}

/// A loaded font at one point size.
pub trait Font {
    fn metrics(&self) -> FontMetrics;

    /// Metrics for one glyph. Unknown glyphs report the replacement box.
    fn glyph_metrics(&self, ch: char) -> GlyphMetrics;

    /// Rasterize `text` into a buffer exactly `text_size(text)` large.
    /// `background` is only painted by [`RenderStyle::Shaded`].
    fn render(
        &self,
        text: &str,
        style: RenderStyle,
        foreground: Color,
        background: Color,
    ) -> Result<PixelBuffer>;

    /// Size of the rendered line: summed advances by line height.
    fn text_size(&self, text: &str) -> Size {
        let width = text.chars().map(|ch| self.glyph_metrics(ch).advance).sum();
        Size::new(width, self.metrics().line_height)
    }
}

/// Loads fonts by name and point size.
pub trait FontProvider {
    fn load(&self, name: &str, point_size: u32) -> Result<Rc<dyn Font>>;
}

// ---------------------------------------------------------------------------
// FontCache
// ---------------------------------------------------------------------------

/// Memoising font store, created once by the application and passed by
/// reference to every consumer.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    fonts: HashMap<(String, u32), Rc<dyn Font>>,
}

impl FontCache {
    pub fn new(provider: impl FontProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            fonts: HashMap::new(),
        }
    }

    /// Fetch a font, loading it on first use. Failures are not cached.
    pub fn get(&mut self, name: &str, point_size: u32) -> Result<Rc<dyn Font>> {
        let key = (name.to_owned(), point_size);
        if let Some(font) = self.fonts.get(&key) {
            return Ok(Rc::clone(font));
        }
        let font = self.provider.load(name, point_size)?;
        log::debug!("loaded font '{name}' at {point_size}pt");
        self.fonts.insert(key, Rc::clone(&font));
        Ok(font)
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached font.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new(BuiltinFonts)
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.fonts.keys().collect();
        keys.sort();
        f.debug_struct("FontCache").field("fonts", &keys).finish()
    }
}
