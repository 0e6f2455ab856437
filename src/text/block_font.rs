//! A dependency-free font that draws every glyph as a solid block.
//!
//! Block glyphs keep real proportions (x-height for lowercase, descenders
//! for `gjpqy`, zero-width control characters), which is enough for layout
//! to exercise glyph metrics and for terminal output to stay legible as
//! shapes.

use std::rc::Rc;

use super::{Font, FontMetrics, FontProvider, GlyphMetrics, RenderStyle};
use crate::color::Color;
use crate::error::{GuiError, Result};
use crate::geometry::{Point, Rectangle, Size};
use crate::render::PixelBuffer;

/// Name under which [`BuiltinFonts`] serves the block font.
pub const BLOCK_FONT: &str = "block";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockFont {
    point_size: i32,
}

impl BlockFont {
    pub fn new(point_size: u32) -> Self {
        Self {
            point_size: point_size.clamp(1, 512) as i32,
        }
    }

    fn advance(&self) -> i32 {
        (self.point_size * 3 / 5).max(1)
    }

    fn margin(&self) -> i32 {
        i32::from(self.advance() > 2)
    }
}

impl Font for BlockFont {
    fn metrics(&self) -> FontMetrics {
        let ascent = (self.point_size * 4 / 5).max(1);
        FontMetrics {
            ascent,
            descent: self.point_size - ascent,
            line_height: self.point_size,
        }
    }

    fn glyph_metrics(&self, ch: char) -> GlyphMetrics {
        if ch.is_control() {
            return GlyphMetrics::default();
        }
        let advance = self.advance();
        if ch.is_whitespace() {
            return GlyphMetrics { advance, ..GlyphMetrics::default() };
        }

        let FontMetrics { ascent, descent, .. } = self.metrics();
        let margin = self.margin();
        let max_y = if ch.is_lowercase() {
            (ascent * 3 / 5).max(1)
        } else {
            ascent - margin
        };
        let min_y = if matches!(ch, 'g' | 'j' | 'p' | 'q' | 'y') { -descent } else { 0 };
        GlyphMetrics {
            min_x: margin,
            max_x: advance - margin,
            min_y,
            max_y: max_y.max(min_y + 1),
            advance,
        }
    }

    fn render(
        &self,
        text: &str,
        style: RenderStyle,
        foreground: Color,
        background: Color,
    ) -> Result<PixelBuffer> {
        let size = self.text_size(text);
        if size.is_empty() {
            return Err(GuiError::Render(format!("text {text:?} has no visible extent")));
        }

        let fill = match style {
            RenderStyle::Shaded => background,
            RenderStyle::Blended | RenderStyle::Solid => Color::TRANSPARENT,
        };
        let mut pixels = PixelBuffer::new(size, fill);
        let ascent = self.metrics().ascent;

        let mut pen = 0;
        for ch in text.chars() {
            let glyph = self.glyph_metrics(ch);
            let area = Rectangle::new(
                Point::new(pen + glyph.min_x, ascent - glyph.max_y),
                Size::new(glyph.max_x - glyph.min_x, glyph.max_y - glyph.min_y),
            );
            pixels.fill_rect(area, foreground);
            pen += glyph.advance;
        }
        Ok(pixels)
    }
}

/// Provider for fonts compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFonts;

impl FontProvider for BuiltinFonts {
    fn load(&self, name: &str, point_size: u32) -> Result<Rc<dyn Font>> {
        if name != BLOCK_FONT {
            return Err(GuiError::FontLoad {
                name: name.to_owned(),
                point_size,
                reason: "no such built-in font".into(),
            });
        }
        if point_size == 0 {
            return Err(GuiError::FontLoad {
                name: name.to_owned(),
                point_size,
                reason: "point size must be positive".into(),
            });
        }
        Ok(Rc::new(BlockFont::new(point_size)))
    }
}
