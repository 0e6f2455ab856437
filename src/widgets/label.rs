//! Label: a single line of text.
//!
//! The text is rasterized during layout, where the font cache is available,
//! and uploaded to a texture on the next draw. When the font cannot be loaded
//! the label logs a warning and lays out as zero-sized instead of failing.

use std::any::Any;

use crate::color::Color;
use crate::error::Result;
use crate::gadget::{DrawFrame, Gadget, LayoutContext, VisualMetrics};
use crate::geometry::{Rectangle, Size};
use crate::render::{PixelBuffer, Renderer, TextureId, Transform};
use crate::text::RenderStyle;
use crate::theme::Theme;

/// A leaf that shows one line of text.
#[derive(Debug, Default)]
pub struct Label {
    text: String,
    font_override: Option<(String, u32)>,
    color_override: Option<Color>,
    font: (String, u32),
    color: Color,
    rendered: Option<PixelBuffer>,
    texture: Option<(TextureId, Size)>,
    upload: bool,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Use a specific font instead of the theme's (builder).
    pub fn with_font(mut self, name: impl Into<String>, point_size: u32) -> Self {
        self.font_override = Some((name.into(), point_size));
        self
    }

    /// Use a specific text color instead of the theme foreground (builder).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color_override = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Takes effect at the next layout.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.rendered = None;
    }

    /// Font name and point size in effect after theming.
    pub fn font(&self) -> (&str, u32) {
        (&self.font.0, self.font.1)
    }

    fn rasterize(&self, ctx: &mut LayoutContext<'_>) -> Result<PixelBuffer> {
        let (name, size) = &self.font;
        let font = ctx.fonts.get(name, *size)?;
        font.render(&self.text, RenderStyle::Blended, self.color, Color::TRANSPARENT)
    }
}

impl Gadget for Label {
    fn gadget_type(&self) -> &str {
        "Label"
    }

    fn apply_theme(&mut self, theme: &Theme, _metrics: &mut VisualMetrics) {
        self.font = self
            .font_override
            .clone()
            .unwrap_or_else(|| (theme.font_name.clone(), theme.font_size));
        self.color = self.color_override.unwrap_or(theme.foreground);
        self.rendered = None;
    }

    fn content_size(&mut self, ctx: &mut LayoutContext<'_>) -> Size {
        if self.text.is_empty() {
            self.rendered = None;
            return Size::zero();
        }
        match self.rasterize(ctx) {
            Ok(pixels) => {
                let size = pixels.size();
                self.rendered = Some(pixels);
                self.upload = true;
                size
            }
            Err(err) => {
                log::warn!("label {:?} not rendered: {err}", self.text);
                self.rendered = None;
                Size::zero()
            }
        }
    }

    fn constrain(&mut self, _ctx: &mut LayoutContext<'_>, metrics: &mut VisualMetrics, constraint: Size) {
        let fit = metrics.content_constraint(constraint);
        metrics.set_desired_size(metrics.desired_size().component_min(fit));
    }

    fn draw(&mut self, renderer: &mut dyn Renderer, frame: &DrawFrame) -> Result<()> {
        let Some(pixels) = &self.rendered else {
            return Ok(());
        };
        let size = pixels.size();

        if self.upload {
            let texture = match self.texture {
                Some((texture, cached)) if cached == size => texture,
                previous => {
                    if let Some((texture, _)) = previous {
                        renderer.destroy_texture(texture);
                    }
                    self.texture = None;
                    let texture = renderer.create_texture(size)?;
                    self.texture = Some((texture, size));
                    texture
                }
            };
            renderer.update_texture(texture, pixels)?;
            self.upload = false;
        }

        let Some((texture, _)) = self.texture else {
            return Ok(());
        };
        // Clipped rather than scaled when constrained.
        let visible = frame.content_rect.size.component_min(size);
        if visible.is_empty() {
            return Ok(());
        }
        renderer.copy(
            texture,
            Some(Rectangle::from_size(visible)),
            Rectangle::new(frame.content_rect.point, visible),
            Transform::IDENTITY,
        )
    }

    fn release(&mut self, renderer: &mut dyn Renderer) {
        if let Some((texture, _)) = self.texture.take() {
            renderer.destroy_texture(texture);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
