//! Border: a single-child frame with bevelled edges.
//!
//! The border is painted once into an offscreen texture the size of the
//! border rectangle and copied on every draw after that; the texture is
//! repainted only when the size or the theme changes.

use std::any::Any;

use crate::color::Color;
use crate::error::Result;
use crate::gadget::{DrawFrame, Gadget, VisualMetrics};
use crate::geometry::{Padding, Point, Rectangle, Size};
use crate::render::{DrawStateGuard, RenderTargetGuard, Renderer, TextureId, Transform};
use crate::theme::{CornerStyle, Theme};

/// Which way the bevel faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bevel {
    /// Light top-left, dark bottom-right.
    #[default]
    Raised,
    /// Dark top-left, light bottom-right.
    Sunken,
    /// Both sides in the light shade.
    Flat,
}

/// Edge colors and geometry for [`paint_bevel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelPaint {
    pub width: i32,
    pub light: Color,
    pub shadow: Color,
    pub corners: CornerStyle,
}

impl BevelPaint {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            width: theme.border_width.max(0),
            light: theme.top_edge,
            shadow: theme.bottom_edge,
            corners: theme.corner_style,
        }
    }
}

/// Paint `width` nested one-pixel rings inside `rect`. The bottom and right
/// edges are drawn last and own the shared corners.
pub fn paint_bevel(
    renderer: &mut dyn Renderer,
    rect: Rectangle,
    bevel: Bevel,
    paint: BevelPaint,
) -> Result<()> {
    let (top_left, bottom_right) = match bevel {
        Bevel::Raised => (paint.light, paint.shadow),
        Bevel::Sunken => (paint.shadow, paint.light),
        Bevel::Flat => (paint.light, paint.light),
    };
    for ring in 0..paint.width {
        let left = rect.point.x + ring;
        let top = rect.point.y + ring;
        let right = rect.right() - 1 - ring;
        let bottom = rect.bottom() - 1 - ring;
        if right < left || bottom < top {
            break;
        }
        let inset = i32::from(ring == 0 && paint.corners == CornerStyle::Round);

        renderer.set_draw_color(top_left);
        renderer.draw_line(Point::new(left + inset, top), Point::new(right - inset, top))?;
        renderer.draw_line(Point::new(left, top + inset), Point::new(left, bottom - inset))?;
        renderer.set_draw_color(bottom_right);
        renderer.draw_line(Point::new(left + inset, bottom), Point::new(right - inset, bottom))?;
        renderer.draw_line(Point::new(right, top + inset), Point::new(right, bottom - inset))?;
    }
    Ok(())
}

/// A singlet that frames its child.
#[derive(Debug, Default)]
pub struct Border {
    bevel: Bevel,
    width: Option<i32>,
    paint: Option<BevelPaint>,
    cache: Option<(TextureId, Size)>,
    stale: bool,
}

impl Border {
    pub fn new(bevel: Bevel) -> Self {
        Self {
            bevel,
            ..Self::default()
        }
    }

    /// Override the theme's border width (builder).
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width.max(0));
        self
    }

    pub fn bevel(&self) -> Bevel {
        self.bevel
    }

    pub fn set_bevel(&mut self, bevel: Bevel) {
        if self.bevel != bevel {
            self.bevel = bevel;
            self.stale = true;
        }
    }

    fn cached_texture(
        &mut self,
        renderer: &mut dyn Renderer,
        size: Size,
        paint: BevelPaint,
    ) -> Result<TextureId> {
        if let Some((texture, cached)) = self.cache {
            if cached == size && !self.stale {
                return Ok(texture);
            }
            renderer.destroy_texture(texture);
            self.cache = None;
        }

        let texture = renderer.create_texture(size)?;
        self.cache = Some((texture, size));
        {
            let mut target = RenderTargetGuard::new(&mut *renderer, Some(texture))?;
            let mut state = DrawStateGuard::new(&mut *target);
            state.set_clip_rect(None);
            state.set_draw_color(Color::TRANSPARENT);
            state.clear()?;
            paint_bevel(&mut *state, Rectangle::from_size(size), self.bevel, paint)?;
        }
        self.stale = false;
        Ok(texture)
    }
}

impl Gadget for Border {
    fn gadget_type(&self) -> &str {
        "Border"
    }

    fn apply_theme(&mut self, theme: &Theme, metrics: &mut VisualMetrics) {
        let mut paint = BevelPaint::from_theme(theme);
        if let Some(width) = self.width {
            paint.width = width;
        }
        metrics.set_gadget_padding(Padding::all(paint.width));
        self.paint = Some(paint);
        self.stale = true;
    }

    fn draw(&mut self, renderer: &mut dyn Renderer, frame: &DrawFrame) -> Result<()> {
        let Some(paint) = self.paint else {
            return Ok(());
        };
        let size = frame.border_rect.size;
        if size.is_empty() || paint.width == 0 {
            return Ok(());
        }
        let texture = self.cached_texture(renderer, size, paint)?;
        renderer.copy(texture, None, frame.border_rect, Transform::IDENTITY)
    }

    fn release(&mut self, renderer: &mut dyn Renderer) {
        if let Some((texture, _)) = self.cache.take() {
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
