//! Panel: a fixed-size leaf, optionally filled with a solid color.

use std::any::Any;

use crate::color::Color;
use crate::error::Result;
use crate::gadget::{DrawFrame, Gadget, LayoutContext, VisualMetrics};
use crate::geometry::Size;
use crate::render::Renderer;

/// A leaf with a fixed content size. Useful as a spacer or a swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    size: Size,
    color: Option<Color>,
}

impl Panel {
    pub fn new(size: Size) -> Self {
        Self { size, color: None }
    }

    /// Fill the content rectangle with `color` (builder).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the requested size. Callers go through
    /// [`SceneTree::update`](crate::gadget::SceneTree::update) so the node is
    /// relaid out.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }
}

impl Gadget for Panel {
    fn gadget_type(&self) -> &str {
        "Panel"
    }

    fn content_size(&mut self, _ctx: &mut LayoutContext<'_>) -> Size {
        self.size
    }

    fn constrain(&mut self, _ctx: &mut LayoutContext<'_>, metrics: &mut VisualMetrics, constraint: Size) {
        let fit = metrics.content_constraint(constraint);
        metrics.set_desired_size(metrics.desired_size().component_min(fit));
    }

    fn draw(&mut self, renderer: &mut dyn Renderer, frame: &DrawFrame) -> Result<()> {
        if let Some(color) = self.color {
            renderer.set_draw_color(color);
            renderer.fill_rect(frame.content_rect)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Rectangle};
    use crate::render::SoftwareRenderer;
    use crate::text::FontCache;
    use crate::theme::Theme;

    #[test]
    fn reports_its_size() {
        let mut fonts = FontCache::default();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut fonts, &theme);
        let mut panel = Panel::new(Size::new(7, 3));
        assert_eq!(panel.content_size(&mut ctx), Size::new(7, 3));
    }

    #[test]
    fn shrinks_to_constraint() {
        let mut fonts = FontCache::default();
        let theme = Theme::default();
        let mut ctx = LayoutContext::new(&mut fonts, &theme);
        let mut metrics = VisualMetrics::new();
        metrics.set_desired_size(Size::new(10, 10));
        Panel::new(Size::new(10, 10)).constrain(&mut ctx, &mut metrics, Size::new(4, 20));
        assert_eq!(metrics.desired_size(), Size::new(4, 10));
    }

    #[test]
    fn fills_content_rect() {
        let mut r = SoftwareRenderer::headless(Size::new(6, 6));
        let mut metrics = VisualMetrics::new();
        metrics.set_desired_size(Size::new(2, 2));
        let frame = DrawFrame::new(&metrics, Point::new(1, 1));
        Panel::new(Size::new(2, 2))
            .with_color(Color::GREEN)
            .draw(&mut r, &frame)
            .unwrap();
        assert_eq!(r.screen().get(Point::new(2, 2)), Some(Color::GREEN));
        assert_eq!(r.screen().get(Point::new(3, 3)), Some(Color::BLACK));
        assert_eq!(frame.content_rect, Rectangle::from_xywh(1, 1, 2, 2));
    }
}
