//! The `Gadget` behavior trait and the contexts handed to it.
//!
//! Structure (kind, children, manager, flags) lives in the scene tree; a
//! behavior only supplies what is specific to one type of gadget: its content
//! size, how it draws, and how it reacts to input. Every hook has a default,
//! so a plain container can implement just `gadget_type` and the `Any`
//! accessors.

use std::any::Any;

use crate::error::Result;
use crate::event::{KeyEvent, MouseButton, Press};
use crate::geometry::{Point, Rectangle, Size};
use crate::render::Renderer;
use crate::text::FontCache;
use crate::theme::Theme;

use super::metrics::VisualMetrics;

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Shared resources available during layout.
pub struct LayoutContext<'a> {
    pub fonts: &'a mut FontCache,
    pub theme: &'a Theme,
}

impl<'a> LayoutContext<'a> {
    pub fn new(fonts: &'a mut FontCache, theme: &'a Theme) -> Self {
        Self { fonts, theme }
    }
}

/// Absolute geometry of a node for one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawFrame {
    /// Absolute position of the clip rectangle's origin.
    pub location: Point,
    pub clip_rect: Rectangle,
    pub border_rect: Rectangle,
    pub render_rect: Rectangle,
    pub content_rect: Rectangle,
    pub has_focus: bool,
}

impl DrawFrame {
    /// Translate a node's local rectangles to `location`.
    pub fn new(metrics: &VisualMetrics, location: Point) -> Self {
        Self {
            location,
            clip_rect: metrics.clip_rect().translate(location),
            border_rect: metrics.border_rect().translate(location),
            render_rect: metrics.render_rect().translate(location),
            content_rect: metrics.content_rect().translate(location),
            has_focus: metrics.has_focus,
        }
    }
}

/// Whether a handler dealt with an event. Ignored events bubble to the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    #[default]
    Ignored,
    Consumed,
}

impl EventResult {
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// Requests an event handler makes of the tree. Applied to the handling node
/// after the handler returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventContext {
    redraw: bool,
    relayout: bool,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Relayout implies redraw.
    pub fn request_layout(&mut self) {
        self.relayout = true;
        self.redraw = true;
    }

    pub fn wants_redraw(&self) -> bool {
        self.redraw
    }

    pub fn wants_layout(&self) -> bool {
        self.relayout
    }
}

/// A mouse button transition as seen by a gadget. `position` is in window
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonInput {
    pub button: MouseButton,
    pub press: Press,
    pub position: Point,
}

// ---------------------------------------------------------------------------
// Gadget
// ---------------------------------------------------------------------------

/// Behavior of one node in the scene tree.
pub trait Gadget: Any {
    /// Type name used in diagnostics and error messages (e.g. "Button").
    fn gadget_type(&self) -> &str;

    /// Pull defaults from the theme. Runs when the node is initialized and
    /// again after a theme change.
    fn apply_theme(&mut self, _theme: &Theme, _metrics: &mut VisualMetrics) {}

    /// Content-derived desired size, excluding all padding.
    ///
    /// Only consulted for nodes whose size is not derived from children:
    /// leaves, empty singlets and widgets without a layout manager.
    fn content_size(&mut self, _ctx: &mut LayoutContext<'_>) -> Size {
        Size::zero()
    }

    /// Second layout phase for leaves: shrink to fit `constraint` (a clip
    /// size). The default leaves the metrics untouched.
    fn constrain(
        &mut self,
        _ctx: &mut LayoutContext<'_>,
        _metrics: &mut VisualMetrics,
        _constraint: Size,
    ) {
    }

    /// Paint the node. The background and clip are already applied.
    fn draw(&mut self, _renderer: &mut dyn Renderer, _frame: &DrawFrame) -> Result<()> {
        Ok(())
    }

    /// Release renderer resources. Called once after the node is destroyed.
    fn release(&mut self, _renderer: &mut dyn Renderer) {}

    /// Whether this container takes `child`.
    fn accepts_child(&self, _child: &dyn Gadget) -> bool {
        true
    }

    fn accepts_focus(&self) -> bool {
        false
    }

    fn focus_changed(&mut self, _focused: bool) {}

    fn enter_leave(&mut self, _ctx: &mut EventContext, _entered: bool) -> EventResult {
        EventResult::Ignored
    }

    fn mouse_button(&mut self, _ctx: &mut EventContext, _input: &ButtonInput) -> EventResult {
        EventResult::Ignored
    }

    fn mouse_wheel(
        &mut self,
        _ctx: &mut EventContext,
        _position: Point,
        _delta: Point,
    ) -> EventResult {
        EventResult::Ignored
    }

    fn key(&mut self, _ctx: &mut EventContext, _key: &KeyEvent) -> EventResult {
        EventResult::Ignored
    }

    fn text_input(&mut self, _ctx: &mut EventContext, _text: &str) -> EventResult {
        EventResult::Ignored
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Gadget for Plain {
        fn gadget_type(&self) -> &str {
            "Plain"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn defaults_ignore_events() {
        let mut g = Plain;
        let mut ctx = EventContext::new();
        assert_eq!(g.enter_leave(&mut ctx, true), EventResult::Ignored);
        assert!(!g.accepts_focus());
        assert!(g.accepts_child(&Plain));
        assert!(!ctx.wants_redraw());
    }

    #[test]
    fn downcast_through_any() {
        let g: Box<dyn Gadget> = Box::new(Plain);
        assert!(g.as_any().downcast_ref::<Plain>().is_some());
    }

    #[test]
    fn layout_request_implies_redraw() {
        let mut ctx = EventContext::new();
        ctx.request_layout();
        assert!(ctx.wants_redraw());
        assert!(ctx.wants_layout());
    }

    #[test]
    fn draw_frame_translates_rectangles() {
        let mut m = VisualMetrics::new();
        m.set_desired_size(Size::new(4, 2));
        m.set_gadget_padding(crate::geometry::Padding::all(1));
        let frame = DrawFrame::new(&m, Point::new(10, 20));
        assert_eq!(frame.clip_rect, Rectangle::from_xywh(10, 20, 6, 4));
        assert_eq!(frame.content_rect, Rectangle::from_xywh(11, 21, 4, 2));
    }
}
