//! VisualMetrics: the sizes, paddings and derived rectangles of one node.
//!
//! Rectangles are computed bottom-up from the desired size:
//!
//! ```text
//! render = desired + inner alignment padding
//! border = render  + gadget padding
//! clip   = border  + outer alignment padding
//! ```
//!
//! and positioned top-down relative to the node's own origin, so that
//! `content ⊂ render ⊂ border ⊂ clip`. Every setter recomputes all four
//! rectangles before returning.

use crate::color::Color;
use crate::geometry::{Padding, Point, Rectangle, Size};

#[derive(Debug, Clone, Default)]
pub struct VisualMetrics {
    draw_location: Point,
    last_draw_location: Point,
    desired_size: Size,
    inner_alignment_padding: Padding,
    outer_alignment_padding: Padding,
    gadget_padding: Padding,
    maximum_size: Option<Size>,

    content_rect: Rectangle,
    render_rect: Rectangle,
    border_rect: Rectangle,
    clip_rect: Rectangle,

    pub background: Option<Color>,
    pub has_focus: bool,
}

impl VisualMetrics {
    pub fn new() -> Self {
        let mut metrics = Self {
            draw_location: Point::zero(),
            desired_size: Size::zero(),
            inner_alignment_padding: Padding::zero(),
            outer_alignment_padding: Padding::zero(),
            gadget_padding: Padding::zero(),
            ..Self::default()
        };
        metrics.update_rectangles();
        metrics
    }

    /// Recompute the four rectangles from the desired size and paddings.
    pub fn update_rectangles(&mut self) {
        let render_size = self.desired_size + self.inner_alignment_padding;
        let border_size = render_size + self.gadget_padding;
        let clip_size = border_size + self.outer_alignment_padding;

        self.clip_rect = Rectangle::from_size(clip_size);
        self.border_rect = Rectangle::new(self.outer_alignment_padding.origin(), border_size);
        self.render_rect = Rectangle::new(
            self.border_rect.point + self.gadget_padding.origin(),
            render_size,
        );
        self.content_rect = Rectangle::new(
            self.render_rect.point + self.inner_alignment_padding.origin(),
            self.desired_size,
        );
    }

    // -- getters ------------------------------------------------------------

    /// Position relative to the manager's content origin.
    pub fn draw_location(&self) -> Point {
        self.draw_location
    }

    /// Absolute position at the last draw; unset until the first draw.
    pub fn last_draw_location(&self) -> Point {
        self.last_draw_location
    }

    pub fn desired_size(&self) -> Size {
        self.desired_size
    }

    pub fn inner_alignment_padding(&self) -> Padding {
        self.inner_alignment_padding
    }

    pub fn outer_alignment_padding(&self) -> Padding {
        self.outer_alignment_padding
    }

    pub fn gadget_padding(&self) -> Padding {
        self.gadget_padding
    }

    pub fn maximum_size(&self) -> Option<Size> {
        self.maximum_size
    }

    pub fn content_rect(&self) -> Rectangle {
        self.content_rect
    }

    pub fn render_rect(&self) -> Rectangle {
        self.render_rect
    }

    pub fn border_rect(&self) -> Rectangle {
        self.border_rect
    }

    pub fn clip_rect(&self) -> Rectangle {
        self.clip_rect
    }

    /// All padding between the clip edge and the content.
    pub fn frame(&self) -> Padding {
        self.inner_alignment_padding + self.gadget_padding + self.outer_alignment_padding
    }

    /// The desired size that fits a clip-size constraint.
    pub fn content_constraint(&self, constraint: Size) -> Size {
        constraint - self.frame()
    }

    /// Whether the clip size exceeds the maximum size on either axis.
    pub fn exceeds_maximum(&self) -> bool {
        self.maximum_size
            .is_some_and(|max| self.clip_rect.size.exceeds(max))
    }

    // -- setters ------------------------------------------------------------

    pub fn set_draw_location(&mut self, location: Point) {
        self.draw_location = location;
    }

    pub(crate) fn set_last_draw_location(&mut self, location: Point) {
        self.last_draw_location = location;
    }

    pub fn set_desired_size(&mut self, size: Size) {
        self.desired_size = size;
        self.update_rectangles();
    }

    pub fn set_inner_alignment_padding(&mut self, padding: Padding) {
        self.inner_alignment_padding = padding;
        self.update_rectangles();
    }

    pub fn set_outer_alignment_padding(&mut self, padding: Padding) {
        self.outer_alignment_padding = padding;
        self.update_rectangles();
    }

    pub fn set_gadget_padding(&mut self, padding: Padding) {
        self.gadget_padding = padding;
        self.update_rectangles();
    }

    /// Clear both alignment paddings. Layout managers call this before
    /// re-measuring a child so results do not depend on the previous pass.
    pub fn reset_alignment_padding(&mut self) {
        self.inner_alignment_padding = Padding::zero();
        self.outer_alignment_padding = Padding::zero();
        self.update_rectangles();
    }

    pub fn set_maximum_size(&mut self, size: Option<Size>) {
        self.maximum_size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rectangles_nest_bottom_up() {
        let mut m = VisualMetrics::new();
        m.set_desired_size(Size::new(10, 4));
        m.set_inner_alignment_padding(Padding::new(1, 0, 2, 0));
        m.set_gadget_padding(Padding::all(1));
        m.set_outer_alignment_padding(Padding::new(0, 3, 0, 0));

        assert_eq!(m.content_rect(), Rectangle::from_xywh(3, 2, 10, 4));
        assert_eq!(m.render_rect(), Rectangle::from_xywh(1, 1, 12, 5));
        assert_eq!(m.border_rect(), Rectangle::from_xywh(0, 0, 14, 7));
        assert_eq!(m.clip_rect(), Rectangle::from_xywh(0, 0, 14, 10));

        assert!(m.clip_rect().contains_rectangle(m.border_rect()));
        assert!(m.border_rect().contains_rectangle(m.render_rect()));
        assert!(m.render_rect().contains_rectangle(m.content_rect()));
    }

    #[test]
    fn maximum_size_is_checked_on_clip() {
        let mut m = VisualMetrics::new();
        m.set_desired_size(Size::new(8, 8));
        assert!(!m.exceeds_maximum());
        m.set_maximum_size(Some(Size::new(10, 10)));
        assert!(!m.exceeds_maximum());
        m.set_gadget_padding(Padding::all(2));
        assert!(m.exceeds_maximum());
        assert_eq!(m.content_constraint(Size::new(10, 10)), Size::new(6, 6));
    }

    #[test]
    fn last_draw_location_starts_unset() {
        let m = VisualMetrics::new();
        assert!(!m.last_draw_location().is_set());
        assert!(m.draw_location().is_set());
    }

    #[test]
    fn reset_alignment_padding_shrinks_clip() {
        let mut m = VisualMetrics::new();
        m.set_desired_size(Size::new(5, 5));
        m.set_outer_alignment_padding(Padding::new(0, 10, 0, 0));
        assert_eq!(m.clip_rect().size, Size::new(5, 15));
        m.reset_alignment_padding();
        assert_eq!(m.clip_rect().size, Size::new(5, 5));
    }
}
