//! Layout managers: strategies that place a widget's children.
//!
//! A manager is attached to a widget (or screen) and runs the two layout
//! phases for it. The scene tree takes the manager out of the node for the
//! duration of the call, so a manager receives the whole tree mutably and
//! can recurse into children through [`SceneTree::initial_layout`] and
//! [`SceneTree::constrained_layout`].
//!
//! Managers place children relative to the widget's content origin and
//! finish by setting the widget's desired size.

pub mod linear;
pub mod stack;

use crate::gadget::{GadgetId, LayoutContext, SceneTree};
use crate::geometry::{Padding, Point, Size};

pub use linear::LinearLayout;
pub use stack::StackLayout;

/// Places the children of one widget.
pub trait LayoutManager {
    /// Short name for diagnostics and tree dumps.
    fn name(&self) -> &str;

    /// Exploratory phase: lay out every child, place them, and size the
    /// widget. Returns whether any child needs a constrained pass.
    fn initial_widget_layout(
        &mut self,
        tree: &mut SceneTree,
        ctx: &mut LayoutContext<'_>,
        widget: GadgetId,
    ) -> bool;

    /// Executive phase: fit the children into `constraint`, the widget's
    /// clip-size budget, and re-place them.
    fn constrained_widget_layout(
        &mut self,
        tree: &mut SceneTree,
        ctx: &mut LayoutContext<'_>,
        widget: GadgetId,
        constraint: Size,
    );
}

/// Direction in which a linear layout sequences its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn major(self, size: Size) -> i32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    pub fn minor(self, size: Size) -> i32 {
        match self {
            Orientation::Horizontal => size.height,
            Orientation::Vertical => size.width,
        }
    }

    /// Build a size from major and minor extents.
    pub fn size(self, major: i32, minor: i32) -> Size {
        match self {
            Orientation::Horizontal => Size::new(major, minor),
            Orientation::Vertical => Size::new(minor, major),
        }
    }

    /// Build a point from major and minor offsets.
    pub fn point(self, major: i32, minor: i32) -> Point {
        match self {
            Orientation::Horizontal => Point::new(major, minor),
            Orientation::Vertical => Point::new(minor, major),
        }
    }

    /// Padding on the minor axis only.
    pub fn minor_padding(self, before: i32, after: i32) -> Padding {
        match self {
            Orientation::Horizontal => Padding::new(before, after, 0, 0),
            Orientation::Vertical => Padding::new(0, 0, before, after),
        }
    }
}

/// Where leftover space on an axis goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Top or left: the residue goes after the child.
    #[default]
    Start,
    /// Split, with the odd unit on the trailing side.
    Center,
    /// Bottom or right: the residue goes before the child.
    End,
}

impl Alignment {
    /// Split `residue` into (before, after).
    pub fn split(self, residue: i32) -> (i32, i32) {
        let residue = residue.max(0);
        match self {
            Alignment::Start => (0, residue),
            Alignment::End => (residue, 0),
            Alignment::Center => {
                let before = residue / 2;
                (before, residue - before)
            }
        }
    }
}

/// Which alignment padding a manager writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingTarget {
    /// Outside the border: the child's background stays its own size.
    #[default]
    Outer,
    /// Inside the border: the child's frame stretches to the row.
    Inner,
}

/// Write alignment padding into a child's metrics.
pub(crate) fn apply_alignment(
    tree: &mut SceneTree,
    child: GadgetId,
    target: PaddingTarget,
    padding: Padding,
) {
    if let Some(m) = tree.metrics_mut(child) {
        match target {
            PaddingTarget::Outer => m.set_outer_alignment_padding(padding),
            PaddingTarget::Inner => m.set_inner_alignment_padding(padding),
        }
    }
}

/// Clear a child's alignment paddings before it is measured again.
pub(crate) fn reset_alignment(tree: &mut SceneTree, child: GadgetId) {
    if let Some(m) = tree.metrics_mut(child) {
        m.reset_alignment_padding();
    }
}

pub(crate) fn clip_size(tree: &SceneTree, id: GadgetId) -> Size {
    tree.metrics(id).map(|m| m.clip_rect().size).unwrap_or_default()
}

pub(crate) fn set_desired_size(tree: &mut SceneTree, id: GadgetId, size: Size) {
    if let Some(m) = tree.metrics_mut(id) {
        m.set_desired_size(size);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::any::Any;

    use crate::gadget::{Gadget, LayoutContext, VisualMetrics};
    use crate::geometry::Size;

    /// Leaf with a fixed content size. When `shrinks`, the constrained pass
    /// narrows it to fit.
    pub struct Fixed {
        pub size: Size,
        pub shrinks: bool,
    }

    impl Fixed {
        pub fn new(width: i32, height: i32) -> Self {
            Self {
                size: Size::new(width, height),
                shrinks: false,
            }
        }

        pub fn shrinking(width: i32, height: i32) -> Self {
            Self {
                size: Size::new(width, height),
                shrinks: true,
            }
        }
    }

    impl Gadget for Fixed {
        fn gadget_type(&self) -> &str {
            "Fixed"
        }

        fn content_size(&mut self, _ctx: &mut LayoutContext<'_>) -> Size {
            self.size
        }

        fn constrain(
            &mut self,
            _ctx: &mut LayoutContext<'_>,
            metrics: &mut VisualMetrics,
            constraint: Size,
        ) {
            if self.shrinks {
                let fit = metrics.content_constraint(constraint);
                metrics.set_desired_size(metrics.desired_size().component_min(fit));
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Container behavior with no content of its own.
    pub struct Holder;

    impl Gadget for Holder {
        fn gadget_type(&self) -> &str {
            "Holder"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }
}
