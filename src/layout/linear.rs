//! Linear layout: children in a row or a column.

use super::{
    apply_alignment, clip_size, reset_alignment, set_desired_size, Alignment, LayoutManager,
    Orientation, PaddingTarget,
};
use crate::gadget::{GadgetId, LayoutContext, SceneTree};
use crate::geometry::Size;

/// Sequences children along one axis and aligns them on the other.
///
/// Children are placed back to back along the major axis, `spacing` pixels
/// apart, in manage order. On the minor axis each child is padded up to the
/// tallest (or widest) child; `alignment` decides which side of the child the
/// padding lands on and `padding_target` whether it sits inside or outside
/// the child's border.
#[derive(Debug, Clone, Default)]
pub struct LinearLayout {
    orientation: Orientation,
    alignment: Alignment,
    padding_target: PaddingTarget,
    spacing: i32,
}

impl LinearLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_padding_target(mut self, target: PaddingTarget) -> Self {
        self.padding_target = target;
        self
    }

    /// Gap between adjacent children. Negative values are treated as zero.
    #[must_use]
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing.max(0);
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn padding_target(&self) -> PaddingTarget {
        self.padding_target
    }

    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Place `children` along the major axis, then pad each on the minor
    /// axis to the largest extent. Returns the widget's content size.
    fn arrange(&self, tree: &mut SceneTree, children: &[GadgetId]) -> Size {
        let axis = self.orientation;
        let mut offset = 0;
        let mut minor_max = 0;
        for (index, &child) in children.iter().enumerate() {
            if index > 0 {
                offset += self.spacing;
            }
            if let Some(m) = tree.metrics_mut(child) {
                m.set_draw_location(axis.point(offset, 0));
            }
            let clip = clip_size(tree, child);
            offset += axis.major(clip);
            minor_max = minor_max.max(axis.minor(clip));
        }

        for &child in children {
            let residue = minor_max - axis.minor(clip_size(tree, child));
            if residue > 0 {
                let (before, after) = self.alignment.split(residue);
                apply_alignment(tree, child, self.padding_target, axis.minor_padding(before, after));
            }
        }

        axis.size(offset, minor_max)
    }
}

impl LayoutManager for LinearLayout {
    fn name(&self) -> &str {
        match self.orientation {
            Orientation::Horizontal => "LinearLayout(horizontal)",
            Orientation::Vertical => "LinearLayout(vertical)",
        }
    }

    fn initial_widget_layout(
        &mut self,
        tree: &mut SceneTree,
        ctx: &mut LayoutContext<'_>,
        widget: GadgetId,
    ) -> bool {
        let children = tree.children(widget).to_vec();
        let mut needs_constraint = false;
        for &child in &children {
            reset_alignment(tree, child);
            needs_constraint |= tree.initial_layout(child, ctx);
        }
        let size = self.arrange(tree, &children);
        set_desired_size(tree, widget, size);
        needs_constraint
    }

    fn constrained_widget_layout(
        &mut self,
        tree: &mut SceneTree,
        ctx: &mut LayoutContext<'_>,
        widget: GadgetId,
        constraint: Size,
    ) {
        let Some(content) = tree.metrics(widget).map(|m| m.content_constraint(constraint)) else {
            return;
        };
        let axis = self.orientation;
        let children = tree.children(widget).to_vec();

        // Earlier children get first claim on the major axis.
        let mut offset = 0;
        for (index, &child) in children.iter().enumerate() {
            if index > 0 {
                offset += self.spacing;
            }
            reset_alignment(tree, child);
            let available = axis.size(axis.major(content) - offset, axis.minor(content));
            tree.constrained_layout(child, ctx, available);
            offset += axis.major(clip_size(tree, child));
        }

        let size = self.arrange(tree, &children);
        set_desired_size(tree, widget, size);
    }
}
