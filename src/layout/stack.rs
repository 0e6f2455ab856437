//! Stack layout: children layered at the content origin.

use super::{
    apply_alignment, clip_size, reset_alignment, set_desired_size, Alignment, LayoutManager,
    PaddingTarget,
};
use crate::gadget::{GadgetId, LayoutContext, SceneTree};
use crate::geometry::{Padding, Point, Size};

/// Places every child at the content origin and pads each up to the largest
/// child on both axes. Later children draw over earlier ones.
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    horizontal: Alignment,
    vertical: Alignment,
    padding_target: PaddingTarget,
}

impl StackLayout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alignment(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    #[must_use]
    pub fn with_padding_target(mut self, target: PaddingTarget) -> Self {
        self.padding_target = target;
        self
    }

    fn arrange(&self, tree: &mut SceneTree, children: &[GadgetId]) -> Size {
        let mut extent = Size::zero();
        for &child in children {
            if let Some(m) = tree.metrics_mut(child) {
                m.set_draw_location(Point::zero());
            }
            extent = extent.component_max(clip_size(tree, child));
        }
        for &child in children {
            let clip = clip_size(tree, child);
            let (left, right) = self.horizontal.split(extent.width - clip.width);
            let (top, bottom) = self.vertical.split(extent.height - clip.height);
            let padding = Padding::new(top, bottom, left, right);
            if padding != Padding::zero() {
                apply_alignment(tree, child, self.padding_target, padding);
            }
        }
        extent
    }
}

impl LayoutManager for StackLayout {
    fn name(&self) -> &str {
        "StackLayout"
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
        let children = tree.children(widget).to_vec();
        for &child in &children {
            reset_alignment(tree, child);
            tree.constrained_layout(child, ctx, content);
        }
        let size = self.arrange(tree, &children);
        set_desired_size(tree, widget, size);
    }
}
