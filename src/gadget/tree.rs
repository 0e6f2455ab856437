//! Scene tree: the arena of gadget nodes and the operations on it.
//!
//! Ownership runs strictly from manager to child. A node's `manager` is a
//! back reference and is validated on every use, so a destroyed manager
//! simply reads as "no manager". Destroyed behaviors are parked until the
//! owning window hands them the renderer to release their resources.

use slotmap::SlotMap;

use super::metrics::VisualMetrics;
use super::node::{Decorator, GadgetId, GadgetNode, NodeKind};
use super::traits::{ButtonInput, DrawFrame, EventContext, EventResult, Gadget, LayoutContext};
use crate::color::Color;
use crate::error::{GuiError, Result};
use crate::event::KeyEvent;
use crate::geometry::{Padding, Point, Size};
use crate::layout::LayoutManager;
use crate::render::Renderer;
use crate::theme::Theme;
use crate::window::WindowId;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[GadgetId] = &[];

pub struct SceneTree {
    nodes: SlotMap<GadgetId, GadgetNode>,
    theme: Theme,
    retired: Vec<Box<dyn Gadget>>,
}

impl SceneTree {
    pub fn new(theme: Theme) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            theme,
            retired: Vec::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Replace the theme and re-apply it to every initialized node.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let mut roots = Vec::new();
        for (id, node) in self.nodes.iter_mut() {
            node.needs_theme_values = true;
            if node.initialized && node.manager.is_none() {
                roots.push(id);
            }
        }
        for root in roots {
            self.initialize(root);
        }
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    fn insert(
        &mut self,
        kind: NodeKind,
        behavior: Box<dyn Gadget>,
        layout: Option<Box<dyn LayoutManager>>,
    ) -> GadgetId {
        let mut node = GadgetNode::new(kind, behavior);
        node.layout = layout;
        self.nodes.insert(node)
    }

    /// Create a detached leaf.
    pub fn add_gadget(&mut self, behavior: impl Gadget) -> GadgetId {
        self.insert(NodeKind::Gadget, Box::new(behavior), None)
    }

    /// Create a detached single-child container.
    pub fn add_singlet(&mut self, behavior: impl Gadget) -> GadgetId {
        self.insert(NodeKind::Singlet, Box::new(behavior), None)
    }

    /// Create a detached multi-child container placed by `layout`.
    pub fn add_widget(
        &mut self,
        behavior: impl Gadget,
        layout: impl LayoutManager + 'static,
    ) -> GadgetId {
        self.insert(NodeKind::Widget, Box::new(behavior), Some(Box::new(layout)))
    }

    /// Create and initialize the root widget of `window`.
    pub fn add_screen(
        &mut self,
        window: WindowId,
        behavior: Box<dyn Gadget>,
        layout: Box<dyn LayoutManager>,
    ) -> GadgetId {
        let id = self.insert(NodeKind::Screen { window }, behavior, Some(layout));
        self.initialize(id);
        id
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn contains(&self, id: GadgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: GadgetId) -> Option<&GadgetNode> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children in order. Empty for leaves and unknown nodes.
    pub fn children(&self, id: GadgetId) -> &[GadgetId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// The node's manager, if both are alive.
    pub fn manager(&self, id: GadgetId) -> Option<GadgetId> {
        self.nodes
            .get(id)
            .and_then(|n| n.manager)
            .filter(|m| self.nodes.contains_key(*m))
    }

    /// Managers from the immediate one up to the root.
    pub fn ancestors(&self, id: GadgetId) -> Vec<GadgetId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(m) = self.manager(current) {
            result.push(m);
            current = m;
        }
        result
    }

    /// Whether `ancestor` is `id` or one of its managers.
    pub fn is_ancestor_or_self(&self, ancestor: GadgetId, id: GadgetId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    pub fn kind(&self, id: GadgetId) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    pub fn metrics(&self, id: GadgetId) -> Option<&VisualMetrics> {
        self.nodes.get(id).map(|n| &n.metrics)
    }

    /// Direct metrics access for layout managers. Does not mark anything.
    pub fn metrics_mut(&mut self, id: GadgetId) -> Option<&mut VisualMetrics> {
        self.nodes.get_mut(id).map(|n| &mut n.metrics)
    }

    /// Downcast a node's behavior.
    pub fn behavior<T: Gadget>(&self, id: GadgetId) -> Option<&T> {
        self.nodes.get(id)?.behavior.as_any().downcast_ref()
    }

    /// Mutate a node's behavior and mark it for layout.
    pub fn update<T: Gadget, R>(&mut self, id: GadgetId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let behavior = self.nodes.get_mut(id)?.behavior.as_any_mut().downcast_mut::<T>()?;
        let result = f(behavior);
        self.mark_needs_layout(id);
        Some(result)
    }

    pub fn set_name(&mut self, id: GadgetId, name: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.name = name.into();
        }
    }

    pub fn set_background(&mut self, id: GadgetId, color: Option<Color>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.metrics.background = color;
            self.mark_needs_drawing(id);
        }
    }

    pub fn set_gadget_padding(&mut self, id: GadgetId, padding: Padding) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.metrics.set_gadget_padding(padding);
            self.mark_needs_layout(id);
        }
    }

    pub fn set_maximum_size(&mut self, id: GadgetId, size: Option<Size>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.metrics.set_maximum_size(size);
            self.mark_needs_layout(id);
        }
    }

    /// Append a decorator; it is dropped with the node.
    pub fn add_decorator(
        &mut self,
        id: GadgetId,
        decorator: impl Fn(&mut dyn Renderer, &DrawFrame) -> Result<()> + 'static,
    ) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(GuiError::UnknownGadget)?;
        node.decorators.push(Box::new(decorator) as Decorator);
        self.mark_needs_drawing(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Make `child` a child of `container`, moving it from any previous
    /// manager. A singlet destroys the child it held before.
    pub fn manage(&mut self, container: GadgetId, child: GadgetId) -> Result<()> {
        let (Some(c), Some(g)) = (self.nodes.get(container), self.nodes.get(child)) else {
            return Err(GuiError::UnknownGadget);
        };
        if !c.kind.is_container() {
            return Err(GuiError::NotAContainer {
                container: c.name.clone(),
            });
        }
        if self.is_ancestor_or_self(child, container) {
            return Err(GuiError::WouldCreateCycle {
                container: c.name.clone(),
                child: g.name.clone(),
            });
        }
        if matches!(g.kind, NodeKind::Screen { .. }) || !c.behavior.accepts_child(g.behavior.as_ref())
        {
            return Err(GuiError::ChildRejected {
                container: c.behavior.gadget_type().to_owned(),
                child: g.behavior.gadget_type().to_owned(),
            });
        }

        self.detach(child);

        let container_node = &mut self.nodes[container];
        let previous = match container_node.kind {
            NodeKind::Singlet => std::mem::take(&mut container_node.children),
            _ => Vec::new(),
        };
        container_node.children.push(child);
        let initialized = container_node.initialized;
        self.nodes[child].manager = Some(container);

        for old in previous {
            self.destroy_subtree(old);
        }
        if initialized {
            self.initialize(child);
        }
        self.mark_needs_layout(container);
        log::trace!("managed {child:?} under {container:?}");
        Ok(())
    }

    /// Detach `child` from `container` and destroy it.
    pub fn release(&mut self, container: GadgetId, child: GadgetId) -> Result<()> {
        self.take(container, child)?;
        self.destroy(child);
        Ok(())
    }

    /// Detach `child` from `container`, leaving it alive and unmanaged.
    pub fn take(&mut self, container: GadgetId, child: GadgetId) -> Result<GadgetId> {
        if self.manager(child) != Some(container) {
            return Err(GuiError::UnknownGadget);
        }
        self.detach(child);
        Ok(child)
    }

    /// Destroy a node and its subtree. Returns `false` for unknown nodes.
    pub fn destroy(&mut self, id: GadgetId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.detach(id);
        self.destroy_subtree(id);
        true
    }

    /// Swap a widget's layout manager, returning the previous one.
    pub fn set_layout_manager(
        &mut self,
        widget: GadgetId,
        layout: impl LayoutManager + 'static,
    ) -> Result<Option<Box<dyn LayoutManager>>> {
        let node = self.nodes.get_mut(widget).ok_or(GuiError::UnknownGadget)?;
        if !node.kind.is_widget() {
            return Err(GuiError::NotAContainer {
                container: node.name.clone(),
            });
        }
        let previous = node.layout.replace(Box::new(layout));
        self.mark_needs_layout(widget);
        Ok(previous)
    }

    /// Behaviors of destroyed nodes awaiting `Gadget::release`.
    pub fn take_retired(&mut self) -> Vec<Box<dyn Gadget>> {
        std::mem::take(&mut self.retired)
    }

    fn detach(&mut self, id: GadgetId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        // Alignment padding belongs to the old manager's arrangement.
        node.metrics.reset_alignment_padding();
        let Some(manager) = node.manager.take() else {
            return;
        };
        if let Some(m) = self.nodes.get_mut(manager) {
            m.children.retain(|&c| c != id);
            self.mark_needs_layout(manager);
        }
    }

    fn destroy_subtree(&mut self, id: GadgetId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children.iter().copied());
                self.retired.push(node.behavior);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle and invalidation
    // -----------------------------------------------------------------------

    /// Apply pending theme values to the subtree and mark it initialized.
    pub fn initialize(&mut self, id: GadgetId) {
        let theme = self.theme.clone();
        let mut changed = false;
        self.visit_preorder(id, |tree, current| {
            let node = &mut tree.nodes[current];
            if node.needs_theme_values {
                node.behavior.apply_theme(&theme, &mut node.metrics);
                node.needs_theme_values = false;
                node.needs_layout = true;
                changed = true;
            }
            node.initialized = true;
        });
        if changed {
            self.mark_needs_layout(id);
        }
    }

    /// Flag `id` and all of its managers for layout (and drawing).
    pub fn mark_needs_layout(&mut self, id: GadgetId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get_mut(c) else { break };
            node.needs_layout = true;
            node.needs_drawing = true;
            current = node.manager;
        }
    }

    /// Flag `id` and all of its managers for drawing.
    pub fn mark_needs_drawing(&mut self, id: GadgetId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get_mut(c) else { break };
            node.needs_drawing = true;
            current = node.manager;
        }
    }

    pub(crate) fn clear_needs_drawing(&mut self, id: GadgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.needs_drawing = false;
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// First layout phase. Returns whether a constrained pass is needed.
    pub fn initial_layout(&mut self, id: GadgetId, ctx: &mut LayoutContext<'_>) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        let kind = node.kind;
        let first_child = node.children.first().copied();
        let layout = if kind.is_widget() { node.layout.take() } else { None };

        let mut needs_constraint = false;
        match (kind, first_child, layout) {
            (NodeKind::Singlet, Some(child), _) => {
                if let Some(child_node) = self.nodes.get_mut(child) {
                    child_node.metrics.reset_alignment_padding();
                }
                needs_constraint = self.initial_layout(child, ctx);
                self.adopt_child_size(id, child);
            }
            (_, _, Some(mut layout)) => {
                needs_constraint = layout.initial_widget_layout(self, ctx, id);
                self.restore_layout(id, layout);
            }
            _ => {
                let node = &mut self.nodes[id];
                let size = node.behavior.content_size(ctx);
                node.metrics.set_desired_size(size);
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.needs_layout = false;
        }
        self.immediate_gadget_layout(id) || needs_constraint
    }

    /// Recompute rectangles; true iff the clip exceeds the maximum size.
    pub fn immediate_gadget_layout(&mut self, id: GadgetId) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.metrics.update_rectangles();
                node.metrics.exceeds_maximum()
            }
            None => false,
        }
    }

    /// Second layout phase: fit the node's clip into `constraint`.
    pub fn constrained_layout(
        &mut self,
        id: GadgetId,
        ctx: &mut LayoutContext<'_>,
        constraint: Size,
    ) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let kind = node.kind;
        let first_child = node.children.first().copied();
        let inner = node.metrics.content_constraint(constraint);
        let layout = if kind.is_widget() { node.layout.take() } else { None };

        match (kind, first_child, layout) {
            (NodeKind::Singlet, Some(child), _) => {
                self.constrained_layout(child, ctx, inner);
                self.adopt_child_size(id, child);
            }
            (_, _, Some(mut layout)) => {
                layout.constrained_widget_layout(self, ctx, id, constraint);
                self.restore_layout(id, layout);
            }
            _ => {
                let node = &mut self.nodes[id];
                node.behavior.constrain(ctx, &mut node.metrics, constraint);
            }
        }
        self.immediate_gadget_layout(id);
    }

    /// Singlet sizing: desired size is the child's clip size, child at the
    /// content origin.
    fn adopt_child_size(&mut self, singlet: GadgetId, child: GadgetId) {
        let Some(child_node) = self.nodes.get_mut(child) else {
            return;
        };
        child_node.metrics.set_draw_location(Point::zero());
        let size = child_node.metrics.clip_rect().size;
        if let Some(node) = self.nodes.get_mut(singlet) {
            node.metrics.set_desired_size(size);
        }
    }

    fn restore_layout(&mut self, id: GadgetId, layout: Box<dyn LayoutManager>) {
        // A manager swapped in during the call wins.
        if let Some(node) = self.nodes.get_mut(id) {
            if node.layout.is_none() {
                node.layout = Some(layout);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Preorder visit of the subtree at `root`, with an explicit stack. The
    /// visitor may mutate the tree; children are read after the visit.
    pub fn visit_preorder(&mut self, root: GadgetId, mut visit: impl FnMut(&mut SceneTree, GadgetId)) {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            visit(self, current);
            // Push children in reverse so the first child is visited first.
            stack.extend(self.children(current).iter().rev().copied());
        }
    }

    /// Preorder list of the subtree at `root`.
    pub fn preorder(&self, root: GadgetId) -> Vec<GadgetId> {
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Depth-first search for the last node matching `predicate`. Only the
    /// children of matching nodes are explored, so the deepest match along
    /// the last matching branch wins.
    pub fn find_last(
        &self,
        root: GadgetId,
        predicate: impl Fn(GadgetId, &GadgetNode) -> bool,
    ) -> Option<GadgetId> {
        let mut found = None;
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if predicate(current, node) {
                found = Some(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// Hit test against the clip rectangle at the last draw location.
    pub fn contains_point(&self, id: GadgetId, point: Point) -> bool {
        self.nodes.get(id).is_some_and(|n| node_contains_point(n, point))
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// The nearest node at or above `id` that accepts focus.
    pub fn focus_target(&self, id: GadgetId) -> Option<GadgetId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&g| self.nodes.get(g).is_some_and(|n| n.behavior.accepts_focus()))
    }

    pub(crate) fn set_has_focus(&mut self, id: GadgetId, focused: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            if node.metrics.has_focus != focused {
                node.metrics.has_focus = focused;
                node.behavior.focus_changed(focused);
                self.mark_needs_drawing(id);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Offer an event to `id`, then to each manager in turn until one
    /// consumes it. Returns the consumer.
    pub fn bubble(
        &mut self,
        id: GadgetId,
        mut handler: impl FnMut(&mut dyn Gadget, &mut EventContext) -> EventResult,
    ) -> Option<GadgetId> {
        let mut current = Some(id);
        while let Some(c) = current {
            let node = self.nodes.get_mut(c)?;
            let mut ctx = EventContext::new();
            let result = handler(node.behavior.as_mut(), &mut ctx);
            current = node.manager;
            if ctx.wants_layout() {
                self.mark_needs_layout(c);
            } else if ctx.wants_redraw() {
                self.mark_needs_drawing(c);
            }
            if result.is_consumed() {
                return Some(c);
            }
        }
        None
    }

    pub fn enter_leave_event(&mut self, id: GadgetId, entered: bool) -> Option<GadgetId> {
        self.bubble(id, |g, ctx| g.enter_leave(ctx, entered))
    }

    pub fn mouse_button_event(&mut self, id: GadgetId, input: &ButtonInput) -> Option<GadgetId> {
        self.bubble(id, |g, ctx| g.mouse_button(ctx, input))
    }

    pub fn mouse_wheel_event(&mut self, id: GadgetId, position: Point, delta: Point) -> Option<GadgetId> {
        self.bubble(id, |g, ctx| g.mouse_wheel(ctx, position, delta))
    }

    pub fn key_event(&mut self, id: GadgetId, key: &KeyEvent) -> Option<GadgetId> {
        self.bubble(id, |g, ctx| g.key(ctx, key))
    }

    pub fn text_input_event(&mut self, id: GadgetId, text: &str) -> Option<GadgetId> {
        self.bubble(id, |g, ctx| g.text_input(ctx, text))
    }

    // -----------------------------------------------------------------------
    // Drawing support
    // -----------------------------------------------------------------------

    /// Split borrow for drawing one node: behavior, metrics and decorators.
    pub(crate) fn draw_parts(
        &mut self,
        id: GadgetId,
    ) -> Option<(&mut dyn Gadget, &mut VisualMetrics, &[Decorator])> {
        let node = self.nodes.get_mut(id)?;
        Some((node.behavior.as_mut(), &mut node.metrics, node.decorators.as_slice()))
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

fn node_contains_point(node: &GadgetNode, point: Point) -> bool {
    let location = node.metrics.last_draw_location();
    location.is_set() && node.metrics.clip_rect().translate(location).contains_point(point)
}

/// Predicate for `find_last` hit testing.
pub fn hit(point: Point) -> impl Fn(GadgetId, &GadgetNode) -> bool {
    move |_: GadgetId, node: &GadgetNode| node_contains_point(node, point)
}
