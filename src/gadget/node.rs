//! Node types: GadgetId, NodeKind, GadgetNode.

use std::fmt;

use slotmap::new_key_type;

use super::metrics::VisualMetrics;
use super::traits::{DrawFrame, Gadget};
use crate::error::Result;
use crate::layout::LayoutManager;
use crate::render::Renderer;
use crate::window::WindowId;

new_key_type! {
    /// Handle to a node in a [`SceneTree`](super::SceneTree). Stale handles
    /// resolve to nothing.
    pub struct GadgetId;
}

/// The structural variant of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf: no children.
    Gadget,
    /// Exactly zero or one child; sized by it.
    Singlet,
    /// Ordered children placed by a layout manager.
    Widget,
    /// Root widget of a window.
    Screen { window: WindowId },
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Gadget)
    }

    /// Widgets and screens; both delegate to a layout manager.
    pub fn is_widget(self) -> bool {
        matches!(self, NodeKind::Widget | NodeKind::Screen { .. })
    }
}

/// Extra drawing run after a node's own `draw`, in attachment order.
pub type Decorator = Box<dyn Fn(&mut dyn Renderer, &DrawFrame) -> Result<()>>;

/// One node of the scene tree.
pub struct GadgetNode {
    pub(crate) kind: NodeKind,
    pub(crate) behavior: Box<dyn Gadget>,
    pub(crate) metrics: VisualMetrics,
    pub(crate) needs_layout: bool,
    pub(crate) needs_drawing: bool,
    pub(crate) needs_theme_values: bool,
    pub(crate) initialized: bool,
    pub(crate) manager: Option<GadgetId>,
    pub(crate) name: String,
    pub(crate) children: Vec<GadgetId>,
    pub(crate) layout: Option<Box<dyn LayoutManager>>,
    pub(crate) decorators: Vec<Decorator>,
}

impl GadgetNode {
    pub(crate) fn new(kind: NodeKind, behavior: Box<dyn Gadget>) -> Self {
        let name = behavior.gadget_type().to_owned();
        Self {
            kind,
            behavior,
            metrics: VisualMetrics::new(),
            needs_layout: true,
            needs_drawing: true,
            needs_theme_values: true,
            initialized: false,
            manager: None,
            name,
            children: Vec::new(),
            layout: None,
            decorators: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn behavior(&self) -> &dyn Gadget {
        self.behavior.as_ref()
    }

    pub fn metrics(&self) -> &VisualMetrics {
        &self.metrics
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn needs_drawing(&self) -> bool {
        self.needs_drawing
    }

    pub fn needs_theme_values(&self) -> bool {
        self.needs_theme_values
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn manager(&self) -> Option<GadgetId> {
        self.manager
    }

    /// Diagnostic name; defaults to the gadget type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[GadgetId] {
        &self.children
    }

    pub fn layout_manager(&self) -> Option<&dyn LayoutManager> {
        self.layout.as_deref()
    }

    pub fn decorator_count(&self) -> usize {
        self.decorators.len()
    }
}

impl fmt::Debug for GadgetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GadgetNode")
            .field("kind", &self.kind)
            .field("type", &self.behavior.gadget_type())
            .field("name", &self.name)
            .field("manager", &self.manager)
            .field("children", &self.children)
            .field("needs_layout", &self.needs_layout)
            .field("needs_drawing", &self.needs_drawing)
            .finish()
    }
}
