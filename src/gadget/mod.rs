//! Gadgets: the nodes of the scene tree and the behavior trait they carry.

pub mod metrics;
pub mod node;
pub mod traits;
pub mod tree;

pub use metrics::VisualMetrics;
pub use node::{Decorator, GadgetId, GadgetNode, NodeKind};
pub use traits::{
    ButtonInput, DrawFrame, EventContext, EventResult, Gadget, LayoutContext,
};
pub use tree::{hit, SceneTree};
