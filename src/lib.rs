//! # gadgetry
//!
//! A retained-mode gadget toolkit: a scene tree of gadgets with two-phase
//! layout, typed signals, and pointer and keyboard routing, drawn through a
//! pluggable renderer.
//!
//! Nodes come in four kinds. Gadgets are leaves, singlets hold one child
//! and take its size, widgets hand their children to a layout manager, and
//! screens are the root widgets of a window. Layout runs in two stages: an
//! exploratory pass where every node reports the size it would like, then a
//! constrained pass, only when something overflowed, that fits nodes into
//! the space they were given.
//!
//! ## Core Systems
//!
//! - **[`gadget`]**: Slotmap-backed scene tree, node kinds, visual metrics, behavior trait
//! - **[`layout`]**: Layout managers: linear rows and columns, stacks, alignment
//! - **[`window`]**: Windows: screens, drawing traversal, hit-testing, focus chain
//! - **[`app`]**: Application: windows, event loop, pointer and keyboard routing
//! - **[`signal`]**: Typed signals and slots with automatic disconnection
//! - **[`event`]**: Input events, the cross-thread queue, crossterm decoding
//! - **[`render`]**: Renderer trait, software rasterizer, terminal presenter
//! - **[`text`]**: Font cache and the built-in block font
//! - **[`widgets`]**: Built-in widgets: Container, Panel, Label, Border, Button, ButtonBox
//! - **[`timer`]**: Periodic timers marshalled onto the event queue
//! - **[`testing`]**: Headless Pilot, scripted input, frame capture, tree dumps
//! - **[`geometry`]**: Point, Size, Rectangle, Padding primitives

// Foundation
pub mod color;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod theme;

// Core systems
pub mod gadget;
pub mod layout;
pub mod signal;

// Windows and input
pub mod app;
pub mod event;
pub mod timer;
pub mod window;

// Rendering
pub mod render;
pub mod text;

// Widgets
pub mod widgets;

// Test support
pub mod testing;

pub use app::{AppConfig, Application};
pub use color::Color;
pub use error::{GuiError, Result};
pub use gadget::{GadgetId, NodeKind, SceneTree};
pub use geometry::{Padding, Point, Rectangle, Size};
pub use signal::{Signal, Slot};
pub use window::{Window, WindowConfig, WindowId};
