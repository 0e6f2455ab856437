//! Headless testing support: Pilot, scripted input, frame capture, snapshots.
//!
//! Use the [`Pilot`] to drive an [`Application`](crate::app::Application)
//! without a terminal, [`ScriptedEvents`] to feed
//! [`Application::run`](crate::app::Application::run), and [`dump_tree`] or
//! [`frame_to_ascii`] to capture state as text.

pub mod pilot;
pub mod snapshot;

pub use pilot::{FrameCapture, Pilot, ScriptedEvents};
pub use snapshot::{dump_tree, dump_window, frame_to_ascii};
