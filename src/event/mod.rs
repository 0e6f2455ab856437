//! Event system: semantic input events, crossterm decoding, the event queue.

pub mod input;
pub mod queue;

pub use input::{
    decode_crossterm, ButtonMask, Event, Key, KeyEvent, Modifiers, MouseButton, Press, WindowEvent,
};
pub use queue::{EventQueue, EventSender, EventSource, TerminalEvents};
