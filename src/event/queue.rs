//! Event queue and event sources.
//!
//! [`EventQueue`] is the application's inbox, an unbounded tokio channel.
//! Its [`EventSender`] half is `Send + Clone`, so timer tasks on another
//! thread can post ticks without touching the scene tree. [`EventSource`]
//! abstracts the platform; [`TerminalEvents`] reads crossterm input.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::input::{decode_crossterm, Event};
use crate::error::Result;
use crate::window::WindowId;

// ---------------------------------------------------------------------------
// EventSender
// ---------------------------------------------------------------------------

/// Clonable, thread-safe handle for posting events to an [`EventQueue`].
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<Event>,
}

impl EventSender {
    /// Post an event. Returns `false` once the queue has been dropped.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// FIFO of pending events.
#[derive(Debug)]
pub struct EventQueue {
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    /// Enqueue an event from the owning thread.
    pub fn push(&self, event: Event) {
        // The receiver lives in `self`, so the channel cannot be closed here.
        let _ = self.tx.send(event);
    }

    /// Pop the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<Event> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every pending event in arrival order.
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Wait for the next event. Used by async hosts.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// EventSource
// ---------------------------------------------------------------------------

/// A platform input source.
pub trait EventSource {
    /// Wait up to `timeout` for input and return the decoded events (empty
    /// on timeout). Undecodable input is an error.
    fn wait(&mut self, timeout: Duration) -> Result<Vec<Event>>;
}

/// Crossterm-backed source delivering everything to one window.
#[derive(Debug, Clone, Copy)]
pub struct TerminalEvents {
    window: WindowId,
}

impl TerminalEvents {
    pub fn new(window: WindowId) -> Self {
        Self { window }
    }
}

impl EventSource for TerminalEvents {
    fn wait(&mut self, timeout: Duration) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        if !crossterm::event::poll(timeout)? {
            return Ok(events);
        }
        // Drain whatever else is already buffered without blocking.
        loop {
            let event = decode_crossterm(self.window, crossterm::event::read()?)?;
            let text = match &event {
                Event::Key { key, .. } => key.text(),
                _ => None,
            };
            events.push(event);
            if let Some(ch) = text {
                events.push(Event::TextInput {
                    window: self.window,
                    text: ch.to_string(),
                });
            }
            if !crossterm::event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(events)
    }
}
