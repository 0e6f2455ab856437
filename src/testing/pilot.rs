//! Pilot: programmatic interaction with a headless application.
//!
//! The [`Pilot`] owns an [`Application`] with one window drawing into a
//! [`SoftwareRenderer`] whose frames are captured by a [`FrameCapture`].
//! Input is fed through [`Application::handle_event`] exactly as the event
//! loop would, so tests exercise the real routing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::app::{AppConfig, Application};
use crate::error::{GuiError, Result};
use crate::event::{ButtonMask, Event, EventSource, Key, KeyEvent, Modifiers, MouseButton, Press};
use crate::gadget::GadgetId;
use crate::geometry::{Point, Size};
use crate::render::{HeadlessPresenter, PixelBuffer, Presenter, SoftwareRenderer};
use crate::window::{Window, WindowConfig, WindowId};

// ---------------------------------------------------------------------------
// FrameCapture
// ---------------------------------------------------------------------------

/// A presenter whose frames stay readable after the renderer is boxed into a
/// window. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    inner: Rc<RefCell<HeadlessPresenter>>,
}

impl FrameCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.inner.borrow().frames()
    }

    pub fn last_frame(&self) -> Option<PixelBuffer> {
        self.inner.borrow().last_frame().cloned()
    }
}

impl Presenter for FrameCapture {
    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        self.inner.borrow_mut().present(frame)
    }
}

// ---------------------------------------------------------------------------
// ScriptedEvents
// ---------------------------------------------------------------------------

/// An [`EventSource`] that replays prepared batches, one per wait, then
/// reports [`Event::Quit`].
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    batches: VecDeque<Vec<Event>>,
    failure: Option<String>,
}

impl ScriptedEvents {
    pub fn new(batches: Vec<Vec<Event>>) -> Self {
        Self {
            batches: batches.into(),
            failure: None,
        }
    }

    /// A source whose first wait fails as an undecodable event would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            batches: VecDeque::new(),
            failure: Some(message.into()),
        }
    }

    pub fn push(&mut self, batch: Vec<Event>) {
        self.batches.push_back(batch);
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }
}

impl EventSource for ScriptedEvents {
    fn wait(&mut self, _timeout: Duration) -> Result<Vec<Event>> {
        if let Some(message) = self.failure.take() {
            return Err(GuiError::UnhandledEvent(message));
        }
        Ok(self.batches.pop_front().unwrap_or_else(|| vec![Event::Quit]))
    }
}

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless application driver for tests.
///
/// # Examples
///
/// ```ignore
/// use gadgetry::testing::Pilot;
///
/// let mut pilot = Pilot::new(Size::new(40, 20))?;
/// pilot.frame()?;
/// pilot.click(3, 3)?;
/// ```
pub struct Pilot {
    app: Application,
    window: WindowId,
    capture: FrameCapture,
}

impl Pilot {
    /// Create an application with one window of `size`.
    pub fn new(size: Size) -> Result<Self> {
        Self::with_config(AppConfig::default(), size)
    }

    pub fn with_config(config: AppConfig, size: Size) -> Result<Self> {
        let mut app = Application::new(config);
        let capture = FrameCapture::new();
        let renderer = SoftwareRenderer::new(size, capture.clone());
        let window = app.create_window(WindowConfig::new().with_size(size), renderer)?;
        Ok(Self {
            app,
            window,
            capture,
        })
    }

    pub fn app(&self) -> &Application {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut Application {
        &mut self.app
    }

    pub fn window_id(&self) -> WindowId {
        self.window
    }

    /// The pilot's window; `None` once it has been closed.
    pub fn window(&self) -> Option<&Window> {
        self.app.window(self.window)
    }

    pub fn window_mut(&mut self) -> Option<&mut Window> {
        self.app.window_mut(self.window)
    }

    // ── Input simulation ─────────────────────────────────────────────

    pub fn send(&mut self, event: Event) -> Result<()> {
        self.app.handle_event(event)
    }

    /// Move the pointer with no buttons held.
    pub fn hover(&mut self, x: i32, y: i32) -> Result<()> {
        self.send(Event::MouseMotion {
            window: self.window,
            position: Point::new(x, y),
            buttons: ButtonMask::NONE,
        })
    }

    /// Left-button press and release at (x, y).
    pub fn click(&mut self, x: i32, y: i32) -> Result<()> {
        for press in [Press::Down, Press::Up] {
            self.send(Event::MouseButton {
                window: self.window,
                button: MouseButton::Left,
                press,
                position: Point::new(x, y),
            })?;
        }
        Ok(())
    }

    /// Key down with no modifiers, plus the text it produces.
    pub fn press_key(&mut self, code: Key) -> Result<()> {
        let key = KeyEvent::new(code, Modifiers::NONE);
        let text = key.text();
        self.send(Event::Key {
            window: self.window,
            key,
        })?;
        if let Some(ch) = text {
            self.send(Event::TextInput {
                window: self.window,
                text: ch.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn type_text(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            self.press_key(Key::Char(ch))?;
        }
        Ok(())
    }

    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.send(Event::Window {
            window: self.window,
            event: crate::event::WindowEvent::Resized(Size::new(width, height)),
        })
    }

    // ── Frames ───────────────────────────────────────────────────────

    /// Lay out and draw whatever needs it.
    pub fn frame(&mut self) -> Result<()> {
        self.app.render_frame()
    }

    pub fn frames(&self) -> usize {
        self.capture.frames()
    }

    pub fn last_frame(&self) -> Option<PixelBuffer> {
        self.capture.last_frame()
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn gadget_at(&self, x: i32, y: i32) -> Option<GadgetId> {
        self.window()?.find_gadget(Point::new(x, y))
    }

    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::layout::LinearLayout;
    use crate::widgets::{Container, Panel};

    #[test]
    fn new_creates_a_sized_window() {
        let pilot = Pilot::new(Size::new(12, 8)).unwrap();
        let window = pilot.window().unwrap();
        assert_eq!(window.size(), Size::new(12, 8));
        assert!(pilot.is_running());
        assert_eq!(pilot.frames(), 0);
    }

    #[test]
    fn frame_draws_only_when_needed() {
        let mut pilot = Pilot::new(Size::new(4, 4)).unwrap();
        let window = pilot.window_mut().unwrap();
        let screen = window.add_screen(Container::new(), LinearLayout::horizontal());
        let panel = window
            .tree_mut()
            .add_gadget(Panel::new(Size::new(2, 2)).with_color(Color::RED));
        window.tree_mut().manage(screen, panel).unwrap();

        pilot.frame().unwrap();
        pilot.frame().unwrap();
        assert_eq!(pilot.frames(), 1);
        assert_eq!(
            pilot.last_frame().unwrap().get(Point::new(1, 1)),
            Some(Color::RED)
        );
        assert_eq!(pilot.gadget_at(1, 1), Some(panel));
    }

    #[test]
    fn scripted_events_end_with_quit() {
        let mut source = ScriptedEvents::new(vec![vec![]]);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.wait(Duration::ZERO).unwrap(), vec![]);
        assert_eq!(source.wait(Duration::ZERO).unwrap(), vec![Event::Quit]);
    }

    #[test]
    fn resize_reaches_the_window() {
        let mut pilot = Pilot::new(Size::new(4, 4)).unwrap();
        pilot.resize(8, 6).unwrap();
        assert_eq!(pilot.window().unwrap().size(), Size::new(8, 6));
    }
}
