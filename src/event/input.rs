//! Semantic input events and the crossterm decoder.
//!
//! [`Event`] is the discriminated union the application loop routes into
//! windows. [`decode_crossterm`] converts raw crossterm events. Key codes with
//! no mapping decode as [`Key::Unknown`]; an event kind with no mapping is
//! reported as [`GuiError::UnhandledEvent`](crate::error::GuiError::UnhandledEvent) rather than
//! being silently dropped.

use std::ops::{BitAnd, BitOr};

use crossterm::event as ct;

use crate::error::Result;
use crate::geometry::{Point, Size};
use crate::timer::TimerId;
use crate::window::WindowId;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A key with no mapping here (lock, media and modifier keys).
    Unknown,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// Whether a key or button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Press {
    #[default]
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
    pub press: Press,
    /// Auto-repeat of a held key.
    pub repeat: bool,
}

impl KeyEvent {
    /// A key-down event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            press: Press::Down,
            repeat: false,
        }
    }

    /// Printable text this key produces, if any.
    pub fn text(&self) -> Option<char> {
        match self.code {
            Key::Char(c)
                if self.press == Press::Down
                    && !self.modifiers.contains(Modifiers::CTRL)
                    && !self.modifiers.contains(Modifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 4,
        }
    }
}

/// Set of mouse buttons currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);

    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !button.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<MouseButton> for ButtonMask {
    fn from(button: MouseButton) -> Self {
        ButtonMask(button.bit())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Window state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Shown,
    Hidden,
    Exposed,
    Resized(Size),
    Moved(Point),
    FocusGained,
    FocusLost,
    /// The pointer entered the window.
    Enter,
    /// The pointer left the window.
    Leave,
    Close,
}

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Quit,
    Window {
        window: WindowId,
        event: WindowEvent,
    },
    Key {
        window: WindowId,
        key: KeyEvent,
    },
    TextInput {
        window: WindowId,
        text: String,
    },
    MouseMotion {
        window: WindowId,
        position: Point,
        buttons: ButtonMask,
    },
    MouseButton {
        window: WindowId,
        button: MouseButton,
        press: Press,
        position: Point,
    },
    MouseWheel {
        window: WindowId,
        position: Point,
        /// Scroll amount; positive `y` scrolls up, positive `x` right.
        delta: Point,
    },
    Touch {
        window: WindowId,
        position: Point,
    },
    Timer {
        timer: TimerId,
        tick: u64,
    },
}

// ---------------------------------------------------------------------------
// Crossterm decoding
// ---------------------------------------------------------------------------

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: ct::KeyCode) -> Key {
    match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::BackTab => Key::BackTab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Insert => Key::Insert,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        ct::KeyCode::F(n) => Key::F(n),
        other => {
            log::trace!("unmapped key code {other:?}");
            Key::Unknown
        }
    }
}

fn convert_button(b: ct::MouseButton) -> MouseButton {
    match b {
        ct::MouseButton::Left => MouseButton::Left,
        ct::MouseButton::Right => MouseButton::Right,
        ct::MouseButton::Middle => MouseButton::Middle,
    }
}

/// Decode a crossterm event for `window`. Terminal cells map one-to-one to
/// window pixels.
pub fn decode_crossterm(window: WindowId, event: ct::Event) -> Result<Event> {
    match event {
        ct::Event::Key(ke) => {
            let press = match ke.kind {
                ct::KeyEventKind::Press | ct::KeyEventKind::Repeat => Press::Down,
                ct::KeyEventKind::Release => Press::Up,
            };
            let key = KeyEvent {
                code: convert_key(ke.code),
                modifiers: convert_modifiers(ke.modifiers),
                press,
                repeat: ke.kind == ct::KeyEventKind::Repeat,
            };
            Ok(Event::Key { window, key })
        }
        ct::Event::Mouse(me) => {
            let position = Point::new(me.column.into(), me.row.into());
            Ok(match me.kind {
                ct::MouseEventKind::Down(b) => Event::MouseButton {
                    window,
                    button: convert_button(b),
                    press: Press::Down,
                    position,
                },
                ct::MouseEventKind::Up(b) => Event::MouseButton {
                    window,
                    button: convert_button(b),
                    press: Press::Up,
                    position,
                },
                ct::MouseEventKind::Drag(b) => Event::MouseMotion {
                    window,
                    position,
                    buttons: convert_button(b).into(),
                },
                ct::MouseEventKind::Moved => Event::MouseMotion {
                    window,
                    position,
                    buttons: ButtonMask::NONE,
                },
                ct::MouseEventKind::ScrollUp => Event::MouseWheel {
                    window,
                    position,
                    delta: Point::new(0, 1),
                },
                ct::MouseEventKind::ScrollDown => Event::MouseWheel {
                    window,
                    position,
                    delta: Point::new(0, -1),
                },
                ct::MouseEventKind::ScrollLeft => Event::MouseWheel {
                    window,
                    position,
                    delta: Point::new(-1, 0),
                },
                ct::MouseEventKind::ScrollRight => Event::MouseWheel {
                    window,
                    position,
                    delta: Point::new(1, 0),
                },
            })
        }
        ct::Event::Resize(w, h) => Ok(Event::Window {
            window,
            event: WindowEvent::Resized(Size::new(w.into(), h.into())),
        }),
        ct::Event::FocusGained => Ok(Event::Window {
            window,
            event: WindowEvent::FocusGained,
        }),
        ct::Event::FocusLost => Ok(Event::Window {
            window,
            event: WindowEvent::FocusLost,
        }),
        ct::Event::Paste(text) => Ok(Event::TextInput { window, text }),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> WindowId {
        WindowId::default()
    }

    fn key(code: ct::KeyCode, modifiers: ct::KeyModifiers) -> ct::Event {
        ct::Event::Key(ct::KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: ct::MouseEventKind, column: u16, row: u16) -> ct::Event {
        ct::Event::Mouse(ct::MouseEvent {
            kind,
            column,
            row,
            modifiers: ct::KeyModifiers::NONE,
        })
    }

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn button_mask_tracks_buttons() {
        let mut mask = ButtonMask::NONE;
        mask.insert(MouseButton::Left);
        mask.insert(MouseButton::Right);
        assert!(mask.contains(MouseButton::Left));
        mask.remove(MouseButton::Left);
        assert!(!mask.contains(MouseButton::Left));
        assert!(!mask.is_empty());
        mask.remove(MouseButton::Right);
        assert!(mask.is_empty());
    }

    // ── Keys ─────────────────────────────────────────────────────────

    #[test]
    fn decode_key_with_modifiers() {
        let event = decode_crossterm(
            window(),
            key(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL),
        )
        .unwrap();
        match event {
            Event::Key { key, .. } => {
                assert_eq!(key.code, Key::Char('c'));
                assert!(key.modifiers.contains(Modifiers::CTRL));
                assert_eq!(key.press, Press::Down);
                assert_eq!(key.text(), None);
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn decode_navigation_keys() {
        for (code, expected) in [
            (ct::KeyCode::Left, Key::Left),
            (ct::KeyCode::Home, Key::Home),
            (ct::KeyCode::PageDown, Key::PageDown),
            (ct::KeyCode::Esc, Key::Escape),
            (ct::KeyCode::F(5), Key::F(5)),
        ] {
            let event = decode_crossterm(window(), key(code, ct::KeyModifiers::NONE)).unwrap();
            assert!(matches!(event, Event::Key { key, .. } if key.code == expected));
        }
    }

    #[test]
    fn plain_char_produces_text() {
        let ke = KeyEvent::new(Key::Char('x'), Modifiers::SHIFT);
        assert_eq!(ke.text(), Some('x'));
    }

    #[test]
    fn unmapped_key_codes_decode_as_unknown() {
        for code in [ct::KeyCode::CapsLock, ct::KeyCode::Menu, ct::KeyCode::Null] {
            let event = decode_crossterm(window(), key(code, ct::KeyModifiers::NONE)).unwrap();
            assert!(matches!(event, Event::Key { key, .. } if key.code == Key::Unknown));
        }
    }

    // ── Mouse ────────────────────────────────────────────────────────

    #[test]
    fn decode_mouse_down() {
        let event = decode_crossterm(
            window(),
            mouse(ct::MouseEventKind::Down(ct::MouseButton::Left), 10, 5),
        )
        .unwrap();
        assert_eq!(
            event,
            Event::MouseButton {
                window: window(),
                button: MouseButton::Left,
                press: Press::Down,
                position: Point::new(10, 5),
            }
        );
    }

    #[test]
    fn decode_drag_as_motion_with_button() {
        let event = decode_crossterm(
            window(),
            mouse(ct::MouseEventKind::Drag(ct::MouseButton::Right), 3, 7),
        )
        .unwrap();
        match event {
            Event::MouseMotion { position, buttons, .. } => {
                assert_eq!(position, Point::new(3, 7));
                assert!(buttons.contains(MouseButton::Right));
            }
            other => panic!("expected motion, got {other:?}"),
        }
    }

    #[test]
    fn decode_moved_has_no_buttons() {
        let event = decode_crossterm(window(), mouse(ct::MouseEventKind::Moved, 1, 2)).unwrap();
        assert!(matches!(event, Event::MouseMotion { buttons, .. } if buttons.is_empty()));
    }

    #[test]
    fn decode_scroll() {
        let event = decode_crossterm(window(), mouse(ct::MouseEventKind::ScrollDown, 0, 0)).unwrap();
        assert!(matches!(event, Event::MouseWheel { delta, .. } if delta == Point::new(0, -1)));
    }

    // ── Window ───────────────────────────────────────────────────────

    #[test]
    fn decode_resize_and_focus() {
        assert_eq!(
            decode_crossterm(window(), ct::Event::Resize(120, 40)).unwrap(),
            Event::Window {
                window: window(),
                event: WindowEvent::Resized(Size::new(120, 40)),
            }
        );
        assert_eq!(
            decode_crossterm(window(), ct::Event::FocusLost).unwrap(),
            Event::Window {
                window: window(),
                event: WindowEvent::FocusLost,
            }
        );
    }

    #[test]
    fn decode_paste_as_text_input() {
        let event = decode_crossterm(window(), ct::Event::Paste("hello".into())).unwrap();
        assert_eq!(
            event,
            Event::TextInput {
                window: window(),
                text: "hello".into(),
            }
        );
    }
}
