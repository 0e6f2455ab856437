//! Button: a focusable singlet that reports hover, press and activation.
//!
//! The button frames its child (usually a [`Label`](super::Label)) with a
//! bevel that sinks while pressed. State changes go out on
//! [`Button::state_changed`]; a slot connecting to it is immediately told the
//! current state. A completed click, Enter, or Space goes out on
//! [`Button::activated`].

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use crate::color::Color;
use crate::error::Result;
use crate::event::{Key, KeyEvent, MouseButton, Press};
use crate::gadget::{
    ButtonInput, DrawFrame, EventContext, EventResult, Gadget, GadgetId, SceneTree, VisualMetrics,
};
use crate::geometry::Padding;
use crate::render::Renderer;
use crate::signal::Signal;
use crate::theme::Theme;

use super::border::{paint_bevel, Bevel, BevelPaint};
use super::label::Label;

/// Interaction state of a [`Button`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    /// The pointer is over the button.
    Hover,
    /// The left button went down on it and has not been released.
    Pressed,
}

pub struct Button {
    state: Rc<Cell<ButtonState>>,
    state_changed: Signal<ButtonState>,
    activated: Signal<()>,
    paint: Option<BevelPaint>,
    highlight: Color,
}

impl Button {
    pub fn new() -> Self {
        let state = Rc::new(Cell::new(ButtonState::Normal));
        let current = Rc::clone(&state);
        Self {
            state,
            state_changed: Signal::with_connecting(move |signal| {
                signal.transmit_last_connected(current.get());
            }),
            activated: Signal::new(),
            paint: None,
            highlight: Color::default(),
        }
    }

    /// Create a button singlet holding a [`Label`] with `text`.
    pub fn with_label(tree: &mut SceneTree, text: impl Into<String>) -> Result<GadgetId> {
        let button = tree.add_singlet(Button::new());
        let label = tree.add_gadget(Label::new(text));
        tree.manage(button, label)?;
        Ok(button)
    }

    pub fn state(&self) -> ButtonState {
        self.state.get()
    }

    pub fn state_changed(&self) -> &Signal<ButtonState> {
        &self.state_changed
    }

    pub fn activated(&self) -> &Signal<()> {
        &self.activated
    }

    fn set_state(&mut self, ctx: &mut EventContext, state: ButtonState) {
        if self.state.get() != state {
            self.state.set(state);
            ctx.request_redraw();
            self.state_changed.transmit(state);
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl Gadget for Button {
    fn gadget_type(&self) -> &str {
        "Button"
    }

    fn apply_theme(&mut self, theme: &Theme, metrics: &mut VisualMetrics) {
        let paint = BevelPaint::from_theme(theme);
        metrics.set_gadget_padding(Padding::all(paint.width));
        metrics.background = Some(theme.background);
        self.paint = Some(paint);
        self.highlight = theme.highlight;
    }

    fn draw(&mut self, renderer: &mut dyn Renderer, frame: &DrawFrame) -> Result<()> {
        let Some(mut paint) = self.paint else {
            return Ok(());
        };
        let state = self.state.get();
        if state != ButtonState::Normal {
            renderer.set_draw_color(self.highlight);
            renderer.fill_rect(frame.render_rect)?;
        }
        if frame.has_focus {
            paint.light = self.highlight;
        }
        let bevel = match state {
            ButtonState::Pressed => Bevel::Sunken,
            ButtonState::Normal | ButtonState::Hover => Bevel::Raised,
        };
        paint_bevel(renderer, frame.border_rect, bevel, paint)
    }

    fn accepts_focus(&self) -> bool {
        true
    }

    fn enter_leave(&mut self, ctx: &mut EventContext, entered: bool) -> EventResult {
        let next = match (entered, self.state.get()) {
            (true, ButtonState::Normal) => ButtonState::Hover,
            (true, current) => current,
            (false, _) => ButtonState::Normal,
        };
        self.set_state(ctx, next);
        EventResult::Consumed
    }

    fn mouse_button(&mut self, ctx: &mut EventContext, input: &ButtonInput) -> EventResult {
        if input.button != MouseButton::Left {
            return EventResult::Ignored;
        }
        match input.press {
            Press::Down => self.set_state(ctx, ButtonState::Pressed),
            Press::Up => {
                if self.state.get() == ButtonState::Pressed {
                    self.set_state(ctx, ButtonState::Hover);
                    self.activated.transmit(());
                }
            }
        }
        EventResult::Consumed
    }

    fn key(&mut self, _ctx: &mut EventContext, key: &KeyEvent) -> EventResult {
        let activates = matches!(key.code, Key::Enter | Key::Char(' '));
        if !activates || key.press != Press::Down || key.repeat {
            return EventResult::Ignored;
        }
        self.activated.transmit(());
        EventResult::Consumed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;
    use crate::geometry::Point;
    use crate::signal::Slot;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn left(press: Press) -> ButtonInput {
        ButtonInput {
            button: MouseButton::Left,
            press,
            position: Point::new(0, 0),
        }
    }

    #[test]
    fn connecting_slot_learns_current_state() {
        let button = Button::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let slot = Slot::new(move |state| sink.borrow_mut().push(state));
        button.state_changed().connect(&slot);
        assert_eq!(*seen.borrow(), vec![ButtonState::Normal]);
    }

    #[test]
    fn click_cycle_reports_states_and_activates() {
        let mut button = Button::new();
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let state_slot = Slot::new(move |state| sink.borrow_mut().push(state));
        button.state_changed().connect(&state_slot);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let click_slot = Slot::new(move |()| counter.set(counter.get() + 1));
        button.activated().connect(&click_slot);

        let mut ctx = EventContext::new();
        button.enter_leave(&mut ctx, true);
        button.mouse_button(&mut ctx, &left(Press::Down));
        button.mouse_button(&mut ctx, &left(Press::Up));
        button.enter_leave(&mut ctx, false);

        assert!(ctx.wants_redraw());
        assert_eq!(clicks.get(), 1);
        assert_eq!(
            *states.borrow(),
            vec![
                ButtonState::Normal,
                ButtonState::Hover,
                ButtonState::Pressed,
                ButtonState::Hover,
                ButtonState::Normal,
            ]
        );
    }

    #[test]
    fn release_without_press_does_not_activate() {
        let mut button = Button::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let slot = Slot::new(move |()| counter.set(counter.get() + 1));
        button.activated().connect(&slot);
        button.mouse_button(&mut EventContext::new(), &left(Press::Up));
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn other_buttons_bubble() {
        let mut button = Button::new();
        let input = ButtonInput {
            button: MouseButton::Right,
            press: Press::Down,
            position: Point::new(0, 0),
        };
        assert_eq!(
            button.mouse_button(&mut EventContext::new(), &input),
            EventResult::Ignored
        );
    }

    #[test]
    fn enter_and_space_activate() {
        let mut button = Button::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let slot = Slot::new(move |()| counter.set(counter.get() + 1));
        button.activated().connect(&slot);

        let mut ctx = EventContext::new();
        let enter = KeyEvent::new(Key::Enter, Modifiers::NONE);
        let space = KeyEvent::new(Key::Char(' '), Modifiers::NONE);
        let other = KeyEvent::new(Key::Char('x'), Modifiers::NONE);
        assert!(button.key(&mut ctx, &enter).is_consumed());
        assert!(button.key(&mut ctx, &space).is_consumed());
        assert!(!button.key(&mut ctx, &other).is_consumed());
        assert_eq!(clicks.get(), 2);
    }

    #[test]
    fn with_label_builds_a_singlet() {
        let mut tree = SceneTree::default();
        let button = Button::with_label(&mut tree, "OK").unwrap();
        let label = tree.children(button)[0];
        assert_eq!(tree.behavior::<Label>(label).unwrap().text(), "OK");
        assert!(tree.behavior::<Button>(button).is_some());
    }
}
