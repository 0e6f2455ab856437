//! Application: windows, the event loop, and input routing.
//!
//! [`Application`] owns every window, the font cache, the event queue and
//! the timers. Input arrives as [`Event`]s from an [`EventSource`] (or from
//! the queue, for timer ticks and anything posted through an
//! [`EventSender`]) and is routed to gadgets: pointer events to the gadget
//! under the pointer, keys and text to the focused gadget, both bubbling up
//! through the managers until one consumes them.

use std::time::Duration;

use slotmap::SlotMap;

use crate::error::{GuiError, Result};
use crate::event::{
    ButtonMask, Event, EventQueue, EventSender, EventSource, KeyEvent, MouseButton, Press,
    WindowEvent,
};
use crate::gadget::{ButtonInput, GadgetId};
use crate::geometry::Point;
use crate::render::Renderer;
use crate::text::FontCache;
use crate::theme::Theme;
use crate::timer::{TimerId, Timers};
use crate::window::{Window, WindowConfig, WindowId};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Application name, used in log output.
    pub title: String,
    /// Target frames per second for the event loop.
    pub frame_rate: u32,
    /// Theme handed to every window.
    pub theme: Theme,
    /// Default font as (name, point size), overriding the theme's.
    pub font: Option<(String, u32)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "gadgetry".to_owned(),
            frame_rate: 60,
            theme: Theme::default(),
            font: None,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the target frame rate (builder). Zero is treated as one.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        self.frame_rate = frame_rate.max(1);
        self
    }

    /// Set the theme (builder).
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the default font (builder).
    pub fn with_font(mut self, name: impl Into<String>, point_size: u32) -> Self {
        self.font = Some((name.into(), point_size));
        self
    }

    /// The theme with the font override applied.
    pub fn effective_theme(&self) -> Theme {
        match &self.font {
            Some((name, size)) => self.theme.clone().with_font(name.clone(), *size),
            None => self.theme.clone(),
        }
    }

    /// Time budget for one frame.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

pub struct Application {
    config: AppConfig,
    theme: Theme,
    fonts: FontCache,
    windows: SlotMap<WindowId, Window>,
    queue: EventQueue,
    timers: Timers,
    running: bool,
    /// Window the pointer is in.
    mouse_window: Option<WindowId>,
    /// Gadget that last received an enter.
    mouse_gadget: Option<(WindowId, GadgetId)>,
    buttons: ButtonMask,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        let theme = config.effective_theme();
        Self {
            config,
            theme,
            fonts: FontCache::default(),
            windows: SlotMap::with_key(),
            queue: EventQueue::new(),
            timers: Timers::new(),
            running: true,
            mouse_window: None,
            mouse_gadget: None,
            buttons: ButtonMask::NONE,
        }
    }

    /// Replace the font cache, e.g. with one backed by another provider.
    pub fn with_fonts(mut self, fonts: FontCache) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn fonts_mut(&mut self) -> &mut FontCache {
        &mut self.fonts
    }

    // -----------------------------------------------------------------------
    // Windows
    // -----------------------------------------------------------------------

    /// Create a window drawing into `renderer`, which is resized to the
    /// configured size.
    pub fn create_window(
        &mut self,
        config: WindowConfig,
        mut renderer: impl Renderer + 'static,
    ) -> Result<WindowId> {
        renderer.set_output_size(config.size)?;
        let theme = self.theme.clone();
        let title = config.title.clone();
        let id = self
            .windows
            .insert_with_key(|id| Window::new(id, config, theme, Box::new(renderer)));
        log::info!("created window {id:?} {title:?}");
        Ok(id)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().collect()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Close and drop a window, releasing its gadgets' resources.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        self.windows.remove(id).ok_or(GuiError::UnknownWindow)?;
        if self.mouse_window == Some(id) {
            self.mouse_window = None;
        }
        if self.mouse_gadget.is_some_and(|(window, _)| window == id) {
            self.mouse_gadget = None;
        }
        log::info!("closed window {id:?}");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queue and timers
    // -----------------------------------------------------------------------

    /// Handle for posting events from other threads.
    pub fn event_sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    /// Start a timer posting its ticks to this application's queue.
    pub fn start_timer(&mut self, id: TimerId) -> Result<()> {
        let sender = self.queue.sender();
        self.timers.start(id, sender)
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the event loop after the current event.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Pointer state: the window it is in and the held buttons.
    pub fn mouse_window(&self) -> Option<WindowId> {
        self.mouse_window
    }

    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    /// The gadget under the pointer, if it is still alive.
    pub fn mouse_gadget(&self) -> Option<GadgetId> {
        self.live_mouse_gadget().map(|(_, gadget)| gadget)
    }

    /// Lay out and draw every window that needs it.
    pub fn render_frame(&mut self) -> Result<()> {
        for window in self.windows.values_mut() {
            window.layout_if_needed(&mut self.fonts);
            if window.needs_drawing() {
                window.draw()?;
            }
        }
        Ok(())
    }

    /// Run until quit: drain the queue, wait up to one frame for input,
    /// dispatch, render.
    pub fn run(&mut self, source: &mut dyn EventSource) -> Result<()> {
        self.running = true;
        log::info!("{}: event loop started", self.config.title);
        self.render_frame()?;
        while self.running {
            let mut events = self.queue.drain();
            let timeout = if events.is_empty() {
                self.config.frame_period()
            } else {
                Duration::ZERO
            };
            events.extend(source.wait(timeout)?);
            for event in events {
                self.handle_event(event)?;
                if !self.running {
                    break;
                }
            }
            if self.running {
                self.render_frame()?;
            }
        }
        log::info!("{}: event loop stopped", self.config.title);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route one event. Events for windows that no longer exist are dropped.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        log::trace!("event {event:?}");
        match event {
            Event::Quit => self.quit(),
            Event::Window { window, event } => self.handle_window_event(window, event)?,
            Event::MouseMotion {
                window,
                position,
                buttons,
            } => {
                self.buttons = buttons;
                self.mouse_window = Some(window);
                // While dragging, the pressed gadget keeps the pointer.
                if buttons.is_empty() {
                    let target = self.gadget_at(window, position);
                    self.track_pointer(window, target);
                }
            }
            Event::MouseButton {
                window,
                button,
                press,
                position,
            } => self.handle_mouse_button(window, button, press, position),
            Event::MouseWheel {
                window,
                position,
                delta,
            } => {
                if let Some(target) = self.gadget_at(window, position) {
                    if let Some(win) = self.windows.get_mut(window) {
                        win.tree_mut().mouse_wheel_event(target, position, delta);
                    }
                }
            }
            Event::Key { window, key } => self.handle_key(window, &key),
            Event::TextInput { window, text } => {
                if let Some(win) = self.windows.get_mut(window) {
                    if let Some(leaf) = win.focus_leaf() {
                        win.tree_mut().text_input_event(leaf, &text);
                    }
                }
            }
            Event::Touch { window, position } => {
                log::debug!("touch at {position:?} in {window:?} ignored");
            }
            Event::Timer { timer, tick } => {
                if !self.timers.transmit(timer, tick) {
                    log::trace!("late tick {tick} for removed timer {timer:?}");
                }
            }
        }
        Ok(())
    }

    fn handle_window_event(&mut self, id: WindowId, event: WindowEvent) -> Result<()> {
        if event == WindowEvent::Close {
            if self.windows.contains_key(id) {
                self.close_window(id)?;
            }
            if self.windows.is_empty() {
                log::info!("last window closed");
                self.quit();
            }
            return Ok(());
        }

        let Some(window) = self.windows.get_mut(id) else {
            log::debug!("{event:?} for unknown window {id:?}");
            return Ok(());
        };
        match event {
            WindowEvent::Shown | WindowEvent::Exposed | WindowEvent::Hidden => {
                window.request_redraw();
            }
            WindowEvent::Resized(size) => window.resize(size)?,
            WindowEvent::Moved(position) => log::debug!("window {id:?} moved to {position:?}"),
            WindowEvent::FocusGained => log::debug!("window {id:?} gained focus"),
            WindowEvent::FocusLost => log::debug!("window {id:?} lost focus"),
            WindowEvent::Enter => self.mouse_window = Some(id),
            WindowEvent::Leave => {
                self.track_pointer(id, None);
                if self.mouse_window == Some(id) {
                    self.mouse_window = None;
                }
            }
            WindowEvent::Close => {}
        }
        Ok(())
    }

    fn handle_mouse_button(
        &mut self,
        window: WindowId,
        button: MouseButton,
        press: Press,
        position: Point,
    ) {
        match press {
            Press::Down => self.buttons.insert(button),
            Press::Up => self.buttons.remove(button),
        }
        let Some(target) = self.gadget_at(window, position) else {
            return;
        };
        let Some(win) = self.windows.get_mut(window) else {
            return;
        };
        if press == Press::Down {
            if let Some(focus) = win.tree().focus_target(target) {
                win.set_focus_gadget(focus);
            }
        }
        let input = ButtonInput {
            button,
            press,
            position,
        };
        win.tree_mut().mouse_button_event(target, &input);
    }

    fn handle_key(&mut self, window: WindowId, key: &KeyEvent) {
        let Some(win) = self.windows.get_mut(window) else {
            return;
        };
        match win.focus_leaf() {
            Some(leaf) => {
                win.tree_mut().key_event(leaf, key);
            }
            None => log::trace!("key {:?} with nothing focused", key.code),
        }
    }

    fn gadget_at(&self, window: WindowId, position: Point) -> Option<GadgetId> {
        self.windows.get(window)?.find_gadget(position)
    }

    fn live_mouse_gadget(&self) -> Option<(WindowId, GadgetId)> {
        self.mouse_gadget.filter(|&(window, gadget)| {
            self.windows
                .get(window)
                .is_some_and(|w| w.tree().contains(gadget))
        })
    }

    /// Move the pointer onto `target`, pairing a leave for the previous
    /// gadget with an enter for the new one.
    fn track_pointer(&mut self, window: WindowId, target: Option<GadgetId>) {
        let previous = self.live_mouse_gadget();
        let next = target.map(|gadget| (window, gadget));
        if previous == next {
            return;
        }
        if let Some((old_window, old)) = previous {
            if let Some(win) = self.windows.get_mut(old_window) {
                win.tree_mut().enter_leave_event(old, false);
            }
        }
        if let Some((new_window, new)) = next {
            if let Some(win) = self.windows.get_mut(new_window) {
                win.tree_mut().enter_leave_event(new, true);
            }
        }
        self.mouse_gadget = next;
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, Modifiers};
    use crate::gadget::{EventContext, EventResult, Gadget, LayoutContext};
    use crate::geometry::Size;
    use crate::layout::LinearLayout;
    use crate::render::SoftwareRenderer;
    use crate::signal::Slot;
    use crate::testing::ScriptedEvents;
    use crate::widgets::Container;
    use pretty_assertions::assert_eq;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        focusable: bool,
    }

    impl Recorder {
        fn push(&self, what: &str) -> EventResult {
            self.log.borrow_mut().push(format!("{what} {}", self.name));
            EventResult::Consumed
        }
    }

    impl Gadget for Recorder {
        fn gadget_type(&self) -> &str {
            "Recorder"
        }
        fn content_size(&mut self, _ctx: &mut LayoutContext<'_>) -> Size {
            Size::new(5, 5)
        }
        fn accepts_focus(&self) -> bool {
            self.focusable
        }
        fn enter_leave(&mut self, _ctx: &mut EventContext, entered: bool) -> EventResult {
            self.push(if entered { "enter" } else { "leave" })
        }
        fn mouse_button(&mut self, _ctx: &mut EventContext, input: &ButtonInput) -> EventResult {
            self.push(match input.press {
                Press::Down => "press",
                Press::Up => "release",
            })
        }
        fn mouse_wheel(&mut self, _ctx: &mut EventContext, _p: Point, _d: Point) -> EventResult {
            self.push("wheel")
        }
        fn key(&mut self, _ctx: &mut EventContext, _key: &KeyEvent) -> EventResult {
            self.push("key")
        }
        fn text_input(&mut self, _ctx: &mut EventContext, text: &str) -> EventResult {
            self.push(&format!("text {text}"))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Fixture {
        app: Application,
        window: WindowId,
        a: GadgetId,
        b: GadgetId,
        log: Log,
    }

    /// Two 5x5 recorders side by side; only `a` takes focus.
    fn fixture() -> Fixture {
        let mut app = Application::default();
        let window = app
            .create_window(
                WindowConfig::new().with_size(Size::new(20, 10)),
                SoftwareRenderer::headless(Size::new(1, 1)),
            )
            .unwrap();
        let log: Log = Rc::default();
        let win = app.window_mut(window).unwrap();
        let screen = win.add_screen(Container::new(), LinearLayout::horizontal());
        let tree = win.tree_mut();
        let a = tree.add_gadget(Recorder {
            name: "A",
            log: Rc::clone(&log),
            focusable: true,
        });
        let b = tree.add_gadget(Recorder {
            name: "B",
            log: Rc::clone(&log),
            focusable: false,
        });
        tree.manage(screen, a).unwrap();
        tree.manage(screen, b).unwrap();
        app.render_frame().unwrap();
        Fixture {
            app,
            window,
            a,
            b,
            log,
        }
    }

    fn motion(window: WindowId, x: i32, y: i32) -> Event {
        Event::MouseMotion {
            window,
            position: Point::new(x, y),
            buttons: ButtonMask::NONE,
        }
    }

    fn taken(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn window_is_sized_from_config() {
        let f = fixture();
        let win = f.app.window(f.window).unwrap();
        assert_eq!(win.renderer().output_size(), Size::new(20, 10));
    }

    #[test]
    fn enter_and_leave_are_paired() {
        let Fixture { mut app, window, a, log, .. } = fixture();
        app.handle_event(motion(window, 1, 1)).unwrap();
        app.handle_event(motion(window, 2, 2)).unwrap();
        app.handle_event(motion(window, 6, 1)).unwrap();
        app.handle_event(motion(window, 1, 1)).unwrap();
        assert_eq!(app.mouse_gadget(), Some(a));
        app.handle_event(motion(window, 15, 8)).unwrap();
        assert_eq!(app.mouse_gadget(), None);
        assert_eq!(
            taken(&log),
            vec!["enter A", "leave A", "enter B", "leave B", "enter A", "leave A"]
        );
    }

    #[test]
    fn dragging_keeps_the_tracked_gadget() {
        let Fixture { mut app, window, log, .. } = fixture();
        app.handle_event(motion(window, 1, 1)).unwrap();
        app.handle_event(Event::MouseMotion {
            window,
            position: Point::new(6, 1),
            buttons: ButtonMask::from(MouseButton::Left),
        })
        .unwrap();
        assert_eq!(taken(&log), vec!["enter A"]);
        assert!(app.buttons().contains(MouseButton::Left));
    }

    #[test]
    fn destroyed_tracked_gadget_gets_no_leave() {
        let Fixture { mut app, window, a, log, .. } = fixture();
        app.handle_event(motion(window, 1, 1)).unwrap();
        app.window_mut(window).unwrap().tree_mut().destroy(a);
        app.render_frame().unwrap();
        app.handle_event(motion(window, 1, 1)).unwrap();
        assert_eq!(taken(&log), vec!["enter A", "enter B"]);
    }

    #[test]
    fn press_focuses_and_keys_follow_focus() {
        let Fixture { mut app, window, a, log, .. } = fixture();
        let press = |press| Event::MouseButton {
            window,
            button: MouseButton::Left,
            press,
            position: Point::new(1, 1),
        };
        app.handle_event(press(Press::Down)).unwrap();
        app.handle_event(press(Press::Up)).unwrap();
        assert_eq!(app.window(window).unwrap().focus_leaf(), Some(a));

        let key = KeyEvent::new(Key::Char('q'), Modifiers::NONE);
        app.handle_event(Event::Key { window, key }).unwrap();
        app.handle_event(Event::TextInput {
            window,
            text: "hi".into(),
        })
        .unwrap();
        assert_eq!(taken(&log), vec!["press A", "release A", "key A", "text hi A"]);
    }

    #[test]
    fn press_on_unfocusable_gadget_keeps_focus() {
        let Fixture { mut app, window, a, log, .. } = fixture();
        app.window_mut(window).unwrap().set_focus_gadget(a);
        app.handle_event(Event::MouseButton {
            window,
            button: MouseButton::Left,
            press: Press::Down,
            position: Point::new(6, 1),
        })
        .unwrap();
        assert_eq!(app.window(window).unwrap().focus_leaf(), Some(a));
        assert_eq!(taken(&log), vec!["press B"]);
    }

    #[test]
    fn wheel_goes_under_the_pointer() {
        let Fixture { mut app, window, log, .. } = fixture();
        app.handle_event(Event::MouseWheel {
            window,
            position: Point::new(6, 1),
            delta: Point::new(0, 1),
        })
        .unwrap();
        assert_eq!(taken(&log), vec!["wheel B"]);
    }

    #[test]
    fn leave_window_sends_leave() {
        let Fixture { mut app, window, log, .. } = fixture();
        app.handle_event(Event::Window {
            window,
            event: WindowEvent::Enter,
        })
        .unwrap();
        assert_eq!(app.mouse_window(), Some(window));
        app.handle_event(motion(window, 1, 1)).unwrap();
        app.handle_event(Event::Window {
            window,
            event: WindowEvent::Leave,
        })
        .unwrap();
        assert_eq!(taken(&log), vec!["enter A", "leave A"]);
        assert_eq!(app.mouse_window(), None);
    }

    #[test]
    fn resize_and_close() {
        let Fixture { mut app, window, .. } = fixture();
        app.handle_event(Event::Window {
            window,
            event: WindowEvent::Resized(Size::new(30, 12)),
        })
        .unwrap();
        assert_eq!(app.window(window).unwrap().size(), Size::new(30, 12));

        app.handle_event(Event::Window {
            window,
            event: WindowEvent::Close,
        })
        .unwrap();
        assert!(app.window(window).is_none());
        assert!(!app.is_running());
        assert!(matches!(
            app.close_window(window),
            Err(GuiError::UnknownWindow)
        ));
    }

    #[test]
    fn timer_ticks_reach_the_signal() {
        let mut app = Application::default();
        let timer = app.timers_mut().add(Duration::from_millis(10));
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ticks);
        let slot = Slot::new(move |tick| sink.borrow_mut().push(tick));
        app.timers().signal(timer).unwrap().connect(&slot);

        app.handle_event(Event::Timer { timer, tick: 1 }).unwrap();
        app.handle_event(Event::Timer { timer, tick: 2 }).unwrap();
        assert_eq!(*ticks.borrow(), vec![1, 2]);
    }

    #[test]
    fn run_processes_script_and_queue_until_quit() {
        let Fixture { mut app, window, log, .. } = fixture();
        app.event_sender().send(motion(window, 1, 1));
        let mut source = ScriptedEvents::new(vec![vec![motion(window, 6, 1)]]);
        app.run(&mut source).unwrap();
        assert!(!app.is_running());
        assert_eq!(taken(&log), vec!["enter A", "leave A", "enter B"]);
    }

    #[test]
    fn run_propagates_source_errors() {
        let mut app = Application::default();
        let mut source = ScriptedEvents::failing("decoder exploded");
        assert!(matches!(
            app.run(&mut source),
            Err(GuiError::UnhandledEvent(_))
        ));
    }

    #[test]
    fn config_builder() {
        let config = AppConfig::new()
            .with_title("demo")
            .with_frame_rate(0)
            .with_font("block", 14);
        assert_eq!(config.frame_rate, 1);
        assert_eq!(config.frame_period(), Duration::from_secs(1));
        assert_eq!(config.effective_theme().font_size, 14);
        assert_eq!(AppConfig::default().frame_rate, 60);
    }
}
