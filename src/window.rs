//! Window: one scene tree, its screens, and the renderer they draw into.
//!
//! A [`Window`] owns a [`SceneTree`] whose roots are screens. It runs the
//! two-stage layout over every screen, draws the screens in order (later
//! screens on top), resolves the gadget under a point, and keeps the focus
//! chain: the focused leaf plus every manager up to its screen.

use slotmap::new_key_type;

use crate::error::Result;
use crate::gadget::{hit, DrawFrame, Gadget, GadgetId, LayoutContext, SceneTree};
use crate::geometry::{Point, Rectangle, Size};
use crate::layout::LayoutManager;
use crate::render::{DrawStateGuard, Renderer};
use crate::text::FontCache;
use crate::theme::Theme;

new_key_type! {
    /// Handle to a window owned by the [`Application`](crate::app::Application).
    pub struct WindowId;
}

// ---------------------------------------------------------------------------
// WindowConfig
// ---------------------------------------------------------------------------

/// Creation parameters for a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Size of the drawing surface in pixels.
    pub size: Size,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "gadgetry".to_owned(),
            size: Size::new(160, 96),
        }
    }
}

impl WindowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the surface size (builder).
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

pub struct Window {
    id: WindowId,
    title: String,
    size: Size,
    tree: SceneTree,
    renderer: Box<dyn Renderer>,
    screens: Vec<GadgetId>,
    /// Focused leaf first, then its managers.
    focus_chain: Vec<GadgetId>,
    redraw: bool,
}

impl Window {
    /// Create a window around `renderer`. The renderer's output is expected
    /// to already match `config.size`.
    pub fn new(
        id: WindowId,
        config: WindowConfig,
        theme: Theme,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        Self {
            id,
            title: config.title,
            size: config.size,
            tree: SceneTree::new(theme),
            renderer,
            screens: Vec::new(),
            focus_chain: Vec::new(),
            redraw: true,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    /// Screens in drawing order.
    pub fn screens(&self) -> &[GadgetId] {
        &self.screens
    }

    // -----------------------------------------------------------------------
    // Screens
    // -----------------------------------------------------------------------

    /// Create a screen on top of the existing ones. Screens may not grow
    /// past the window.
    pub fn add_screen(
        &mut self,
        behavior: impl Gadget,
        layout: impl LayoutManager + 'static,
    ) -> GadgetId {
        let screen = self
            .tree
            .add_screen(self.id, Box::new(behavior), Box::new(layout));
        self.tree.set_maximum_size(screen, Some(self.size));
        self.screens.push(screen);
        log::debug!("window {:?}: added screen {screen:?}", self.id);
        screen
    }

    /// Destroy a screen and its subtree. Returns `false` if it is not one of
    /// this window's screens.
    pub fn remove_screen(&mut self, screen: GadgetId) -> bool {
        let Some(index) = self.screens.iter().position(|&s| s == screen) else {
            return false;
        };
        self.screens.remove(index);
        self.tree.destroy(screen);
        self.focus_chain.retain(|&id| self.tree.contains(id));
        self.redraw = true;
        true
    }

    // -----------------------------------------------------------------------
    // Invalidation
    // -----------------------------------------------------------------------

    pub fn needs_layout(&self) -> bool {
        self.screens
            .iter()
            .any(|&s| self.tree.get(s).is_some_and(|n| n.needs_layout()))
    }

    pub fn needs_drawing(&self) -> bool {
        self.redraw
            || self
                .screens
                .iter()
                .any(|&s| self.tree.get(s).is_some_and(|n| n.needs_drawing()))
    }

    /// Force a full redraw on the next frame.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Resize the surface. Screens are relaid out against the new size.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if size == self.size {
            return Ok(());
        }
        log::debug!("window {:?} resized to {}x{}", self.id, size.width, size.height);
        self.renderer.set_output_size(size)?;
        self.size = size;
        for &screen in &self.screens {
            self.tree.set_maximum_size(screen, Some(size));
            self.tree.mark_needs_layout(screen);
        }
        self.redraw = true;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Two-stage layout of every screen. The constrained stage runs only
    /// when the exploratory stage asks for it.
    pub fn layout(&mut self, fonts: &mut FontCache) {
        let theme = self.tree.theme().clone();
        let mut ctx = LayoutContext::new(fonts, &theme);

        let mut needs_constraint = false;
        for &screen in &self.screens {
            needs_constraint |= self.tree.initial_layout(screen, &mut ctx);
        }
        if needs_constraint {
            log::trace!("window {:?}: constrained layout pass", self.id);
            for &screen in &self.screens {
                self.tree.constrained_layout(screen, &mut ctx, self.size);
            }
        }
        self.redraw = true;
    }

    /// Run [`layout`](Self::layout) if any screen is flagged. Returns
    /// whether it ran.
    pub fn layout_if_needed(&mut self, fonts: &mut FontCache) -> bool {
        if !self.needs_layout() {
            return false;
        }
        self.layout(fonts);
        true
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Clear, draw every screen, present.
    pub fn draw(&mut self) -> Result<()> {
        for mut behavior in self.tree.take_retired() {
            behavior.release(self.renderer.as_mut());
        }

        let background = self.tree.theme().background;
        {
            let mut renderer = DrawStateGuard::new(self.renderer.as_mut());
            renderer.set_clip_rect(None);
            renderer.set_draw_color(background);
            renderer.clear()?;
        }

        for index in 0..self.screens.len() {
            self.draw_subtree(self.screens[index])?;
        }
        self.redraw = false;
        self.renderer.present()
    }

    /// Preorder draw with an explicit stack of (node, parent content
    /// origin, parent clip), all in window coordinates.
    fn draw_subtree(&mut self, root: GadgetId) -> Result<()> {
        let mut stack: Vec<(GadgetId, Point, Option<Rectangle>)> =
            vec![(root, Point::zero(), None)];

        while let Some((id, origin, parent_clip)) = stack.pop() {
            let Some((behavior, metrics, decorators)) = self.tree.draw_parts(id) else {
                continue;
            };
            let location = origin + metrics.draw_location();
            metrics.set_last_draw_location(location);
            let frame = DrawFrame::new(metrics, location);
            let clip = match parent_clip {
                Some(parent) => frame.clip_rect.intersection(parent),
                None => frame.clip_rect,
            };

            if !clip.is_empty() {
                let mut renderer = DrawStateGuard::new(self.renderer.as_mut());
                renderer.set_clip_rect(Some(clip));
                if let Some(color) = metrics.background {
                    renderer.set_draw_color(color);
                    renderer.fill_rect(frame.border_rect)?;
                }
                if let Err(err) = behavior.draw(&mut *renderer, &frame) {
                    log::warn!("{} failed to draw: {err}", behavior.gadget_type());
                }
                for decorator in decorators {
                    if let Err(err) = decorator(&mut *renderer, &frame) {
                        log::warn!("decorator on {} failed: {err}", behavior.gadget_type());
                    }
                }
            }
            self.tree.clear_needs_drawing(id);

            let content_origin = frame.content_rect.point;
            for &child in self.tree.children(id).iter().rev() {
                stack.push((child, content_origin, Some(clip)));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// The deepest drawn gadget containing `point`. Later screens are
    /// searched first.
    pub fn find_gadget(&self, point: Point) -> Option<GadgetId> {
        self.screens
            .iter()
            .rev()
            .find_map(|&screen| self.tree.find_last(screen, hit(point)))
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// Focus `id` and every manager above it. Nodes of the previous chain
    /// that are not on the new path lose focus.
    pub fn set_focus_gadget(&mut self, id: GadgetId) {
        let chain: Vec<GadgetId> = if self.tree.contains(id) {
            std::iter::once(id).chain(self.tree.ancestors(id)).collect()
        } else {
            Vec::new()
        };
        if chain == self.focus_chain {
            return;
        }
        for old in std::mem::take(&mut self.focus_chain) {
            if !chain.contains(&old) {
                self.tree.set_has_focus(old, false);
            }
        }
        for &g in &chain {
            self.tree.set_has_focus(g, true);
        }
        log::trace!("window {:?}: focus {id:?}", self.id);
        self.focus_chain = chain;
    }

    pub fn clear_focus_chain(&mut self) {
        for id in std::mem::take(&mut self.focus_chain) {
            self.tree.set_has_focus(id, false);
        }
    }

    /// Live members of the focus chain, leaf first.
    pub fn focus_chain(&self) -> Vec<GadgetId> {
        self.focus_chain
            .iter()
            .copied()
            .filter(|&id| self.tree.contains(id))
            .collect()
    }

    /// The focused gadget, if it is still alive.
    pub fn focus_leaf(&self) -> Option<GadgetId> {
        self.focus_chain
            .first()
            .copied()
            .filter(|&id| self.tree.contains(id))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        for screen in std::mem::take(&mut self.screens) {
            self.tree.destroy(screen);
        }
        for mut behavior in self.tree.take_retired() {
            behavior.release(self.renderer.as_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::gadget::VisualMetrics;
    use crate::geometry::Padding;
    use crate::layout::{LinearLayout, StackLayout};
    use crate::render::SoftwareRenderer;
    use crate::testing::FrameCapture;
    use pretty_assertions::assert_eq;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Tile {
        size: Size,
        focusable: bool,
    }

    impl Tile {
        fn new(width: i32, height: i32) -> Self {
            Self {
                size: Size::new(width, height),
                focusable: false,
            }
        }
    }

    impl Gadget for Tile {
        fn gadget_type(&self) -> &str {
            "Tile"
        }
        fn content_size(&mut self, _ctx: &mut LayoutContext<'_>) -> Size {
            self.size
        }
        fn constrain(&mut self, _ctx: &mut LayoutContext<'_>, m: &mut VisualMetrics, c: Size) {
            let fit = m.content_constraint(c);
            m.set_desired_size(m.desired_size().component_min(fit));
        }
        fn accepts_focus(&self) -> bool {
            self.focusable
        }
        fn draw(&mut self, _r: &mut dyn Renderer, _f: &DrawFrame) -> Result<()> {
            Err(crate::error::GuiError::Render("tile cannot draw".into()))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Group {
        focusable: bool,
    }

    impl Gadget for Group {
        fn gadget_type(&self) -> &str {
            "Group"
        }
        fn accepts_focus(&self) -> bool {
            self.focusable
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn window(size: Size) -> (Window, FrameCapture) {
        let capture = FrameCapture::new();
        let renderer = SoftwareRenderer::new(size, capture.clone());
        let config = WindowConfig::new().with_size(size);
        let window = Window::new(WindowId::default(), config, Theme::default(), Box::new(renderer));
        (window, capture)
    }

    #[test]
    fn draw_places_children_inside_parent_content() {
        let (mut win, capture) = window(Size::new(20, 10));
        let screen = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        win.tree_mut().set_gadget_padding(screen, Padding::all(1));
        let a = win.tree_mut().add_gadget(Tile::new(3, 2));
        let b = win.tree_mut().add_gadget(Tile::new(4, 2));
        win.tree_mut().manage(screen, a).unwrap();
        win.tree_mut().manage(screen, b).unwrap();
        win.tree_mut().set_background(b, Some(Color::RED));

        let mut fonts = FontCache::default();
        assert!(win.layout_if_needed(&mut fonts));
        assert!(!win.layout_if_needed(&mut fonts));
        win.draw().unwrap();

        let tree = win.tree();
        assert_eq!(tree.metrics(a).unwrap().last_draw_location(), Point::new(1, 1));
        assert_eq!(tree.metrics(b).unwrap().last_draw_location(), Point::new(4, 1));
        let frame = capture.last_frame().unwrap();
        assert_eq!(frame.get(Point::new(4, 1)), Some(Color::RED));
        assert_eq!(frame.get(Point::new(7, 2)), Some(Color::RED));
        assert_eq!(frame.get(Point::new(8, 1)), Some(Theme::default().background));
        assert!(!win.needs_drawing());
    }

    #[test]
    fn find_gadget_returns_deepest_and_top_screen() {
        let (mut win, _) = window(Size::new(20, 10));
        let bottom = win.add_screen(Group { focusable: false }, StackLayout::new());
        let top = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        let under = win.tree_mut().add_gadget(Tile::new(10, 10));
        let over = win.tree_mut().add_gadget(Tile::new(5, 5));
        win.tree_mut().manage(bottom, under).unwrap();
        win.tree_mut().manage(top, over).unwrap();

        assert_eq!(win.find_gadget(Point::new(1, 1)), None);
        win.layout(&mut FontCache::default());
        win.draw().unwrap();

        assert_eq!(win.find_gadget(Point::new(1, 1)), Some(over));
        assert_eq!(win.find_gadget(Point::new(7, 7)), Some(under));
        assert_eq!(win.find_gadget(Point::new(15, 1)), None);
    }

    #[test]
    fn oversized_screen_is_constrained_to_window() {
        let (mut win, _) = window(Size::new(10, 10));
        let screen = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        let wide = win.tree_mut().add_gadget(Tile::new(30, 4));
        win.tree_mut().manage(screen, wide).unwrap();
        win.layout(&mut FontCache::default());
        assert_eq!(
            win.tree().metrics(wide).unwrap().desired_size(),
            Size::new(10, 4)
        );

        win.resize(Size::new(6, 6)).unwrap();
        assert!(win.needs_layout());
        win.layout(&mut FontCache::default());
        assert_eq!(win.tree().metrics(wide).unwrap().desired_size(), Size::new(6, 4));
        assert_eq!(win.renderer().output_size(), Size::new(6, 6));
    }

    #[test]
    fn focus_chain_runs_to_the_screen() {
        let (mut win, _) = window(Size::new(10, 10));
        let screen = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        let group = win
            .tree_mut()
            .add_widget(Group { focusable: true }, LinearLayout::vertical());
        let leaf = win.tree_mut().add_gadget(Tile {
            size: Size::new(1, 1),
            focusable: true,
        });
        let other = win.tree_mut().add_gadget(Tile::new(1, 1));
        win.tree_mut().manage(screen, group).unwrap();
        win.tree_mut().manage(group, leaf).unwrap();
        win.tree_mut().manage(screen, other).unwrap();

        win.set_focus_gadget(leaf);
        assert_eq!(win.focus_chain(), vec![leaf, group, screen]);
        assert!(win.tree().metrics(group).unwrap().has_focus);

        win.set_focus_gadget(other);
        assert_eq!(win.focus_leaf(), Some(other));
        assert!(!win.tree().metrics(leaf).unwrap().has_focus);
        assert!(!win.tree().metrics(group).unwrap().has_focus);
        assert!(win.tree().metrics(screen).unwrap().has_focus);

        win.tree_mut().destroy(other);
        assert_eq!(win.focus_leaf(), None);
        assert_eq!(win.focus_chain(), vec![screen]);

        win.clear_focus_chain();
        assert!(!win.tree().metrics(screen).unwrap().has_focus);
    }

    #[test]
    fn refocus_follows_a_moved_leaf() {
        let (mut win, _) = window(Size::new(10, 10));
        let screen = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        let first = win
            .tree_mut()
            .add_widget(Group { focusable: false }, LinearLayout::vertical());
        let second = win
            .tree_mut()
            .add_widget(Group { focusable: false }, LinearLayout::vertical());
        let leaf = win.tree_mut().add_gadget(Tile {
            size: Size::new(1, 1),
            focusable: true,
        });
        win.tree_mut().manage(screen, first).unwrap();
        win.tree_mut().manage(screen, second).unwrap();
        win.tree_mut().manage(first, leaf).unwrap();
        win.set_focus_gadget(leaf);
        assert_eq!(win.focus_chain(), vec![leaf, first, screen]);

        win.tree_mut().manage(second, leaf).unwrap();
        win.set_focus_gadget(leaf);
        assert_eq!(win.focus_chain(), vec![leaf, second, screen]);
        assert!(!win.tree().metrics(first).unwrap().has_focus);
        assert!(win.tree().metrics(second).unwrap().has_focus);
        assert!(win.tree().metrics(leaf).unwrap().has_focus);
    }

    struct Releasing(Rc<RefCell<u32>>);

    impl Gadget for Releasing {
        fn gadget_type(&self) -> &str {
            "Releasing"
        }
        fn release(&mut self, _renderer: &mut dyn Renderer) {
            *self.0.borrow_mut() += 1;
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn destroyed_behaviors_are_released_with_the_renderer() {
        let released = Rc::new(RefCell::new(0));
        let (mut win, _) = window(Size::new(4, 4));
        let screen = win.add_screen(Group { focusable: false }, LinearLayout::horizontal());
        let a = win.tree_mut().add_gadget(Releasing(Rc::clone(&released)));
        let b = win.tree_mut().add_gadget(Releasing(Rc::clone(&released)));
        win.tree_mut().manage(screen, a).unwrap();
        win.tree_mut().manage(screen, b).unwrap();

        win.tree_mut().release(screen, a).unwrap();
        assert_eq!(*released.borrow(), 0);
        win.draw().unwrap();
        assert_eq!(*released.borrow(), 1);

        drop(win);
        assert_eq!(*released.borrow(), 2);
    }
}
