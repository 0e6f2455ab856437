//! Rendering: the backend interface, scoped state guards, and backends.
//!
//! - [`Renderer`]: what the scene tree needs from a 2D backend.
//! - [`DrawStateGuard`] / [`RenderTargetGuard`]: save state on construction,
//!   restore it on drop (including early returns and unwinding).
//! - [`SoftwareRenderer`]: an in-memory backend over [`PixelBuffer`]s.
//! - [`TerminalDriver`]: a crossterm presenter that shows each pixel as a cell.

pub mod driver;
pub mod pixels;
pub mod software;

use std::ops::{Deref, DerefMut};

use slotmap::new_key_type;

use crate::color::Color;
use crate::error::Result;
use crate::geometry::{Point, Rectangle, Size};

pub use driver::TerminalDriver;
pub use pixels::{PixelBuffer, PixelUpdate};
pub use software::{HeadlessPresenter, Presenter, SoftwareRenderer};

new_key_type! {
    /// Handle to an offscreen render target.
    pub struct TextureId;
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Clockwise quarter-turn rotation applied when copying a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Whether the rotation swaps width and height.
    pub fn is_transposing(self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }
}

/// Rotation plus mirroring for texture copies. Flips apply after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: Rotation::None,
        flip_horizontal: false,
        flip_vertical: false,
    };

    pub fn rotated(rotation: Rotation) -> Self {
        Self { rotation, ..Self::IDENTITY }
    }

    pub fn flipped(horizontal: bool, vertical: bool) -> Self {
        Self {
            flip_horizontal: horizontal,
            flip_vertical: vertical,
            ..Self::IDENTITY
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// The 2D backend consumed by windows and gadgets.
///
/// Drawing goes to the current render target: the output surface when no
/// texture is selected, otherwise that texture. Fills and lines use the
/// current draw color and respect the current clip rectangle.
pub trait Renderer {
    /// Size of the current render target.
    fn output_size(&self) -> Size;

    /// Resize the output surface (not textures).
    fn set_output_size(&mut self, size: Size) -> Result<()>;

    /// Create an offscreen render target, initially transparent.
    fn create_texture(&mut self, size: Size) -> Result<TextureId>;

    /// Release a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, texture: TextureId);

    /// Replace a texture's pixels. The buffer must match the texture size.
    fn update_texture(&mut self, texture: TextureId, pixels: &PixelBuffer) -> Result<()>;

    fn render_target(&self) -> Option<TextureId>;

    /// Select where drawing goes. `None` selects the output surface.
    fn set_render_target(&mut self, target: Option<TextureId>) -> Result<()>;

    fn draw_color(&self) -> Color;

    fn set_draw_color(&mut self, color: Color);

    fn clip_rect(&self) -> Option<Rectangle>;

    fn set_clip_rect(&mut self, clip: Option<Rectangle>);

    /// Fill `rect` with the draw color.
    fn fill_rect(&mut self, rect: Rectangle) -> Result<()>;

    /// Draw a one-pixel line from `from` to `to`, both inclusive.
    fn draw_line(&mut self, from: Point, to: Point) -> Result<()>;

    /// Copy a texture (or the `src` region of it) into `dst` on the current
    /// target, scaling to fit and applying `transform`.
    fn copy(
        &mut self,
        texture: TextureId,
        src: Option<Rectangle>,
        dst: Rectangle,
        transform: Transform,
    ) -> Result<()>;

    /// Fill the whole current target with the draw color, ignoring the clip.
    fn clear(&mut self) -> Result<()>;

    /// Show the output surface.
    fn present(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Saves the draw color and clip rectangle; restores them on drop.
pub struct DrawStateGuard<'a> {
    renderer: &'a mut dyn Renderer,
    color: Color,
    clip: Option<Rectangle>,
}

impl<'a> DrawStateGuard<'a> {
    pub fn new(renderer: &'a mut dyn Renderer) -> Self {
        let color = renderer.draw_color();
        let clip = renderer.clip_rect();
        Self { renderer, color, clip }
    }
}

impl<'a> Deref for DrawStateGuard<'a> {
    type Target = dyn Renderer + 'a;
    fn deref(&self) -> &Self::Target {
        self.renderer
    }
}

impl<'a> DerefMut for DrawStateGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.renderer
    }
}

impl Drop for DrawStateGuard<'_> {
    fn drop(&mut self) {
        self.renderer.set_draw_color(self.color);
        self.renderer.set_clip_rect(self.clip);
    }
}

/// Redirects drawing to a render target; restores the previous one on drop.
pub struct RenderTargetGuard<'a> {
    renderer: &'a mut dyn Renderer,
    previous: Option<TextureId>,
}

impl<'a> RenderTargetGuard<'a> {
    pub fn new(renderer: &'a mut dyn Renderer, target: Option<TextureId>) -> Result<Self> {
        let previous = renderer.render_target();
        renderer.set_render_target(target)?;
        Ok(Self { renderer, previous })
    }
}

impl<'a> Deref for RenderTargetGuard<'a> {
    type Target = dyn Renderer + 'a;
    fn deref(&self) -> &Self::Target {
        self.renderer
    }
}

impl<'a> DerefMut for RenderTargetGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.renderer
    }
}

impl Drop for RenderTargetGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.renderer.set_render_target(self.previous) {
            log::error!("failed to restore render target: {err}");
        }
    }
}
