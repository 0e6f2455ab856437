//! In-memory renderer.
//!
//! `SoftwareRenderer` rasterizes into a screen [`PixelBuffer`] and a slotmap of
//! texture buffers, then hands the finished screen to a [`Presenter`] on
//! `present`. The headless presenter keeps the last frame for tests; the
//! terminal driver paints it with crossterm.

use slotmap::SlotMap;

use super::pixels::PixelBuffer;
use super::{Renderer, Rotation, TextureId, Transform};
use crate::color::Color;
use crate::error::{GuiError, Result};
use crate::geometry::{Point, Rectangle, Size};

/// Largest texture side accepted by `create_texture`.
pub const MAX_TEXTURE_SIDE: i32 = 8192;

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Receives each finished frame.
pub trait Presenter {
    fn present(&mut self, frame: &PixelBuffer) -> Result<()>;
}

/// Presenter that only remembers what it was given.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    frames: usize,
    last_frame: Option<PixelBuffer>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.last_frame.as_ref()
    }
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, frame: &PixelBuffer) -> Result<()> {
        self.frames += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SoftwareRenderer
// ---------------------------------------------------------------------------

pub struct SoftwareRenderer<P: Presenter = HeadlessPresenter> {
    screen: PixelBuffer,
    textures: SlotMap<TextureId, PixelBuffer>,
    target: Option<TextureId>,
    draw_color: Color,
    clip: Option<Rectangle>,
    presenter: P,
}

impl SoftwareRenderer<HeadlessPresenter> {
    /// A renderer whose frames go nowhere but the headless presenter.
    pub fn headless(size: Size) -> Self {
        Self::new(size, HeadlessPresenter::new())
    }
}

impl<P: Presenter> SoftwareRenderer<P> {
    /// Create a renderer with a black screen of `size`.
    pub fn new(size: Size, presenter: P) -> Self {
        Self {
            screen: PixelBuffer::new(size, Color::BLACK),
            textures: SlotMap::with_key(),
            target: None,
            draw_color: Color::BLACK,
            clip: None,
            presenter,
        }
    }

    /// The output surface.
    pub fn screen(&self) -> &PixelBuffer {
        &self.screen
    }

    pub fn texture(&self, texture: TextureId) -> Option<&PixelBuffer> {
        self.textures.get(texture)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn target_mut(&mut self) -> Result<&mut PixelBuffer> {
        match self.target {
            None => Ok(&mut self.screen),
            Some(id) => self.textures.get_mut(id).ok_or(GuiError::UnknownTexture),
        }
    }

    fn target_ref(&self) -> Option<&PixelBuffer> {
        match self.target {
            None => Some(&self.screen),
            Some(id) => self.textures.get(id),
        }
    }

    /// The drawable area of the current target after clipping.
    fn effective_clip(&self, bounds: Rectangle) -> Rectangle {
        match self.clip {
            Some(clip) => clip.intersection(bounds),
            None => bounds,
        }
    }
}

/// Map a destination-space pixel back to a source pixel.
///
/// `(tx, ty)` is a position in the transformed image of size `transformed`;
/// `source` is the size of the untransformed region.
fn untransform(tx: i32, ty: i32, transformed: Size, source: Size, transform: Transform) -> Point {
    let tx = if transform.flip_horizontal { transformed.width - 1 - tx } else { tx };
    let ty = if transform.flip_vertical { transformed.height - 1 - ty } else { ty };
    match transform.rotation {
        Rotation::None => Point::new(tx, ty),
        Rotation::Quarter => Point::new(ty, source.height - 1 - tx),
        Rotation::Half => Point::new(source.width - 1 - tx, source.height - 1 - ty),
        Rotation::ThreeQuarter => Point::new(source.width - 1 - ty, tx),
    }
}

impl<P: Presenter> Renderer for SoftwareRenderer<P> {
    fn output_size(&self) -> Size {
        self.target_ref().map(PixelBuffer::size).unwrap_or_default()
    }

    fn set_output_size(&mut self, size: Size) -> Result<()> {
        if size != self.screen.size() {
            log::debug!("output resized to {}x{}", size.width, size.height);
            self.screen = PixelBuffer::new(size, Color::BLACK);
        }
        Ok(())
    }

    fn create_texture(&mut self, size: Size) -> Result<TextureId> {
        if size.is_empty() {
            return Err(GuiError::TextureCreation {
                size,
                reason: "texture has no area".into(),
            });
        }
        if size.width > MAX_TEXTURE_SIDE || size.height > MAX_TEXTURE_SIDE {
            return Err(GuiError::TextureCreation {
                size,
                reason: format!("side exceeds {MAX_TEXTURE_SIDE}"),
            });
        }
        Ok(self.textures.insert(PixelBuffer::transparent(size)))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if self.textures.remove(texture).is_some() && self.target == Some(texture) {
            self.target = None;
        }
    }

    fn update_texture(&mut self, texture: TextureId, pixels: &PixelBuffer) -> Result<()> {
        let buffer = self.textures.get_mut(texture).ok_or(GuiError::UnknownTexture)?;
        if buffer.size() != pixels.size() {
            return Err(GuiError::Render(format!(
                "texture is {}x{} but update is {}x{}",
                buffer.size().width,
                buffer.size().height,
                pixels.size().width,
                pixels.size().height
            )));
        }
        *buffer = pixels.clone();
        Ok(())
    }

    fn render_target(&self) -> Option<TextureId> {
        self.target
    }

    fn set_render_target(&mut self, target: Option<TextureId>) -> Result<()> {
        if let Some(id) = target {
            if !self.textures.contains_key(id) {
                return Err(GuiError::UnknownTexture);
            }
        }
        self.target = target;
        Ok(())
    }

    fn draw_color(&self) -> Color {
        self.draw_color
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn clip_rect(&self) -> Option<Rectangle> {
        self.clip
    }

    fn set_clip_rect(&mut self, clip: Option<Rectangle>) {
        self.clip = clip;
    }

    fn fill_rect(&mut self, rect: Rectangle) -> Result<()> {
        let color = self.draw_color;
        let clip = self.clip;
        let target = self.target_mut()?;
        let area = match clip {
            Some(clip) => rect.intersection(clip),
            None => rect,
        };
        target.fill_rect(area, color);
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point) -> Result<()> {
        let color = self.draw_color;
        let bounds = self.target_ref().ok_or(GuiError::UnknownTexture)?.bounds();
        let area = self.effective_clip(bounds);
        let target = self.target_mut()?;

        // Bresenham, all octants.
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            let p = Point::new(x, y);
            if area.contains_point(p) {
                target.blend(p, color);
            }
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    fn copy(
        &mut self,
        texture: TextureId,
        src: Option<Rectangle>,
        dst: Rectangle,
        transform: Transform,
    ) -> Result<()> {
        // Cloned so a texture may be copied onto itself.
        let source = self.textures.get(texture).ok_or(GuiError::UnknownTexture)?.clone();
        let region = match src {
            Some(rect) => rect.intersection(source.bounds()),
            None => source.bounds(),
        };
        if region.is_empty() || dst.is_empty() {
            return Ok(());
        }

        let transformed = if transform.rotation.is_transposing() {
            region.size.transpose()
        } else {
            region.size
        };
        let bounds = self.target_ref().ok_or(GuiError::UnknownTexture)?.bounds();
        let area = self.effective_clip(bounds).intersection(dst);
        let target = self.target_mut()?;

        for y in area.point.y..area.bottom() {
            for x in area.point.x..area.right() {
                // Nearest-neighbour scale into transformed space.
                let tx = (x - dst.point.x) * transformed.width / dst.size.width;
                let ty = (y - dst.point.y) * transformed.height / dst.size.height;
                let s = untransform(tx, ty, transformed, region.size, transform);
                if let Some(color) = source.get(region.point + s) {
                    target.blend(Point::new(x, y), color);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let color = self.draw_color;
        self.target_mut()?.clear(color);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presenter.present(&self.screen)
    }
}
