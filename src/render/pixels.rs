//! PixelBuffer: an owned RGBA raster.
//!
//! Pixel buffers back the software renderer's screen and textures, carry the
//! output of font rasterization, and are what presenters receive. The `diff`
//! method compares two frames and yields only the pixels that changed.

use crate::color::Color;
use crate::geometry::{Point, Rectangle, Size};

// ---------------------------------------------------------------------------
// PixelUpdate
// ---------------------------------------------------------------------------

/// A single pixel that changed between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelUpdate {
    pub x: u16,
    pub y: u16,
    pub color: Color,
}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// A row-major grid of colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a buffer filled with `fill`.
    pub fn new(size: Size, fill: Color) -> Self {
        Self {
            size,
            pixels: vec![fill; size.area() as usize],
        }
    }

    /// A fully transparent buffer.
    pub fn transparent(size: Size) -> Self {
        Self::new(size, Color::TRANSPARENT)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The buffer's bounds at the origin.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_size(self.size)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.bounds().contains_point(p) {
            Some((p.y * self.size.width + p.x) as usize)
        } else {
            None
        }
    }

    /// The color at `p`, or `None` outside the buffer.
    pub fn get(&self, p: Point) -> Option<Color> {
        self.index(p).map(|i| self.pixels[i])
    }

    /// Overwrite the pixel at `p`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, p: Point, color: Color) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = color;
        }
    }

    /// Blend `color` over the pixel at `p`. Out-of-bounds writes are ignored.
    pub fn blend(&mut self, p: Point, color: Color) {
        if let Some(i) = self.index(p) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Blend `color` over every pixel of `rect` that lies inside the buffer.
    pub fn fill_rect(&mut self, rect: Rectangle, color: Color) {
        let area = rect.intersection(self.bounds());
        for y in area.point.y..area.bottom() {
            for x in area.point.x..area.right() {
                self.blend(Point::new(x, y), color);
            }
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// One row of pixels, or an empty slice outside the buffer.
    pub fn row(&self, y: i32) -> &[Color] {
        if y < 0 || y >= self.size.height {
            return &[];
        }
        let start = (y * self.size.width) as usize;
        &self.pixels[start..start + self.size.width as usize]
    }

    /// Compare this frame against a previous one and return the changed pixels.
    ///
    /// Pixels outside the previous frame's bounds always count as changed.
    pub fn diff(&self, previous: &PixelBuffer) -> Vec<PixelUpdate> {
        let mut updates = Vec::new();
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let p = Point::new(x, y);
                let current = self.pixels[(y * self.size.width + x) as usize];
                if previous.get(p) != Some(current) {
                    updates.push(PixelUpdate {
                        x: x as u16,
                        y: y as u16,
                        color: current,
                    });
                }
            }
        }
        updates
    }
}
