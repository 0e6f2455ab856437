//! RGBA color value and color-string parsing.
//!
//! Color strings are parsed as named colors or `#rgb`, `#rrggbb`, `#rrggbbaa`
//! hex values.

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const GREY: Color = Color::rgb(128, 128, 128);

    /// An opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the alpha channel is zero.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Scale the RGB channels by `factor` (alpha untouched), saturating at 255.
    pub fn shade(self, factor: f32) -> Color {
        let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Color::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Source-over blend of `self` onto `dst`.
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv) / 255) as u8;
                let out_a = a + (dst.a as u32 * inv) / 255;
                Color::rgba(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    out_a.min(255) as u8,
                )
            }
        }
    }

    /// Parse a color string.
    ///
    /// Supports hex colors (`#rgb`, `#rrggbb`, `#rrggbbaa`) and a small set of
    /// case-insensitive names. Returns `None` if the string cannot be parsed.
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex_color(hex);
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            "yellow" => Some(Color::rgb(255, 255, 0)),
            "magenta" => Some(Color::rgb(255, 0, 255)),
            "cyan" => Some(Color::rgb(0, 255, 255)),
            "grey" | "gray" => Some(Color::GREY),
            "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Some(Color::rgb(64, 64, 64)),
            "transparent" => Some(Color::TRANSPARENT),
            _ => None,
        }
    }
}

/// Parse a hex color string (without the leading `#`).
fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        8 => Some(Color::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
        6 => Some(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => {
            let r = channel(0..1)?;
            let g = channel(1..2)?;
            let b = channel(2..3)?;
            // Expand: 0xA -> 0xAA
            Some(Color::rgb(r * 16 + r, g * 16 + g, b * 16 + b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_variants() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::RED));
        assert_eq!(Color::parse("#f00"), Some(Color::RED));
        assert_eq!(Color::parse("#abc"), Some(Color::rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(Color::parse("#11223344"), Some(Color::rgba(0x11, 0x22, 0x33, 0x44)));
    }

    #[test]
    fn parse_hex_invalid() {
        assert_eq!(Color::parse("#ff00"), None);
        assert_eq!(Color::parse("#gghhii"), None);
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(Color::parse("  Red "), Some(Color::RED));
        assert_eq!(Color::parse("GRAY"), Some(Color::GREY));
        assert_eq!(Color::parse("rainbow"), None);
    }

    #[test]
    fn blend_extremes() {
        assert_eq!(Color::RED.over(Color::BLUE), Color::RED);
        assert_eq!(Color::TRANSPARENT.over(Color::BLUE), Color::BLUE);
        let half = Color::rgba(255, 0, 0, 128).over(Color::BLACK);
        assert_eq!(half.r, 128);
        assert_eq!(half.a, 255);
    }

    #[test]
    fn shade_saturates() {
        assert_eq!(Color::rgb(200, 100, 0).shade(2.0), Color::rgb(255, 200, 0));
        assert_eq!(Color::rgb(200, 100, 0).shade(0.5), Color::rgb(100, 50, 0));
    }
}
