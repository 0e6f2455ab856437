//! Theme: the default look consumed by gadgets when they are initialized.
//!
//! A [`Theme`] is a plain value object. The scene tree hands it to every
//! gadget's `apply_theme` hook when the gadget is initialized; the core never
//! mutates it.

use crate::color::Color;

/// How border corners are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerStyle {
    #[default]
    Square,
    /// Corner pixels are left unpainted.
    Round,
}

/// Default colors, border metrics and font for gadgets.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Shade for the top and left edges of raised borders.
    pub top_edge: Color,
    /// Shade for the bottom and right edges of raised borders.
    pub bottom_edge: Color,
    /// Fill used by pressed or hovered interactive gadgets.
    pub highlight: Color,
    pub border_width: i32,
    pub corner_style: CornerStyle,
    pub font_name: String,
    pub font_size: u32,
}

impl Default for Theme {
    fn default() -> Self {
        let background = Color::rgb(48, 48, 52);
        Self {
            background,
            foreground: Color::rgb(220, 220, 220),
            top_edge: background.shade(1.6),
            bottom_edge: background.shade(0.5),
            highlight: Color::rgb(70, 110, 160),
            border_width: 2,
            corner_style: CornerStyle::Square,
            font_name: crate::text::BLOCK_FONT.to_owned(),
            font_size: 10,
        }
    }
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background and derive edge shading from it (builder).
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.top_edge = background.shade(1.6);
        self.bottom_edge = background.shade(0.5);
        self
    }

    /// Set the foreground (builder).
    pub fn with_foreground(mut self, foreground: Color) -> Self {
        self.foreground = foreground;
        self
    }

    /// Set the default border thickness (builder).
    pub fn with_border_width(mut self, width: i32) -> Self {
        self.border_width = width.max(0);
        self
    }

    /// Set the default corner style (builder).
    pub fn with_corner_style(mut self, style: CornerStyle) -> Self {
        self.corner_style = style;
        self
    }

    /// Set the default font (builder).
    pub fn with_font(mut self, name: impl Into<String>, point_size: u32) -> Self {
        self.font_name = name.into();
        self.font_size = point_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_drives_edge_shading() {
        let theme = Theme::new().with_background(Color::rgb(100, 100, 100));
        assert_eq!(theme.top_edge, Color::rgb(160, 160, 160));
        assert_eq!(theme.bottom_edge, Color::rgb(50, 50, 50));
    }

    #[test]
    fn border_width_never_negative() {
        assert_eq!(Theme::new().with_border_width(-3).border_width, 0);
    }

    #[test]
    fn builder_sets_font() {
        let theme = Theme::new().with_font("mono", 14);
        assert_eq!(theme.font_name, "mono");
        assert_eq!(theme.font_size, 14);
    }
}
