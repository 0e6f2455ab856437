//! Container: a plain widget behavior for grouping children.
//!
//! A container draws nothing but its optional background. Which children it
//! holds and where they go is up to the scene tree and the layout manager it
//! is created with, so the same behavior serves as a screen root, a row, a
//! column, or a stack.

use std::any::Any;

use crate::color::Color;
use crate::gadget::{Gadget, VisualMetrics};
use crate::geometry::Padding;
use crate::theme::Theme;

/// Background choice for a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Fill {
    #[default]
    None,
    Theme,
    Color(Color),
}

/// A widget behavior that groups children.
///
/// # Examples
///
/// ```ignore
/// use gadgetry::layout::LinearLayout;
/// use gadgetry::widgets::Container;
///
/// let column = tree.add_widget(Container::filled(), LinearLayout::vertical());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Container {
    fill: Fill,
    padding: Option<Padding>,
}

impl Container {
    /// A transparent container.
    pub fn new() -> Self {
        Self::default()
    }

    /// A container painted with the theme background.
    pub fn filled() -> Self {
        Self {
            fill: Fill::Theme,
            ..Self::default()
        }
    }

    /// Paint the container with `color` (builder).
    pub fn with_background(mut self, color: Color) -> Self {
        self.fill = Fill::Color(color);
        self
    }

    /// Inset the children by `padding` (builder).
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }
}

impl Gadget for Container {
    fn gadget_type(&self) -> &str {
        "Container"
    }

    fn apply_theme(&mut self, theme: &Theme, metrics: &mut VisualMetrics) {
        metrics.background = match self.fill {
            Fill::None => None,
            Fill::Theme => Some(theme.background),
            Fill::Color(color) => Some(color),
        };
        if let Some(padding) = self.padding {
            metrics.set_gadget_padding(padding);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
