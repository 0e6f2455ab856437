//! ButtonBox: a row that only holds buttons.

use std::any::Any;

use crate::gadget::{Gadget, GadgetId, SceneTree};
use crate::layout::{Alignment, LinearLayout};

use super::button::Button;

/// Gap between buttons in a box.
pub const BUTTON_SPACING: i32 = 4;

/// Widget behavior that rejects anything but [`Button`] children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonBox;

impl ButtonBox {
    /// The layout a button box is normally created with: a centered row.
    pub fn layout() -> LinearLayout {
        LinearLayout::horizontal()
            .with_alignment(Alignment::Center)
            .with_spacing(BUTTON_SPACING)
    }

    /// Create a detached button box widget.
    pub fn create(tree: &mut SceneTree) -> GadgetId {
        tree.add_widget(ButtonBox, Self::layout())
    }
}

impl Gadget for ButtonBox {
    fn gadget_type(&self) -> &str {
        "ButtonBox"
    }

    fn accepts_child(&self, child: &dyn Gadget) -> bool {
        child.as_any().is::<Button>()
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
    use crate::error::GuiError;
    use crate::widgets::Label;

    #[test]
    fn accepts_buttons_only() {
        let mut tree = SceneTree::default();
        let row = ButtonBox::create(&mut tree);
        let ok = Button::with_label(&mut tree, "OK").unwrap();
        let text = tree.add_gadget(Label::new("nope"));

        tree.manage(row, ok).unwrap();
        assert!(matches!(
            tree.manage(row, text),
            Err(GuiError::ChildRejected { .. })
        ));
        assert_eq!(tree.children(row), &[ok]);
        assert_eq!(tree.manager(text), None);
    }
}
