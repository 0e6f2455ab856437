//! Built-in gadgets: Panel, Label, Border, Button, ButtonBox, Container.

pub mod border;
pub mod button;
pub mod button_box;
pub mod container;
pub mod label;
pub mod panel;

pub use border::{paint_bevel, Bevel, BevelPaint, Border};
pub use button::{Button, ButtonState};
pub use button_box::ButtonBox;
pub use container::Container;
pub use label::Label;
pub use panel::Panel;
