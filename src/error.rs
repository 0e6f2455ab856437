//! Error taxonomy for scene-tree assembly, resources and event decoding.
//!
//! Expired handles (dead slots, dead managers, dead focus-chain entries) are
//! never errors; they are treated as absent wherever they are encountered.

use crate::geometry::Size;

/// Errors raised by gadgetry.
#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    /// `manage` was called on a node that cannot hold children.
    #[error("gadget '{container}' cannot manage children")]
    NotAContainer { container: String },

    /// The container refused a child of this type.
    #[error("'{container}' does not accept a child of type '{child}'")]
    ChildRejected { container: String, child: String },

    /// Managing the child would make a node its own ancestor.
    #[error("managing '{child}' under '{container}' would create a cycle")]
    WouldCreateCycle { container: String, child: String },

    /// A handle did not resolve to a live gadget.
    #[error("unknown or destroyed gadget")]
    UnknownGadget,

    /// A handle did not resolve to a live window.
    #[error("unknown or closed window")]
    UnknownWindow,

    /// A render target could not be created.
    #[error("cannot create texture of size {}x{}: {reason}", size.width, size.height)]
    TextureCreation { size: Size, reason: String },

    /// A timer handle did not resolve.
    #[error("unknown or removed timer")]
    UnknownTimer,

    /// A texture handle did not resolve.
    #[error("unknown or destroyed texture")]
    UnknownTexture,

    /// A font could not be loaded.
    #[error("cannot load font '{name}' at {point_size}pt: {reason}")]
    FontLoad { name: String, point_size: u32, reason: String },

    /// A rendering operation failed.
    #[error("render error: {0}")]
    Render(String),

    /// A platform event kind the decoder does not handle.
    #[error("unhandled input event: {0}")]
    UnhandledEvent(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout gadgetry.
pub type Result<T> = std::result::Result<T, GuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_descriptive() {
        let err = GuiError::ChildRejected {
            container: "ButtonBox".into(),
            child: "Label".into(),
        };
        assert_eq!(err.to_string(), "'ButtonBox' does not accept a child of type 'Label'");

        let err = GuiError::TextureCreation {
            size: Size::new(0, 4),
            reason: "empty".into(),
        };
        assert_eq!(err.to_string(), "cannot create texture of size 0x4: empty");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "tty gone");
        let err: GuiError = io.into();
        assert!(matches!(err, GuiError::Io(_)));
    }
}
