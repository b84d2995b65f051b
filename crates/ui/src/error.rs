//! UI error types.

use thiserror::Error;

use crate::component::ComponentKind;

/// Errors raised by the rendering layer.
#[derive(Debug, Error)]
pub enum UiError {
    /// The external renderer failed to mount a component.
    #[error("Failed to render {kind} into region '{region}': {reason}")]
    RenderFailed {
        kind: ComponentKind,
        region: String,
        reason: String,
    },
}

/// Result type for UI operations.
pub type Result<T> = std::result::Result<T, UiError>;
