//! Commerce API error types.

use thiserror::Error;

use crate::api::Operation;

/// Errors returned by the commerce backend.
#[derive(Debug, Clone, Error)]
pub enum CommerceError {
    /// The backend rejected the mutation.
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: Operation, reason: String },

    /// There is no cart to operate on.
    #[error("Cart is empty")]
    EmptyCart,
}

/// Result type for commerce operations.
pub type Result<T> = std::result::Result<T, CommerceError>;
