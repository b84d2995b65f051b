//! Checkout error types.

use commerce::CommerceError;
use thiserror::Error;
use ui::UiError;

use crate::step::StepKind;

/// Errors surfaced by the checkout flow.
///
/// An invalid form is not an error; see [`crate::StepOutcome::Invalid`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The commerce backend rejected a step's commit. The step stays open.
    #[error("Step '{step}' commit failed: {source}")]
    Commit {
        step: StepKind,
        #[source]
        source: CommerceError,
    },

    /// Something the step relies on is not mounted or not known.
    #[error("Step '{step}' cannot continue: missing {what}")]
    MissingPrerequisite { step: StepKind, what: String },

    /// Order placement was requested before every step was complete.
    #[error("Place order is disabled until every step is complete")]
    PlaceOrderDisabled,

    /// The backend rejected the order.
    #[error("Place order failed: {0}")]
    PlaceOrder(#[source] CommerceError),

    /// Rendering failed.
    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    /// Props or form values could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
