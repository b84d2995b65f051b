//! Driver error types.

use std::path::PathBuf;

use checkout::CheckoutError;
use thiserror::Error;
use ui::ComponentKind;

/// Errors that stop a script run.
///
/// Step failures do not stop a run; they are recorded in the report.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("No script given; set CHECKOUT_SCRIPT or pass a path")]
    NoScript,

    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Action {index}: no {form} form is mounted")]
    FormNotMounted { index: usize, form: ComponentKind },

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

pub type Result<T> = std::result::Result<T, DriverError>;
