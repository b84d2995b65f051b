//! Step identities and continue outcomes.

use serde::{Deserialize, Serialize};

/// The wizard steps, in flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Shipping,
    ShippingMethod,
    Payment,
    Billing,
}

impl StepKind {
    /// All steps in flow order.
    pub const ALL: [StepKind; 4] = [
        StepKind::Shipping,
        StepKind::ShippingMethod,
        StepKind::Payment,
        StepKind::Billing,
    ];

    /// Position in the flow.
    pub fn index(&self) -> usize {
        match self {
            StepKind::Shipping => 0,
            StepKind::ShippingMethod => 1,
            StepKind::Payment => 2,
            StepKind::Billing => 3,
        }
    }

    /// Returns true for the last step, which opens nothing after it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepKind::Billing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Shipping => "shipping",
            StepKind::ShippingMethod => "shipping_method",
            StepKind::Payment => "payment",
            StepKind::Billing => "billing",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a step's continue action ended with, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Values were committed and the step closed.
    Completed,
    /// The form did not validate; nothing changed.
    Invalid,
}
