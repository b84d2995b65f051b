//! Checkout options.

/// Behavioural switches for a checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    /// Initial state of the "billing same as shipping" checkbox when no live
    /// value has been reported yet.
    pub bill_to_shipping_default: bool,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            bill_to_shipping_default: true,
        }
    }
}
