//! Commerce API trait.

use async_trait::async_trait;
use common::{Address, CartSnapshot, OrderResult, PaymentMethod, ShippingMethod};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The mutations the checkout can ask the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    SetGuestEmail,
    SetShippingAddress,
    SetShippingMethod,
    SetPaymentMethod,
    SetBillingAddress,
    PlaceOrder,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SetGuestEmail => "set_guest_email",
            Operation::SetShippingAddress => "set_shipping_address",
            Operation::SetShippingMethod => "set_shipping_method",
            Operation::SetPaymentMethod => "set_payment_method",
            Operation::SetBillingAddress => "set_billing_address",
            Operation::PlaceOrder => "place_order",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing address to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingAddressInput {
    /// Reuse the shipping address.
    SameAsShipping,
    Address(Address),
}

/// Client for the remote commerce backend.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn set_guest_email(&self, email: &str) -> Result<CartSnapshot>;

    async fn set_shipping_address(&self, address: Address) -> Result<CartSnapshot>;

    async fn set_shipping_method(&self, method: ShippingMethod) -> Result<CartSnapshot>;

    async fn set_payment_method(&self, method: PaymentMethod) -> Result<CartSnapshot>;

    async fn set_billing_address(&self, input: BillingAddressInput) -> Result<CartSnapshot>;

    async fn place_order(&self) -> Result<OrderResult>;
}
