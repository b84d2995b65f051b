//! Shared data model for the checkout workspace.
//!
//! Cart snapshots arrive from the commerce backend as immutable values; every
//! update supersedes the previous one. Nothing in here mutates a snapshot in
//! place on behalf of the checkout flow.

pub mod cart;
pub mod order;
pub mod types;
pub mod values;

pub use cart::{Address, CartItem, CartSnapshot, PaymentMethod, ShippingMethod};
pub use order::OrderResult;
pub use types::SessionId;
pub use values::CheckoutValues;
