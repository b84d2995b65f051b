//! Commerce backend contract used by the checkout steps.
//!
//! Every mutation is fire-and-await and may fail. Successful mutations return
//! the cart as the backend now sees it; the real client additionally
//! broadcasts that cart on `checkout/updated`, which [`InMemoryCommerceApi`]
//! reproduces when given a bus.

pub mod api;
pub mod error;
pub mod memory;

pub use api::{BillingAddressInput, CommerceApi, Operation};
pub use error::{CommerceError, Result};
pub use memory::InMemoryCommerceApi;
