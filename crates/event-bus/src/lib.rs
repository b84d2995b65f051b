//! Event bus for checkout domain events.
//!
//! Delivery is synchronous with respect to emission: `publish` awaits every
//! subscriber of the topic, in subscription order, before returning. Each
//! topic also keeps the last published event so that "eager" subscribers see
//! already-existing data once, at subscribe time.

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventHandler, SubscribeOptions, SubscriptionId};
pub use event::{CheckoutEvent, Topic};
