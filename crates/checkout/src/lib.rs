//! Multi-step checkout flow orchestrator.
//!
//! A checkout is a wizard of four dependent steps (shipping, shipping
//! method, payment, billing) driven by cart snapshots arriving on the event
//! bus. The [`FlowController`] opens the first incomplete step, summarises
//! the completed ones and enables order placement once every step is
//! complete. Steps commit through [`commerce::CommerceApi`] and render
//! through [`ui::Renderer`], both behind traits.

pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod layout;
pub mod session;
pub mod step;
pub mod steps;
pub mod view;

pub use config::CheckoutOptions;
pub use context::{CONFIRMATION_ID, CheckoutContext, EMPTY_CART_ID, FormRefs, PLACE_ORDER_ID};
pub use error::{CheckoutError, Result};
pub use flow::FlowController;
pub use layout::{CheckoutLayout, StepRegions};
pub use session::CheckoutSession;
pub use step::{StepKind, StepOutcome};
pub use steps::{CheckoutStep, StepSequence};
pub use view::{CheckoutView, StepView};
