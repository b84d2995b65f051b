//! Headless checkout runner.
//!
//! Replays a [`Script`] of domain events and user actions against a
//! checkout session backed by the in-memory renderer and commerce backend,
//! and reports what each action did and what the page shows at the end.

pub mod config;
pub mod error;
pub mod script;

use std::path::Path;
use std::sync::Arc;

use checkout::{CheckoutOptions, CheckoutSession, CheckoutView, StepOutcome};
use commerce::InMemoryCommerceApi;
use common::OrderResult;
use event_bus::{CheckoutEvent, EventBus};
use serde::Serialize;
use ui::InMemoryRenderer;

pub use config::Config;
pub use error::{DriverError, Result};
pub use script::{Action, Script};

/// What one action did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub index: usize,
    pub action: &'static str,
    pub outcome: String,
}

/// Result of a script run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub actions: Vec<ActionReport>,
    pub view: CheckoutView,
    pub orders: Vec<OrderResult>,
}

/// Reads and replays the script at `path`.
pub async fn run_file(path: &Path, options: CheckoutOptions) -> Result<RunReport> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DriverError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let script: Script = serde_json::from_str(&raw)?;
    run_script(script, options).await
}

/// Replays `script` against a fresh headless session.
///
/// Step failures are recorded and the run goes on, the way a shopper would
/// retry. Only a missing form or a session that cannot start aborts.
#[tracing::instrument(skip_all, fields(actions = script.actions.len()))]
pub async fn run_script(script: Script, options: CheckoutOptions) -> Result<RunReport> {
    let bus = EventBus::new();
    let renderer = InMemoryRenderer::new();
    let commerce = InMemoryCommerceApi::with_bus(bus.clone());
    if let Some(cart) = script.cart {
        commerce.set_cart(cart);
    }

    let session = CheckoutSession::start(
        Arc::new(renderer.clone()),
        Arc::new(commerce.clone()),
        bus.clone(),
        options,
    )
    .await?;

    let mut reports = Vec::with_capacity(script.actions.len());
    for (index, action) in script.actions.into_iter().enumerate() {
        let name = action.name();
        let outcome = match action {
            Action::Publish { event } => {
                bus.publish(event).await;
                "published".to_string()
            }
            Action::Initialize => {
                bus.publish(CheckoutEvent::CheckoutInitialized(commerce.cart()))
                    .await;
                "published".to_string()
            }
            Action::Authenticate { authenticated } => {
                bus.publish(CheckoutEvent::Authenticated(authenticated))
                    .await;
                "published".to_string()
            }
            Action::Fill { form, values, valid } => {
                let handle = renderer
                    .form(form)
                    .ok_or(DriverError::FormNotMounted { index, form })?;
                handle.fill(values);
                handle.set_valid(valid);
                "filled".to_string()
            }
            Action::Continue { step } => match session.continue_step(step).await {
                Ok(StepOutcome::Completed) => "completed".to_string(),
                Ok(StepOutcome::Invalid) => "invalid".to_string(),
                Err(e) => format!("error: {e}"),
            },
            Action::Edit { step } => match session.edit_step(step).await {
                Ok(()) => "opened".to_string(),
                Err(e) => format!("error: {e}"),
            },
            Action::PlaceOrder => match session.place_order().await {
                Ok(order) => format!("order {}", order.order_number),
                Err(e) => format!("error: {e}"),
            },
            Action::FailOn { operation, fail } => {
                commerce.set_fail_on(operation, fail);
                format!("{operation} fail={fail}")
            }
        };
        tracing::info!(index, action = name, %outcome, "action replayed");
        reports.push(ActionReport {
            index,
            action: name,
            outcome,
        });
    }

    let report = RunReport {
        actions: reports,
        view: session.view(),
        orders: commerce.orders(),
    };
    session.end();
    Ok(report)
}
