//! The four wizard steps behind one uniform interface.
//!
//! Each step owns a fragment of the page and knows how to render itself,
//! summarise a committed value, judge completeness from a snapshot and
//! commit its own values. [`CheckoutStep`] is the tagged union the flow
//! controller drives; it stays step-agnostic beyond that.

mod billing;
mod payment;
mod shipping;
mod shipping_method;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use common::CartSnapshot;
use serde::de::DeserializeOwned;
use ui::{Component, ComponentKind, FormRef};

use crate::context::CheckoutContext;
use crate::error::{CheckoutError, Result};
use crate::step::{StepKind, StepOutcome};

pub use billing::{BILLING_ADDRESS_FORM_ID, BILLING_SAVED_ADDRESSES_ID, BillingStep};
pub use payment::{BILL_TO_SHIPPING_ID, CARD_METHOD_CODES, PAYMENT_METHODS_ID, PaymentStep};
pub use shipping::{LOGIN_FORM_ID, SHIPPING_ADDRESS_FORM_ID, SHIPPING_SAVED_ADDRESSES_ID, ShippingStep};
pub use shipping_method::{SHIPPING_METHODS_ID, ShippingMethodStep};

/// One wizard step.
pub enum CheckoutStep {
    Shipping(ShippingStep),
    ShippingMethod(ShippingMethodStep),
    Payment(PaymentStep),
    Billing(BillingStep),
}

impl CheckoutStep {
    pub fn kind(&self) -> StepKind {
        match self {
            CheckoutStep::Shipping(_) => StepKind::Shipping,
            CheckoutStep::ShippingMethod(_) => StepKind::ShippingMethod,
            CheckoutStep::Payment(_) => StepKind::Payment,
            CheckoutStep::Billing(_) => StepKind::Billing,
        }
    }

    fn context(&self) -> &CheckoutContext {
        match self {
            CheckoutStep::Shipping(step) => step.context(),
            CheckoutStep::ShippingMethod(step) => step.context(),
            CheckoutStep::Payment(step) => step.context(),
            CheckoutStep::Billing(step) => step.context(),
        }
    }

    /// Pure completeness predicate over a snapshot.
    pub fn is_complete(&self, snapshot: &CartSnapshot) -> bool {
        match self {
            CheckoutStep::Shipping(step) => step.is_complete(snapshot),
            CheckoutStep::ShippingMethod(step) => step.is_complete(snapshot),
            CheckoutStep::Payment(step) => step.is_complete(snapshot),
            CheckoutStep::Billing(step) => step.is_complete(snapshot),
        }
    }

    /// True when the step is complete without any UI for this snapshot:
    /// shipping method on a virtual cart, billing reusing the shipping
    /// address.
    pub fn is_bypassed(&self, snapshot: &CartSnapshot) -> bool {
        match self {
            CheckoutStep::ShippingMethod(_) => snapshot.is_virtual,
            CheckoutStep::Billing(_) => {
                snapshot.billing_address.is_none() && snapshot.same_as_billing()
            }
            CheckoutStep::Shipping(_) | CheckoutStep::Payment(_) => false,
        }
    }

    /// Reads the step region's active flag.
    pub fn is_active(&self) -> bool {
        self.context().layout.step(self.kind()).root.is_active()
    }

    /// Renders the step's controls and sets its active flag to `active`.
    /// Without a snapshot, the last observed one is used.
    pub async fn display(&self, active: bool, snapshot: Option<&CartSnapshot>) -> Result<()> {
        match self {
            CheckoutStep::Shipping(step) => step.display(active, snapshot).await,
            CheckoutStep::ShippingMethod(step) => step.display(active, snapshot).await,
            CheckoutStep::Payment(step) => step.display(active, snapshot).await,
            CheckoutStep::Billing(step) => step.display(active, snapshot).await,
        }
    }

    /// Shows the committed value read-only and closes the step.
    pub fn display_summary(&self, snapshot: &CartSnapshot) {
        match self {
            CheckoutStep::Shipping(step) => step.display_summary(snapshot),
            CheckoutStep::ShippingMethod(step) => step.display_summary(snapshot),
            CheckoutStep::Payment(step) => step.display_summary(snapshot),
            CheckoutStep::Billing(step) => step.display_summary(snapshot),
        }
    }

    /// Swaps guest address inputs for saved-address selectors, where the
    /// step has any.
    pub async fn remount_for_customer(&self, snapshot: Option<&CartSnapshot>) -> Result<()> {
        match self {
            CheckoutStep::Shipping(step) => step.remount_for_customer(snapshot).await,
            CheckoutStep::Billing(step) => step.remount_for_customer(snapshot).await,
            CheckoutStep::ShippingMethod(_) | CheckoutStep::Payment(_) => Ok(()),
        }
    }

    /// Removes the step's UI, summary and active flag.
    pub fn teardown(&self) {
        let ctx = self.context();
        match self {
            CheckoutStep::Shipping(step) => step.teardown(),
            CheckoutStep::ShippingMethod(step) => step.teardown(),
            CheckoutStep::Payment(step) => step.teardown(),
            CheckoutStep::Billing(step) => step.teardown(),
        }
        ctx.unmount_widget(&continue_button_id(ctx, self.kind()));
        let regions = ctx.layout.step(self.kind());
        regions.summary.clear();
        regions.root.set_active(false);
    }

    /// The step's continue action, run under the overlay spinner.
    ///
    /// An invalid form yields [`StepOutcome::Invalid`] and changes nothing.
    /// Commit and prerequisite failures are logged and returned; the step
    /// stays open. On success a step-completed signal is emitted.
    #[tracing::instrument(skip_all, fields(step = %self.kind()))]
    pub async fn continue_step(&self, sequence: &StepSequence) -> Result<StepOutcome> {
        let ctx = self.context();
        let kind = self.kind();

        let result = ctx
            .spinner
            .run(async {
                match self {
                    CheckoutStep::Shipping(step) => step.continue_step(sequence).await,
                    CheckoutStep::ShippingMethod(step) => step.continue_step(sequence).await,
                    CheckoutStep::Payment(step) => step.continue_step(sequence).await,
                    CheckoutStep::Billing(step) => step.continue_step(sequence).await,
                }
            })
            .await;

        match &result {
            Ok(StepOutcome::Completed) => {
                metrics::counter!("checkout_step_completed_total", "step" => kind.as_str())
                    .increment(1);
                tracing::info!("step completed");
                ctx.emit_step_completed().await;
            }
            Ok(StepOutcome::Invalid) => {
                tracing::warn!("step form is invalid, staying on step");
            }
            Err(e) => {
                metrics::counter!("checkout_step_failures_total", "step" => kind.as_str())
                    .increment(1);
                tracing::error!(error = %e, "step continue failed");
            }
        }

        result
    }
}

/// The steps in flow order.
pub struct StepSequence {
    steps: [CheckoutStep; 4],
}

impl StepSequence {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self {
            steps: [
                CheckoutStep::Shipping(ShippingStep::new(ctx.clone())),
                CheckoutStep::ShippingMethod(ShippingMethodStep::new(ctx.clone())),
                CheckoutStep::Payment(PaymentStep::new(ctx.clone())),
                CheckoutStep::Billing(BillingStep::new(ctx)),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckoutStep> {
        self.steps.iter()
    }

    pub fn get(&self, kind: StepKind) -> &CheckoutStep {
        &self.steps[kind.index()]
    }

    pub fn all_complete(&self, snapshot: &CartSnapshot) -> bool {
        self.steps.iter().all(|step| step.is_complete(snapshot))
    }

    /// Opens the first step after `kind` that is not bypassed for
    /// `snapshot`, returning which one opened.
    pub async fn open_after(
        &self,
        kind: StepKind,
        snapshot: &CartSnapshot,
    ) -> Result<Option<StepKind>> {
        if kind.is_terminal() {
            return Ok(None);
        }
        for step in self.steps.iter().skip(kind.index() + 1) {
            if !step.is_bypassed(snapshot) {
                step.display(true, Some(snapshot)).await?;
                return Ok(Some(step.kind()));
            }
        }
        Ok(None)
    }
}

/// Sets the step's active flag; opening a step closes every other one.
fn set_active(ctx: &CheckoutContext, kind: StepKind, active: bool) {
    if active {
        if !ctx.layout.step(kind).root.is_active() {
            metrics::counter!("checkout_step_opened_total", "step" => kind.as_str()).increment(1);
            tracing::info!(step = %kind, "step opened");
        }
        ctx.layout.activate(kind);
    } else {
        ctx.layout.step(kind).root.set_active(false);
    }
}

fn continue_button_id(ctx: &CheckoutContext, kind: StepKind) -> String {
    format!("{}-continue", ctx.layout.step(kind).root.id())
}

/// Renders the step's continue button, once.
async fn mount_continue_button(ctx: &CheckoutContext, kind: StepKind) -> Result<()> {
    let regions = ctx.layout.step(kind);
    let component = Component::new(ComponentKind::Button)
        .prop("action", "continue")
        .prop("step", kind.as_str());
    ctx.mount_widget(&continue_button_id(ctx, kind), component, &regions.actions)
        .await?;
    Ok(())
}

/// Awaits a commerce call, timing it and tagging failures with the step.
async fn commit<T, F>(kind: StepKind, call: F) -> Result<T>
where
    F: Future<Output = commerce::Result<T>>,
{
    let started = Instant::now();
    let result = call.await;
    metrics::histogram!("checkout_step_commit_duration_seconds", "step" => kind.as_str())
        .record(started.elapsed().as_secs_f64());
    result.map_err(|source| CheckoutError::Commit { step: kind, source })
}

/// What a form cell yielded.
enum FormRead<T> {
    /// A live form validated and parsed.
    Value(T),
    /// A live form exists but failed validation or parsing.
    Invalid,
    /// No form is mounted.
    Absent,
}

/// Validates and parses the live form behind `form_ref`.
fn read_form<T: DeserializeOwned>(kind: StepKind, form_ref: &FormRef) -> FormRead<T> {
    let Some(form) = form_ref.current() else {
        return FormRead::Absent;
    };
    if !form.validate() {
        return FormRead::Invalid;
    }
    match serde_json::from_value(form.values()) {
        Ok(value) => FormRead::Value(value),
        Err(e) => {
            tracing::warn!(step = %kind, error = %e, "form values do not parse");
            FormRead::Invalid
        }
    }
}
