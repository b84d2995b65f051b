//! The reconciliation loop that decides which step is open.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{CartSnapshot, CheckoutValues, OrderResult};
use ui::{Component, ComponentKind};

use crate::context::{CONFIRMATION_ID, CheckoutContext, EMPTY_CART_ID, PLACE_ORDER_ID};
use crate::error::{CheckoutError, Result};
use crate::step::{StepKind, StepOutcome};
use crate::steps::StepSequence;

/// Drives the step sequence from domain events and user actions.
///
/// There are two independent completeness checks. The flow walk enables
/// order placement when it finds every step complete, and the
/// step-completed handler does the same check again. The second one fires
/// even when the walk was skipped by the in-progress guard, so completion is
/// never missed because of event ordering.
pub struct FlowController {
    ctx: Arc<CheckoutContext>,
    steps: StepSequence,
    /// Set once the initial walk has opened a step; cleared by empty cart,
    /// order placement and failed walks.
    in_progress: AtomicBool,
    /// Set once guest address inputs were swapped for saved-address
    /// selectors; cleared on logout.
    customer_inputs: AtomicBool,
}

impl FlowController {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self {
            steps: StepSequence::new(ctx.clone()),
            ctx,
            in_progress: AtomicBool::new(false),
            customer_inputs: AtomicBool::new(false),
        }
    }

    pub fn context(&self) -> &Arc<CheckoutContext> {
        &self.ctx
    }

    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Opens the first incomplete step and summarises the ones before it.
    /// Enables order placement when every step is complete.
    #[tracing::instrument(skip_all, fields(session = %self.ctx.session_id()))]
    pub async fn handle_checkout_flow(&self, snapshot: &CartSnapshot) -> Result<()> {
        self.ctx.set_place_order_enabled(false);

        for step in self.steps.iter() {
            if !step.is_complete(snapshot) {
                step.display(true, Some(snapshot)).await?;
                tracing::debug!(step = %step.kind(), "flow walk stopped at incomplete step");
                return Ok(());
            }
            if !step.is_bypassed(snapshot) {
                step.display(false, Some(snapshot)).await?;
            }
            step.display_summary(snapshot);
        }

        self.ctx.set_place_order_enabled(true);
        Ok(())
    }

    /// Reconciles the page with a fresh checkout snapshot.
    #[tracing::instrument(skip_all, fields(session = %self.ctx.session_id()))]
    pub async fn handle_checkout_update(&self, snapshot: Option<CartSnapshot>) -> Result<()> {
        self.ctx.set_snapshot(snapshot.clone());

        let Some(snapshot) = snapshot.filter(|snapshot| !snapshot.is_empty()) else {
            return self.show_empty_cart().await;
        };
        self.hide_empty_cart();
        self.ctx
            .layout
            .shipping_method
            .root
            .set_hidden(snapshot.is_virtual);

        if self.ctx.is_authenticated() {
            self.sync_identity(Some(&snapshot)).await?;
        }

        if self.in_progress.swap(true, Ordering::SeqCst) {
            tracing::debug!("flow already in progress, leaving transition to the open step");
            return Ok(());
        }
        if let Err(e) = self.handle_checkout_flow(&snapshot).await {
            self.in_progress.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    /// `cart/initialized` only decides between the empty-cart notice and
    /// the checkout page; the checkout snapshot drives the steps.
    pub async fn handle_cart_update(&self, snapshot: Option<&CartSnapshot>) -> Result<()> {
        match snapshot {
            Some(snapshot) if !snapshot.is_empty() => {
                self.hide_empty_cart();
                Ok(())
            }
            _ => self.show_empty_cart().await,
        }
    }

    #[tracing::instrument(skip(self), fields(session = %self.ctx.session_id()))]
    pub async fn handle_authenticated(&self, authenticated: bool) -> Result<()> {
        self.ctx.set_authenticated(authenticated);
        if authenticated {
            let snapshot = self.ctx.snapshot();
            self.sync_identity(snapshot.as_ref()).await
        } else {
            self.customer_inputs.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    pub fn handle_values(&self, values: CheckoutValues) {
        self.ctx.set_values(values);
    }

    /// Replaces guest inputs with saved-address selectors, once per sign-in.
    /// The step stays where it was.
    async fn sync_identity(&self, snapshot: Option<&CartSnapshot>) -> Result<()> {
        if self
            .customer_inputs
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        tracing::info!("customer signed in, remounting address inputs");
        // Clear first so nothing reads a form that is about to go away.
        self.ctx.forms.clear_identity_inputs();
        for step in self.steps.iter() {
            if let Err(e) = step.remount_for_customer(snapshot).await {
                self.customer_inputs.store(false, Ordering::SeqCst);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Second completeness check, run on every step-completed signal.
    pub fn on_step_completed(&self) {
        let Some(snapshot) = self.ctx.snapshot() else {
            return;
        };
        if self.steps.all_complete(&snapshot) {
            tracing::info!("all steps complete, enabling place order");
            self.ctx.set_place_order_enabled(true);
        }
    }

    /// Re-opens a step for editing. Downstream completeness is no longer
    /// trusted, so order placement is disabled until it is re-established.
    #[tracing::instrument(skip(self), fields(session = %self.ctx.session_id()))]
    pub async fn edit_step(&self, kind: StepKind) -> Result<()> {
        self.ctx.set_place_order_enabled(false);
        self.steps.get(kind).display(true, None).await
    }

    pub async fn continue_step(&self, kind: StepKind) -> Result<StepOutcome> {
        self.steps.get(kind).continue_step(&self.steps).await
    }

    /// Places the order under the overlay spinner.
    #[tracing::instrument(skip(self), fields(session = %self.ctx.session_id()))]
    pub async fn place_order(&self) -> Result<OrderResult> {
        if !self.ctx.place_order_enabled() {
            tracing::warn!("place order requested while disabled");
            return Err(CheckoutError::PlaceOrderDisabled);
        }

        let commerce = self.ctx.commerce.clone();
        let result = self
            .ctx
            .spinner
            .run(async move { commerce.place_order().await.map_err(CheckoutError::PlaceOrder) })
            .await;

        match &result {
            Ok(order) => {
                metrics::counter!("checkout_orders_placed_total").increment(1);
                tracing::info!(order_number = %order.order_number, "order placed");
            }
            Err(e) => tracing::error!(error = %e, "place order failed"),
        }
        result
    }

    /// Replaces the checkout with the order confirmation.
    #[tracing::instrument(skip_all, fields(order_number = %order.order_number))]
    pub async fn handle_order_placed(&self, order: &OrderResult) -> Result<()> {
        self.teardown_steps();
        self.ctx.forms.clear_all();
        self.in_progress.store(false, Ordering::SeqCst);
        self.ctx.set_place_order_enabled(false);
        self.ctx.unmount(PLACE_ORDER_ID);

        let confirmation = Component::new(ComponentKind::OrderConfirmation)
            .prop("orderNumber", order.order_number.as_str())
            .prop("email", serde_json::to_value(&order.email)?);
        self.ctx
            .mount(CONFIRMATION_ID, confirmation, &self.ctx.layout.confirmation)
            .await?;
        self.ctx.layout.main.set_hidden(true);
        Ok(())
    }

    /// Shows the empty-cart notice and drops all step UI, so a later cart
    /// starts from a clean page.
    pub async fn show_empty_cart(&self) -> Result<()> {
        self.in_progress.store(false, Ordering::SeqCst);
        self.ctx.set_place_order_enabled(false);
        self.teardown_steps();

        self.ctx
            .mount(
                EMPTY_CART_ID,
                Component::new(ComponentKind::EmptyCart),
                &self.ctx.layout.empty_cart,
            )
            .await?;
        self.ctx.layout.empty_cart.set_hidden(false);
        self.ctx.layout.main.set_hidden(true);
        tracing::info!("cart is empty");
        Ok(())
    }

    pub fn hide_empty_cart(&self) {
        self.ctx.unmount(EMPTY_CART_ID);
        self.ctx.layout.empty_cart.set_hidden(true);
        self.ctx.layout.main.set_hidden(false);
    }

    fn teardown_steps(&self) {
        for step in self.steps.iter() {
            step.teardown();
        }
    }
}
