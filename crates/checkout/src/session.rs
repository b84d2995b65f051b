//! One checkout session: event wiring and user actions.

use std::sync::Arc;

use async_trait::async_trait;
use commerce::CommerceApi;
use common::{OrderResult, SessionId};
use event_bus::{CheckoutEvent, EventBus, EventHandler, SubscribeOptions, SubscriptionId, Topic};
use ui::{Component, ComponentKind, Renderer};

use crate::config::CheckoutOptions;
use crate::context::{CheckoutContext, PLACE_ORDER_ID};
use crate::error::Result;
use crate::flow::FlowController;
use crate::step::{StepKind, StepOutcome};
use crate::view::CheckoutView;

/// Topics the session listens on, with whether the last value is replayed
/// at subscribe time.
const SUBSCRIPTIONS: [(Topic, bool); 7] = [
    (Topic::Authenticated, true),
    (Topic::CartInitialized, true),
    (Topic::CheckoutInitialized, true),
    (Topic::CheckoutUpdated, false),
    (Topic::CheckoutValues, true),
    (Topic::OrderPlaced, false),
    (Topic::StepCompleted, false),
];

/// Routes bus events into the flow controller.
///
/// Handlers cannot fail on the bus, so errors are logged here and the page
/// stays in whatever re-enterable state the failing call left it.
struct FlowSubscriber {
    controller: Arc<FlowController>,
}

#[async_trait]
impl EventHandler for FlowSubscriber {
    async fn handle(&self, event: &CheckoutEvent) {
        let controller = &self.controller;
        let result = match event {
            CheckoutEvent::Authenticated(authenticated) => {
                controller.handle_authenticated(*authenticated).await
            }
            CheckoutEvent::CartInitialized(snapshot) => {
                controller.handle_cart_update(snapshot.as_ref()).await
            }
            CheckoutEvent::CheckoutInitialized(snapshot)
            | CheckoutEvent::CheckoutUpdated(snapshot) => {
                controller.handle_checkout_update(snapshot.clone()).await
            }
            CheckoutEvent::CheckoutValues(values) => {
                controller.handle_values(values.clone());
                Ok(())
            }
            CheckoutEvent::OrderPlaced(order) => controller.handle_order_placed(order).await,
            CheckoutEvent::StepCompleted => {
                controller.on_step_completed();
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::error!(topic = %event.topic(), error = %e, "checkout event handling failed");
        }
    }
}

/// A running checkout on one page.
///
/// Owns its registries, form cells and bus subscriptions; nothing outlives
/// [`CheckoutSession::end`].
pub struct CheckoutSession {
    controller: Arc<FlowController>,
    subscriptions: Vec<SubscriptionId>,
}

impl CheckoutSession {
    /// Builds the session context, renders the disabled place-order button
    /// and subscribes to the checkout topics. Data already on the bus is
    /// replayed into the flow before this returns.
    #[tracing::instrument(skip_all)]
    pub async fn start(
        renderer: Arc<dyn Renderer>,
        commerce: Arc<dyn CommerceApi>,
        bus: EventBus,
        options: CheckoutOptions,
    ) -> Result<Self> {
        let ctx = Arc::new(CheckoutContext::new(
            SessionId::new(),
            renderer,
            commerce,
            bus.clone(),
            options,
        ));
        ctx.mount(
            PLACE_ORDER_ID,
            Component::new(ComponentKind::PlaceOrder).prop("disabled", true),
            &ctx.layout.place_order,
        )
        .await?;

        let controller = Arc::new(FlowController::new(ctx.clone()));
        let handler: Arc<dyn EventHandler> = Arc::new(FlowSubscriber {
            controller: controller.clone(),
        });

        let mut subscriptions = Vec::with_capacity(SUBSCRIPTIONS.len());
        for (topic, eager) in SUBSCRIPTIONS {
            let options = if eager {
                SubscribeOptions::eager()
            } else {
                SubscribeOptions::lazy()
            };
            subscriptions.push(bus.subscribe(topic, handler.clone(), options).await);
        }

        tracing::info!(session = %ctx.session_id(), "checkout session started");
        Ok(Self {
            controller,
            subscriptions,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.controller.context().session_id()
    }

    pub fn context(&self) -> &Arc<CheckoutContext> {
        self.controller.context()
    }

    pub fn controller(&self) -> &FlowController {
        &self.controller
    }

    /// Runs a step's continue action.
    pub async fn continue_step(&self, kind: StepKind) -> Result<StepOutcome> {
        self.controller.continue_step(kind).await
    }

    /// Follows a summary's edit link.
    pub async fn edit_step(&self, kind: StepKind) -> Result<()> {
        self.controller.edit_step(kind).await
    }

    pub async fn place_order(&self) -> Result<OrderResult> {
        self.controller.place_order().await
    }

    pub fn view(&self) -> CheckoutView {
        CheckoutView::capture(self.context())
    }

    /// Unsubscribes and unmounts everything the session rendered.
    #[tracing::instrument(skip_all, fields(session = %self.session_id()))]
    pub fn end(self) {
        let ctx = self.controller.context();
        for id in self.subscriptions {
            ctx.bus.unsubscribe(id);
        }
        ctx.containers.clear();
        ctx.components.clear();
        ctx.forms.clear_all();
        tracing::info!("checkout session ended");
    }
}
