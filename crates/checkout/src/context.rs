//! Per-session services and observed state shared by the steps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use commerce::CommerceApi;
use common::{CartSnapshot, CheckoutValues, SessionId};
use event_bus::{CheckoutEvent, EventBus};
use parking_lot::RwLock;
use ui::{Component, FormRef, Handle, OverlaySpinner, Props, Region, Registry, Renderer, UiError};

use crate::config::CheckoutOptions;
use crate::layout::CheckoutLayout;

/// Container registry id of the place-order button.
pub const PLACE_ORDER_ID: &str = "place-order";
/// Container registry id of the empty-cart notice.
pub const EMPTY_CART_ID: &str = "empty-cart";
/// Container registry id of the order confirmation.
pub const CONFIRMATION_ID: &str = "order-confirmation";

/// Form cells, one per logical input. Each is handed to exactly one live
/// container at a time.
#[derive(Debug, Clone, Default)]
pub struct FormRefs {
    pub login: FormRef,
    pub shipping_address: FormRef,
    pub shipping_methods: FormRef,
    pub payment_methods: FormRef,
    pub credit_card: FormRef,
    pub billing_address: FormRef,
}

impl FormRefs {
    /// Forgets the identity-bound inputs (email and addresses).
    pub fn clear_identity_inputs(&self) {
        self.login.clear();
        self.shipping_address.clear();
        self.billing_address.clear();
    }

    pub fn clear_all(&self) {
        self.clear_identity_inputs();
        self.shipping_methods.clear();
        self.payment_methods.clear();
        self.credit_card.clear();
    }
}

#[derive(Debug, Default)]
struct Observed {
    snapshot: Option<CartSnapshot>,
    values: CheckoutValues,
    authenticated: bool,
}

/// Everything one checkout session shares: the registries, the renderer and
/// backend, the page layout, form cells and the last values seen on the bus.
///
/// Built at session start and dropped at session end; nothing in here is a
/// process-wide singleton.
pub struct CheckoutContext {
    session_id: SessionId,
    pub renderer: Arc<dyn Renderer>,
    pub commerce: Arc<dyn CommerceApi>,
    pub bus: EventBus,
    pub components: Arc<Registry>,
    pub containers: Arc<Registry>,
    pub spinner: OverlaySpinner,
    pub layout: CheckoutLayout,
    pub forms: FormRefs,
    pub options: CheckoutOptions,
    observed: RwLock<Observed>,
    place_order_enabled: AtomicBool,
}

impl CheckoutContext {
    pub fn new(
        session_id: SessionId,
        renderer: Arc<dyn Renderer>,
        commerce: Arc<dyn CommerceApi>,
        bus: EventBus,
        options: CheckoutOptions,
    ) -> Self {
        let layout = CheckoutLayout::new();
        let components = Arc::new(Registry::components());
        let spinner = OverlaySpinner::new(
            renderer.clone(),
            components.clone(),
            layout.overlay.clone(),
        );
        Self {
            session_id,
            renderer,
            commerce,
            bus,
            components,
            containers: Arc::new(Registry::containers()),
            spinner,
            layout,
            forms: FormRefs::default(),
            options,
            observed: RwLock::new(Observed::default()),
            place_order_enabled: AtomicBool::new(false),
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Mounts a container once per id.
    pub async fn mount(
        &self,
        id: &str,
        component: Component,
        region: &Region,
    ) -> Result<Handle, UiError> {
        self.containers
            .get_or_render(id, || self.renderer.render(component, region))
            .await
    }

    /// Mounts a container, or pushes fresh props into the live one.
    pub async fn mount_or_update(
        &self,
        id: &str,
        component: Component,
        region: &Region,
    ) -> Result<(), UiError> {
        if !self.containers.update_props(id, component.props.clone()) {
            self.mount(id, component, region).await?;
        }
        Ok(())
    }

    /// Mounts a leaf widget once per id.
    pub async fn mount_widget(
        &self,
        id: &str,
        component: Component,
        region: &Region,
    ) -> Result<Handle, UiError> {
        self.components
            .get_or_render(id, || self.renderer.render(component, region))
            .await
    }

    pub fn unmount(&self, id: &str) -> bool {
        self.containers.unmount(id)
    }

    pub fn unmount_widget(&self, id: &str) -> bool {
        self.components.unmount(id)
    }

    pub fn snapshot(&self) -> Option<CartSnapshot> {
        self.observed.read().snapshot.clone()
    }

    pub fn set_snapshot(&self, snapshot: Option<CartSnapshot>) {
        self.observed.write().snapshot = snapshot;
    }

    pub fn values(&self) -> CheckoutValues {
        self.observed.read().values.clone()
    }

    pub fn set_values(&self, values: CheckoutValues) {
        self.observed.write().values = values;
    }

    pub fn is_authenticated(&self) -> bool {
        self.observed.read().authenticated
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.observed.write().authenticated = authenticated;
    }

    /// Whether "billing same as shipping" is ticked for this cart.
    pub fn bill_to_shipping(&self, snapshot: &CartSnapshot) -> bool {
        !snapshot.is_virtual
            && self
                .values()
                .is_bill_to_shipping_address
                .unwrap_or(self.options.bill_to_shipping_default)
    }

    pub fn place_order_enabled(&self) -> bool {
        self.place_order_enabled.load(Ordering::SeqCst)
    }

    /// Flips the place-order button. The props update is dropped if the
    /// button is not mounted.
    pub fn set_place_order_enabled(&self, enabled: bool) {
        let previous = self.place_order_enabled.swap(enabled, Ordering::SeqCst);
        let mut patch = Props::new();
        patch.insert("disabled".to_string(), (!enabled).into());
        self.containers.update_props(PLACE_ORDER_ID, patch);
        if previous != enabled {
            tracing::debug!(session = %self.session_id, enabled, "place order toggled");
        }
    }

    /// Signals that a step finished its commit.
    pub async fn emit_step_completed(&self) {
        self.bus.publish(CheckoutEvent::StepCompleted).await;
    }
}
