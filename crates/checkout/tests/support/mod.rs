//! Shared harness for checkout integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use checkout::{CheckoutOptions, CheckoutSession, StepKind, StepOutcome};
use commerce::InMemoryCommerceApi;
use common::{Address, CartItem, CartSnapshot, PaymentMethod, ShippingMethod};
use event_bus::{CheckoutEvent, EventBus};
use serde_json::{Value, json};
use ui::{ComponentKind, InMemoryRenderer};

/// A session wired to in-memory renderer and backend on one bus.
pub struct TestHarness {
    pub bus: EventBus,
    pub renderer: InMemoryRenderer,
    pub commerce: InMemoryCommerceApi,
    pub session: CheckoutSession,
}

impl TestHarness {
    /// Starts a session with `cart` loaded in the backend but not yet
    /// published.
    pub async fn new(cart: CartSnapshot) -> Self {
        Self::with_options(cart, CheckoutOptions::default()).await
    }

    pub async fn with_options(cart: CartSnapshot, options: CheckoutOptions) -> Self {
        let bus = EventBus::new();
        let renderer = InMemoryRenderer::new();
        let commerce = InMemoryCommerceApi::with_bus(bus.clone());
        commerce.set_cart(cart);

        let session = CheckoutSession::start(
            Arc::new(renderer.clone()),
            Arc::new(commerce.clone()),
            bus.clone(),
            options,
        )
        .await
        .expect("session starts");

        Self {
            bus,
            renderer,
            commerce,
            session,
        }
    }

    /// Publishes the backend's cart as `checkout/initialized`.
    pub async fn initialize(&self) {
        self.bus
            .publish(CheckoutEvent::CheckoutInitialized(self.commerce.cart()))
            .await;
    }

    pub async fn publish(&self, event: CheckoutEvent) {
        self.bus.publish(event).await;
    }

    /// Fills the most recently mounted form of `kind`.
    pub fn fill(&self, kind: ComponentKind, values: Value) {
        self.renderer
            .form(kind)
            .unwrap_or_else(|| panic!("no {kind} form mounted"))
            .fill(values);
    }

    pub async fn continue_step(&self, kind: StepKind) -> StepOutcome {
        self.session
            .continue_step(kind)
            .await
            .unwrap_or_else(|e| panic!("continue {kind} failed: {e}"))
    }

    pub async fn complete_shipping(&self) {
        self.fill(ComponentKind::LoginForm, json!({ "email": "a@b.com" }));
        self.fill(
            ComponentKind::AddressForm,
            serde_json::to_value(address()).unwrap(),
        );
        assert_eq!(
            self.continue_step(StepKind::Shipping).await,
            StepOutcome::Completed
        );
    }

    pub async fn complete_shipping_method(&self) {
        self.fill(
            ComponentKind::ShippingMethods,
            json!({ "carrierCode": "flatrate", "methodCode": "flatrate" }),
        );
        assert_eq!(
            self.continue_step(StepKind::ShippingMethod).await,
            StepOutcome::Completed
        );
    }

    pub async fn complete_payment(&self, code: &str) {
        self.fill(ComponentKind::PaymentMethods, json!({ "code": code }));
        assert_eq!(
            self.continue_step(StepKind::Payment).await,
            StepOutcome::Completed
        );
    }

    pub fn place_order_disabled_prop(&self) -> Value {
        self.renderer.live(ComponentKind::PlaceOrder)[0].props()["disabled"].clone()
    }
}

pub fn address() -> Address {
    Address {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        street: vec!["12 Analytical Row".to_string()],
        city: "London".to_string(),
        postcode: "N1 9GU".to_string(),
        country_code: "GB".to_string(),
        ..Default::default()
    }
}

pub fn billing_address() -> Address {
    Address {
        firstname: "Charles".to_string(),
        lastname: "Babbage".to_string(),
        street: vec!["1 Difference Lane".to_string()],
        city: "Cambridge".to_string(),
        postcode: "CB2 1TN".to_string(),
        country_code: "GB".to_string(),
        ..Default::default()
    }
}

/// A physical cart with nothing committed.
pub fn physical_cart() -> CartSnapshot {
    CartSnapshot {
        id: Some("cart-1".to_string()),
        items: vec![CartItem::new("SKU-001", "Widget", 2)],
        available_shipping_methods: vec![
            ShippingMethod::new("flatrate", "flatrate").with_title("Flat Rate"),
            ShippingMethod::new("ups", "ground").with_title("UPS Ground"),
        ],
        available_payment_methods: vec![
            PaymentMethod::new("checkmo").with_title("Check / Money order"),
            PaymentMethod::new("braintree").with_title("Credit Card"),
        ],
        ..Default::default()
    }
}

pub fn virtual_cart() -> CartSnapshot {
    CartSnapshot {
        is_virtual: true,
        items: vec![CartItem::new("GIFT-50", "Gift card", 1)],
        available_shipping_methods: Vec::new(),
        ..physical_cart()
    }
}

/// A physical cart with every step committed, billing reusing shipping.
pub fn complete_cart() -> CartSnapshot {
    CartSnapshot {
        email: Some("a@b.com".to_string()),
        shipping_addresses: vec![Address {
            same_as_billing: true,
            ..address()
        }],
        shipping_method: Some(ShippingMethod::new("flatrate", "flatrate").with_title("Flat Rate")),
        payment_method: Some(PaymentMethod::new("checkmo").with_title("Check / Money order")),
        ..physical_cart()
    }
}
