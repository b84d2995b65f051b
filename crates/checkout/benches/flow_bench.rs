use std::sync::Arc;

use checkout::{CheckoutOptions, CheckoutSession, FlowController};
use commerce::InMemoryCommerceApi;
use common::{Address, CartItem, CartSnapshot, PaymentMethod, SessionId, ShippingMethod};
use criterion::{Criterion, criterion_group, criterion_main};
use event_bus::{CheckoutEvent, EventBus};
use ui::{InMemoryRenderer, Registry};

fn complete_cart() -> CartSnapshot {
    CartSnapshot {
        email: Some("a@b.com".to_string()),
        items: vec![CartItem::new("SKU-001", "Widget", 2)],
        shipping_addresses: vec![Address {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            street: vec!["12 Analytical Row".to_string()],
            city: "London".to_string(),
            postcode: "N1 9GU".to_string(),
            country_code: "GB".to_string(),
            same_as_billing: true,
            ..Default::default()
        }],
        shipping_method: Some(ShippingMethod::new("flatrate", "flatrate")),
        payment_method: Some(PaymentMethod::new("checkmo")),
        ..Default::default()
    }
}

fn controller() -> FlowController {
    let ctx = checkout::CheckoutContext::new(
        SessionId::new(),
        Arc::new(InMemoryRenderer::new()),
        Arc::new(InMemoryCommerceApi::new()),
        EventBus::new(),
        CheckoutOptions::default(),
    );
    FlowController::new(Arc::new(ctx))
}

/// Walk over a complete cart with every container already mounted.
fn bench_flow_walk_warm(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let flow = controller();
    let cart = complete_cart();
    rt.block_on(flow.handle_checkout_flow(&cart)).unwrap();

    c.bench_function("checkout/flow_walk_warm", |b| {
        b.iter(|| {
            rt.block_on(flow.handle_checkout_flow(&cart)).unwrap();
        });
    });
}

/// Session start plus the first walk, rendering everything from scratch.
fn bench_session_start_and_walk(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cart = complete_cart();

    c.bench_function("checkout/session_start_and_walk", |b| {
        b.iter(|| {
            rt.block_on(async {
                let bus = EventBus::new();
                let session = CheckoutSession::start(
                    Arc::new(InMemoryRenderer::new()),
                    Arc::new(InMemoryCommerceApi::new()),
                    bus.clone(),
                    CheckoutOptions::default(),
                )
                .await
                .unwrap();
                bus.publish(CheckoutEvent::CheckoutInitialized(Some(cart.clone())))
                    .await;
                session.end();
            });
        });
    });
}

fn bench_registry_hit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let renderer = InMemoryRenderer::new();
    let registry = Registry::containers();
    let region = ui::Region::new("bench");
    let component = || ui::Component::new(ui::ComponentKind::Button);
    rt.block_on(registry.get_or_render("bench-button", || {
        ui::Renderer::render(&renderer, component(), &region)
    }))
    .unwrap();

    c.bench_function("checkout/registry_hit", |b| {
        b.iter(|| {
            rt.block_on(registry.get_or_render("bench-button", || {
                ui::Renderer::render(&renderer, component(), &region)
            }))
            .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_flow_walk_warm,
    bench_session_start_and_walk,
    bench_registry_hit
);
criterion_main!(benches);
