//! Property tests over arbitrary snapshots and edit sequences.

mod support;

use checkout::{CheckoutSession, StepKind};
use common::{Address, CartSnapshot, PaymentMethod, ShippingMethod};
use event_bus::CheckoutEvent;
use proptest::prelude::*;
use support::{TestHarness, address, billing_address, physical_cart};

#[derive(Debug, Clone)]
struct SnapshotShape {
    is_virtual: bool,
    email: bool,
    shipping_address: bool,
    same_as_billing: bool,
    shipping_method: bool,
    payment_method: bool,
    billing_address: bool,
}

fn shapes() -> impl Strategy<Value = SnapshotShape> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(
                is_virtual,
                email,
                shipping_address,
                same_as_billing,
                shipping_method,
                payment_method,
                billing_address,
            )| SnapshotShape {
                is_virtual,
                email,
                shipping_address,
                same_as_billing,
                shipping_method,
                payment_method,
                billing_address,
            },
        )
}

fn snapshot(shape: &SnapshotShape) -> CartSnapshot {
    let mut snapshot = CartSnapshot {
        is_virtual: shape.is_virtual,
        ..physical_cart()
    };
    if shape.email {
        snapshot.email = Some("a@b.com".to_string());
    }
    if shape.shipping_address && !shape.is_virtual {
        snapshot.shipping_addresses = vec![Address {
            same_as_billing: shape.same_as_billing,
            ..address()
        }];
    }
    if shape.shipping_method && !shape.is_virtual {
        snapshot.shipping_method = Some(ShippingMethod::new("flatrate", "flatrate"));
    }
    if shape.payment_method {
        snapshot.payment_method = Some(PaymentMethod::new("checkmo"));
    }
    if shape.billing_address {
        snapshot.billing_address = Some(billing_address());
    }
    snapshot
}

fn kinds() -> impl Strategy<Value = StepKind> {
    prop::sample::select(StepKind::ALL.to_vec())
}

fn active_count(session: &CheckoutSession) -> usize {
    session
        .view()
        .steps
        .iter()
        .filter(|step| step.active)
        .count()
}

proptest! {
    #[test]
    fn at_most_one_step_is_active(
        shape in shapes(),
        edits in prop::collection::vec(kinds(), 0..6),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let cart = snapshot(&shape);
            let h = TestHarness::new(cart.clone()).await;
            h.initialize().await;
            prop_assert!(active_count(&h.session) <= 1);

            let complete = h.session.controller().steps().all_complete(&cart);
            prop_assert_eq!(h.session.view().place_order_enabled, complete);

            for kind in edits {
                h.session.edit_step(kind).await.unwrap();
                prop_assert_eq!(active_count(&h.session), 1);
                prop_assert_eq!(h.session.view().active_step(), Some(kind));

                h.publish(CheckoutEvent::CheckoutUpdated(Some(cart.clone()))).await;
                prop_assert!(active_count(&h.session) <= 1);
            }
            Ok(())
        })?;
    }

    #[test]
    fn virtual_carts_never_need_a_shipping_method(email in any::<bool>()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(async {
            let cart = snapshot(&SnapshotShape {
                is_virtual: true,
                email,
                shipping_address: false,
                same_as_billing: false,
                shipping_method: false,
                payment_method: false,
                billing_address: false,
            });
            let h = TestHarness::new(cart.clone()).await;
            let steps = h.session.controller().steps();
            prop_assert!(steps.get(StepKind::ShippingMethod).is_complete(&cart));
            prop_assert_eq!(steps.get(StepKind::Shipping).is_complete(&cart), email);
            Ok(())
        })?;
    }
}
