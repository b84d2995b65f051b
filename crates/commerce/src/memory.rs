//! In-memory commerce backend.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{Address, CartSnapshot, OrderResult, PaymentMethod, ShippingMethod};
use event_bus::{CheckoutEvent, EventBus};
use parking_lot::RwLock;

use crate::api::{BillingAddressInput, CommerceApi, Operation};
use crate::error::{CommerceError, Result};

#[derive(Debug, Default)]
struct InMemoryCommerceState {
    cart: Option<CartSnapshot>,
    orders: Vec<OrderResult>,
    calls: Vec<Operation>,
    fail_on: HashSet<Operation>,
    next_order: u32,
}

/// In-memory commerce backend for tests and scripted runs.
///
/// Holds one cart. With a bus attached, every successful mutation is
/// followed by `checkout/updated` carrying the new cart, and a placed order
/// by `order/placed`.
#[derive(Clone, Default)]
pub struct InMemoryCommerceApi {
    state: Arc<RwLock<InMemoryCommerceState>>,
    bus: Option<EventBus>,
}

impl InMemoryCommerceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that broadcasts cart changes on `bus`.
    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            state: Arc::default(),
            bus: Some(bus),
        }
    }

    /// Replaces the current cart without broadcasting.
    pub fn set_cart(&self, cart: CartSnapshot) {
        self.state.write().cart = Some(cart);
    }

    pub fn cart(&self) -> Option<CartSnapshot> {
        self.state.read().cart.clone()
    }

    /// Makes `operation` fail while set.
    pub fn set_fail_on(&self, operation: Operation, fail: bool) {
        let mut state = self.state.write();
        if fail {
            state.fail_on.insert(operation);
        } else {
            state.fail_on.remove(&operation);
        }
    }

    /// Operations attempted so far, including failed ones.
    pub fn calls(&self) -> Vec<Operation> {
        self.state.read().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state
            .read()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn orders(&self) -> Vec<OrderResult> {
        self.state.read().orders.clone()
    }

    /// Records the call, checks the failure switch and applies `mutate`.
    fn mutate<F>(&self, operation: Operation, mutate: F) -> Result<CartSnapshot>
    where
        F: FnOnce(&mut CartSnapshot) -> Result<()>,
    {
        let mut state = self.state.write();
        state.calls.push(operation);

        if state.fail_on.contains(&operation) {
            return Err(CommerceError::Rejected {
                operation,
                reason: "backend configured to fail".to_string(),
            });
        }

        let cart = state.cart.as_mut().ok_or(CommerceError::EmptyCart)?;
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        mutate(cart)?;
        tracing::debug!(%operation, "cart mutated");
        Ok(cart.clone())
    }

    async fn broadcast(&self, event: CheckoutEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event).await;
        }
    }

    async fn commit<F>(&self, operation: Operation, mutate: F) -> Result<CartSnapshot>
    where
        F: FnOnce(&mut CartSnapshot) -> Result<()>,
    {
        let cart = self.mutate(operation, mutate)?;
        self.broadcast(CheckoutEvent::CheckoutUpdated(Some(cart.clone())))
            .await;
        Ok(cart)
    }
}

fn rejected(operation: Operation, reason: &str) -> CommerceError {
    CommerceError::Rejected {
        operation,
        reason: reason.to_string(),
    }
}

#[async_trait]
impl CommerceApi for InMemoryCommerceApi {
    async fn set_guest_email(&self, email: &str) -> Result<CartSnapshot> {
        let email = email.trim().to_string();
        self.commit(Operation::SetGuestEmail, move |cart| {
            if email.is_empty() || !email.contains('@') {
                return Err(rejected(Operation::SetGuestEmail, "invalid email"));
            }
            cart.email = Some(email);
            Ok(())
        })
        .await
    }

    async fn set_shipping_address(&self, address: Address) -> Result<CartSnapshot> {
        self.commit(Operation::SetShippingAddress, move |cart| {
            if cart.is_virtual {
                return Err(rejected(
                    Operation::SetShippingAddress,
                    "virtual carts have no shipping address",
                ));
            }
            let same_as_billing = cart.same_as_billing();
            cart.shipping_addresses = vec![Address {
                same_as_billing,
                ..address
            }];
            Ok(())
        })
        .await
    }

    async fn set_shipping_method(&self, method: ShippingMethod) -> Result<CartSnapshot> {
        self.commit(Operation::SetShippingMethod, move |cart| {
            if cart.shipping_address().is_none() {
                return Err(rejected(
                    Operation::SetShippingMethod,
                    "shipping address must be set first",
                ));
            }
            cart.shipping_method = Some(method);
            Ok(())
        })
        .await
    }

    async fn set_payment_method(&self, method: PaymentMethod) -> Result<CartSnapshot> {
        self.commit(Operation::SetPaymentMethod, move |cart| {
            cart.payment_method = Some(method);
            Ok(())
        })
        .await
    }

    async fn set_billing_address(&self, input: BillingAddressInput) -> Result<CartSnapshot> {
        self.commit(Operation::SetBillingAddress, move |cart| {
            match input {
                BillingAddressInput::SameAsShipping => {
                    let shipping = cart.shipping_addresses.first_mut().ok_or_else(|| {
                        rejected(Operation::SetBillingAddress, "no shipping address to reuse")
                    })?;
                    shipping.same_as_billing = true;
                    cart.billing_address = None;
                }
                BillingAddressInput::Address(address) => {
                    if let Some(shipping) = cart.shipping_addresses.first_mut() {
                        shipping.same_as_billing = false;
                    }
                    cart.billing_address = Some(Address {
                        same_as_billing: false,
                        ..address
                    });
                }
            }
            Ok(())
        })
        .await
    }

    async fn place_order(&self) -> Result<OrderResult> {
        let order = {
            let mut state = self.state.write();
            state.calls.push(Operation::PlaceOrder);

            if state.fail_on.contains(&Operation::PlaceOrder) {
                return Err(rejected(Operation::PlaceOrder, "backend configured to fail"));
            }

            let cart = state.cart.as_ref().ok_or(CommerceError::EmptyCart)?;
            if cart.is_empty() {
                return Err(CommerceError::EmptyCart);
            }
            if cart.email().is_none() {
                return Err(rejected(Operation::PlaceOrder, "email is missing"));
            }
            if !cart.is_virtual
                && (cart.shipping_address().is_none() || cart.shipping_method.is_none())
            {
                return Err(rejected(Operation::PlaceOrder, "shipping is incomplete"));
            }
            if cart.payment_method.is_none() {
                return Err(rejected(Operation::PlaceOrder, "payment method is missing"));
            }
            if cart.billing_address.is_none() && !cart.same_as_billing() {
                return Err(rejected(Operation::PlaceOrder, "billing address is missing"));
            }

            let email = cart.email.clone();
            state.next_order += 1;
            let order = OrderResult {
                order_number: format!("{:09}", state.next_order),
                email,
                placed_at: Utc::now(),
            };
            state.orders.push(order.clone());
            state.cart = None;
            order
        };

        tracing::info!(order_number = %order.order_number, "order placed");
        self.broadcast(CheckoutEvent::OrderPlaced(order.clone())).await;
        Ok(order)
    }
}
