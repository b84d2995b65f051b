//! Payment step: payment method selection and the bill-to-shipping choice.

use std::sync::Arc;

use commerce::BillingAddressInput;
use common::{CartSnapshot, PaymentMethod};
use ui::{Component, ComponentKind, Summary};

use super::{FormRead, StepSequence, commit, mount_continue_button, read_form, set_active};
use crate::context::CheckoutContext;
use crate::error::{CheckoutError, Result};
use crate::step::{StepKind, StepOutcome};

pub const PAYMENT_METHODS_ID: &str = "payment-methods";
pub const BILL_TO_SHIPPING_ID: &str = "payment-bill-to-shipping";

/// Methods whose card details live in a separate hosted-fields form.
pub const CARD_METHOD_CODES: [&str; 2] = ["braintree", "payment_services_paypal_hosted_fields"];

const KIND: StepKind = StepKind::Payment;

pub struct PaymentStep {
    ctx: Arc<CheckoutContext>,
}

impl PaymentStep {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self { ctx }
    }

    pub(super) fn context(&self) -> &CheckoutContext {
        &self.ctx
    }

    pub fn is_complete(&self, snapshot: &CartSnapshot) -> bool {
        snapshot.payment_method.is_some()
    }

    pub async fn display(&self, active: bool, snapshot: Option<&CartSnapshot>) -> Result<()> {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.ctx.snapshot().unwrap_or_default(),
        };
        let content = &self.ctx.layout.payment.content;

        let methods = Component::new(ComponentKind::PaymentMethods)
            .prop(
                "methods",
                serde_json::to_value(&snapshot.available_payment_methods)?,
            )
            .prop("selected", serde_json::to_value(&snapshot.payment_method)?)
            .form_ref(self.ctx.forms.payment_methods.clone());
        self.ctx
            .mount_or_update(PAYMENT_METHODS_ID, methods, content)
            .await?;

        // Nothing ships on a virtual cart, so there is no address to reuse.
        if snapshot.is_virtual {
            self.ctx.unmount(BILL_TO_SHIPPING_ID);
        } else {
            let checkbox = Component::new(ComponentKind::BillToShipping)
                .prop("checked", self.ctx.bill_to_shipping(&snapshot));
            self.ctx
                .mount_or_update(BILL_TO_SHIPPING_ID, checkbox, content)
                .await?;
        }

        mount_continue_button(&self.ctx, KIND).await?;
        set_active(&self.ctx, KIND, active);
        Ok(())
    }

    pub fn display_summary(&self, snapshot: &CartSnapshot) {
        let regions = &self.ctx.layout.payment;
        match &snapshot.payment_method {
            Some(method) => regions
                .summary
                .set_summary(Summary::editable(vec![method.label().to_string()])),
            None => regions.summary.clear(),
        }
        regions.root.set_active(false);
    }

    pub fn teardown(&self) {
        self.ctx.unmount(PAYMENT_METHODS_ID);
        self.ctx.unmount(BILL_TO_SHIPPING_ID);
        self.ctx.forms.payment_methods.clear();
    }

    /// Card methods also need their hosted card form to be present and valid.
    fn card_form_outcome(&self, method: &PaymentMethod) -> Result<Option<StepOutcome>> {
        if !CARD_METHOD_CODES.contains(&method.code.as_str()) {
            return Ok(None);
        }
        match self.ctx.forms.credit_card.current() {
            None => Err(CheckoutError::MissingPrerequisite {
                step: KIND,
                what: format!("credit card form for '{}'", method.code),
            }),
            Some(form) if !form.validate() => Ok(Some(StepOutcome::Invalid)),
            Some(_) => Ok(None),
        }
    }

    pub async fn continue_step(&self, sequence: &StepSequence) -> Result<StepOutcome> {
        let method = match read_form::<PaymentMethod>(KIND, &self.ctx.forms.payment_methods) {
            FormRead::Value(method) => method,
            FormRead::Invalid => return Ok(StepOutcome::Invalid),
            FormRead::Absent => match self.ctx.values().selected_payment_method {
                Some(method) => method,
                None => return Ok(StepOutcome::Invalid),
            },
        };
        if let Some(outcome) = self.card_form_outcome(&method)? {
            return Ok(outcome);
        }

        let mut committed = commit(KIND, self.ctx.commerce.set_payment_method(method)).await?;
        // Both commits land before payment closes, so a failed billing
        // commit leaves payment open for a retry.
        let bill_to_shipping = self.ctx.bill_to_shipping(&committed);
        if bill_to_shipping {
            committed = commit(
                KIND,
                self.ctx
                    .commerce
                    .set_billing_address(BillingAddressInput::SameAsShipping),
            )
            .await?;
        }
        self.display(false, Some(&committed)).await?;
        self.display_summary(&committed);

        let billing = sequence.get(StepKind::Billing);
        if bill_to_shipping {
            billing.display_summary(&committed);
        } else {
            billing.display(true, Some(&committed)).await?;
        }
        Ok(StepOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckoutOptions;
    use commerce::InMemoryCommerceApi;
    use common::{CartItem, CheckoutValues, SessionId};
    use event_bus::EventBus;
    use ui::InMemoryRenderer;

    fn step() -> (PaymentStep, InMemoryRenderer) {
        let renderer = InMemoryRenderer::new();
        let ctx = Arc::new(CheckoutContext::new(
            SessionId::new(),
            Arc::new(renderer.clone()),
            Arc::new(InMemoryCommerceApi::new()),
            EventBus::new(),
            CheckoutOptions::default(),
        ));
        (PaymentStep::new(ctx), renderer)
    }

    fn cart() -> CartSnapshot {
        CartSnapshot {
            items: vec![CartItem::new("SKU-001", "Widget", 1)],
            available_payment_methods: vec![
                PaymentMethod::new("checkmo").with_title("Check / Money order"),
                PaymentMethod::new("braintree"),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bill_to_shipping_checkbox_only_for_physical_carts() {
        let (step, renderer) = step();
        step.display(true, Some(&cart())).await.unwrap();
        let live = renderer.live(ComponentKind::BillToShipping);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].props()["checked"], true);

        let digital = CartSnapshot {
            is_virtual: true,
            ..cart()
        };
        step.display(true, Some(&digital)).await.unwrap();
        assert!(renderer.live(ComponentKind::BillToShipping).is_empty());
    }

    #[tokio::test]
    async fn test_checkbox_follows_live_values() {
        let (step, renderer) = step();
        step.context().set_values(CheckoutValues {
            is_bill_to_shipping_address: Some(false),
            ..Default::default()
        });

        step.display(false, Some(&cart())).await.unwrap();

        let live = renderer.live(ComponentKind::BillToShipping);
        assert_eq!(live[0].props()["checked"], false);
    }

    #[test]
    fn test_card_method_without_card_form_is_missing_prerequisite() {
        let (step, _) = step();
        let err = step
            .card_form_outcome(&PaymentMethod::new("braintree"))
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::MissingPrerequisite {
                step: StepKind::Payment,
                ..
            }
        ));

        let outcome = step
            .card_form_outcome(&PaymentMethod::new("checkmo"))
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_summary_uses_method_title() {
        let (step, _) = step();
        let snapshot = CartSnapshot {
            payment_method: Some(PaymentMethod::new("checkmo").with_title("Check / Money order")),
            ..cart()
        };

        step.display_summary(&snapshot);

        let summary = step.context().layout.payment.summary.summary().unwrap();
        assert_eq!(summary.lines, vec!["Check / Money order".to_string()]);
    }
}
