//! Shipping method step: carrier and rate selection.

use std::sync::Arc;

use common::{CartSnapshot, ShippingMethod};
use ui::{Component, ComponentKind, Summary};

use super::{FormRead, StepSequence, commit, mount_continue_button, read_form, set_active};
use crate::context::CheckoutContext;
use crate::error::Result;
use crate::step::{StepKind, StepOutcome};

pub const SHIPPING_METHODS_ID: &str = "shipping-methods";

const KIND: StepKind = StepKind::ShippingMethod;

pub struct ShippingMethodStep {
    ctx: Arc<CheckoutContext>,
}

impl ShippingMethodStep {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self { ctx }
    }

    pub(super) fn context(&self) -> &CheckoutContext {
        &self.ctx
    }

    /// Virtual carts have nothing to ship.
    pub fn is_complete(&self, snapshot: &CartSnapshot) -> bool {
        snapshot.is_virtual || snapshot.shipping_method.is_some()
    }

    /// Renders the method list. The list is refreshed in place, since the
    /// available rates change with the shipping address.
    pub async fn display(&self, active: bool, snapshot: Option<&CartSnapshot>) -> Result<()> {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.ctx.snapshot().unwrap_or_default(),
        };

        let component = Component::new(ComponentKind::ShippingMethods)
            .prop(
                "methods",
                serde_json::to_value(&snapshot.available_shipping_methods)?,
            )
            .prop("selected", serde_json::to_value(&snapshot.shipping_method)?)
            .form_ref(self.ctx.forms.shipping_methods.clone());
        self.ctx
            .mount_or_update(
                SHIPPING_METHODS_ID,
                component,
                &self.ctx.layout.shipping_method.content,
            )
            .await?;
        mount_continue_button(&self.ctx, KIND).await?;
        set_active(&self.ctx, KIND, active);
        Ok(())
    }

    pub fn display_summary(&self, snapshot: &CartSnapshot) {
        self.render_summary(snapshot);
    }

    fn render_summary(&self, snapshot: &CartSnapshot) {
        let regions = &self.ctx.layout.shipping_method;
        match (&snapshot.shipping_method, snapshot.is_virtual) {
            (Some(method), false) => {
                regions
                    .summary
                    .set_summary(Summary::editable(vec![method.label()]));
            }
            _ => regions.summary.clear(),
        }
        regions.root.set_active(false);
    }

    pub fn teardown(&self) {
        self.ctx.unmount(SHIPPING_METHODS_ID);
        self.ctx.forms.shipping_methods.clear();
    }

    pub async fn continue_step(&self, sequence: &StepSequence) -> Result<StepOutcome> {
        let method = match read_form::<ShippingMethod>(KIND, &self.ctx.forms.shipping_methods) {
            FormRead::Value(method) => method,
            FormRead::Invalid => return Ok(StepOutcome::Invalid),
            FormRead::Absent => match self.ctx.values().selected_shipping_method {
                Some(method) => method,
                None => return Ok(StepOutcome::Invalid),
            },
        };

        let committed = commit(KIND, self.ctx.commerce.set_shipping_method(method)).await?;

        self.display(false, Some(&committed)).await?;
        self.render_summary(&committed);
        sequence.open_after(KIND, &committed).await?;
        Ok(StepOutcome::Completed)
    }
}
