//! Billing step: billing address, unless it reuses the shipping address.

use std::sync::Arc;

use commerce::BillingAddressInput;
use common::{Address, CartSnapshot};
use ui::{Component, ComponentKind, Summary};

use super::{FormRead, StepSequence, commit, mount_continue_button, read_form, set_active};
use crate::context::CheckoutContext;
use crate::error::Result;
use crate::step::{StepKind, StepOutcome};

pub const BILLING_ADDRESS_FORM_ID: &str = "billing-address-form";
pub const BILLING_SAVED_ADDRESSES_ID: &str = "billing-saved-addresses";

const KIND: StepKind = StepKind::Billing;

const SAME_AS_SHIPPING: &str = "Same as shipping address";

pub struct BillingStep {
    ctx: Arc<CheckoutContext>,
}

impl BillingStep {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self { ctx }
    }

    pub(super) fn context(&self) -> &CheckoutContext {
        &self.ctx
    }

    pub fn is_complete(&self, snapshot: &CartSnapshot) -> bool {
        snapshot.billing_address.is_some() || snapshot.same_as_billing()
    }

    pub async fn display(&self, active: bool, snapshot: Option<&CartSnapshot>) -> Result<()> {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.ctx.snapshot().unwrap_or_default(),
        };
        self.mount_address_inputs(&snapshot).await?;
        mount_continue_button(&self.ctx, KIND).await?;
        set_active(&self.ctx, KIND, active);
        Ok(())
    }

    async fn mount_address_inputs(&self, snapshot: &CartSnapshot) -> Result<()> {
        let address = serde_json::to_value(&snapshot.billing_address)?;
        let content = &self.ctx.layout.billing.content;

        if self.ctx.is_authenticated() {
            self.ctx.unmount(BILLING_ADDRESS_FORM_ID);
            let component = Component::new(ComponentKind::SavedAddresses)
                .prop("addressType", "billing")
                .prop("selected", address)
                .form_ref(self.ctx.forms.billing_address.clone());
            self.ctx
                .mount(BILLING_SAVED_ADDRESSES_ID, component, content)
                .await?;
        } else {
            self.ctx.unmount(BILLING_SAVED_ADDRESSES_ID);
            let component = Component::new(ComponentKind::AddressForm)
                .prop("addressType", "billing")
                .prop("address", address)
                .form_ref(self.ctx.forms.billing_address.clone());
            self.ctx
                .mount(BILLING_ADDRESS_FORM_ID, component, content)
                .await?;
        }
        Ok(())
    }

    pub fn display_summary(&self, snapshot: &CartSnapshot) {
        let regions = &self.ctx.layout.billing;
        if let Some(address) = &snapshot.billing_address {
            regions.summary.set_summary(Summary::editable(address.lines()));
        } else if snapshot.same_as_billing() {
            regions
                .summary
                .set_summary(Summary::editable(vec![SAME_AS_SHIPPING.to_string()]));
        } else {
            regions.summary.clear();
        }
        regions.root.set_active(false);
    }

    /// Swaps a guest address form for the saved-address selector. The form
    /// cell must already be cleared.
    pub async fn remount_for_customer(&self, snapshot: Option<&CartSnapshot>) -> Result<()> {
        let mounted = self.ctx.unmount(BILLING_ADDRESS_FORM_ID)
            | self.ctx.unmount(BILLING_SAVED_ADDRESSES_ID);
        if mounted {
            let snapshot = match snapshot {
                Some(snapshot) => snapshot.clone(),
                None => self.ctx.snapshot().unwrap_or_default(),
            };
            self.mount_address_inputs(&snapshot).await?;
        }
        Ok(())
    }

    pub fn teardown(&self) {
        self.ctx.unmount(BILLING_ADDRESS_FORM_ID);
        self.ctx.unmount(BILLING_SAVED_ADDRESSES_ID);
        self.ctx.forms.billing_address.clear();
    }

    pub async fn continue_step(&self, sequence: &StepSequence) -> Result<StepOutcome> {
        let snapshot = self.ctx.snapshot().unwrap_or_default();
        let address = match read_form::<Address>(KIND, &self.ctx.forms.billing_address) {
            FormRead::Value(address) => address,
            FormRead::Invalid => return Ok(StepOutcome::Invalid),
            FormRead::Absent => match snapshot.billing_address {
                Some(address) => address,
                None => return Ok(StepOutcome::Invalid),
            },
        };

        let committed = commit(
            KIND,
            self.ctx
                .commerce
                .set_billing_address(BillingAddressInput::Address(address)),
        )
        .await?;

        self.display(false, Some(&committed)).await?;
        self.display_summary(&committed);
        sequence.open_after(KIND, &committed).await?;
        Ok(StepOutcome::Completed)
    }
}
