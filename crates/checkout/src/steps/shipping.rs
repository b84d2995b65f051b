//! Shipping step: contact email and shipping address.

use std::sync::Arc;

use common::{Address, CartSnapshot};
use serde::Deserialize;
use ui::{Component, ComponentKind, Summary};

use super::{FormRead, StepSequence, commit, mount_continue_button, read_form, set_active};
use crate::context::CheckoutContext;
use crate::error::Result;
use crate::step::{StepKind, StepOutcome};

pub const LOGIN_FORM_ID: &str = "shipping-login-form";
pub const SHIPPING_ADDRESS_FORM_ID: &str = "shipping-address-form";
pub const SHIPPING_SAVED_ADDRESSES_ID: &str = "shipping-saved-addresses";

const KIND: StepKind = StepKind::Shipping;

#[derive(Deserialize)]
struct LoginValues {
    email: String,
}

pub struct ShippingStep {
    ctx: Arc<CheckoutContext>,
}

impl ShippingStep {
    pub fn new(ctx: Arc<CheckoutContext>) -> Self {
        Self { ctx }
    }

    pub(super) fn context(&self) -> &CheckoutContext {
        &self.ctx
    }

    /// Needs an email, plus a shipping address unless the cart is virtual.
    pub fn is_complete(&self, snapshot: &CartSnapshot) -> bool {
        snapshot.email().is_some() && (snapshot.is_virtual || snapshot.shipping_address().is_some())
    }

    pub async fn display(&self, active: bool, snapshot: Option<&CartSnapshot>) -> Result<()> {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot.clone(),
            None => self.ctx.snapshot().unwrap_or_default(),
        };

        self.mount_email_input(&snapshot).await?;
        if snapshot.is_virtual {
            self.clear_address_inputs();
        } else {
            self.mount_address_inputs(&snapshot).await?;
        }
        mount_continue_button(&self.ctx, KIND).await?;
        set_active(&self.ctx, KIND, active);
        Ok(())
    }

    pub fn display_summary(&self, snapshot: &CartSnapshot) {
        self.render_summary(snapshot.email(), snapshot.shipping_address());
    }

    fn render_summary(&self, email: Option<&str>, address: Option<&Address>) {
        let mut lines = Vec::new();
        if let Some(email) = email {
            lines.push(email.to_string());
        }
        if let Some(address) = address {
            lines.extend(address.lines());
        }
        let regions = &self.ctx.layout.shipping;
        regions.summary.set_summary(Summary::editable(lines));
        regions.root.set_active(false);
    }

    /// Guests get an email form; signed-in customers use the account email.
    async fn mount_email_input(&self, snapshot: &CartSnapshot) -> Result<()> {
        if self.ctx.is_authenticated() {
            self.ctx.unmount(LOGIN_FORM_ID);
            return Ok(());
        }
        let component = Component::new(ComponentKind::LoginForm)
            .prop("email", snapshot.email().unwrap_or_default())
            .form_ref(self.ctx.forms.login.clone());
        self.ctx
            .mount(LOGIN_FORM_ID, component, &self.ctx.layout.login)
            .await?;
        Ok(())
    }

    async fn mount_address_inputs(&self, snapshot: &CartSnapshot) -> Result<()> {
        let address = serde_json::to_value(snapshot.shipping_address())?;
        let content = &self.ctx.layout.shipping.content;

        if self.ctx.is_authenticated() {
            self.ctx.unmount(SHIPPING_ADDRESS_FORM_ID);
            let component = Component::new(ComponentKind::SavedAddresses)
                .prop("addressType", "shipping")
                .prop("selected", address)
                .form_ref(self.ctx.forms.shipping_address.clone());
            self.ctx
                .mount(SHIPPING_SAVED_ADDRESSES_ID, component, content)
                .await?;
        } else {
            self.ctx.unmount(SHIPPING_SAVED_ADDRESSES_ID);
            let component = Component::new(ComponentKind::AddressForm)
                .prop("addressType", "shipping")
                .prop("address", address)
                .form_ref(self.ctx.forms.shipping_address.clone());
            self.ctx
                .mount(SHIPPING_ADDRESS_FORM_ID, component, content)
                .await?;
        }
        Ok(())
    }

    /// Virtual carts have no address UI at all.
    fn clear_address_inputs(&self) {
        self.ctx.unmount(SHIPPING_ADDRESS_FORM_ID);
        self.ctx.unmount(SHIPPING_SAVED_ADDRESSES_ID);
        self.ctx.forms.shipping_address.clear();
        self.ctx.layout.shipping.content.clear();
    }

    /// Replaces the guest email and address forms after sign-in. Form cells
    /// must already be cleared, so mounted inputs are rebuilt to rebind
    /// them. Only inputs that were on the page come back.
    pub async fn remount_for_customer(&self, snapshot: Option<&CartSnapshot>) -> Result<()> {
        self.ctx.unmount(LOGIN_FORM_ID);
        let mounted = self.ctx.unmount(SHIPPING_ADDRESS_FORM_ID)
            | self.ctx.unmount(SHIPPING_SAVED_ADDRESSES_ID);
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
        self.ctx.unmount(LOGIN_FORM_ID);
        self.clear_address_inputs();
    }

    pub async fn continue_step(&self, sequence: &StepSequence) -> Result<StepOutcome> {
        let snapshot = self.ctx.snapshot().unwrap_or_default();

        let email = if self.ctx.is_authenticated() {
            None
        } else {
            match read_form::<LoginValues>(KIND, &self.ctx.forms.login) {
                FormRead::Value(values) => Some(values.email),
                FormRead::Invalid => return Ok(StepOutcome::Invalid),
                FormRead::Absent => self
                    .ctx
                    .values()
                    .email
                    .or_else(|| snapshot.email().map(str::to_string)),
            }
        };
        if !self.ctx.is_authenticated() && email.as_deref().is_none_or(|e| e.trim().is_empty()) {
            return Ok(StepOutcome::Invalid);
        }

        let address = if snapshot.is_virtual {
            None
        } else {
            match read_form::<Address>(KIND, &self.ctx.forms.shipping_address) {
                FormRead::Value(address) => Some(address),
                FormRead::Invalid => return Ok(StepOutcome::Invalid),
                FormRead::Absent => match snapshot.shipping_address() {
                    Some(address) => Some(address.clone()),
                    None => return Ok(StepOutcome::Invalid),
                },
            }
        };

        let mut committed = snapshot;
        if let Some(email) = &email {
            committed = commit(KIND, self.ctx.commerce.set_guest_email(email)).await?;
        }
        if let Some(address) = address {
            committed = commit(KIND, self.ctx.commerce.set_shipping_address(address)).await?;
        }

        self.display(false, Some(&committed)).await?;
        self.render_summary(committed.email(), committed.shipping_address());
        sequence.open_after(KIND, &committed).await?;
        Ok(StepOutcome::Completed)
    }
}
