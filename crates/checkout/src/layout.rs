//! Page regions the checkout renders into.

use ui::Region;

use crate::step::StepKind;

/// The regions one step owns.
#[derive(Debug, Clone)]
pub struct StepRegions {
    /// Carries the step's active and hidden flags.
    pub root: Region,
    /// Editable form or selector.
    pub content: Region,
    /// Continue button.
    pub actions: Region,
    /// Read-only rendering of the committed value.
    pub summary: Region,
}

impl StepRegions {
    fn new(name: &str) -> Self {
        Self {
            root: Region::new(name),
            content: Region::new(&format!("{name}-content")),
            actions: Region::new(&format!("{name}-actions")),
            summary: Region::new(&format!("{name}-summary")),
        }
    }
}

/// All regions of the checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutLayout {
    pub main: Region,
    pub empty_cart: Region,
    pub confirmation: Region,
    pub place_order: Region,
    pub overlay: Region,
    /// Guest email form, above the shipping address.
    pub login: Region,
    pub shipping: StepRegions,
    pub shipping_method: StepRegions,
    pub payment: StepRegions,
    pub billing: StepRegions,
}

impl CheckoutLayout {
    pub fn new() -> Self {
        let empty_cart = Region::new("empty-cart");
        empty_cart.set_hidden(true);
        Self {
            main: Region::new("checkout-main"),
            empty_cart,
            confirmation: Region::new("order-confirmation"),
            place_order: Region::new("place-order"),
            overlay: Region::new("overlay-spinner"),
            login: Region::new("shipping-login"),
            shipping: StepRegions::new("shipping"),
            shipping_method: StepRegions::new("shipping-method"),
            payment: StepRegions::new("payment"),
            billing: StepRegions::new("billing"),
        }
    }

    pub fn step(&self, kind: StepKind) -> &StepRegions {
        match kind {
            StepKind::Shipping => &self.shipping,
            StepKind::ShippingMethod => &self.shipping_method,
            StepKind::Payment => &self.payment,
            StepKind::Billing => &self.billing,
        }
    }

    /// Marks `kind` as the open step and every other step as closed.
    pub fn activate(&self, kind: StepKind) {
        for other in StepKind::ALL {
            self.step(other).root.set_active(other == kind);
        }
    }

    /// Steps whose region is currently flagged active.
    pub fn active_steps(&self) -> Vec<StepKind> {
        StepKind::ALL
            .into_iter()
            .filter(|kind| self.step(*kind).root.is_active())
            .collect()
    }
}

impl Default for CheckoutLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_is_exclusive() {
        let layout = CheckoutLayout::new();
        layout.activate(StepKind::Shipping);
        layout.activate(StepKind::Payment);
        assert_eq!(layout.active_steps(), vec![StepKind::Payment]);
    }

    #[test]
    fn test_region_names() {
        let layout = CheckoutLayout::new();
        assert_eq!(layout.shipping_method.root.id(), "shipping-method");
        assert_eq!(layout.billing.summary.id(), "billing-summary");
        assert!(layout.empty_cart.is_hidden());
        assert!(!layout.main.is_hidden());
    }
}
