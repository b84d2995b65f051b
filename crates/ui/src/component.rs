//! Component descriptions handed to the external renderer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::FormRef;

/// Props are an open JSON object, as the external library defines them.
pub type Props = Map<String, Value>;

/// The widgets and containers the checkout mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    /// Guest email form.
    LoginForm,
    /// Editable address form for guests.
    AddressForm,
    /// Saved-address selector for signed-in customers.
    SavedAddresses,
    ShippingMethods,
    PaymentMethods,
    /// "Billing same as shipping" checkbox.
    BillToShipping,
    Button,
    PlaceOrder,
    Spinner,
    EmptyCart,
    OrderConfirmation,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::LoginForm => "login-form",
            ComponentKind::AddressForm => "address-form",
            ComponentKind::SavedAddresses => "saved-addresses",
            ComponentKind::ShippingMethods => "shipping-methods",
            ComponentKind::PaymentMethods => "payment-methods",
            ComponentKind::BillToShipping => "bill-to-shipping",
            ComponentKind::Button => "button",
            ComponentKind::PlaceOrder => "place-order",
            ComponentKind::Spinner => "spinner",
            ComponentKind::EmptyCart => "empty-cart",
            ComponentKind::OrderConfirmation => "order-confirmation",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A component to mount: its kind, initial props and, for forms, the cell
/// the renderer publishes the live form handle into.
#[derive(Debug, Clone)]
pub struct Component {
    pub kind: ComponentKind,
    pub props: Props,
    pub form_ref: Option<FormRef>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            props: Props::new(),
            form_ref: None,
        }
    }

    /// Sets a single prop.
    pub fn prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    /// Binds the form this component owns to `form_ref`.
    pub fn form_ref(mut self, form_ref: FormRef) -> Self {
        self.form_ref = Some(form_ref);
        self
    }
}
