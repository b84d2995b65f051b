use serde::{Deserialize, Serialize};

use crate::cart::{PaymentMethod, ShippingMethod};

/// Live, uncommitted values reported by the checkout forms.
///
/// These are the last values observed on the `checkout/values` topic and act
/// as a fallback source when a form has already been unmounted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bill_to_shipping_address: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_shipping_method: Option<ShippingMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_payment_method: Option<PaymentMethod>,
}
