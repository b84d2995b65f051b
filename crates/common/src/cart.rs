//! Cart snapshot and the value objects it carries.

use serde::{Deserialize, Serialize};

/// A postal address as the commerce backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub firstname: String,
    pub lastname: String,
    pub street: Vec<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub postcode: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    /// Only meaningful on shipping addresses: billing should reuse this address.
    #[serde(default)]
    pub same_as_billing: bool,
}

impl Address {
    /// Returns the address as display lines, name first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.firstname, self.lastname)];
        lines.extend(self.street.iter().cloned());
        let locality = match &self.region {
            Some(region) => format!("{}, {} {}", self.city, region, self.postcode),
            None => format!("{} {}", self.city, self.postcode),
        };
        lines.push(locality);
        lines.push(self.country_code.clone());
        if let Some(telephone) = &self.telephone {
            lines.push(telephone.clone());
        }
        lines
    }
}

/// A carrier/method pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub carrier_code: String,
    pub method_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ShippingMethod {
    pub fn new(carrier_code: impl Into<String>, method_code: impl Into<String>) -> Self {
        Self {
            carrier_code: carrier_code.into(),
            method_code: method_code.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Label shown in summaries: the title if present, else `carrier_method`.
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("{}_{}", self.carrier_code, self.method_code),
        }
    }
}

/// A payment method identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PaymentMethod {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.code)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub sku: String,
    pub name: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            quantity,
        }
    }
}

/// Point-in-time view of the checkout-relevant cart and customer state.
///
/// Snapshots are delivered by events and never mutated by the checkout flow;
/// a newer snapshot replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_virtual: bool,
    pub items: Vec<CartItem>,
    pub shipping_addresses: Vec<Address>,
    pub available_shipping_methods: Vec<ShippingMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<ShippingMethod>,
    pub available_payment_methods: Vec<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_accepted: Option<bool>,
}

impl CartSnapshot {
    /// Returns true if the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the committed email, ignoring blank values.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.trim().is_empty())
    }

    /// Returns the first committed shipping address.
    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_addresses.first()
    }

    /// Returns true if the first shipping address doubles as billing address.
    pub fn same_as_billing(&self) -> bool {
        self.shipping_address()
            .is_some_and(|address| address.same_as_billing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> Address {
        Address {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            street: vec!["12 Analytical Row".to_string()],
            city: "London".to_string(),
            region: None,
            postcode: "N1 9GU".to_string(),
            country_code: "GB".to_string(),
            telephone: None,
            same_as_billing: false,
        }
    }

    #[test]
    fn test_blank_email_is_treated_as_missing() {
        let snapshot = CartSnapshot {
            email: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(snapshot.email(), None);
    }

    #[test]
    fn test_same_as_billing_reads_first_shipping_address() {
        let mut snapshot = CartSnapshot::default();
        assert!(!snapshot.same_as_billing());

        let mut shipping = address();
        shipping.same_as_billing = true;
        snapshot.shipping_addresses.push(shipping);
        assert!(snapshot.same_as_billing());
    }

    #[test]
    fn test_address_lines() {
        let lines = address().lines();
        assert_eq!(
            lines,
            vec!["Ada Lovelace", "12 Analytical Row", "London N1 9GU", "GB"]
        );
    }

    #[test]
    fn test_snapshot_deserializes_from_camel_case_with_defaults() {
        let json = r#"{
            "email": "a@b.com",
            "isVirtual": true,
            "items": [{"sku": "GC-1", "name": "Gift card", "quantity": 1}]
        }"#;
        let snapshot: CartSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_virtual);
        assert_eq!(snapshot.email(), Some("a@b.com"));
        assert!(snapshot.shipping_addresses.is_empty());
        assert!(snapshot.payment_method.is_none());
    }

    #[test]
    fn test_shipping_method_label_falls_back_to_codes() {
        assert_eq!(ShippingMethod::new("flatrate", "flatrate").label(), "flatrate_flatrate");
        assert_eq!(
            ShippingMethod::new("ups", "ground").with_title("UPS Ground").label(),
            "UPS Ground"
        );
    }
}
