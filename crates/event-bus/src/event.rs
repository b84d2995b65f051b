//! Checkout domain events and their topics.

use common::{CartSnapshot, CheckoutValues, OrderResult};
use serde::{Deserialize, Serialize};

/// A named channel on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "authenticated")]
    Authenticated,
    #[serde(rename = "cart/initialized")]
    CartInitialized,
    #[serde(rename = "checkout/initialized")]
    CheckoutInitialized,
    #[serde(rename = "checkout/updated")]
    CheckoutUpdated,
    #[serde(rename = "checkout/values")]
    CheckoutValues,
    #[serde(rename = "order/placed")]
    OrderPlaced,
    #[serde(rename = "checkout/step/completed")]
    StepCompleted,
}

impl Topic {
    /// Returns the wire name of the topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Authenticated => "authenticated",
            Topic::CartInitialized => "cart/initialized",
            Topic::CheckoutInitialized => "checkout/initialized",
            Topic::CheckoutUpdated => "checkout/updated",
            Topic::CheckoutValues => "checkout/values",
            Topic::OrderPlaced => "order/placed",
            Topic::StepCompleted => "checkout/step/completed",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events exchanged between the commerce client, the forms and the flow.
///
/// Cart payloads are optional: the backend reports an emptied or missing
/// cart as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum CheckoutEvent {
    #[serde(rename = "authenticated")]
    Authenticated(bool),
    #[serde(rename = "cart/initialized")]
    CartInitialized(Option<CartSnapshot>),
    #[serde(rename = "checkout/initialized")]
    CheckoutInitialized(Option<CartSnapshot>),
    #[serde(rename = "checkout/updated")]
    CheckoutUpdated(Option<CartSnapshot>),
    #[serde(rename = "checkout/values")]
    CheckoutValues(CheckoutValues),
    #[serde(rename = "order/placed")]
    OrderPlaced(OrderResult),
    #[serde(rename = "checkout/step/completed")]
    StepCompleted,
}

impl CheckoutEvent {
    /// Returns the topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            CheckoutEvent::Authenticated(_) => Topic::Authenticated,
            CheckoutEvent::CartInitialized(_) => Topic::CartInitialized,
            CheckoutEvent::CheckoutInitialized(_) => Topic::CheckoutInitialized,
            CheckoutEvent::CheckoutUpdated(_) => Topic::CheckoutUpdated,
            CheckoutEvent::CheckoutValues(_) => Topic::CheckoutValues,
            CheckoutEvent::OrderPlaced(_) => Topic::OrderPlaced,
            CheckoutEvent::StepCompleted => Topic::StepCompleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_matches_variant() {
        assert_eq!(
            CheckoutEvent::Authenticated(true).topic(),
            Topic::Authenticated
        );
        assert_eq!(
            CheckoutEvent::CheckoutUpdated(None).topic(),
            Topic::CheckoutUpdated
        );
        assert_eq!(CheckoutEvent::StepCompleted.topic(), Topic::StepCompleted);
    }

    #[test]
    fn test_event_wire_format_uses_topic_names() {
        let event: CheckoutEvent =
            serde_json::from_str(r#"{"topic": "checkout/updated", "payload": null}"#).unwrap();
        assert_eq!(event, CheckoutEvent::CheckoutUpdated(None));

        let json = serde_json::to_value(CheckoutEvent::Authenticated(true)).unwrap();
        assert_eq!(json["topic"], "authenticated");
        assert_eq!(json["payload"], true);
    }

    #[test]
    fn test_topic_display() {
        assert_eq!(Topic::StepCompleted.to_string(), "checkout/step/completed");
        assert_eq!(Topic::CartInitialized.to_string(), "cart/initialized");
    }
}
