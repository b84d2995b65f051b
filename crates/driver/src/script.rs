//! Script format: a cart plus a list of actions to replay.

use checkout::StepKind;
use commerce::Operation;
use common::CartSnapshot;
use event_bus::CheckoutEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ui::ComponentKind;

/// A scripted checkout run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// Cart loaded into the backend before the session starts.
    #[serde(default)]
    pub cart: Option<CartSnapshot>,
    pub actions: Vec<Action>,
}

/// One scripted event or user interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Publishes an arbitrary domain event.
    Publish { event: CheckoutEvent },
    /// Publishes the backend's current cart as `checkout/initialized`.
    Initialize,
    /// Signs the customer in or out.
    Authenticate { authenticated: bool },
    /// Types into the most recently mounted form of a kind.
    Fill {
        form: ComponentKind,
        values: Value,
        #[serde(default = "default_valid")]
        valid: bool,
    },
    Continue { step: StepKind },
    Edit { step: StepKind },
    PlaceOrder,
    /// Flips a backend failure switch.
    FailOn {
        operation: Operation,
        #[serde(default = "default_valid")]
        fail: bool,
    },
}

fn default_valid() -> bool {
    true
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Publish { .. } => "publish",
            Action::Initialize => "initialize",
            Action::Authenticate { .. } => "authenticate",
            Action::Fill { .. } => "fill",
            Action::Continue { .. } => "continue",
            Action::Edit { .. } => "edit",
            Action::PlaceOrder => "placeOrder",
            Action::FailOn { .. } => "failOn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_each_action() {
        let script: Script = serde_json::from_value(json!({
            "cart": { "items": [{ "sku": "SKU-001", "name": "Widget", "quantity": 1 }] },
            "actions": [
                { "action": "initialize" },
                { "action": "publish", "event": { "topic": "authenticated", "payload": true } },
                { "action": "authenticate", "authenticated": false },
                { "action": "fill", "form": "login-form", "values": { "email": "a@b.com" } },
                { "action": "continue", "step": "shipping_method" },
                { "action": "edit", "step": "billing" },
                { "action": "failOn", "operation": "setPaymentMethod" },
                { "action": "placeOrder" }
            ]
        }))
        .unwrap();

        assert_eq!(script.actions.len(), 8);
        assert!(matches!(
            script.actions[1],
            Action::Publish {
                event: CheckoutEvent::Authenticated(true)
            }
        ));
        assert!(matches!(
            script.actions[3],
            Action::Fill {
                form: ComponentKind::LoginForm,
                valid: true,
                ..
            }
        ));
        assert!(matches!(
            script.actions[6],
            Action::FailOn {
                operation: Operation::SetPaymentMethod,
                fail: true
            }
        ));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<Action, _> = serde_json::from_value(json!({ "action": "teleport" }));
        assert!(result.is_err());
    }
}
