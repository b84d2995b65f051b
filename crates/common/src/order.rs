use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub placed_at: DateTime<Utc>,
}
