//! Driver configuration loaded from environment variables.

use std::path::PathBuf;

use checkout::CheckoutOptions;

/// Driver configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `CHECKOUT_SCRIPT`: path of the JSON script to replay (no default)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CHECKOUT_PRINT_METRICS`: `true`/`1` prints Prometheus text after the run
/// - `CHECKOUT_BILL_TO_SHIPPING`: initial "billing same as shipping" state
#[derive(Debug, Clone)]
pub struct Config {
    pub script: Option<PathBuf>,
    pub log_level: String,
    pub print_metrics: bool,
    pub bill_to_shipping: Option<bool>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            script: lookup("CHECKOUT_SCRIPT").map(PathBuf::from),
            log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            print_metrics: lookup("CHECKOUT_PRINT_METRICS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            bill_to_shipping: lookup("CHECKOUT_BILL_TO_SHIPPING").and_then(|v| parse_flag(&v)),
        }
    }

    /// Checkout options with the environment overrides applied.
    pub fn options(&self) -> CheckoutOptions {
        let mut options = CheckoutOptions::default();
        if let Some(bill_to_shipping) = self.bill_to_shipping {
            options.bill_to_shipping_default = bill_to_shipping;
        }
        options
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            log_level: "info".to_string(),
            print_metrics: false,
            bill_to_shipping: None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
