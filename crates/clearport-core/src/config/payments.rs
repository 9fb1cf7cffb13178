//! Payment workflow configuration.

use serde::{Deserialize, Serialize};

/// Payment workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// When true, a payment may only be completed after the importer has
    /// confirmed it. When false, uploading a completion document moves any
    /// payment to COMPLETED regardless of its prior status.
    #[serde(default)]
    pub require_confirmed_completion: bool,
    /// ISO 4217 currency code used when formatting amounts in audit entries.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            require_confirmed_completion: false,
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "SAR".to_string()
}
