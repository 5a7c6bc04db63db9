//! Withdrawal fee schedule configuration.

use serde::Deserialize;
use std::collections::HashMap;

use rust_decimal_macros::dec;

use crate::domain::NetworkFee;

/// Per-asset withdrawal fee schedules.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeesConfig {
    /// Fallback entry for assets without an explicit schedule.
    pub default: Option<NetworkFee>,
    /// Asset symbol to its list of network fee entries.
    #[serde(default)]
    pub schedules: HashMap<String, Vec<NetworkFee>>,
}

/// The built-in single-network fallback used when no default is
/// configured.
pub fn default_network_fee() -> NetworkFee {
    NetworkFee {
        network: "native".to_string(),
        display_name: "Native network".to_string(),
        fee: dec!(0.01),
    }
}
