//! Wallet configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;

/// Opening wallet balances for a fresh session.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Asset symbol to opening balance.
    #[serde(default)]
    pub opening_balances: HashMap<String, Decimal>,
}

/// The documented default wallet used when no configuration and no
/// persisted snapshot exist.
pub fn default_balances() -> HashMap<String, Decimal> {
    HashMap::from([
        ("USDT".to_string(), dec!(10000)),
        ("BTC".to_string(), dec!(0.2)),
        ("ETH".to_string(), dec!(1.5)),
        ("SOL".to_string(), Decimal::ZERO),
        ("XRP".to_string(), Decimal::ZERO),
        ("ADA".to_string(), Decimal::ZERO),
        ("BNB".to_string(), Decimal::ZERO),
        ("DOGE".to_string(), Decimal::ZERO),
    ])
}
