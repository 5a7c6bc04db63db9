//! Market data entities: the pair catalog and the trade tape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// PairTicker is the display state of one trading pair.
///
/// The catalog of pairs is fixed at startup; price and percent change are
/// mutated by the price feed on every tick, volume is a static display value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairTicker {
    /// Trading pair in "BASE/QUOTE" format (e.g., "BTC/USDT").
    pub pair: String,
    /// Current price in the quote asset. Always positive.
    pub price: Decimal,
    /// Percent change against the session open price.
    #[serde(default)]
    pub change: Decimal,
    /// 24h volume display value.
    #[serde(default)]
    pub volume: Decimal,
}

/// TapeTrade is one synthetic print on the trade tape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapeTrade {
    /// When the print occurred.
    #[serde(rename = "time")]
    pub executed_at: DateTime<Utc>,
    /// Print price.
    pub price: Decimal,
    /// Print amount in base asset.
    pub amount: Decimal,
}

/// Splits a pair identifier into its base and quote assets.
/// Returns None if the identifier is not in "BASE/QUOTE" format.
pub fn split_pair(pair: &str) -> Option<(&str, &str)> {
    let (base, quote) = pair.split_once('/')?;
    if base.is_empty() || quote.is_empty() {
        return None;
    }
    Some((base, quote))
}
