//! Market simulation configuration.

use serde::Deserialize;
use std::time::Duration;

use crate::domain::PairTicker;

use super::duration;

/// Synthetic market settings: the pair catalog and tick behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Interval between price feed ticks. Defaults to 2.5s.
    #[serde(default, with = "duration")]
    pub tick_interval: Duration,
    /// Asset all wallet values are quoted in. Defaults to "USDT".
    pub quote_asset: Option<String>,
    /// PRNG seed for a reproducible price walk. Entropy-seeded if unset.
    pub seed: Option<u64>,
    /// Synthetic orderbook depth per side. Defaults to 15.
    pub book_depth: Option<usize>,
    /// Fixed catalog of trading pairs with session open prices.
    pub pairs: Vec<PairTicker>,
}

impl MarketConfig {
    /// Tick interval with the default applied.
    pub fn tick_interval(&self) -> Duration {
        if self.tick_interval.is_zero() {
            Duration::from_millis(2500)
        } else {
            self.tick_interval
        }
    }

    /// Quote asset with the default applied.
    pub fn quote_asset(&self) -> &str {
        self.quote_asset.as_deref().unwrap_or("USDT")
    }

    /// Book depth with the default applied.
    pub fn book_depth(&self) -> usize {
        self.book_depth.unwrap_or(15)
    }
}
