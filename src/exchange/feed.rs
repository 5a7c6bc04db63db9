//! Synthetic price feed: a seeded random walk per trading pair.

use std::collections::HashMap;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{split_pair, PairTicker, TapeTrade};

/// Number of points in a freshly seeded history.
const SEED_POINTS: usize = 80;
/// Maximum number of history points retained per pair.
const MAX_HISTORY: usize = 180;
/// Maximum number of tape prints retained per pair.
const MAX_TAPE: usize = 50;
/// Prices are clamped to this floor and never go non-positive.
const PRICE_FLOOR: Decimal = dec!(0.0001);

/// PriceFeed owns the synthetic price process for every pair in the
/// catalog.
///
/// Each tick multiplies a pair's price by `1 + step` where `step` is drawn
/// uniformly from ±0.05%; seeding a history walks 80 points at ±0.5% per
/// step. The PRNG is injected via a seed so tests get deterministic walks.
pub struct PriceFeed {
    tickers: Vec<PairTicker>,
    opens: HashMap<String, Decimal>,
    histories: HashMap<String, Vec<Decimal>>,
    tapes: HashMap<String, Vec<TapeTrade>>,
    rng: StdRng,
}

impl PriceFeed {
    /// Creates a feed over the given pair catalog and seeds a history for
    /// every pair. The configured prices become the session open prices
    /// that percent change is computed against.
    pub fn new(tickers: Vec<PairTicker>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let opens = tickers
            .iter()
            .map(|t| (t.pair.clone(), t.price))
            .collect();

        let mut feed = Self {
            tickers,
            opens,
            histories: HashMap::new(),
            tapes: HashMap::new(),
            rng,
        };

        for i in 0..feed.tickers.len() {
            let pair = feed.tickers[i].pair.clone();
            let base = feed.tickers[i].price;
            let history = feed.seed_walk(base);
            feed.histories.insert(pair, history);
        }

        feed
    }

    /// Walks SEED_POINTS values from `base`, each step multiplying the
    /// previous value by `1 + U(-0.5%, +0.5%)`.
    fn seed_walk(&mut self, base: Decimal) -> Vec<Decimal> {
        let mut points = Vec::with_capacity(SEED_POINTS);
        let mut last = base.max(PRICE_FLOOR);
        points.push(last);
        for _ in 1..SEED_POINTS {
            let step = Decimal::new(self.rng.random_range(-500..=500), 5);
            last = (last * (Decimal::ONE + step)).max(PRICE_FLOOR);
            points.push(last);
        }
        points
    }

    /// Advances every pair's price by a bounded multiplicative
    /// perturbation (±0.05% per tick), appends to the bounded history and
    /// pushes a synthetic print onto the trade tape.
    pub fn tick(&mut self) {
        let now = Utc::now();
        for i in 0..self.tickers.len() {
            let step = Decimal::new(self.rng.random_range(-50..=50), 5);
            let amount = Decimal::new(self.rng.random_range(100..=2600), 4);
            let pair = self.tickers[i].pair.clone();

            let next = (self.tickers[i].price * (Decimal::ONE + step)).max(PRICE_FLOOR);
            self.tickers[i].price = next;

            let open = self.opens.get(&pair).copied().unwrap_or(next);
            if !open.is_zero() {
                self.tickers[i].change = (next - open) / open * dec!(100);
            }

            let history = self.histories.entry(pair.clone()).or_default();
            history.push(next);
            if history.len() > MAX_HISTORY {
                history.remove(0);
            }

            let tape = self.tapes.entry(pair).or_default();
            tape.insert(
                0,
                TapeTrade {
                    executed_at: now,
                    price: next,
                    amount,
                },
            );
            tape.truncate(MAX_TAPE);
        }
    }

    /// Returns the current price for a pair, if it is in the catalog.
    pub fn price(&self, pair: &str) -> Option<Decimal> {
        self.tickers.iter().find(|t| t.pair == pair).map(|t| t.price)
    }

    /// Returns the full pair catalog with current prices.
    pub fn tickers(&self) -> &[PairTicker] {
        &self.tickers
    }

    /// Returns the bounded price history for a pair, oldest first.
    pub fn history(&self, pair: &str) -> &[Decimal] {
        self.histories.get(pair).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the recent trade tape for a pair, newest first.
    pub fn tape(&self, pair: &str) -> &[TapeTrade] {
        self.tapes.get(pair).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Synthesizes an orderbook ladder around the pair's current price.
    /// Returns None for pairs outside the catalog.
    pub fn order_book(&mut self, pair: &str, depth: usize) -> Option<crate::domain::Orderbook> {
        let mid = self.price(pair)?;
        Some(super::book::synthesize_book(pair, mid, depth, &mut self.rng))
    }

    /// Returns a map from base asset to its current price in the quote
    /// asset, used for wallet valuation.
    pub fn base_prices(&self) -> HashMap<String, Decimal> {
        self.tickers
            .iter()
            .filter_map(|t| {
                let (base, _) = split_pair(&t.pair)?;
                Some((base.to_string(), t.price))
            })
            .collect()
    }
}
