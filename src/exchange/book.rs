//! Orderbook synthesis from a mid price.

use rand::Rng;
use rust_decimal::Decimal;

use crate::domain::{Orderbook, PriceLevel};

/// Synthesizes a transient bid/ask ladder around the given mid price.
///
/// Level `i` (zero-based) sits `0.05% × (i + 1)` away from the mid: asks
/// above, bids below. Both sides come back best-first (asks lowest first,
/// bids highest first). Amounts are random positive values drawn from the
/// supplied generator; nothing here is persisted.
pub fn synthesize_book(pair: &str, mid: Decimal, depth: usize, rng: &mut impl Rng) -> Orderbook {
    let mut asks = Vec::with_capacity(depth);
    let mut bids = Vec::with_capacity(depth);

    for i in 0..depth {
        let offset = Decimal::new(5 * (i as i64 + 1), 4);
        asks.push(PriceLevel {
            price: mid * (Decimal::ONE + offset),
            amount: Decimal::new(rng.random_range(1..=20_000), 4),
        });
        bids.push(PriceLevel {
            price: mid * (Decimal::ONE - offset),
            amount: Decimal::new(rng.random_range(1..=20_000), 4),
        });
    }

    Orderbook {
        pair: pair.to_string(),
        bids,
        asks,
    }
}
