//! Core business entities for trading orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OrderSide represents the direction of an order (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy the base asset, spending the quote asset.
    Buy,
    /// Sell the base asset, receiving the quote asset.
    Sell,
}

/// OrderType represents the type of order execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// A limit order rests on the book at the specified price.
    Limit,
    /// A market order executes immediately at the current feed price.
    Market,
}

/// OrderStatus represents the current state of an order.
///
/// `Filled` and `Cancelled` are terminal: an order in one of these states
/// is only ever appended to history and never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// The order is resting with funds reserved.
    Open,
    /// The order has been completely filled.
    Filled,
    /// The order was cancelled and its reservation refunded.
    Cancelled,
}

/// Order represents a trading order on the simulated exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier assigned at submission.
    pub id: String,
    /// When the order was created.
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    /// Trading pair in "BASE/QUOTE" format (e.g., "BTC/USDT").
    pub pair: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Limit or market.
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Limit price, or the captured execution price for market orders.
    /// Never re-priced after submission.
    pub price: Decimal,
    /// Amount of base asset to buy or sell.
    pub amount: Decimal,
    /// Current state of the order.
    pub status: OrderStatus,
}
