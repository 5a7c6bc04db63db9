//! Order lifecycle: submission, reservation, market settlement, cancel.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{split_pair, Order, OrderSide, OrderStatus, OrderType};

use super::{ExchangeError, IdSource, PriceFeed, Result, WalletLedger};

/// OrderRequest is a user intent to submit an order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub pair: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Required for limit orders, ignored for market orders.
    pub price: Option<Decimal>,
    pub amount: Decimal,
}

/// OrderManager exclusively owns the open-order list and the order
/// history log.
///
/// Both lists keep newest entries first. Open limit orders rest until
/// cancelled; nothing matches them against the ticking feed (see
/// DESIGN.md). History entries are terminal and never mutated.
#[derive(Debug, Clone, Default)]
pub struct OrderManager {
    open: Vec<Order>,
    history: Vec<Order>,
}

impl OrderManager {
    /// Restores the manager from persisted order lists.
    pub fn from_parts(open: Vec<Order>, history: Vec<Order>) -> Self {
        Self { open, history }
    }

    /// Returns the open orders, newest first.
    pub fn open_orders(&self) -> &[Order] {
        &self.open
    }

    /// Returns the order history, newest first.
    pub fn history(&self) -> &[Order] {
        &self.history
    }

    /// Submits an order.
    ///
    /// Validation order: amount, then limit price, then pair, then funds.
    /// A limit order reserves the required funds and rests as `Open`; a
    /// market order settles immediately at the current feed price and is
    /// appended to history as `Filled`. A failed submission performs no
    /// mutation at all.
    pub fn submit(
        &mut self,
        req: &OrderRequest,
        feed: &PriceFeed,
        ledger: &mut WalletLedger,
        ids: &mut IdSource,
    ) -> Result<Order> {
        if req.amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount);
        }

        let price = match req.order_type {
            OrderType::Limit => match req.price {
                Some(price) if price > Decimal::ZERO => price,
                _ => return Err(ExchangeError::InvalidPrice),
            },
            OrderType::Market => feed
                .price(&req.pair)
                .ok_or_else(|| ExchangeError::UnknownPair(req.pair.clone()))?,
        };

        let (base, quote) =
            split_pair(&req.pair).ok_or_else(|| ExchangeError::UnknownPair(req.pair.clone()))?;

        // Buys spend the quote asset, sells spend the base asset.
        let (spend_asset, required) = match req.side {
            OrderSide::Buy => (quote, price * req.amount),
            OrderSide::Sell => (base, req.amount),
        };

        let order = Order {
            id: ids.next_id(),
            created_at: Utc::now(),
            pair: req.pair.clone(),
            side: req.side,
            order_type: req.order_type,
            price,
            amount: req.amount,
            status: OrderStatus::Open,
        };

        match req.order_type {
            OrderType::Limit => {
                ledger.reserve(spend_asset, required)?;
                self.open.insert(0, order.clone());
                debug!(id = %order.id, pair = %order.pair, %required, "limit order resting");
                Ok(order)
            }
            OrderType::Market => {
                let (credit_asset, credit_amount) = match req.side {
                    OrderSide::Buy => (base, req.amount),
                    OrderSide::Sell => (quote, price * req.amount),
                };
                ledger.settle(spend_asset, required, credit_asset, credit_amount)?;

                let filled = Order {
                    status: OrderStatus::Filled,
                    ..order
                };
                self.history.insert(0, filled.clone());
                debug!(id = %filled.id, pair = %filled.pair, %price, "market order filled");
                Ok(filled)
            }
        }
    }

    /// Cancels an open order by id, releasing the literal reserved amount
    /// back to the ledger and appending the cancelled order to history.
    ///
    /// Returns the cancelled order, or None if no open order has that id.
    /// A double cancel is a benign no-op, never an error.
    pub fn cancel(&mut self, order_id: &str, ledger: &mut WalletLedger) -> Option<Order> {
        let idx = self.open.iter().position(|o| o.id == order_id)?;
        let mut order = self.open.remove(idx);

        // Pair format was validated at submission.
        if let Some((base, quote)) = split_pair(&order.pair) {
            match order.side {
                OrderSide::Buy => ledger.release(quote, order.price * order.amount),
                OrderSide::Sell => ledger.release(base, order.amount),
            }
        }

        order.status = OrderStatus::Cancelled;
        self.history.insert(0, order.clone());
        debug!(id = %order.id, pair = %order.pair, "order cancelled");
        Some(order)
    }
}
