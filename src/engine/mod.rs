//! Exchange engine: owns every core component and serializes all
//! mutations.
//!
//! The engine is instantiated once per session and passed by reference to
//! whatever drives it (the demo loop here, a UI bridge in a real
//! deployment). Every handler runs to completion on `&mut self`, which is
//! what makes the reserve/settle sequences atomic without locking: a price
//! tick can never interleave with an order submission.
//!
//! After each mutating intent the affected state slices are written back
//! to the store. A persistence failure is logged and swallowed; the
//! in-memory effect stands.

mod stats;

pub use stats::Stats;

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{
    Deposit, NetworkFee, Order, Orderbook, OrderStatus, PairTicker, TapeTrade, Transaction,
    UserProfile, Withdrawal, WithdrawalPreview,
};
use crate::exchange::{
    FundsSimulator, IdSource, OrderManager, OrderRequest, PriceFeed, Result, WalletLedger,
};
use crate::storage::{keys, load_slice, save_slice, StateStore};

/// The simulated exchange engine.
pub struct Engine {
    quote_asset: String,
    book_depth: usize,
    feed: PriceFeed,
    ledger: WalletLedger,
    orders: OrderManager,
    funds: FundsSimulator,
    profile: UserProfile,
    ids: IdSource,
    store: Box<dyn StateStore>,
    stats: Stats,
}

impl Engine {
    /// Builds an engine from config and the persisted snapshot. Every
    /// slice that is absent or corrupt starts from its documented
    /// default; the pair catalog and its prices always start fresh from
    /// config.
    pub async fn new(config: &Config, store: Box<dyn StateStore>) -> Self {
        let balances = load_slice(store.as_ref(), keys::WALLET, config.opening_balances()).await;
        let open: Vec<Order> = load_slice(store.as_ref(), keys::OPEN_ORDERS, Vec::new()).await;
        let history: Vec<Order> =
            load_slice(store.as_ref(), keys::ORDER_HISTORY, Vec::new()).await;
        let addresses: HashMap<String, String> =
            load_slice(store.as_ref(), keys::DEPOSIT_ADDRESSES, HashMap::new()).await;
        let deposits: Vec<Deposit> =
            load_slice(store.as_ref(), keys::DEPOSITS, Vec::new()).await;
        let withdrawals: Vec<Withdrawal> =
            load_slice(store.as_ref(), keys::WITHDRAWALS, Vec::new()).await;
        let transactions: Vec<Transaction> =
            load_slice(store.as_ref(), keys::TRANSACTIONS, Vec::new()).await;
        let profile = load_slice(store.as_ref(), keys::USER, UserProfile::default()).await;

        let ids = match config.market.seed {
            Some(seed) => IdSource::from_seed(seed),
            None => IdSource::new(),
        };

        info!(
            pairs = config.market.pairs.len(),
            open_orders = open.len(),
            username = %profile.username,
            "engine restored from snapshot"
        );

        Self {
            quote_asset: config.market.quote_asset().to_string(),
            book_depth: config.market.book_depth(),
            feed: PriceFeed::new(config.market.pairs.clone(), config.market.seed),
            ledger: WalletLedger::from_balances(balances),
            orders: OrderManager::from_parts(open, history),
            funds: FundsSimulator::new(
                addresses,
                deposits,
                withdrawals,
                transactions,
                config.fee_schedules(),
                config.default_fee(),
            ),
            profile,
            ids,
            store,
            stats: Stats::default(),
        }
    }

    // ==================== Market data ====================

    /// Advances the synthetic price feed by one tick. Prices are not
    /// persisted; the catalog is reseeded from config each session.
    pub fn tick(&mut self) {
        self.feed.tick();
        self.stats.ticks += 1;
    }

    /// Current price for a pair.
    pub fn price(&self, pair: &str) -> Option<Decimal> {
        self.feed.price(pair)
    }

    /// The pair catalog with live prices.
    pub fn tickers(&self) -> &[PairTicker] {
        self.feed.tickers()
    }

    /// Bounded price history for a pair, oldest first.
    pub fn history(&self, pair: &str) -> &[Decimal] {
        self.feed.history(pair)
    }

    /// Recent synthetic trade prints for a pair, newest first.
    pub fn tape(&self, pair: &str) -> &[TapeTrade] {
        self.feed.tape(pair)
    }

    /// Synthesized orderbook ladder for a pair.
    pub fn order_book(&mut self, pair: &str) -> Option<Orderbook> {
        self.feed.order_book(pair, self.book_depth)
    }

    // ==================== Orders ====================

    /// Submits an order and persists the wallet plus the touched order
    /// list.
    pub async fn submit_order(&mut self, req: OrderRequest) -> Result<Order> {
        let order = self
            .orders
            .submit(&req, &self.feed, &mut self.ledger, &mut self.ids)?;
        self.stats.orders_submitted += 1;

        self.persist(keys::WALLET, self.ledger.balances()).await;
        match order.status {
            OrderStatus::Open => {
                self.persist(keys::OPEN_ORDERS, &self.orders.open_orders()).await;
            }
            _ => {
                self.persist(keys::ORDER_HISTORY, &self.orders.history()).await;
            }
        }
        Ok(order)
    }

    /// Cancels an open order, refunding its reservation. Returns None if
    /// no open order has that id; a double cancel is a benign no-op.
    pub async fn cancel_order(&mut self, order_id: &str) -> Option<Order> {
        let order = self.orders.cancel(order_id, &mut self.ledger)?;
        self.stats.orders_cancelled += 1;

        self.persist(keys::WALLET, self.ledger.balances()).await;
        self.persist(keys::OPEN_ORDERS, &self.orders.open_orders()).await;
        self.persist(keys::ORDER_HISTORY, &self.orders.history()).await;
        Some(order)
    }

    /// Open orders, newest first.
    pub fn open_orders(&self) -> &[Order] {
        self.orders.open_orders()
    }

    /// Order history, newest first.
    pub fn order_history(&self) -> &[Order] {
        self.orders.history()
    }

    // ==================== Wallet ====================

    /// Balance for one asset, zero if unknown.
    pub fn balance(&self, asset: &str) -> Decimal {
        self.ledger.balance(asset)
    }

    /// The full balance map.
    pub fn balances(&self) -> &HashMap<String, Decimal> {
        self.ledger.balances()
    }

    /// Total wallet value in the quote asset at current feed prices.
    pub fn total_value(&self) -> Decimal {
        self.ledger
            .total_value(&self.feed.base_prices(), &self.quote_asset)
    }

    // ==================== Funds ====================

    /// Cached deposit address for an asset, generated on first request.
    pub async fn deposit_address(&mut self, asset: &str) -> String {
        let cached = self.funds.addresses().contains_key(asset);
        let address = self.funds.deposit_address(asset, &mut self.ids);
        if !cached {
            self.persist(keys::DEPOSIT_ADDRESSES, self.funds.addresses()).await;
        }
        address
    }

    /// Replaces the cached deposit address for an asset.
    pub async fn regenerate_address(&mut self, asset: &str) -> String {
        let address = self.funds.regenerate_address(asset, &mut self.ids);
        self.persist(keys::DEPOSIT_ADDRESSES, self.funds.addresses()).await;
        address
    }

    /// Simulates an incoming deposit.
    pub async fn deposit(&mut self, asset: &str, amount: Decimal) -> Result<Deposit> {
        let deposit = self
            .funds
            .simulate_deposit(asset, amount, &mut self.ledger, &mut self.ids)?;
        self.stats.deposits += 1;

        self.persist(keys::WALLET, self.ledger.balances()).await;
        self.persist(keys::DEPOSITS, &self.funds.deposits()).await;
        self.persist(keys::TRANSACTIONS, &self.funds.transactions()).await;
        Ok(deposit)
    }

    /// Simulates an outgoing withdrawal, debiting amount plus fee.
    pub async fn withdraw(
        &mut self,
        asset: &str,
        network: &str,
        address: &str,
        amount: Decimal,
    ) -> Result<Withdrawal> {
        let withdrawal = self.funds.withdraw(
            asset,
            network,
            address,
            amount,
            &mut self.ledger,
            &mut self.ids,
        )?;
        self.stats.withdrawals += 1;

        self.persist(keys::WALLET, self.ledger.balances()).await;
        self.persist(keys::WITHDRAWALS, &self.funds.withdrawals()).await;
        self.persist(keys::TRANSACTIONS, &self.funds.transactions()).await;
        Ok(withdrawal)
    }

    /// Pure withdrawal quote; touches no state.
    pub fn preview_withdrawal(
        &self,
        asset: &str,
        network: &str,
        amount: Decimal,
    ) -> WithdrawalPreview {
        self.funds.preview_withdrawal(asset, network, amount)
    }

    /// Withdrawal fee schedule for an asset.
    pub fn fee_schedule(&self, asset: &str) -> &[NetworkFee] {
        self.funds.fee_schedule(asset)
    }

    /// Deposit records, newest first.
    pub fn deposits(&self) -> &[Deposit] {
        self.funds.deposits()
    }

    /// Withdrawal records, newest first.
    pub fn withdrawals(&self) -> &[Withdrawal] {
        self.funds.withdrawals()
    }

    /// Combined transaction log, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.funds.transactions()
    }

    // ==================== Profile & session ====================

    /// The persisted user profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Updates and persists the user profile. An empty username falls
    /// back to "guest".
    pub async fn update_profile(&mut self, username: &str, two_fa: bool) {
        self.profile.username = if username.trim().is_empty() {
            "guest".to_string()
        } else {
            username.trim().to_string()
        };
        self.profile.two_fa = two_fa;
        self.persist(keys::USER, &self.profile).await;
    }

    /// Session counters.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Closes the underlying store.
    pub async fn close(self) {
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "failed to close state store");
        }
    }

    async fn persist<T: Serialize>(&self, key: &str, value: &T) {
        save_slice(self.store.as_ref(), key, value).await;
    }
}

#[cfg(test)]
mod tests;
