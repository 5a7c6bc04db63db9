//! End-to-end tests for the engine: intents, persistence and restart
//! recovery over a real SQLite store.

use super::*;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use async_trait::async_trait;

use std::result::Result;

use crate::domain::{OrderSide, OrderType};
use crate::storage::{SqliteStore, SqliteStoreConfig, StorageError};

fn test_config() -> Config {
    serde_yaml::from_str(
        r#"
app:
  name: simplex-test
  env: test

market:
  tick_interval: 2500ms
  seed: 42
  book_depth: 5
  pairs:
    - { pair: BTC/USDT, price: "64321.5" }
    - { pair: ETH/USDT, price: "3245.12" }

wallet:
  opening_balances:
    USDT: "10000"
    BTC: "0.2"

fees:
  schedules:
    BTC:
      - { network: bitcoin, display_name: Bitcoin, fee: "0.0005" }
"#,
    )
    .unwrap()
}

async fn open_store(dir: &TempDir) -> Box<dyn StateStore> {
    let path = dir.path().join("state.db");
    let store = SqliteStore::new(SqliteStoreConfig {
        path: path.to_str().unwrap().to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();
    Box::new(store)
}

async fn open_engine(dir: &TempDir) -> Engine {
    Engine::new(&test_config(), open_store(dir).await).await
}

fn market_buy(pair: &str, amount: Decimal) -> OrderRequest {
    OrderRequest {
        pair: pair.to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Market,
        price: None,
        amount,
    }
}

fn limit_sell(pair: &str, price: Decimal, amount: Decimal) -> OrderRequest {
    OrderRequest {
        pair: pair.to_string(),
        side: OrderSide::Sell,
        order_type: OrderType::Limit,
        price: Some(price),
        amount,
    }
}

// ==================== Startup ====================

#[tokio::test]
async fn test_fresh_engine_starts_from_config() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir).await;

    assert_eq!(engine.balance("USDT"), dec!(10000));
    assert_eq!(engine.balance("BTC"), dec!(0.2));
    assert_eq!(engine.profile().username, "guest");
    assert!(!engine.profile().two_fa);
    assert!(engine.open_orders().is_empty());
    assert!(engine.order_history().is_empty());
    assert!(engine.transactions().is_empty());
    assert_eq!(engine.tickers().len(), 2);
    assert_eq!(engine.price("BTC/USDT"), Some(dec!(64321.5)));
}

#[tokio::test]
async fn test_corrupt_wallet_slice_falls_back_to_config() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    store.save(keys::WALLET, "{not json").await.unwrap();
    store.save(keys::OPEN_ORDERS, "42").await.unwrap();

    let engine = Engine::new(&test_config(), store).await;
    assert_eq!(engine.balance("USDT"), dec!(10000));
    assert!(engine.open_orders().is_empty());
}

// ==================== Market data ====================

#[tokio::test]
async fn test_tick_moves_market_data() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    let before = engine.history("BTC/USDT").len();
    engine.tick();
    engine.tick();

    assert_eq!(engine.stats().ticks, 2);
    assert_eq!(engine.history("BTC/USDT").len(), before + 2);
    assert_eq!(engine.tape("BTC/USDT").len(), 2);
    assert!(engine.price("BTC/USDT").unwrap() > Decimal::ZERO);
}

#[tokio::test]
async fn test_order_book_uses_configured_depth() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    let book = engine.order_book("BTC/USDT").unwrap();
    assert_eq!(book.bids.len(), 5);
    assert_eq!(book.asks.len(), 5);
    assert!(engine.order_book("DOGE/USDT").is_none());
}

#[tokio::test]
async fn test_total_value_at_feed_prices() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir).await;

    // 10000 USDT + 0.2 BTC × 64321.5
    assert_eq!(engine.total_value(), dec!(22864.3));
}

// ==================== Orders across restarts ====================

#[tokio::test]
async fn test_market_order_persists_across_restart() {
    let dir = TempDir::new().unwrap();

    let mut engine = open_engine(&dir).await;
    let order = engine
        .submit_order(market_buy("BTC/USDT", dec!(0.1)))
        .await
        .unwrap();
    assert_eq!(engine.stats().orders_submitted, 1);
    engine.close().await;

    let restored = open_engine(&dir).await;
    assert_eq!(restored.balance("USDT"), dec!(3567.85));
    assert_eq!(restored.balance("BTC"), dec!(0.3));
    assert_eq!(restored.order_history().len(), 1);
    assert_eq!(restored.order_history()[0].id, order.id);
    assert_eq!(restored.order_history()[0].status, OrderStatus::Filled);
}

#[tokio::test]
async fn test_open_order_survives_restart_and_cancels() {
    let dir = TempDir::new().unwrap();

    let mut engine = open_engine(&dir).await;
    let order = engine
        .submit_order(limit_sell("BTC/USDT", dec!(65000), dec!(0.05)))
        .await
        .unwrap();
    assert_eq!(engine.balance("BTC"), dec!(0.15));
    engine.close().await;

    let mut restored = open_engine(&dir).await;
    assert_eq!(restored.balance("BTC"), dec!(0.15));
    assert_eq!(restored.open_orders().len(), 1);

    // The reservation is still refundable after the restart.
    let cancelled = restored.cancel_order(&order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(restored.balance("BTC"), dec!(0.2));
    assert!(restored.open_orders().is_empty());
    restored.close().await;

    let after_cancel = open_engine(&dir).await;
    assert!(after_cancel.open_orders().is_empty());
    assert_eq!(after_cancel.order_history()[0].status, OrderStatus::Cancelled);
    assert_eq!(after_cancel.balance("BTC"), dec!(0.2));
}

#[tokio::test]
async fn test_failed_submit_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    let result = engine.submit_order(market_buy("BTC/USDT", dec!(5))).await;
    assert!(result.is_err());
    assert_eq!(engine.stats().orders_submitted, 0);
    assert_eq!(engine.balance("USDT"), dec!(10000));
    assert!(engine.order_history().is_empty());
}

#[tokio::test]
async fn test_cancel_unknown_order_is_noop() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    assert!(engine.cancel_order("missing").await.is_none());
    assert_eq!(engine.stats().orders_cancelled, 0);
}

// ==================== Funds across restarts ====================

#[tokio::test]
async fn test_deposit_and_withdrawal_flow() {
    let dir = TempDir::new().unwrap();

    let mut engine = open_engine(&dir).await;
    engine.deposit("ETH", dec!(2)).await.unwrap();
    engine
        .withdraw("BTC", "bitcoin", "bc1qdest", dec!(0.1))
        .await
        .unwrap();

    assert_eq!(engine.balance("ETH"), dec!(2));
    assert_eq!(engine.balance("BTC"), dec!(0.0995));
    assert_eq!(engine.deposits().len(), 1);
    assert_eq!(engine.withdrawals().len(), 1);
    // Every transfer lands in the combined log too.
    assert_eq!(engine.transactions().len(), 2);
    engine.close().await;

    let restored = open_engine(&dir).await;
    assert_eq!(restored.balance("ETH"), dec!(2));
    assert_eq!(restored.balance("BTC"), dec!(0.0995));
    assert_eq!(restored.deposits().len(), 1);
    assert_eq!(restored.withdrawals().len(), 1);
    assert_eq!(restored.transactions().len(), 2);
}

#[tokio::test]
async fn test_deposit_address_persists_across_restart() {
    let dir = TempDir::new().unwrap();

    let mut engine = open_engine(&dir).await;
    let address = engine.deposit_address("BTC").await;
    assert_eq!(engine.deposit_address("BTC").await, address);
    engine.close().await;

    let mut restored = open_engine(&dir).await;
    assert_eq!(restored.deposit_address("BTC").await, address);

    let regenerated = restored.regenerate_address("BTC").await;
    assert_ne!(regenerated, address);
    restored.close().await;

    let mut after = open_engine(&dir).await;
    assert_eq!(after.deposit_address("BTC").await, regenerated);
}

#[tokio::test]
async fn test_withdraw_insufficient_leaves_state_untouched() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    let result = engine.withdraw("BTC", "bitcoin", "bc1qdest", dec!(1)).await;
    assert!(result.is_err());
    assert_eq!(engine.balance("BTC"), dec!(0.2));
    assert!(engine.withdrawals().is_empty());
    assert!(engine.transactions().is_empty());
    assert_eq!(engine.stats().withdrawals, 0);
}

#[tokio::test]
async fn test_preview_withdrawal_is_read_only() {
    let dir = TempDir::new().unwrap();
    let engine = open_engine(&dir).await;

    let preview = engine.preview_withdrawal("BTC", "bitcoin", dec!(0.1));
    assert_eq!(preview.fee, dec!(0.0005));
    assert_eq!(preview.net_received, dec!(0.0995));
    assert_eq!(engine.balance("BTC"), dec!(0.2));
    assert!(engine.transactions().is_empty());
}

// ==================== Persistence failures ====================

/// A store whose writes always fail, for exercising the
/// log-and-swallow persistence policy.
struct BrokenStore;

#[async_trait]
impl StateStore for BrokenStore {
    async fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::other("disk full")))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_intents_succeed_when_persistence_fails() {
    let mut engine = Engine::new(&test_config(), Box::new(BrokenStore)).await;

    // The in-memory effect stands even though every save errors.
    let order = engine
        .submit_order(market_buy("BTC/USDT", dec!(0.1)))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Filled);
    assert_eq!(engine.balance("USDT"), dec!(3567.85));
    assert_eq!(engine.balance("BTC"), dec!(0.3));
    assert_eq!(engine.order_history().len(), 1);

    engine.deposit("ETH", dec!(1)).await.unwrap();
    assert_eq!(engine.balance("ETH"), dec!(1));

    engine.update_profile("alice", true).await;
    assert_eq!(engine.profile().username, "alice");
}

// ==================== Profile ====================

#[tokio::test]
async fn test_profile_update_persists() {
    let dir = TempDir::new().unwrap();

    let mut engine = open_engine(&dir).await;
    engine.update_profile("alice", true).await;
    assert_eq!(engine.profile().username, "alice");
    assert!(engine.profile().two_fa);
    engine.close().await;

    let restored = open_engine(&dir).await;
    assert_eq!(restored.profile().username, "alice");
    assert!(restored.profile().two_fa);
}

#[tokio::test]
async fn test_profile_empty_username_falls_back_to_guest() {
    let dir = TempDir::new().unwrap();
    let mut engine = open_engine(&dir).await;

    engine.update_profile("   ", false).await;
    assert_eq!(engine.profile().username, "guest");
}
