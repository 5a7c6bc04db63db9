mod config;
mod domain;
mod engine;
mod exchange;
mod storage;

use config::Config;
use domain::{OrderSide, OrderType};
use engine::Engine;
use exchange::OrderRequest;
use rust_decimal_macros::dec;
use std::env;
use storage::{SqliteStore, SqliteStoreConfig};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = parse_config_path();
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    let store = match SqliteStore::new(SqliteStoreConfig {
        path: config.storage_path(),
        ..Default::default()
    })
    .await
    {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to open state store");
            return;
        }
    };

    let mut engine = Engine::new(&config, Box::new(store)).await;
    info!(config = %config_path, app = %config.app.name, "Engine initialized");

    if env::args().any(|arg| arg == "--demo-session") {
        demo_session(&mut engine).await;
        engine.close().await;
        return;
    }

    run(&mut engine, &config).await;
    engine.close().await;
}

/// Drives the feed until Ctrl+C, logging a market summary every tick.
async fn run(engine: &mut Engine, config: &Config) {
    let mut interval = tokio::time::interval(config.market.tick_interval());
    info!(
        interval = ?config.market.tick_interval(),
        pairs = engine.tickers().len(),
        "Feed running (press Ctrl+C to stop)"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                engine.tick();
                for ticker in engine.tickers() {
                    info!(
                        pair = %ticker.pair,
                        price = %ticker.price,
                        change = %ticker.change,
                        "tick"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    let stats = engine.stats();
    info!(
        ticks = stats.ticks,
        orders = stats.orders_submitted,
        total_value = %engine.total_value(),
        "Shutting down"
    );
}

/// Runs a scripted session against the engine and exits. Useful for
/// exercising the persistence path end to end against a real database.
async fn demo_session(engine: &mut Engine) {
    info!(total_value = %engine.total_value(), "Demo session starting");

    for _ in 0..5 {
        engine.tick();
    }

    let buy = OrderRequest {
        pair: "BTC/USDT".to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Market,
        price: None,
        amount: dec!(0.01),
    };
    match engine.submit_order(buy).await {
        Ok(order) => info!(id = %order.id, price = %order.price, "Market buy filled"),
        Err(e) => error!(error = %e, "Market buy rejected"),
    }

    let sell = OrderRequest {
        pair: "BTC/USDT".to_string(),
        side: OrderSide::Sell,
        order_type: OrderType::Limit,
        price: Some(dec!(70000)),
        amount: dec!(0.01),
    };
    match engine.submit_order(sell).await {
        Ok(order) => {
            info!(id = %order.id, "Limit sell resting");
            if engine.cancel_order(&order.id).await.is_some() {
                info!(id = %order.id, "Limit sell cancelled");
            }
        }
        Err(e) => error!(error = %e, "Limit sell rejected"),
    }

    let address = engine.deposit_address("ETH").await;
    info!(%address, "ETH deposit address");

    match engine.deposit("ETH", dec!(1)).await {
        Ok(deposit) => info!(id = %deposit.id, "Deposit confirmed"),
        Err(e) => error!(error = %e, "Deposit rejected"),
    }

    let preview = engine.preview_withdrawal("ETH", "erc20", dec!(0.5));
    info!(fee = %preview.fee, net = %preview.net_received, "Withdrawal preview");

    match engine.withdraw("ETH", "erc20", &address, dec!(0.5)).await {
        Ok(withdrawal) => info!(id = %withdrawal.id, fee = %withdrawal.fee, "Withdrawal pending"),
        Err(e) => error!(error = %e, "Withdrawal rejected"),
    }

    let stats = engine.stats();
    info!(
        orders = stats.orders_submitted,
        cancelled = stats.orders_cancelled,
        deposits = stats.deposits,
        withdrawals = stats.withdrawals,
        total_value = %engine.total_value(),
        "Demo session finished"
    );
}
