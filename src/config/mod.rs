//! Configuration loading and validation for the simulated exchange.
//!
//! Uses serde_yaml to load YAML configuration files. Only `app` and
//! `market` are required; wallet, fees and storage have documented
//! defaults.

mod app;
mod duration;
mod error;
mod fees;
mod market;
mod storage;
mod wallet;

pub use app::AppConfig;
pub use error::ConfigError;
pub use fees::{default_network_fee, FeesConfig};
pub use market::MarketConfig;
pub use storage::StorageConfig;
pub use wallet::{default_balances, WalletConfig};

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::domain::{split_pair, NetworkFee};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Pair catalog and synthetic feed settings.
    pub market: MarketConfig,
    /// Opening wallet balances (optional).
    pub wallet: Option<WalletConfig>,
    /// Withdrawal fee schedules (optional).
    pub fees: Option<FeesConfig>,
    /// State snapshot storage (optional).
    pub storage: Option<StorageConfig>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.market.pairs.is_empty() {
            return Err(ConfigError::Validation(
                "at least one trading pair is required".into(),
            ));
        }

        for ticker in &self.market.pairs {
            if split_pair(&ticker.pair).is_none() {
                return Err(ConfigError::Validation(format!(
                    "pair {}: must be in BASE/QUOTE format",
                    ticker.pair
                )));
            }
            if ticker.price <= Decimal::ZERO {
                return Err(ConfigError::Validation(format!(
                    "pair {}: price must be positive",
                    ticker.pair
                )));
            }
        }

        for (asset, balance) in &self.opening_balances() {
            if balance.is_sign_negative() {
                return Err(ConfigError::Validation(format!(
                    "wallet {}: opening balance must not be negative",
                    asset
                )));
            }
        }

        for (asset, schedule) in self.fee_schedules() {
            if schedule.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "fees {}: schedule must not be empty",
                    asset
                )));
            }
            for entry in schedule {
                if entry.fee.is_sign_negative() {
                    return Err(ConfigError::Validation(format!(
                        "fees {}/{}: fee must not be negative",
                        asset, entry.network
                    )));
                }
            }
        }

        Ok(())
    }

    /// Opening balances, falling back to the documented default wallet.
    pub fn opening_balances(&self) -> HashMap<String, Decimal> {
        match &self.wallet {
            Some(wallet) if !wallet.opening_balances.is_empty() => {
                wallet.opening_balances.clone()
            }
            _ => default_balances(),
        }
    }

    /// The fallback fee entry for assets without an explicit schedule.
    pub fn default_fee(&self) -> NetworkFee {
        self.fees
            .as_ref()
            .and_then(|f| f.default.clone())
            .unwrap_or_else(default_network_fee)
    }

    /// Per-asset fee schedules (possibly empty).
    pub fn fee_schedules(&self) -> HashMap<String, Vec<NetworkFee>> {
        self.fees
            .as_ref()
            .map(|f| f.schedules.clone())
            .unwrap_or_default()
    }

    /// Database path with the default applied.
    pub fn storage_path(&self) -> String {
        self.storage
            .as_ref()
            .and_then(|s| s.path.clone())
            .unwrap_or_else(|| "simplex.db".to_string())
    }
}
