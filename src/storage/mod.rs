//! Persistence gateway: durable key/value state slices.
//!
//! Each owning component reads its slice at startup and writes it back
//! after every mutation. A missing or corrupt slice falls back to its
//! documented default instead of propagating a parse failure.

mod sqlite;

pub use sqlite::{SqliteStore, SqliteStoreConfig};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Persisted slice keys. The names match the reference snapshot format so
/// an existing snapshot stays loadable.
pub mod keys {
    pub const USER: &str = "user";
    pub const WALLET: &str = "wallet";
    pub const OPEN_ORDERS: &str = "openOrders";
    pub const ORDER_HISTORY: &str = "orderHistory";
    pub const DEPOSIT_ADDRESSES: &str = "depositAddresses";
    pub const DEPOSITS: &str = "deposits";
    pub const WITHDRAWALS: &str = "withdrawals";
    pub const TRANSACTIONS: &str = "transactions";
}

/// StateStore defines the interface for the durable key/value store.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the raw JSON value for a key. Ok(None) if the key is absent.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Saves the raw JSON value for a key, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Closes the store.
    async fn close(&self) -> Result<(), StorageError>;
}

/// StorageError represents errors that can occur during storage
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads and decodes one state slice, falling back to the given default
/// when the slice is absent, unreadable or corrupt.
pub async fn load_slice<T: DeserializeOwned>(store: &dyn StateStore, key: &str, default: T) -> T {
    match store.load(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "corrupt state slice, using default");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!(key, error = %e, "failed to load state slice, using default");
            default
        }
    }
}

/// Encodes and saves one state slice. Persistence failures are logged and
/// swallowed: the in-memory effect of the operation stands regardless.
pub async fn save_slice<T: Serialize>(store: &dyn StateStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "failed to encode state slice");
            return;
        }
    };
    if let Err(e) = store.save(key, &raw).await {
        warn!(key, error = %e, "failed to persist state slice");
    }
}
