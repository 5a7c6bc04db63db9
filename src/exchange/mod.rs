//! The simulated exchange core: price feed, wallet ledger, order
//! lifecycle and funds simulation.
//!
//! All components are plain structs owned by the engine and mutated by
//! run-to-completion handlers, so no synchronization is needed. The funds
//! simulator and order manager never touch balances directly; every
//! balance change goes through [`WalletLedger`].

mod book;
mod feed;
mod funds;
mod ids;
mod ledger;
mod orders;

pub use book::synthesize_book;
pub use feed::PriceFeed;
pub use funds::FundsSimulator;
pub use ids::IdSource;
pub use ledger::WalletLedger;
pub use orders::{OrderManager, OrderRequest};

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by exchange intents. All are recoverable validation
/// failures reported to the caller; none of them aborts the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    /// Amount must be greater than zero.
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Limit price must be greater than zero.
    #[error("invalid price: must be greater than zero")]
    InvalidPrice,

    /// Withdrawal destination address must not be empty.
    #[error("invalid address: destination address is required")]
    InvalidAddress,

    /// Balance is too low for the requested operation.
    #[error("insufficient {asset}: short {shortfall}")]
    InsufficientFunds { asset: String, shortfall: Decimal },

    /// Trading pair is not in the catalog or is malformed.
    #[error("unknown pair: {0}")]
    UnknownPair(String),
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
