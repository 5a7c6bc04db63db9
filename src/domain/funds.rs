//! Deposit, withdrawal and transaction-log entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// TransferStatus is the state of a deposit or withdrawal.
///
/// In this simulation `Pending` is a terminal display state for
/// withdrawals; nothing internal ever advances it to `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    Pending,
    Confirmed,
}

/// TransactionKind distinguishes entries in the combined transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

/// Deposit is an append-only record of a simulated incoming transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub id: String,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    pub asset: String,
    pub amount: Decimal,
    pub status: TransferStatus,
}

/// Withdrawal is an append-only record of a simulated outgoing transfer.
/// The fee is burned: it is debited along with the amount and never
/// credited anywhere, matching a real on-chain fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: String,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    pub asset: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub network: String,
    pub address: String,
    pub status: TransferStatus,
}

/// Transaction is one entry in the combined deposit/withdrawal log.
/// Every deposit or withdrawal appends exactly one transaction with the
/// same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "time")]
    pub created_at: DateTime<Utc>,
    pub kind: TransactionKind,
    pub asset: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub status: TransferStatus,
}

/// NetworkFee is one entry in a per-asset withdrawal fee schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFee {
    /// Network identifier (e.g., "trc20").
    pub network: String,
    /// Human-readable network name.
    pub display_name: String,
    /// Fixed fee in asset units.
    pub fee: Decimal,
}

/// WithdrawalPreview is the side-effect-free quote for a withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalPreview {
    pub fee: Decimal,
    pub net_received: Decimal,
}
