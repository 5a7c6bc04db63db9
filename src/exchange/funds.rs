//! Funds simulation: deposit addresses, simulated deposits and
//! fee-scheduled withdrawals.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{
    Deposit, NetworkFee, Transaction, TransactionKind, TransferStatus, Withdrawal,
    WithdrawalPreview,
};

use super::{ExchangeError, IdSource, Result, WalletLedger};

/// FundsSimulator exclusively owns deposit addresses, deposit and
/// withdrawal records and the combined transaction log.
///
/// It never touches balances directly: every credit or debit goes through
/// the [`WalletLedger`] passed into the mutating operations. Every deposit
/// or withdrawal appends exactly one transaction entry with the same id.
#[derive(Debug, Clone)]
pub struct FundsSimulator {
    addresses: HashMap<String, String>,
    deposits: Vec<Deposit>,
    withdrawals: Vec<Withdrawal>,
    transactions: Vec<Transaction>,
    schedules: HashMap<String, Vec<NetworkFee>>,
    default_fee: NetworkFee,
}

impl FundsSimulator {
    /// Creates a simulator from persisted records and the configured fee
    /// schedules.
    pub fn new(
        addresses: HashMap<String, String>,
        deposits: Vec<Deposit>,
        withdrawals: Vec<Withdrawal>,
        transactions: Vec<Transaction>,
        schedules: HashMap<String, Vec<NetworkFee>>,
        default_fee: NetworkFee,
    ) -> Self {
        Self {
            addresses,
            deposits,
            withdrawals,
            transactions,
            schedules,
            default_fee,
        }
    }

    /// Returns the cached deposit address for an asset, generating and
    /// caching one on first request. The address is stable until
    /// explicitly regenerated.
    pub fn deposit_address(&mut self, asset: &str, ids: &mut IdSource) -> String {
        if let Some(address) = self.addresses.get(asset) {
            return address.clone();
        }
        self.regenerate_address(asset, ids)
    }

    /// Unconditionally replaces the cached address for an asset.
    pub fn regenerate_address(&mut self, asset: &str, ids: &mut IdSource) -> String {
        let address = make_address(asset, &ids.next_id());
        self.addresses.insert(asset.to_string(), address.clone());
        debug!(asset, address = %address, "deposit address assigned");
        address
    }

    /// Credits the ledger and appends a confirmed deposit plus a matching
    /// zero-fee transaction entry.
    pub fn simulate_deposit(
        &mut self,
        asset: &str,
        amount: Decimal,
        ledger: &mut WalletLedger,
        ids: &mut IdSource,
    ) -> Result<Deposit> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount);
        }

        ledger.credit(asset, amount);

        let deposit = Deposit {
            id: ids.next_id(),
            created_at: Utc::now(),
            asset: asset.to_string(),
            amount,
            status: TransferStatus::Confirmed,
        };
        self.deposits.insert(0, deposit.clone());
        self.transactions.insert(
            0,
            Transaction {
                id: deposit.id.clone(),
                created_at: deposit.created_at,
                kind: TransactionKind::Deposit,
                asset: deposit.asset.clone(),
                amount,
                fee: Decimal::ZERO,
                status: TransferStatus::Confirmed,
            },
        );
        debug!(asset, %amount, id = %deposit.id, "deposit confirmed");
        Ok(deposit)
    }

    /// Returns the withdrawal fee schedule for an asset: the configured
    /// per-asset entries, or the single default entry for assets without
    /// an explicit schedule.
    pub fn fee_schedule(&self, asset: &str) -> &[NetworkFee] {
        self.schedules
            .get(asset)
            .map(Vec::as_slice)
            .filter(|s| !s.is_empty())
            .unwrap_or(std::slice::from_ref(&self.default_fee))
    }

    /// Resolves the fee entry for a network within an asset's schedule,
    /// falling back to the schedule's first entry for unknown networks.
    fn resolve_fee(&self, asset: &str, network: &str) -> NetworkFee {
        let schedule = self.fee_schedule(asset);
        match schedule.iter().find(|f| f.network == network) {
            Some(entry) => entry.clone(),
            None => {
                debug!(asset, network, fallback = %schedule[0].network, "unknown network, using schedule fallback fee");
                schedule[0].clone()
            }
        }
    }

    /// Pure withdrawal quote: the resolved fee and the net amount the
    /// destination would receive. No state is touched.
    pub fn preview_withdrawal(
        &self,
        asset: &str,
        network: &str,
        amount: Decimal,
    ) -> WithdrawalPreview {
        let fee = self.resolve_fee(asset, network).fee;
        WithdrawalPreview {
            fee,
            net_received: (amount - fee).max(Decimal::ZERO),
        }
    }

    /// Debits `amount + fee` from the ledger in a single call and appends
    /// a pending withdrawal plus a matching transaction entry.
    ///
    /// The balance check explicitly includes the fee, so the shortfall in
    /// an `InsufficientFunds` failure accounts for it. The fee itself is
    /// burned.
    pub fn withdraw(
        &mut self,
        asset: &str,
        network: &str,
        address: &str,
        amount: Decimal,
        ledger: &mut WalletLedger,
        ids: &mut IdSource,
    ) -> Result<Withdrawal> {
        if address.trim().is_empty() {
            return Err(ExchangeError::InvalidAddress);
        }
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount);
        }

        let fee_entry = self.resolve_fee(asset, network);
        ledger.debit(asset, amount + fee_entry.fee)?;

        // The record keeps the network the caller asked for; only the fee
        // comes from the resolved schedule entry.
        let withdrawal = Withdrawal {
            id: ids.next_id(),
            created_at: Utc::now(),
            asset: asset.to_string(),
            amount,
            fee: fee_entry.fee,
            network: network.to_string(),
            address: address.to_string(),
            status: TransferStatus::Pending,
        };
        self.withdrawals.insert(0, withdrawal.clone());
        self.transactions.insert(
            0,
            Transaction {
                id: withdrawal.id.clone(),
                created_at: withdrawal.created_at,
                kind: TransactionKind::Withdrawal,
                asset: withdrawal.asset.clone(),
                amount,
                fee: withdrawal.fee,
                status: TransferStatus::Pending,
            },
        );
        debug!(asset, %amount, fee = %withdrawal.fee, id = %withdrawal.id, "withdrawal pending");
        Ok(withdrawal)
    }

    /// Returns the cached deposit addresses.
    pub fn addresses(&self) -> &HashMap<String, String> {
        &self.addresses
    }

    /// Returns the deposit records, newest first.
    pub fn deposits(&self) -> &[Deposit] {
        &self.deposits
    }

    /// Returns the withdrawal records, newest first.
    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    /// Returns the combined transaction log, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// Builds an opaque, asset-prefixed deposit address from a unique token.
fn make_address(asset: &str, token: &str) -> String {
    let digest = Sha256::digest(format!("{asset}:{token}").as_bytes());
    format!("{}{}", asset.to_lowercase(), hex::encode(&digest[..16]))
}
