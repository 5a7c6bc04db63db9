//! Wallet ledger: per-asset balances with conservation rules.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::{ExchangeError, Result};

/// WalletLedger exclusively owns the asset balance map.
///
/// Balances never go negative: every debiting operation checks the balance
/// first and fails with `InsufficientFunds` instead of underflowing.
/// A reservation against an open limit order is modeled as an immediate
/// debit and reversed by an equal credit on cancel; there is no separate
/// locked sub-balance.
#[derive(Debug, Clone, Default)]
pub struct WalletLedger {
    balances: HashMap<String, Decimal>,
}

impl WalletLedger {
    /// Creates a ledger from a persisted or configured balance map.
    pub fn from_balances(balances: HashMap<String, Decimal>) -> Self {
        Self { balances }
    }

    /// Returns the balance for an asset, zero for unknown assets.
    pub fn balance(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or(Decimal::ZERO)
    }

    /// Returns the full balance map.
    pub fn balances(&self) -> &HashMap<String, Decimal> {
        &self.balances
    }

    /// Unconditionally credits an asset.
    pub fn credit(&mut self, asset: &str, amount: Decimal) {
        *self.balances.entry(asset.to_string()).or_default() += amount;
    }

    /// Debits an asset, failing with `InsufficientFunds` (carrying the
    /// asset and the shortfall) if the balance would underflow. On failure
    /// the ledger is left untouched.
    pub fn debit(&mut self, asset: &str, amount: Decimal) -> Result<()> {
        let balance = self.balance(asset);
        if balance < amount {
            return Err(ExchangeError::InsufficientFunds {
                asset: asset.to_string(),
                shortfall: amount - balance,
            });
        }
        self.balances.insert(asset.to_string(), balance - amount);
        Ok(())
    }

    /// Reserves funds against an open order. Modeled as an immediate
    /// debit.
    pub fn reserve(&mut self, asset: &str, amount: Decimal) -> Result<()> {
        self.debit(asset, amount)
    }

    /// Releases a reservation back to the balance (order cancel). Credits
    /// the literal reserved amount.
    pub fn release(&mut self, asset: &str, amount: Decimal) {
        self.credit(asset, amount);
    }

    /// Settles a trade: debits the spent asset and credits the acquired
    /// asset as one operation. The debit is checked first, so a failed
    /// settlement leaves the ledger untouched.
    pub fn settle(
        &mut self,
        debit_asset: &str,
        debit_amount: Decimal,
        credit_asset: &str,
        credit_amount: Decimal,
    ) -> Result<()> {
        self.debit(debit_asset, debit_amount)?;
        self.credit(credit_asset, credit_amount);
        Ok(())
    }

    /// Total wallet value in the quote asset, the quote asset itself
    /// valued at 1. Assets without a known price contribute nothing.
    pub fn total_value(&self, prices: &HashMap<String, Decimal>, quote_asset: &str) -> Decimal {
        self.balances
            .iter()
            .map(|(asset, amount)| {
                if asset == quote_asset {
                    *amount
                } else {
                    prices.get(asset).copied().unwrap_or(Decimal::ZERO) * amount
                }
            })
            .sum()
    }
}
