//! Account ledger for the ARC token
//!
//! The economy treats the token contract as an atomic value-movement
//! primitive: a transfer either fully applies or fails with no state change.
//! `MemoryLedger` is the in-process implementation used for wiring and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Token ledger errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    #[error("Transfer amount must be positive")]
    ZeroAmount,

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Balance overflow")]
    BalanceOverflow,
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Interface presented by the fungible-token contract.
pub trait TokenLedger {
    /// Move `amount` from `from` to `to`, all-or-nothing.
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()>;

    /// Current balance of `holder` (zero for unknown accounts).
    fn balance_of(&self, holder: &str) -> u64;
}

/// In-memory ARC ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    accounts: HashMap<String, u64>,
    total_supply: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly issued ARC to an account.
    pub fn mint(&mut self, recipient: &str, amount: u64) -> Result<()> {
        if recipient.is_empty() {
            return Err(LedgerError::InvalidAddress);
        }
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        let balance = self.accounts.entry(recipient.to_string()).or_insert(0);
        // Cannot overflow: every balance is bounded by total_supply.
        *balance += amount;
        self.total_supply = new_supply;
        Ok(())
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }
}

impl TokenLedger for MemoryLedger {
    fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        if from.is_empty() || to.is_empty() {
            return Err(LedgerError::InvalidAddress);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        if from != to {
            // Credit cannot overflow: sum of balances equals total_supply.
            let credited = self.balance_of(to) + amount;
            self.accounts.insert(from.to_string(), available - amount);
            self.accounts.insert(to.to_string(), credited);
        }
        Ok(())
    }

    fn balance_of(&self, holder: &str) -> u64 {
        self.accounts.get(holder).copied().unwrap_or(0)
    }
}
