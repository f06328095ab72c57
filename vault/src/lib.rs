//! ARCADE Coin Vault Module
//!
//! The treasury core of the economy: quarter purchases and consumption, the
//! yeet trigger counter, the periodic three-way distribution, the timelocked
//! emergency withdrawal, tipping limits and the oracle-gated buyback.

pub mod buyback;
pub mod config;
pub mod distributor;
pub mod error;
pub mod tipping;
pub mod withdrawal;

pub use buyback::{FixedRateVenue, SwapVenue};
pub use config::{ConfigError, EconomyConfig};
pub use distributor::{
    Distribution, DistributionSplit, PurchaseEntry, RevealParams, Vault,
    MAX_QUARTERS_PER_PURCHASE,
};
pub use error::{Result, VaultError};
pub use tipping::{TipLimiter, TipPolicy};
pub use withdrawal::{TimelockedWithdrawal, WithdrawalRequest};
