//! Vault error types

use thiserror::Error;

use crate::config::ConfigError;

/// Vault treasury errors
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Quarter count must be between 1 and {max}, got {count}")]
    InvalidQuarterCount { count: u32, max: u32 },

    #[error("Insufficient time balance: requested {requested}s, available {available}s")]
    InsufficientTime { requested: u64, available: u64 },

    #[error("Caller {0} is not the vault administrator")]
    NotAdmin(String),

    #[error("Caller {0} is not the consume operator")]
    NotOperator(String),

    #[error("Distribution interval has not elapsed: last at {last}, now {now}")]
    DistributionTooSoon { last: u64, now: u64 },

    #[error("Nothing to distribute")]
    EmptyTreasury,

    #[error("Split parts must sum to 10000 basis points, got {0}")]
    InvalidSplit(u64),

    #[error("Address already configured")]
    AddressAlreadySet,

    #[error("Address not configured")]
    AddressNotSet,

    #[error("Zero address")]
    ZeroAddress,

    #[error("Zero amount")]
    ZeroAmount,

    #[error("Threshold must be positive")]
    ZeroThreshold,

    #[error("No pending random transfer for {0}")]
    NoPendingTransfer(String),

    #[error("Treasury cannot fund the transfer: needs {needed}, holds {available}")]
    InsufficientTreasury { needed: u64, available: u64 },

    #[error("Withdrawal already requested")]
    WithdrawalPending,

    #[error("No withdrawal requested")]
    NoWithdrawalRequested,

    #[error("Withdrawal timelock has not elapsed: requested at {requested_at}, now {now}")]
    WithdrawalLocked { requested_at: u64, now: u64 },

    #[error("Tipping is not enabled for {0}")]
    TippingDisabled(String),

    #[error("Tip below minimum: {amount} < {minimum}")]
    TipBelowMinimum { amount: u64, minimum: u64 },

    #[error("Daily tip limit exceeded: {spent} already sent, {amount} more breaks the {limit} cap")]
    DailyTipLimitExceeded { spent: u64, amount: u64, limit: u64 },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] arcade_core::LedgerError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] arcade_core::OracleError),

    #[error("Staking error: {0}")]
    Staking(#[from] staking::StakingError),

    #[error("Yeet error: {0}")]
    Yeet(#[from] yeet_engine::YeetError),
}

pub type Result<T> = std::result::Result<T, VaultError>;
