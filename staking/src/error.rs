//! Staking error types

use thiserror::Error;

/// Staking pool errors
#[derive(Error, Debug)]
pub enum StakingError {
    #[error("Stake amount must be positive")]
    ZeroAmount,

    #[error("Insufficient stake: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u64, staked: u64 },

    #[error("Reward injection with no stakers")]
    NoStakers,

    #[error("Caller {0} is not the configured distributor")]
    NotDistributor(String),

    #[error("Distributor already configured")]
    DistributorAlreadySet,

    #[error("Arithmetic overflow in reward accounting")]
    ArithmeticOverflow,

    #[error("Ledger error: {0}")]
    Ledger(#[from] arcade_core::LedgerError),
}

pub type Result<T> = std::result::Result<T, StakingError>;
