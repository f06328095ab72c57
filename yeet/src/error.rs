//! Yeet engine error types

use thiserror::Error;

/// Yeet engine errors
#[derive(Error, Debug)]
pub enum YeetError {
    #[error("Already eligible: {0}")]
    AlreadyEligible(String),

    #[error("Not eligible: {0}")]
    NotEligible(String),

    #[error("Commit hash cannot be the zero sentinel")]
    ZeroCommitHash,

    #[error("No active commit for caller")]
    NoActiveCommit,

    #[error("Reveal too early: committed at block {commit_block}, revealed at {block_height}")]
    RevealTooEarly {
        commit_block: u64,
        block_height: u64,
    },

    #[error("Commit expired: committed at block {commit_block}, revealed at {block_height}")]
    CommitExpired {
        commit_block: u64,
        block_height: u64,
    },

    #[error("Secret does not match the committed hash")]
    CommitMismatch,

    #[error("No eligible recipients")]
    EmptyEligibleSet,

    #[error("Transfer amount must be positive")]
    ZeroAmount,

    #[error("Zero address")]
    ZeroAddress,

    #[error("Caller {0} is not the configured distributor")]
    NotDistributor(String),

    #[error("Distributor already configured")]
    DistributorAlreadySet,

    #[error("Leaderboard total overflow")]
    ArithmeticOverflow,

    #[error("Ledger error: {0}")]
    Ledger(#[from] arcade_core::LedgerError),
}

pub type Result<T> = std::result::Result<T, YeetError>;
