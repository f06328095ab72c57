//! ARCADE Coin Yeet Engine
//!
//! Randomized peer-to-peer transfers: a dense registry of eligible
//! recipients, a commit-reveal protocol that resolves to one of them, and
//! the privileged transfer executor feeding the sender leaderboard.

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::{
    commit_digest, CommitRecord, YeetEngine, LEADERBOARD_SIZE, MAX_COMMIT_AGE_BLOCKS,
    MIN_REVEAL_DELAY_BLOCKS,
};
pub use error::{Result, YeetError};
pub use registry::EligibilitySet;
