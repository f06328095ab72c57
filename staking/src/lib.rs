//! ARCADE Coin Staking Module
//!
//! Proportional reward accounting over a pool of staked ARC. Rewards injected
//! by the vault advance a single reward-per-unit index; each position
//! reconciles lazily against the index on its next touch instead of being
//! pushed to on every injection.

pub mod error;
pub mod pool;

pub use error::{Result, StakingError};
pub use pool::{StakePosition, StakingPool};
