//! ARCADE Coin Core Library
//!
//! Shared primitives for the ARC token economy: the token ledger interface,
//! the price oracle interface and economy-wide constants.

pub mod ledger;
pub mod oracle;

pub use ledger::{LedgerError, MemoryLedger, TokenLedger};
pub use oracle::{OracleError, PriceOracle, PriceQuote, StaticOracle};

/// Any address/account interacting with the economy.
///
/// The empty string is the zero value and is rejected wherever a live
/// address is required.
pub type Address = String;

/// Economic constants
pub mod constants {
    /// ARC token unit (8 decimal places)
    pub const ARC_UNIT: u64 = 100_000_000;

    /// Fixed-point scale for the global reward-per-unit index
    pub const REWARD_SCALE: u128 = 1_000_000_000_000_000_000;

    /// Basis-point denominator for treasury splits
    pub const BPS_DENOMINATOR: u64 = 10_000;

    /// Default cost of one quarter (0.25 ARC)
    pub const QUARTER_COST: u64 = ARC_UNIT / 4;

    /// Machine time granted per quarter (15 minutes)
    pub const QUARTER_DURATION_SECS: u64 = 900;

    /// Quarters purchased before a randomized transfer is owed
    pub const YEET_TRIGGER_THRESHOLD: u32 = 8;

    /// Minimum wait between treasury distributions (7 days)
    pub const DISTRIBUTION_INTERVAL_SECS: u64 = 7 * 86400;

    /// Delay between an emergency withdrawal request and its execution (48 hours)
    pub const WITHDRAWAL_DELAY_SECS: u64 = 48 * 3600;

    /// Oracle quotes older than this are unusable (1 hour)
    pub const MAX_PRICE_AGE_SECS: u64 = 3600;
}
