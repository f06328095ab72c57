//! Oracle-gated treasury buyback
//!
//! The swap venue is an external collaborator; the vault only validates the
//! price feed before routing funds to it. A stale or non-positive quote
//! fails the buyback without touching internal balances.

use arcade_core::{LedgerError, TokenLedger};

/// Interface presented by the external swap venue.
pub trait SwapVenue {
    /// Pull `spend` from `payer` and report the amount of ARC bought back.
    /// Routing of the acquired tokens is the venue's concern.
    fn execute_buyback(
        &mut self,
        ledger: &mut dyn TokenLedger,
        payer: &str,
        spend: u64,
    ) -> Result<u64, LedgerError>;
}

/// Venue stub for wiring and tests: takes payment into its own account and
/// reports a fixed-rate fill.
#[derive(Debug, Clone)]
pub struct FixedRateVenue {
    pub address: String,
    /// ARC bought per unit spent, expressed in basis points.
    pub fill_rate_bps: u64,
}

impl SwapVenue for FixedRateVenue {
    fn execute_buyback(
        &mut self,
        ledger: &mut dyn TokenLedger,
        payer: &str,
        spend: u64,
    ) -> Result<u64, LedgerError> {
        ledger.transfer(payer, &self.address, spend)?;
        Ok((spend as u128 * self.fill_rate_bps as u128 / 10_000) as u64)
    }
}
