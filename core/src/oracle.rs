//! Price oracle interface
//!
//! The oracle is an external collaborator; the economy only consumes
//! `latest_price()` and rejects quotes that are stale or non-positive.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_PRICE_AGE_SECS;

/// Oracle errors
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Stale price: quoted at {updated_at}, now {now}")]
    StalePrice { updated_at: u64, now: u64 },

    #[error("Non-positive price")]
    NonPositivePrice,

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;

/// A spot price together with the time it was observed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price value in the venue's quote units.
    pub value: u64,
    /// Unix time the price was last updated.
    pub updated_at: u64,
}

impl PriceQuote {
    /// Reject quotes that are unusable for settlement.
    pub fn validate(&self, now: u64) -> Result<()> {
        if self.value == 0 {
            return Err(OracleError::NonPositivePrice);
        }
        if now.saturating_sub(self.updated_at) > MAX_PRICE_AGE_SECS {
            log::warn!(
                "rejecting stale price quote: updated_at={} now={}",
                self.updated_at,
                now
            );
            return Err(OracleError::StalePrice {
                updated_at: self.updated_at,
                now,
            });
        }
        Ok(())
    }
}

/// Price feed collaborator.
pub trait PriceOracle {
    fn latest_price(&self) -> Result<PriceQuote>;
}

/// Fixed-quote oracle for wiring and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticOracle {
    pub quote: PriceQuote,
}

impl PriceOracle for StaticOracle {
    fn latest_price(&self) -> Result<PriceQuote> {
        Ok(self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_quote_passes() {
        let quote = PriceQuote {
            value: 150,
            updated_at: 10_000,
        };
        assert!(quote.validate(10_500).is_ok());
    }

    #[test]
    fn test_stale_quote_rejected() {
        let quote = PriceQuote {
            value: 150,
            updated_at: 10_000,
        };
        // One second past the one-hour bound.
        let result = quote.validate(10_000 + MAX_PRICE_AGE_SECS + 1);
        assert!(matches!(result, Err(OracleError::StalePrice { .. })));
        // Exactly at the bound is still acceptable.
        assert!(quote.validate(10_000 + MAX_PRICE_AGE_SECS).is_ok());
    }

    #[test]
    fn test_zero_price_rejected() {
        let quote = PriceQuote {
            value: 0,
            updated_at: 10_000,
        };
        assert!(matches!(
            quote.validate(10_000),
            Err(OracleError::NonPositivePrice)
        ));
    }
}
