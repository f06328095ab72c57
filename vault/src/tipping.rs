//! Daily tip allowances
//!
//! A thin per-principal rate limit in front of the transfer executor: tips
//! below the minimum are rejected, and each principal gets a rolling daily
//! allowance keyed by unix day.

use arcade_core::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, VaultError};

const SECS_PER_DAY: u64 = 86_400;

/// Tip limit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipPolicy {
    pub minimum_tip: u64,
    pub daily_tip_limit: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TipAllowance {
    day: u64,
    spent: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipLimiter {
    policy: TipPolicy,
    allowances: HashMap<Address, TipAllowance>,
}

impl TipLimiter {
    pub fn new(policy: TipPolicy) -> Self {
        TipLimiter {
            policy,
            allowances: HashMap::new(),
        }
    }

    pub fn policy(&self) -> TipPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: TipPolicy) {
        self.policy = policy;
    }

    /// Amount already tipped by `principal` during the current unix day.
    pub fn spent_today(&self, principal: &str, now: u64) -> u64 {
        let day = now / SECS_PER_DAY;
        match self.allowances.get(principal) {
            Some(allowance) if allowance.day == day => allowance.spent,
            _ => 0,
        }
    }

    /// Validate `amount` against the policy without recording it. Returns
    /// the day-total the spend would reach.
    pub fn check(&self, principal: &str, amount: u64, now: u64) -> Result<u64> {
        if amount < self.policy.minimum_tip {
            return Err(VaultError::TipBelowMinimum {
                amount,
                minimum: self.policy.minimum_tip,
            });
        }
        let spent = self.spent_today(principal, now);
        let total = spent
            .checked_add(amount)
            .ok_or(VaultError::ArithmeticOverflow)?;
        if total > self.policy.daily_tip_limit {
            return Err(VaultError::DailyTipLimitExceeded {
                spent,
                amount,
                limit: self.policy.daily_tip_limit,
            });
        }
        Ok(total)
    }

    /// Record a spend previously validated with `check`.
    pub fn record(&mut self, principal: &str, day_total: u64, now: u64) {
        let day = now / SECS_PER_DAY;
        self.allowances.insert(
            principal.to_string(),
            TipAllowance {
                day,
                spent: day_total,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> TipLimiter {
        TipLimiter::new(TipPolicy {
            minimum_tip: 10,
            daily_tip_limit: 100,
        })
    }

    #[test]
    fn test_minimum_tip_enforced() {
        let tips = limiter();
        assert!(matches!(
            tips.check("alice", 9, 1000),
            Err(VaultError::TipBelowMinimum {
                amount: 9,
                minimum: 10
            })
        ));
        assert!(tips.check("alice", 10, 1000).is_ok());
    }

    #[test]
    fn test_daily_limit_enforced() {
        let mut tips = limiter();
        let total = tips.check("alice", 60, 1000).unwrap();
        tips.record("alice", total, 1000);

        let total = tips.check("alice", 40, 2000).unwrap();
        tips.record("alice", total, 2000);
        assert_eq!(tips.spent_today("alice", 2000), 100);

        assert!(matches!(
            tips.check("alice", 10, 3000),
            Err(VaultError::DailyTipLimitExceeded {
                spent: 100,
                amount: 10,
                limit: 100
            })
        ));
    }

    #[test]
    fn test_allowance_resets_next_day() {
        let mut tips = limiter();
        let total = tips.check("alice", 100, 1000).unwrap();
        tips.record("alice", total, 1000);

        let next_day = 1000 + SECS_PER_DAY;
        assert_eq!(tips.spent_today("alice", next_day), 0);
        assert!(tips.check("alice", 100, next_day).is_ok());
    }

    #[test]
    fn test_allowances_are_per_principal() {
        let mut tips = limiter();
        let total = tips.check("alice", 100, 1000).unwrap();
        tips.record("alice", total, 1000);

        assert!(tips.check("bob", 100, 1000).is_ok());
    }
}
