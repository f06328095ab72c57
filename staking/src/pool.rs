//! Staking pool with lazy reward settlement
//!
//! A single monotonically non-decreasing index tracks cumulative reward per
//! staked unit at `REWARD_SCALE` fixed-point precision. Every mutating
//! operation settles the touched position against the index before changing
//! balances. Integer division truncates downward, so the pool never pays out
//! more than was injected.

use arcade_core::constants::REWARD_SCALE;
use arcade_core::{Address, TokenLedger};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, StakingError};

/// Per-principal staking state.
///
/// Positions are never deleted; a fully unstaked principal keeps a
/// zero-balance entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakePosition {
    pub staked_amount: u64,
    /// Global index value this position last reconciled against.
    pub reward_index_checkpoint: u128,
    /// Settled but unclaimed rewards.
    pub accrued_unclaimed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingPool {
    /// Ledger account holding all staked ARC and injected rewards.
    address: Address,
    /// Peer allowed to inject rewards (the vault). Wired exactly once.
    distributor: Option<Address>,
    positions: HashMap<Address, StakePosition>,
    total_staked: u64,
    /// Cumulative reward per staked unit, fixed-point at `REWARD_SCALE`.
    global_reward_index: u128,
}

impl StakingPool {
    pub fn new(address: impl Into<Address>) -> Self {
        StakingPool {
            address: address.into(),
            distributor: None,
            positions: HashMap::new(),
            total_staked: 0,
            global_reward_index: 0,
        }
    }

    /// Wire the distributor peer. Allowed exactly once per instance.
    pub fn set_distributor(&mut self, distributor: impl Into<Address>) -> Result<()> {
        if self.distributor.is_some() {
            return Err(StakingError::DistributorAlreadySet);
        }
        self.distributor = Some(distributor.into());
        Ok(())
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn total_staked(&self) -> u64 {
        self.total_staked
    }

    pub fn global_reward_index(&self) -> u128 {
        self.global_reward_index
    }

    pub fn position(&self, principal: &str) -> Option<&StakePosition> {
        self.positions.get(principal)
    }

    /// Number of principals with a nonzero stake.
    pub fn staker_count(&self) -> usize {
        self.positions
            .values()
            .filter(|p| p.staked_amount > 0)
            .count()
    }

    /// Live reward for `principal` under the current index, without settling.
    pub fn earned(&self, principal: &str) -> Result<u64> {
        match self.positions.get(principal) {
            Some(position) => Self::pending_reward(position, self.global_reward_index),
            None => Ok(0),
        }
    }

    /// Lock `amount` ARC for `principal`.
    pub fn stake(
        &mut self,
        ledger: &mut dyn TokenLedger,
        principal: &str,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        self.settle(principal)?;
        let staked = self
            .positions
            .get(principal)
            .map(|p| p.staked_amount)
            .unwrap_or(0);
        let new_staked = staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let new_total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        ledger.transfer(principal, &self.address, amount)?;

        if let Some(position) = self.positions.get_mut(principal) {
            position.staked_amount = new_staked;
        }
        self.total_staked = new_total;
        log::debug!(
            "stake: {} +{} ARC (pool total {})",
            principal,
            amount,
            new_total
        );
        Ok(())
    }

    /// Release `amount` ARC back to `principal`.
    pub fn unstake(
        &mut self,
        ledger: &mut dyn TokenLedger,
        principal: &str,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        self.settle(principal)?;
        let staked = self
            .positions
            .get(principal)
            .map(|p| p.staked_amount)
            .unwrap_or(0);
        if amount > staked {
            return Err(StakingError::InsufficientStake {
                requested: amount,
                staked,
            });
        }

        ledger.transfer(&self.address, principal, amount)?;

        if let Some(position) = self.positions.get_mut(principal) {
            position.staked_amount = staked - amount;
        }
        self.total_staked -= amount;
        log::debug!(
            "unstake: {} -{} ARC (pool total {})",
            principal,
            amount,
            self.total_staked
        );
        Ok(())
    }

    /// Pay out the principal's settled rewards. Settles even when the payout
    /// is zero.
    pub fn claim(&mut self, ledger: &mut dyn TokenLedger, principal: &str) -> Result<u64> {
        self.settle(principal)?;
        let payout = self
            .positions
            .get(principal)
            .map(|p| p.accrued_unclaimed)
            .unwrap_or(0);
        if payout == 0 {
            return Ok(0);
        }

        ledger.transfer(&self.address, principal, payout)?;

        if let Some(position) = self.positions.get_mut(principal) {
            position.accrued_unclaimed = 0;
        }
        log::debug!("claim: {} paid {} ARC", principal, payout);
        Ok(payout)
    }

    /// Fold `amount` of new rewards into the index. Privileged to the wired
    /// distributor; fails when nobody is staked, so the caller can redirect.
    pub fn inject_reward(
        &mut self,
        ledger: &mut dyn TokenLedger,
        caller: &str,
        amount: u64,
    ) -> Result<()> {
        match &self.distributor {
            Some(distributor) if distributor == caller => {}
            _ => return Err(StakingError::NotDistributor(caller.to_string())),
        }
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        if self.total_staked == 0 {
            return Err(StakingError::NoStakers);
        }
        let bump = (amount as u128)
            .checked_mul(REWARD_SCALE)
            .ok_or(StakingError::ArithmeticOverflow)?
            / (self.total_staked as u128);
        let new_index = self
            .global_reward_index
            .checked_add(bump)
            .ok_or(StakingError::ArithmeticOverflow)?;

        ledger.transfer(caller, &self.address, amount)?;

        self.global_reward_index = new_index;
        log::info!(
            "reward injection: {} ARC over {} staked (index {})",
            amount,
            self.total_staked,
            new_index
        );
        Ok(())
    }

    /// Bank the position's pending reward and advance its checkpoint.
    fn settle(&mut self, principal: &str) -> Result<()> {
        let index = self.global_reward_index;
        let position = self.positions.entry(principal.to_string()).or_default();
        let settled = Self::pending_reward(position, index)?;
        position.accrued_unclaimed = settled;
        position.reward_index_checkpoint = index;
        Ok(())
    }

    fn pending_reward(position: &StakePosition, index: u128) -> Result<u64> {
        let delta = index
            .checked_sub(position.reward_index_checkpoint)
            .ok_or(StakingError::ArithmeticOverflow)?;
        let newly_accrued = (position.staked_amount as u128)
            .checked_mul(delta)
            .ok_or(StakingError::ArithmeticOverflow)?
            / REWARD_SCALE;
        let newly_accrued =
            u64::try_from(newly_accrued).map_err(|_| StakingError::ArithmeticOverflow)?;
        position
            .accrued_unclaimed
            .checked_add(newly_accrued)
            .ok_or(StakingError::ArithmeticOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_core::{MemoryLedger, TokenLedger};

    const POOL: &str = "pool";
    const VAULT: &str = "vault";

    fn setup(balances: &[(&str, u64)]) -> (MemoryLedger, StakingPool) {
        let mut ledger = MemoryLedger::new();
        for (holder, amount) in balances {
            ledger.mint(holder, *amount).unwrap();
        }
        let mut pool = StakingPool::new(POOL);
        pool.set_distributor(VAULT).unwrap();
        (ledger, pool)
    }

    #[test]
    fn test_stake_moves_tokens_and_updates_totals() {
        let (mut ledger, mut pool) = setup(&[("alice", 1000)]);

        pool.stake(&mut ledger, "alice", 600).unwrap();

        assert_eq!(pool.total_staked(), 600);
        assert_eq!(pool.position("alice").unwrap().staked_amount, 600);
        assert_eq!(ledger.balance_of("alice"), 400);
        assert_eq!(ledger.balance_of(POOL), 600);
    }

    #[test]
    fn test_stake_rejects_zero_amount() {
        let (mut ledger, mut pool) = setup(&[("alice", 1000)]);
        assert!(matches!(
            pool.stake(&mut ledger, "alice", 0),
            Err(StakingError::ZeroAmount)
        ));
    }

    #[test]
    fn test_unstake_bounds() {
        let (mut ledger, mut pool) = setup(&[("alice", 1000)]);
        pool.stake(&mut ledger, "alice", 500).unwrap();

        let result = pool.unstake(&mut ledger, "alice", 501);
        assert!(matches!(
            result,
            Err(StakingError::InsufficientStake {
                requested: 501,
                staked: 500
            })
        ));

        pool.unstake(&mut ledger, "alice", 500).unwrap();
        assert_eq!(pool.total_staked(), 0);
        assert_eq!(ledger.balance_of("alice"), 1000);
        // The position survives at zero balance.
        assert_eq!(pool.position("alice").unwrap().staked_amount, 0);
    }

    #[test]
    fn test_proportional_rewards_three_to_one() {
        let (mut ledger, mut pool) = setup(&[("alice", 750), ("bob", 250), (VAULT, 1000)]);
        pool.stake(&mut ledger, "alice", 750).unwrap();
        pool.stake(&mut ledger, "bob", 250).unwrap();

        pool.inject_reward(&mut ledger, VAULT, 1000).unwrap();

        assert_eq!(pool.earned("alice").unwrap(), 750);
        assert_eq!(pool.earned("bob").unwrap(), 250);
    }

    #[test]
    fn test_split_injection_never_exceeds_single_injection() {
        // Total stake of 3 forces truncation in the index arithmetic.
        let (mut ledger, mut pool) = setup(&[("alice", 2), ("bob", 1), (VAULT, 20)]);
        pool.stake(&mut ledger, "alice", 2).unwrap();
        pool.stake(&mut ledger, "bob", 1).unwrap();

        let (mut ledger2, mut pool2) = setup(&[("alice", 2), ("bob", 1), (VAULT, 20)]);
        pool2.stake(&mut ledger2, "alice", 2).unwrap();
        pool2.stake(&mut ledger2, "bob", 1).unwrap();

        pool.inject_reward(&mut ledger, VAULT, 10).unwrap();
        pool2.inject_reward(&mut ledger2, VAULT, 5).unwrap();
        pool2.inject_reward(&mut ledger2, VAULT, 5).unwrap();

        let single = pool.earned("alice").unwrap() + pool.earned("bob").unwrap();
        let split = pool2.earned("alice").unwrap() + pool2.earned("bob").unwrap();
        assert!(split <= single);
        // Truncation favors the pool: nothing beyond the injected total.
        assert!(single <= 10);
    }

    #[test]
    fn test_claim_pays_and_resets() {
        let (mut ledger, mut pool) = setup(&[("alice", 100), (VAULT, 50)]);
        pool.stake(&mut ledger, "alice", 100).unwrap();
        pool.inject_reward(&mut ledger, VAULT, 50).unwrap();

        let paid = pool.claim(&mut ledger, "alice").unwrap();
        assert_eq!(paid, 50);
        assert_eq!(ledger.balance_of("alice"), 50);
        assert_eq!(pool.earned("alice").unwrap(), 0);

        // Second claim settles but pays nothing.
        assert_eq!(pool.claim(&mut ledger, "alice").unwrap(), 0);
    }

    #[test]
    fn test_late_staker_earns_nothing_from_earlier_rewards() {
        let (mut ledger, mut pool) = setup(&[("alice", 100), ("bob", 100), (VAULT, 40)]);
        pool.stake(&mut ledger, "alice", 100).unwrap();
        pool.inject_reward(&mut ledger, VAULT, 40).unwrap();

        pool.stake(&mut ledger, "bob", 100).unwrap();
        assert_eq!(pool.earned("alice").unwrap(), 40);
        assert_eq!(pool.earned("bob").unwrap(), 0);
    }

    #[test]
    fn test_inject_requires_distributor_and_stakers() {
        let (mut ledger, mut pool) = setup(&[("alice", 100), (VAULT, 50)]);

        assert!(matches!(
            pool.inject_reward(&mut ledger, VAULT, 50),
            Err(StakingError::NoStakers)
        ));

        pool.stake(&mut ledger, "alice", 100).unwrap();
        assert!(matches!(
            pool.inject_reward(&mut ledger, "mallory", 50),
            Err(StakingError::NotDistributor(_))
        ));
    }

    #[test]
    fn test_distributor_set_once() {
        let mut pool = StakingPool::new(POOL);
        pool.set_distributor(VAULT).unwrap();
        assert!(matches!(
            pool.set_distributor("other"),
            Err(StakingError::DistributorAlreadySet)
        ));
    }

    #[test]
    fn test_earned_is_read_only() {
        let (mut ledger, mut pool) = setup(&[("alice", 100), (VAULT, 30)]);
        pool.stake(&mut ledger, "alice", 100).unwrap();
        pool.inject_reward(&mut ledger, VAULT, 30).unwrap();

        let before = pool.position("alice").unwrap().clone();
        assert_eq!(pool.earned("alice").unwrap(), 30);
        let after = pool.position("alice").unwrap();
        assert_eq!(before.accrued_unclaimed, after.accrued_unclaimed);
        assert_eq!(before.reward_index_checkpoint, after.reward_index_checkpoint);
    }

    #[test]
    fn test_total_staked_matches_positions_over_random_sequence() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let principals = ["p0", "p1", "p2", "p3"];
        let mut balances: Vec<(&str, u64)> = principals.iter().map(|p| (*p, 10_000)).collect();
        balances.push((VAULT, 10_000));
        let (mut ledger, mut pool) = setup(&balances);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let principal = principals[rng.random_range(0..principals.len())];
            let amount = rng.random_range(1..=300u64);
            if rng.random_bool(0.5) {
                if ledger.balance_of(principal) >= amount {
                    pool.stake(&mut ledger, principal, amount).unwrap();
                }
            } else {
                let staked = pool
                    .position(principal)
                    .map(|p| p.staked_amount)
                    .unwrap_or(0);
                if staked >= amount {
                    pool.unstake(&mut ledger, principal, amount).unwrap();
                }
            }

            let sum: u64 = principals
                .iter()
                .filter_map(|p| pool.position(p))
                .map(|p| p.staked_amount)
                .sum();
            assert_eq!(sum, pool.total_staked());
        }
    }
}
