//! Commit-reveal recipient selection and the privileged transfer executor
//!
//! A caller first commits `Sha256(secret ‖ caller)`, then reveals the secret
//! at least one block later. The commit is fixed before the resolving block
//! entropy is knowable, so the committer cannot choose a secret to bias the
//! selection; the expiry window bounds reliance on old block data.

use arcade_core::{Address, TokenLedger};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::{Result, YeetError};
use crate::registry::EligibilitySet;

/// Reveals must wait at least this many blocks after the commit.
pub const MIN_REVEAL_DELAY_BLOCKS: u64 = 1;

/// Commits older than this many blocks can no longer be revealed.
pub const MAX_COMMIT_AGE_BLOCKS: u64 = 256;

/// Maximum number of entries returned by the leaderboard.
pub const LEADERBOARD_SIZE: usize = 20;

/// One outstanding commitment per principal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommitRecord {
    pub commit_hash: [u8; 32],
    pub commit_block: u64,
}

/// Hash binding a reveal secret to the revealing caller.
pub fn commit_digest(secret: &[u8], caller: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(caller.as_bytes());
    hasher.finalize().into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YeetEngine {
    /// Peer allowed to execute transfers (the vault). Wired exactly once.
    distributor: Option<Address>,
    eligible: EligibilitySet,
    commits: HashMap<Address, CommitRecord>,
    /// Cumulative amount sent per principal. Survives eligibility changes.
    total_sent: HashMap<Address, u64>,
}

impl YeetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire the distributor peer. Allowed exactly once per instance.
    pub fn set_distributor(&mut self, distributor: impl Into<Address>) -> Result<()> {
        if self.distributor.is_some() {
            return Err(YeetError::DistributorAlreadySet);
        }
        self.distributor = Some(distributor.into());
        Ok(())
    }

    pub fn add_eligible(&mut self, principal: &str) -> Result<()> {
        if principal.is_empty() {
            return Err(YeetError::ZeroAddress);
        }
        self.eligible.add(principal)?;
        log::debug!("eligible: +{} ({} total)", principal, self.eligible.len());
        Ok(())
    }

    pub fn remove_eligible(&mut self, principal: &str) -> Result<()> {
        self.eligible.remove(principal)?;
        log::debug!("eligible: -{} ({} total)", principal, self.eligible.len());
        Ok(())
    }

    pub fn is_eligible(&self, principal: &str) -> bool {
        self.eligible.contains(principal)
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    pub fn commit_of(&self, caller: &str) -> Option<&CommitRecord> {
        self.commits.get(caller)
    }

    /// Record a commitment for `caller`. A later commit overwrites an
    /// earlier one.
    pub fn commit(&mut self, caller: &str, hash: [u8; 32], block_height: u64) -> Result<()> {
        if caller.is_empty() {
            return Err(YeetError::ZeroAddress);
        }
        if hash == [0u8; 32] {
            return Err(YeetError::ZeroCommitHash);
        }
        self.commits.insert(
            caller.to_string(),
            CommitRecord {
                commit_hash: hash,
                commit_block: block_height,
            },
        );
        log::debug!(
            "commit by {} at block {}: {}",
            caller,
            block_height,
            hex::encode(hash)
        );
        Ok(())
    }

    /// Resolve the caller's commitment into a pseudo-random eligible
    /// recipient.
    ///
    /// `block_entropy` is a host-supplied value derived from a recent block.
    /// An expired commit is deleted by the attempt; every other failure
    /// leaves the commit live.
    pub fn reveal(
        &mut self,
        caller: &str,
        secret: &[u8],
        block_height: u64,
        block_entropy: &[u8; 32],
        now: u64,
    ) -> Result<Address> {
        let record = *self.commits.get(caller).ok_or(YeetError::NoActiveCommit)?;
        let age = block_height.saturating_sub(record.commit_block);
        if age < MIN_REVEAL_DELAY_BLOCKS {
            return Err(YeetError::RevealTooEarly {
                commit_block: record.commit_block,
                block_height,
            });
        }
        if age > MAX_COMMIT_AGE_BLOCKS {
            self.commits.remove(caller);
            return Err(YeetError::CommitExpired {
                commit_block: record.commit_block,
                block_height,
            });
        }
        if commit_digest(secret, caller) != record.commit_hash {
            return Err(YeetError::CommitMismatch);
        }
        if self.eligible.is_empty() {
            return Err(YeetError::EmptyEligibleSet);
        }

        self.commits.remove(caller);

        let mut hasher = Sha256::new();
        hasher.update(block_entropy);
        hasher.update(secret);
        hasher.update(caller.as_bytes());
        hasher.update(now.to_le_bytes());
        let seed: [u8; 32] = hasher.finalize().into();
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&seed[..8]);
        let slot = (u64::from_le_bytes(raw) % self.eligible.len() as u64) as usize;

        let selected = self
            .eligible
            .get(slot)
            .map(str::to_string)
            .ok_or(YeetError::EmptyEligibleSet)?;
        log::info!(
            "reveal by {}: selected {} out of {} eligible",
            caller,
            selected,
            self.eligible.len()
        );
        Ok(selected)
    }

    /// Move `amount` from `from` to `to` and credit the sender's cumulative
    /// total. Privileged to the wired distributor.
    pub fn execute_transfer(
        &mut self,
        caller: &str,
        ledger: &mut dyn TokenLedger,
        from: &str,
        to: &str,
        amount: u64,
    ) -> Result<()> {
        match &self.distributor {
            Some(distributor) if distributor == caller => {}
            _ => return Err(YeetError::NotDistributor(caller.to_string())),
        }
        if from.is_empty() || to.is_empty() {
            return Err(YeetError::ZeroAddress);
        }
        if amount == 0 {
            return Err(YeetError::ZeroAmount);
        }
        let total = self
            .sent_of(from)
            .checked_add(amount)
            .ok_or(YeetError::ArithmeticOverflow)?;

        ledger.transfer(from, to, amount)?;

        self.total_sent.insert(from.to_string(), total);
        log::debug!("transfer: {} -> {} ({} ARC)", from, to, amount);
        Ok(())
    }

    pub fn total_sent(&self, principal: &str) -> u64 {
        self.sent_of(principal)
    }

    /// Up to `k` currently eligible principals with the largest cumulative
    /// sent totals, descending; ties keep backing-array order.
    ///
    /// Selection-sorts the whole eligible set on every call, which is
    /// acceptable only while the set stays small.
    pub fn leaderboard_top(&self, k: usize) -> Vec<(Address, u64)> {
        let members = self.eligible.members();
        let take = k.min(LEADERBOARD_SIZE).min(members.len());
        let mut order: Vec<usize> = (0..members.len()).collect();
        for i in 0..take {
            let mut best = i;
            for j in (i + 1)..order.len() {
                if self.sent_of(&members[order[j]]) > self.sent_of(&members[order[best]]) {
                    best = j;
                }
            }
            order.swap(i, best);
        }
        order[..take]
            .iter()
            .map(|&slot| (members[slot].clone(), self.sent_of(&members[slot])))
            .collect()
    }

    fn sent_of(&self, principal: &str) -> u64 {
        self.total_sent.get(principal).copied().unwrap_or(0)
    }
}
