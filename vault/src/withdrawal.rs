//! Timelocked emergency withdrawal
//!
//! Separates privilege from safety: the administrator may move treasury
//! funds, but only after a fixed public delay between request and execution,
//! so observers have time to react before funds move.

use arcade_core::Address;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// A single outstanding withdrawal request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub asset: Address,
    pub amount: u64,
    pub requested_at: u64,
}

/// Single-slot state machine: Idle -> Requested -> {Executed | Cancelled} -> Idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelockedWithdrawal {
    pending: Option<WithdrawalRequest>,
    delay_secs: u64,
}

impl TimelockedWithdrawal {
    pub fn new(delay_secs: u64) -> Self {
        TimelockedWithdrawal {
            pending: None,
            delay_secs,
        }
    }

    pub fn pending(&self) -> Option<&WithdrawalRequest> {
        self.pending.as_ref()
    }

    pub fn delay_secs(&self) -> u64 {
        self.delay_secs
    }

    /// Record a withdrawal request. Only one may be outstanding.
    pub fn request(&mut self, asset: &str, amount: u64, now: u64) -> Result<()> {
        if self.pending.is_some() {
            return Err(VaultError::WithdrawalPending);
        }
        if asset.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.pending = Some(WithdrawalRequest {
            asset: asset.to_string(),
            amount,
            requested_at: now,
        });
        log::warn!(
            "emergency withdrawal requested: {} of {} at {}",
            amount,
            asset,
            now
        );
        Ok(())
    }

    /// Consume the request once the timelock has elapsed. The caller
    /// performs the actual transfer.
    pub fn execute(&mut self, now: u64) -> Result<WithdrawalRequest> {
        let requested_at = match &self.pending {
            Some(request) => request.requested_at,
            None => return Err(VaultError::NoWithdrawalRequested),
        };
        if now.saturating_sub(requested_at) < self.delay_secs {
            return Err(VaultError::WithdrawalLocked { requested_at, now });
        }
        self.pending
            .take()
            .ok_or(VaultError::NoWithdrawalRequested)
    }

    /// Drop the request without transferring.
    pub fn cancel(&mut self) -> Result<WithdrawalRequest> {
        self.pending
            .take()
            .ok_or(VaultError::NoWithdrawalRequested)
    }
}
