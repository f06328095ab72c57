//! Vault treasury: purchase ledger, counting trigger and periodic
//! distribution
//!
//! Every purchase feeds the accumulated balance and advances the buyer's
//! quarter counter; each wrap at the trigger threshold owes the buyer a
//! randomized transfer. Once per interval the accumulated balance is drained
//! three ways by basis points, with the staking share redirected to the
//! stability reserve when nobody is staked.

use arcade_core::constants::{BPS_DENOMINATOR, DISTRIBUTION_INTERVAL_SECS, WITHDRAWAL_DELAY_SECS};
use arcade_core::{Address, PriceOracle, TokenLedger};
use serde::{Deserialize, Serialize};
use staking::StakingPool;
use std::collections::HashMap;
use yeet_engine::YeetEngine;

use crate::buyback::SwapVenue;
use crate::config::EconomyConfig;
use crate::error::{Result, VaultError};
use crate::tipping::{TipLimiter, TipPolicy};
use crate::withdrawal::{TimelockedWithdrawal, WithdrawalRequest};

/// Largest quarter count accepted by a single purchase.
pub const MAX_QUARTERS_PER_PURCHASE: u32 = 100;

/// Per-principal purchase state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseEntry {
    /// Remaining machine time, in seconds.
    pub time_balance: u64,
    /// Quarters bought since the last wrap, in `0..trigger_threshold`.
    pub quarter_counter: u32,
    /// True while a randomized transfer is owed on this principal's behalf.
    pub pending_random_transfer: bool,
}

/// Three-way distribution split in basis points. Parts must sum to exactly
/// `BPS_DENOMINATOR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSplit {
    pub staking_bps: u64,
    pub stability_bps: u64,
    pub profit_bps: u64,
}

impl DistributionSplit {
    pub fn validate(&self) -> Result<()> {
        let sum = self.staking_bps as u128 + self.stability_bps as u128 + self.profit_bps as u128;
        if sum != BPS_DENOMINATOR as u128 {
            return Err(VaultError::InvalidSplit(u64::try_from(sum).unwrap_or(u64::MAX)));
        }
        Ok(())
    }

    /// Split `amount` into (staking, stability, profit). The profit part
    /// absorbs the integer-division remainder, so the parts always sum to
    /// `amount`.
    pub fn split(&self, amount: u64) -> (u64, u64, u64) {
        let staking = (amount as u128 * self.staking_bps as u128 / BPS_DENOMINATOR as u128) as u64;
        let stability =
            (amount as u128 * self.stability_bps as u128 / BPS_DENOMINATOR as u128) as u64;
        let profit = amount - staking - stability;
        (staking, stability, profit)
    }
}

/// Amounts moved by one distribution run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Distribution {
    pub staking: u64,
    pub stability: u64,
    pub profit: u64,
}

/// Host-supplied inputs for resolving a commit-reveal settlement.
#[derive(Debug, Clone, Copy)]
pub struct RevealParams<'a> {
    pub secret: &'a [u8],
    pub block_height: u64,
    pub block_entropy: &'a [u8; 32],
    pub now: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vault {
    /// Ledger account holding purchase spend until distribution.
    address: Address,
    admin: Address,
    /// Operator allowed to burn down time balances.
    operator: Option<Address>,
    /// Distribution peers, each wired exactly once.
    stability_reserve: Option<Address>,
    profit_sink: Option<Address>,

    unit_cost: u64,
    unit_duration_secs: u64,
    trigger_threshold: u32,
    yeet_amount: u64,
    split: DistributionSplit,

    entries: HashMap<Address, PurchaseEntry>,
    accumulated_balance: u64,
    last_distribution_time: u64,
    withdrawal: TimelockedWithdrawal,
    tips: TipLimiter,
}

impl Vault {
    /// Create a vault with default economy parameters. `now` stamps the
    /// distribution clock so the first interval starts at deployment.
    pub fn new(address: impl Into<Address>, admin: impl Into<Address>, now: u64) -> Result<Self> {
        Self::from_config(address, admin, &EconomyConfig::default(), now)
    }

    pub fn from_config(
        address: impl Into<Address>,
        admin: impl Into<Address>,
        config: &EconomyConfig,
        now: u64,
    ) -> Result<Self> {
        config.validate()?;
        let address = address.into();
        let admin = admin.into();
        if address.is_empty() || admin.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        Ok(Vault {
            address,
            admin,
            operator: None,
            stability_reserve: None,
            profit_sink: None,
            unit_cost: config.unit_cost,
            unit_duration_secs: config.unit_duration_secs,
            trigger_threshold: config.trigger_threshold,
            yeet_amount: config.yeet_amount,
            split: DistributionSplit {
                staking_bps: config.staking_bps,
                stability_bps: config.stability_bps,
                profit_bps: config.profit_bps,
            },
            entries: HashMap::new(),
            accumulated_balance: 0,
            last_distribution_time: now,
            withdrawal: TimelockedWithdrawal::new(WITHDRAWAL_DELAY_SECS),
            tips: TipLimiter::new(TipPolicy {
                minimum_tip: config.minimum_tip,
                daily_tip_limit: config.daily_tip_limit,
            }),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn admin(&self) -> &str {
        &self.admin
    }

    pub fn accumulated_balance(&self) -> u64 {
        self.accumulated_balance
    }

    pub fn last_distribution_time(&self) -> u64 {
        self.last_distribution_time
    }

    pub fn split(&self) -> DistributionSplit {
        self.split
    }

    pub fn unit_cost(&self) -> u64 {
        self.unit_cost
    }

    pub fn trigger_threshold(&self) -> u32 {
        self.trigger_threshold
    }

    pub fn time_balance(&self, principal: &str) -> u64 {
        self.entries
            .get(principal)
            .map(|e| e.time_balance)
            .unwrap_or(0)
    }

    pub fn quarter_counter(&self, principal: &str) -> u32 {
        self.entries
            .get(principal)
            .map(|e| e.quarter_counter)
            .unwrap_or(0)
    }

    pub fn has_pending_random_transfer(&self, principal: &str) -> bool {
        self.entries
            .get(principal)
            .map(|e| e.pending_random_transfer)
            .unwrap_or(false)
    }

    pub fn pending_withdrawal(&self) -> Option<&WithdrawalRequest> {
        self.withdrawal.pending()
    }

    pub fn tip_spent_today(&self, principal: &str, now: u64) -> u64 {
        self.tips.spent_today(principal, now)
    }

    // --- configuration ---

    pub fn set_operator(&mut self, caller: &str, operator: &str) -> Result<()> {
        self.require_admin(caller)?;
        if operator.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        self.operator = Some(operator.to_string());
        Ok(())
    }

    /// Wire the stability reserve. Allowed exactly once per instance.
    pub fn set_stability_reserve(&mut self, caller: &str, reserve: &str) -> Result<()> {
        self.require_admin(caller)?;
        if reserve.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        if self.stability_reserve.is_some() {
            return Err(VaultError::AddressAlreadySet);
        }
        self.stability_reserve = Some(reserve.to_string());
        Ok(())
    }

    /// Wire the profit sink. Allowed exactly once per instance.
    pub fn set_profit_sink(&mut self, caller: &str, sink: &str) -> Result<()> {
        self.require_admin(caller)?;
        if sink.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        if self.profit_sink.is_some() {
            return Err(VaultError::AddressAlreadySet);
        }
        self.profit_sink = Some(sink.to_string());
        Ok(())
    }

    pub fn set_split(&mut self, caller: &str, split: DistributionSplit) -> Result<()> {
        self.require_admin(caller)?;
        split.validate()?;
        self.split = split;
        Ok(())
    }

    pub fn set_trigger_threshold(&mut self, caller: &str, threshold: u32) -> Result<()> {
        self.require_admin(caller)?;
        if threshold == 0 {
            return Err(VaultError::ZeroThreshold);
        }
        self.trigger_threshold = threshold;
        Ok(())
    }

    pub fn set_unit_cost(&mut self, caller: &str, cost: u64) -> Result<()> {
        self.require_admin(caller)?;
        if cost == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.unit_cost = cost;
        Ok(())
    }

    pub fn set_yeet_amount(&mut self, caller: &str, amount: u64) -> Result<()> {
        self.require_admin(caller)?;
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.yeet_amount = amount;
        Ok(())
    }

    pub fn set_tip_policy(&mut self, caller: &str, policy: TipPolicy) -> Result<()> {
        self.require_admin(caller)?;
        self.tips.set_policy(policy);
        Ok(())
    }

    // --- purchases ---

    /// Buy `count` quarters: pulls the cost into the treasury, grants
    /// machine time and advances the quarter counter one unit at a time.
    /// Counter wraps within one call collapse into a single pending
    /// transfer.
    pub fn purchase(
        &mut self,
        ledger: &mut dyn TokenLedger,
        principal: &str,
        count: u32,
    ) -> Result<()> {
        if count == 0 || count > MAX_QUARTERS_PER_PURCHASE {
            return Err(VaultError::InvalidQuarterCount {
                count,
                max: MAX_QUARTERS_PER_PURCHASE,
            });
        }
        if principal.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        let cost = self
            .unit_cost
            .checked_mul(count as u64)
            .ok_or(VaultError::ArithmeticOverflow)?;
        let granted = self
            .unit_duration_secs
            .checked_mul(count as u64)
            .ok_or(VaultError::ArithmeticOverflow)?;
        let new_accumulated = self
            .accumulated_balance
            .checked_add(cost)
            .ok_or(VaultError::ArithmeticOverflow)?;
        let new_time = self
            .time_balance(principal)
            .checked_add(granted)
            .ok_or(VaultError::ArithmeticOverflow)?;

        ledger.transfer(principal, &self.address, cost)?;

        self.accumulated_balance = new_accumulated;
        let threshold = self.trigger_threshold;
        let entry = self.entries.entry(principal.to_string()).or_default();
        entry.time_balance = new_time;

        let mut wraps = 0u32;
        for _ in 0..count {
            entry.quarter_counter += 1;
            if entry.quarter_counter >= threshold {
                entry.quarter_counter = 0;
                wraps += 1;
            }
        }
        if wraps > 0 {
            entry.pending_random_transfer = true;
            log::info!(
                "{} hit the yeet trigger ({} wrap(s) this purchase)",
                principal,
                wraps
            );
        }
        log::debug!(
            "purchase: {} bought {} quarter(s) for {} ({}s granted)",
            principal,
            count,
            cost,
            granted
        );
        Ok(())
    }

    /// Burn down `seconds` of a principal's machine time. Privileged to the
    /// operator.
    pub fn consume(&mut self, caller: &str, principal: &str, seconds: u64) -> Result<()> {
        match &self.operator {
            Some(operator) if operator == caller => {}
            _ => return Err(VaultError::NotOperator(caller.to_string())),
        }
        if seconds == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let available = self.time_balance(principal);
        if available < seconds {
            return Err(VaultError::InsufficientTime {
                requested: seconds,
                available,
            });
        }
        if let Some(entry) = self.entries.get_mut(principal) {
            entry.time_balance = available - seconds;
        }
        Ok(())
    }

    // --- distribution ---

    /// Drain the accumulated balance three ways. The balance is zeroed and
    /// the clock stamped before any transfer, so a failed run cannot be
    /// retried against an already-claimed amount.
    pub fn distribute(
        &mut self,
        caller: &str,
        now: u64,
        pool: &mut StakingPool,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Distribution> {
        self.require_admin(caller)?;
        if now.saturating_sub(self.last_distribution_time) < DISTRIBUTION_INTERVAL_SECS {
            return Err(VaultError::DistributionTooSoon {
                last: self.last_distribution_time,
                now,
            });
        }
        if self.accumulated_balance == 0 {
            return Err(VaultError::EmptyTreasury);
        }
        let stability_reserve = self
            .stability_reserve
            .clone()
            .ok_or(VaultError::AddressNotSet)?;
        let profit_sink = self.profit_sink.clone().ok_or(VaultError::AddressNotSet)?;

        let amount = self.accumulated_balance;
        self.accumulated_balance = 0;
        self.last_distribution_time = now;

        let (mut staking_part, mut stability_part, profit_part) = self.split.split(amount);
        if pool.total_staked() == 0 && staking_part > 0 {
            log::warn!(
                "distribution fallback: no stakers, {} redirected to stability reserve",
                staking_part
            );
            stability_part += staking_part;
            staking_part = 0;
        }

        if staking_part > 0 {
            pool.inject_reward(ledger, &self.address, staking_part)?;
        }
        if stability_part > 0 {
            ledger.transfer(&self.address, &stability_reserve, stability_part)?;
        }
        if profit_part > 0 {
            ledger.transfer(&self.address, &profit_sink, profit_part)?;
        }
        log::info!(
            "distributed {}: staking {}, stability {}, profit {}",
            amount,
            staking_part,
            stability_part,
            profit_part
        );
        Ok(Distribution {
            staking: staking_part,
            stability: stability_part,
            profit: profit_part,
        })
    }

    // --- randomized transfers ---

    /// Resolve a principal's owed randomized transfer: reveal against the
    /// engine, forward `yeet_amount` from the treasury to the selected
    /// recipient and clear the pending flag. Privileged to the admin, whose
    /// own commitment is being revealed.
    pub fn settle_random_transfer(
        &mut self,
        caller: &str,
        principal: &str,
        reveal: RevealParams<'_>,
        engine: &mut YeetEngine,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Address> {
        self.require_admin(caller)?;
        if !self.has_pending_random_transfer(principal) {
            return Err(VaultError::NoPendingTransfer(principal.to_string()));
        }
        if self.accumulated_balance < self.yeet_amount {
            return Err(VaultError::InsufficientTreasury {
                needed: self.yeet_amount,
                available: self.accumulated_balance,
            });
        }

        let recipient = engine.reveal(
            caller,
            reveal.secret,
            reveal.block_height,
            reveal.block_entropy,
            reveal.now,
        )?;
        engine.execute_transfer(
            &self.address,
            ledger,
            &self.address,
            &recipient,
            self.yeet_amount,
        )?;

        self.accumulated_balance -= self.yeet_amount;
        if let Some(entry) = self.entries.get_mut(principal) {
            entry.pending_random_transfer = false;
        }
        log::info!(
            "yeet settled: {} ARC to {} on behalf of {}",
            self.yeet_amount,
            recipient,
            principal
        );
        Ok(recipient)
    }

    // --- tipping ---

    /// Opt a principal into tipping; this also makes them a valid randomized
    /// recipient.
    pub fn enable_tipping(&mut self, principal: &str, engine: &mut YeetEngine) -> Result<()> {
        if principal.is_empty() {
            return Err(VaultError::ZeroAddress);
        }
        engine.add_eligible(principal)?;
        Ok(())
    }

    pub fn disable_tipping(&mut self, principal: &str, engine: &mut YeetEngine) -> Result<()> {
        engine.remove_eligible(principal)?;
        Ok(())
    }

    /// Send a rate-limited tip directly between two principals.
    pub fn tip(
        &mut self,
        ledger: &mut dyn TokenLedger,
        engine: &mut YeetEngine,
        from: &str,
        to: &str,
        amount: u64,
        now: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        if !engine.is_eligible(from) {
            return Err(VaultError::TippingDisabled(from.to_string()));
        }
        let available = ledger.balance_of(from);
        if available < amount {
            return Err(VaultError::Ledger(
                arcade_core::LedgerError::InsufficientBalance {
                    requested: amount,
                    available,
                },
            ));
        }
        let day_total = self.tips.check(from, amount, now)?;

        engine.execute_transfer(&self.address, ledger, from, to, amount)?;

        self.tips.record(from, day_total, now);
        Ok(())
    }

    // --- emergency withdrawal ---

    pub fn request_withdrawal(
        &mut self,
        caller: &str,
        asset: &str,
        amount: u64,
        now: u64,
    ) -> Result<()> {
        self.require_admin(caller)?;
        self.withdrawal.request(asset, amount, now)
    }

    /// Execute a matured withdrawal request, paying the treasury out to the
    /// admin.
    pub fn execute_withdrawal(
        &mut self,
        caller: &str,
        now: u64,
        ledger: &mut dyn TokenLedger,
    ) -> Result<WithdrawalRequest> {
        self.require_admin(caller)?;
        let amount = self
            .withdrawal
            .pending()
            .map(|r| r.amount)
            .ok_or(VaultError::NoWithdrawalRequested)?;
        let available = ledger.balance_of(&self.address);
        if available < amount {
            return Err(VaultError::Ledger(
                arcade_core::LedgerError::InsufficientBalance {
                    requested: amount,
                    available,
                },
            ));
        }
        let request = self.withdrawal.execute(now)?;
        ledger.transfer(&self.address, &self.admin, request.amount)?;
        // An emergency drain may empty the distribution pot.
        self.accumulated_balance = self.accumulated_balance.saturating_sub(request.amount);
        Ok(request)
    }

    pub fn cancel_withdrawal(&mut self, caller: &str) -> Result<WithdrawalRequest> {
        self.require_admin(caller)?;
        self.withdrawal.cancel()
    }

    // --- buyback ---

    /// Spend treasury funds on the external venue, gated by a fresh oracle
    /// quote. Returns the amount bought back.
    pub fn buyback(
        &mut self,
        caller: &str,
        ledger: &mut dyn TokenLedger,
        oracle: &dyn PriceOracle,
        venue: &mut dyn SwapVenue,
        spend: u64,
        now: u64,
    ) -> Result<u64> {
        self.require_admin(caller)?;
        if spend == 0 {
            return Err(VaultError::ZeroAmount);
        }
        if self.accumulated_balance < spend {
            return Err(VaultError::InsufficientTreasury {
                needed: spend,
                available: self.accumulated_balance,
            });
        }
        let quote = oracle.latest_price()?;
        quote.validate(now)?;

        let bought = venue.execute_buyback(ledger, &self.address, spend)?;
        self.accumulated_balance -= spend;
        log::info!(
            "buyback: spent {} acquired {} at price {}",
            spend,
            bought,
            quote.value
        );
        Ok(bought)
    }

    fn require_admin(&self, caller: &str) -> Result<()> {
        if caller != self.admin {
            return Err(VaultError::NotAdmin(caller.to_string()));
        }
        Ok(())
    }
}
