//! Economy configuration file (economy.toml) support
//!
//! Example:
//! ```toml
//! unit_cost = 25000000
//! unit_duration_secs = 900
//! trigger_threshold = 8
//! yeet_amount = 25000000
//! staking_bps = 5000
//! stability_bps = 3000
//! profit_bps = 2000
//! minimum_tip = 1000000
//! daily_tip_limit = 500000000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use arcade_core::constants::{
    BPS_DENOMINATOR, QUARTER_COST, QUARTER_DURATION_SECS, YEET_TRIGGER_THRESHOLD,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Tunable economy parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomyConfig {
    /// Cost of one quarter in ARC base units.
    pub unit_cost: u64,

    /// Machine time granted per quarter, in seconds.
    pub unit_duration_secs: u64,

    /// Quarters purchased before a randomized transfer is owed.
    pub trigger_threshold: u32,

    /// Amount forwarded by a settled randomized transfer.
    pub yeet_amount: u64,

    /// Distribution share sent to the staking pool, in basis points.
    pub staking_bps: u64,

    /// Distribution share sent to the stability reserve, in basis points.
    pub stability_bps: u64,

    /// Distribution share sent to the profit sink, in basis points.
    pub profit_bps: u64,

    /// Smallest accepted tip, in ARC base units.
    pub minimum_tip: u64,

    /// Per-principal daily tip allowance, in ARC base units.
    pub daily_tip_limit: u64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            unit_cost: QUARTER_COST,
            unit_duration_secs: QUARTER_DURATION_SECS,
            trigger_threshold: YEET_TRIGGER_THRESHOLD,
            yeet_amount: QUARTER_COST,
            staking_bps: 5000,
            stability_bps: 3000,
            profit_bps: 2000,
            minimum_tip: 1_000_000,
            daily_tip_limit: 500_000_000,
        }
    }
}

impl EconomyConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: EconomyConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_cost == 0 {
            return Err(ConfigError::InvalidConfig(
                "unit_cost must be positive".to_string(),
            ));
        }
        if self.unit_duration_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "unit_duration_secs must be positive".to_string(),
            ));
        }
        if self.trigger_threshold == 0 {
            return Err(ConfigError::InvalidConfig(
                "trigger_threshold must be positive".to_string(),
            ));
        }
        if self.yeet_amount == 0 {
            return Err(ConfigError::InvalidConfig(
                "yeet_amount must be positive".to_string(),
            ));
        }
        let split_sum =
            self.staking_bps as u128 + self.stability_bps as u128 + self.profit_bps as u128;
        if split_sum != BPS_DENOMINATOR as u128 {
            return Err(ConfigError::InvalidConfig(format!(
                "split parts must sum to {} basis points, got {}",
                BPS_DENOMINATOR, split_sum
            )));
        }
        Ok(())
    }
}
