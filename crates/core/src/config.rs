//! Session configuration
//!
//! All values default to the classic rules; any subset can be overridden from
//! a TOML file or the command line.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    BIG_WIN_THRESHOLD, DEFAULT_CAPACITY, DUAL_RUN_MULTIPLIER, DURATION_MAX_MS, MAX_CAPACITY,
    MIN_RUN_LEN, POINTS_PER_UNIT, SUPPLY_LOW_WATER, SUPPLY_REFILL_TO,
};

/// Top-level configuration for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of tokens in the row
    pub capacity: usize,
    /// Match length in milliseconds
    pub duration_ms: u32,
    /// Seed for the supply RNG
    pub seed: u32,
    pub supply: SupplyConfig,
    pub scoring: ScoringConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            duration_ms: DURATION_MAX_MS,
            seed: 1,
            supply: SupplyConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Supply buffer replenishment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    /// Refill when fewer than this many tokens are pending
    pub low_water: usize,
    /// Pending count after a refill
    pub refill_to: usize,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            low_water: SUPPLY_LOW_WATER,
            refill_to: SUPPLY_REFILL_TO,
        }
    }
}

/// Run detection and scoring constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Shortest run that scores
    pub min_run: usize,
    /// Run points are `points_per_unit * len^2`
    pub points_per_unit: u32,
    /// Extra multiplier for runs uniform in both color and shape
    pub dual_run_multiplier: u32,
    /// Single-move gain that earns the big-win cue
    pub big_win_threshold: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_run: MIN_RUN_LEN,
            points_per_unit: POINTS_PER_UNIT,
            dual_run_multiplier: DUAL_RUN_MULTIPLIER,
            big_win_threshold: BIG_WIN_THRESHOLD,
        }
    }
}

impl SessionConfig {
    /// Default rules with a specific seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Validation(format!(
                "capacity must be in 1..={MAX_CAPACITY}, got {}",
                self.capacity
            )));
        }
        if self.duration_ms == 0 {
            return Err(ConfigError::Validation("duration_ms must be > 0".into()));
        }
        if self.supply.low_water == 0 {
            return Err(ConfigError::Validation(
                "supply.low_water must be > 0".into(),
            ));
        }
        if self.supply.refill_to < self.supply.low_water {
            return Err(ConfigError::Validation(
                "supply.refill_to must be >= supply.low_water".into(),
            ));
        }
        if self.scoring.min_run < 2 {
            return Err(ConfigError::Validation(
                "scoring.min_run must be >= 2".into(),
            ));
        }
        if self.scoring.dual_run_multiplier == 0 {
            return Err(ConfigError::Validation(
                "scoring.dual_run_multiplier must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
