//! Settings that change how the engine folds and compares, never what it stores.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRIFT_THRESHOLD, DEFAULT_TARGET_SUM_TOLERANCE};
use crate::errors::{Error, Result};

/// What the reconciler does with a sell larger than the running position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversellPolicy {
    /// Abort the instrument with `LedgerIntegrityError::Oversell`.
    #[default]
    Reject,
    /// Legacy behaviour: sell only what is held and log a warning.
    Clamp,
}

/// How per-instrument ordering of the input is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Each instrument's transactions must already ascend by (timestamp, sequence number).
    #[default]
    Strict,
    /// Sort each instrument's transactions before folding.
    Sort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub oversell_policy: OversellPolicy,
    pub ordering_policy: OrderingPolicy,
    /// Percentage points of drift tolerated before the advisor speaks up.
    pub drift_threshold: Decimal,
    /// Allowed distance of a goal's target sum from 100.
    pub target_sum_tolerance: Decimal,
    /// Fold instruments on the rayon pool. Results are identical either way.
    pub parallel_fold: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            oversell_policy: OversellPolicy::Reject,
            ordering_policy: OrderingPolicy::Strict,
            drift_threshold: DEFAULT_DRIFT_THRESHOLD,
            target_sum_tolerance: DEFAULT_TARGET_SUM_TOLERANCE,
            parallel_fold: true,
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON. Missing keys fall back to their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let settings: EngineSettings =
            serde_json::from_str(raw).map_err(|e| Error::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.drift_threshold < Decimal::ZERO {
            return Err(Error::Settings(format!(
                "driftThreshold must not be negative, got {}",
                self.drift_threshold
            )));
        }
        if self.target_sum_tolerance < Decimal::ZERO {
            return Err(Error::Settings(format!(
                "targetSumTolerance must not be negative, got {}",
                self.target_sum_tolerance
            )));
        }
        Ok(())
    }
}
