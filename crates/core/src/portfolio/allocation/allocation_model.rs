//! Allocation models for the target comparison.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

use super::AssetClass;

/// Current versus target weight for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSnapshot {
    pub asset_class: AssetClass,
    /// Target share of the portfolio (0-100). Zero for un-targeted classes.
    pub target_percentage: Decimal,
    /// Current share of the priced portfolio (0-100).
    pub current_percentage: Decimal,
    /// `current_percentage - target_percentage`. Positive means overweight.
    pub deviation: Decimal,
    /// Market value held in this class.
    pub current_value: Decimal,
    /// False when the class is held but has no target in the goal.
    pub is_targeted: bool,
}

impl AllocationSnapshot {
    pub fn is_overweight(&self) -> bool {
        self.deviation > Decimal::ZERO
    }

    pub fn rounded_for_display(&self) -> Self {
        Self {
            target_percentage: self.target_percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
            current_percentage: self.current_percentage.round_dp(DISPLAY_DECIMAL_PRECISION),
            deviation: self.deviation.round_dp(DISPLAY_DECIMAL_PRECISION),
            current_value: self.current_value.round_dp(DISPLAY_DECIMAL_PRECISION),
            ..self.clone()
        }
    }
}

/// A user's allocation against their active goal.
///
/// Snapshots cover reconciled, priced holdings only. The instruments left out
/// are listed so a caller can tell a partial picture from a complete one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub goal_id: String,
    pub snapshots: Vec<AllocationSnapshot>,
    /// Instruments whose ledger failed reconciliation.
    pub failed_instruments: Vec<String>,
    /// Held instruments without a usable price.
    pub unpriced_instruments: Vec<String>,
}

impl AllocationReport {
    pub fn is_complete(&self) -> bool {
        self.failed_instruments.is_empty() && self.unpriced_instruments.is_empty()
    }
}
