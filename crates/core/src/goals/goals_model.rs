//! Goals domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::FULL_ALLOCATION_PERCENT;
use crate::errors::GoalConfigurationError;
use crate::portfolio::allocation::AssetClass;

/// Desired share of the portfolio for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationTarget {
    pub asset_class: AssetClass,
    /// Percentage of the total portfolio, 0-100.
    pub target_percentage: Decimal,
}

impl AllocationTarget {
    pub fn new(asset_class: AssetClass, target_percentage: Decimal) -> Self {
        Self {
            asset_class,
            target_percentage,
        }
    }
}

/// Domain model representing an allocation goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub targets: Vec<AllocationTarget>,
}

impl Goal {
    pub fn target_sum(&self) -> Decimal {
        self.targets
            .iter()
            .fold(Decimal::ZERO, |sum, t| sum.saturating_add(t.target_percentage))
    }

    /// Checks the targets without altering them. Targets are never normalized.
    pub fn validate_targets(
        &self,
        tolerance: Decimal,
    ) -> std::result::Result<(), GoalConfigurationError> {
        validate_allocation_targets(&self.id, &self.targets, tolerance)
    }
}

/// Rejects empty, duplicated, out-of-range, or non-summing targets.
pub fn validate_allocation_targets(
    goal_id: &str,
    targets: &[AllocationTarget],
    tolerance: Decimal,
) -> std::result::Result<(), GoalConfigurationError> {
    if targets.is_empty() {
        return Err(GoalConfigurationError::NoTargets {
            goal_id: goal_id.to_string(),
        });
    }

    let mut seen: HashSet<AssetClass> = HashSet::new();
    for target in targets {
        if target.target_percentage < Decimal::ZERO
            || target.target_percentage > FULL_ALLOCATION_PERCENT
        {
            return Err(GoalConfigurationError::TargetOutOfRange {
                goal_id: goal_id.to_string(),
                asset_class: target.asset_class,
                percentage: target.target_percentage,
            });
        }
        if !seen.insert(target.asset_class) {
            return Err(GoalConfigurationError::DuplicateAssetClass {
                goal_id: goal_id.to_string(),
                asset_class: target.asset_class,
            });
        }
    }

    let sum: Decimal = targets.iter().map(|t| t.target_percentage).sum();
    if (sum - FULL_ALLOCATION_PERCENT).abs() > tolerance {
        return Err(GoalConfigurationError::TargetSumMismatch {
            goal_id: goal_id.to_string(),
            sum,
        });
    }
    Ok(())
}
