use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DISPLAY_DECIMAL_PRECISION, FULL_ALLOCATION_PERCENT};
use crate::portfolio::allocation::AssetClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    /// The class is overweight.
    Reduce,
    /// The class is underweight.
    Increase,
}

impl RebalanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebalanceAction::Reduce => "reduce",
            RebalanceAction::Increase => "increase",
        }
    }
}

impl fmt::Display for RebalanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recommended move back toward the target allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub asset_class: AssetClass,
    pub action: RebalanceAction,
    /// Size of the move in percentage points, never negative.
    pub percentage_points: Decimal,
    pub deviation: Decimal,
    pub current_percentage: Decimal,
    pub target_percentage: Decimal,
}

impl Suggestion {
    /// Currency amount of the move for a portfolio worth `total_value`.
    pub fn amount_for(&self, total_value: Decimal) -> Decimal {
        // percentage_points never exceeds 100, so the fraction is at most one.
        total_value * (self.percentage_points / FULL_ALLOCATION_PERCENT)
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} by {:.prec$} pp",
            self.action,
            self.asset_class,
            self.percentage_points,
            prec = DISPLAY_DECIMAL_PRECISION as usize
        )
    }
}

/// Suggestions for a user, with the instruments the comparison could not see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingAdvice {
    pub suggestions: Vec<Suggestion>,
    /// Instruments whose ledger failed reconciliation.
    pub failed_instruments: Vec<String>,
    /// Held instruments without a usable price.
    pub unpriced_instruments: Vec<String>,
}

impl RebalancingAdvice {
    pub fn is_complete(&self) -> bool {
        self.failed_instruments.is_empty() && self.unpriced_instruments.is_empty()
    }
}
