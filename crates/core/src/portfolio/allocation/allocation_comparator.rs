//! Compares the priced portfolio against an allocation goal.

use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::constants::{DEFAULT_TARGET_SUM_TOLERANCE, FULL_ALLOCATION_PERCENT};
use crate::errors::Result;
use crate::goals::{validate_allocation_targets, AllocationTarget, Goal};
use crate::portfolio::valuation::ValuedHolding;
use crate::settings::EngineSettings;

use super::{classify, AllocationSnapshot, AssetClass};

/// Compares against bare targets using the default sum tolerance.
pub fn compare(
    valued: &[ValuedHolding],
    targets: &[AllocationTarget],
) -> Result<Vec<AllocationSnapshot>> {
    validate_allocation_targets("ad-hoc", targets, DEFAULT_TARGET_SUM_TOLERANCE)?;
    Ok(build_snapshots(valued, targets))
}

/// Compares against a goal, validated with the configured tolerance.
///
/// One snapshot is produced per target, in goal order, followed by one per
/// held class the goal does not mention (target zero), sorted by name.
/// Unpriced holdings contribute nothing to current values or the total.
pub fn compare_with(
    valued: &[ValuedHolding],
    goal: &Goal,
    settings: &EngineSettings,
) -> Result<Vec<AllocationSnapshot>> {
    goal.validate_targets(settings.target_sum_tolerance)?;
    Ok(build_snapshots(valued, &goal.targets))
}

/// Market value per asset class over priced holdings.
///
/// A holding that would push the portfolio total out of decimal range is left
/// out, so the class values always sum without overflow.
pub fn value_by_asset_class(valued: &[ValuedHolding]) -> BTreeMap<AssetClass, Decimal> {
    let mut by_class: BTreeMap<AssetClass, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    let mut skipped = 0usize;
    for holding in valued {
        match holding.market_value {
            Some(value) if holding.is_valued() => match total.checked_add(value) {
                Some(new_total) => {
                    total = new_total;
                    *by_class
                        .entry(classify(holding.holding.instrument_class))
                        .or_default() += value;
                }
                None => {
                    warn!(
                        "Leaving {} out of the allocation comparison: portfolio value would leave decimal range",
                        holding.instrument_key()
                    );
                    skipped += 1;
                }
            },
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(
            "{} holdings left out of the allocation comparison",
            skipped
        );
    }
    by_class
}

fn build_snapshots(
    valued: &[ValuedHolding],
    targets: &[AllocationTarget],
) -> Vec<AllocationSnapshot> {
    let by_class = value_by_asset_class(valued);
    let total: Decimal = by_class.values().copied().sum();

    let share = |value: Decimal| {
        if total > Decimal::ZERO {
            value / total * FULL_ALLOCATION_PERCENT
        } else {
            Decimal::ZERO
        }
    };

    let mut snapshots: Vec<AllocationSnapshot> = targets
        .iter()
        .map(|target| {
            let current_value = by_class
                .get(&target.asset_class)
                .copied()
                .unwrap_or_default();
            let current_percentage = share(current_value);
            AllocationSnapshot {
                asset_class: target.asset_class,
                target_percentage: target.target_percentage,
                current_percentage,
                deviation: current_percentage - target.target_percentage,
                current_value,
                is_targeted: true,
            }
        })
        .collect();

    let targeted: HashSet<AssetClass> = targets.iter().map(|t| t.asset_class).collect();
    let mut untargeted: Vec<(AssetClass, Decimal)> = by_class
        .into_iter()
        .filter(|(class, _)| !targeted.contains(class))
        .collect();
    untargeted.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

    for (asset_class, current_value) in untargeted {
        warn!(
            "Portfolio holds {} ({}) but the goal has no target for it",
            asset_class, current_value
        );
        let current_percentage = share(current_value);
        snapshots.push(AllocationSnapshot {
            asset_class,
            target_percentage: Decimal::ZERO,
            current_percentage,
            deviation: current_percentage,
            current_value,
            is_targeted: false,
        });
    }

    snapshots
}
