//! Rebalancing advisor.
//!
//! Thresholds the comparator's deviations and orders what is left by urgency.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::DEFAULT_DRIFT_THRESHOLD;
use crate::portfolio::allocation::AllocationSnapshot;

use super::{RebalanceAction, Suggestion};

/// Advises with the default drift threshold of 5 percentage points.
pub fn advise_default(snapshots: &[AllocationSnapshot]) -> Vec<Suggestion> {
    advise(snapshots, DEFAULT_DRIFT_THRESHOLD)
}

/// Emits a suggestion for every snapshot whose absolute deviation exceeds
/// `threshold`, largest imbalance first. Ties are broken by asset-class name.
///
/// A negative threshold is treated as zero.
pub fn advise(snapshots: &[AllocationSnapshot], threshold: Decimal) -> Vec<Suggestion> {
    let threshold = threshold.max(Decimal::ZERO);

    let mut suggestions: Vec<Suggestion> = snapshots
        .iter()
        .filter(|snapshot| snapshot.deviation.abs() > threshold)
        .map(|snapshot| Suggestion {
            asset_class: snapshot.asset_class,
            action: if snapshot.deviation > Decimal::ZERO {
                RebalanceAction::Reduce
            } else {
                RebalanceAction::Increase
            },
            percentage_points: snapshot.deviation.abs(),
            deviation: snapshot.deviation,
            current_percentage: snapshot.current_percentage,
            target_percentage: snapshot.target_percentage,
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.percentage_points
            .cmp(&a.percentage_points)
            .then_with(|| a.asset_class.as_str().cmp(b.asset_class.as_str()))
    });

    debug!(
        "{} of {} asset classes drifted beyond {} pp",
        suggestions.len(),
        snapshots.len(),
        threshold
    );
    suggestions
}
