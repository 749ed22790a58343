//! Replays ledger entries into per-instrument holdings.
//!
//! Each instrument is an independent fold over its own entries in
//! `(timestamp, sequence_number)` order. Instruments share no state, so they
//! can be folded on the rayon pool without changing the result.

use log::{debug, error};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::errors::{LedgerIntegrityError, Result};
use crate::settings::{EngineSettings, OrderingPolicy};
use crate::transactions::{validate_transactions, OrderingKey, Transaction};

use super::{PositionAccumulator, ReconciliationResult};

type FoldOutcome = (
    String,
    std::result::Result<Option<PositionAccumulator>, LedgerIntegrityError>,
);

/// Reconciles with default settings: oversell rejected, strict ordering.
pub fn reconcile(transactions: &[Transaction]) -> Result<ReconciliationResult> {
    reconcile_with(transactions, &EngineSettings::default())
}

/// Full replay of a user's ledger.
///
/// Malformed entries fail the whole call before folding begins. Integrity
/// problems abort only the instrument they occur in and are reported in
/// `ReconciliationResult::failures`.
pub fn reconcile_with(
    transactions: &[Transaction],
    settings: &EngineSettings,
) -> Result<ReconciliationResult> {
    validate_transactions(transactions)?;

    let groups = group_by_instrument(transactions);
    debug!(
        "Reconciling {} transactions across {} instruments",
        transactions.len(),
        groups.len()
    );

    let outcomes = fold_groups(groups, &BTreeMap::new(), settings);

    let mut watermarks = BTreeMap::new();
    let mut failures = BTreeMap::new();
    collect_outcomes(outcomes, &mut watermarks, &mut failures);

    Ok(ReconciliationResult::from_parts(watermarks, failures))
}

/// Continues a previous reconciliation with newly appended entries.
///
/// Yields the same holdings and income as a full replay of the combined
/// history, provided every appended entry is newer than the last one already
/// folded for its instrument. Instruments that failed before stay failed.
pub fn reconcile_incremental(
    previous: &ReconciliationResult,
    appended: &[Transaction],
    settings: &EngineSettings,
) -> Result<ReconciliationResult> {
    validate_transactions(appended)?;

    let groups: Vec<(String, Vec<&Transaction>)> = group_by_instrument(appended)
        .into_iter()
        .filter(|(key, _)| {
            let known_failure = previous.failures.contains_key(key);
            if known_failure {
                debug!(
                    "Skipping appended entries for {}: instrument already failed reconciliation",
                    key
                );
            }
            !known_failure
        })
        .collect();
    debug!(
        "Incrementally reconciling {} appended transactions across {} instruments",
        appended.len(),
        groups.len()
    );

    let outcomes = fold_groups(groups, &previous.watermarks, settings);

    let mut watermarks = previous.watermarks.clone();
    let mut failures = previous.failures.clone();
    collect_outcomes(outcomes, &mut watermarks, &mut failures);

    Ok(ReconciliationResult::from_parts(watermarks, failures))
}

/// Groups entries by instrument, keeping input order within each group.
fn group_by_instrument(transactions: &[Transaction]) -> Vec<(String, Vec<&Transaction>)> {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        groups.entry(tx.instrument_key.as_str()).or_default().push(tx);
    }
    groups
        .into_iter()
        .map(|(key, txs)| (key.to_string(), txs))
        .collect()
}

fn fold_groups(
    groups: Vec<(String, Vec<&Transaction>)>,
    starting_points: &BTreeMap<String, PositionAccumulator>,
    settings: &EngineSettings,
) -> Vec<FoldOutcome> {
    let fold = |(key, txs): (String, Vec<&Transaction>)| -> FoldOutcome {
        let start = starting_points.get(&key).cloned();
        let outcome = fold_instrument(&key, txs, start, settings);
        (key, outcome)
    };

    if settings.parallel_fold {
        groups.into_par_iter().map(fold).collect()
    } else {
        groups.into_iter().map(fold).collect()
    }
}

fn collect_outcomes(
    outcomes: Vec<FoldOutcome>,
    watermarks: &mut BTreeMap<String, PositionAccumulator>,
    failures: &mut BTreeMap<String, LedgerIntegrityError>,
) {
    for (key, outcome) in outcomes {
        match outcome {
            Ok(Some(position)) => {
                watermarks.insert(key, position);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Reconciliation of {} aborted: {}", key, e);
                watermarks.remove(&key);
                failures.insert(key, e);
            }
        }
    }
}

/// Puts one instrument's entries in fold order according to the policy.
fn order_entries<'a>(
    instrument_key: &str,
    mut txs: Vec<&'a Transaction>,
    policy: OrderingPolicy,
) -> std::result::Result<Vec<&'a Transaction>, LedgerIntegrityError> {
    if policy == OrderingPolicy::Sort {
        txs.sort_by_key(|tx| tx.ordering_key());
    }

    let mut previous: Option<OrderingKey> = None;
    for tx in &txs {
        let key = tx.ordering_key();
        if let Some(prev) = previous {
            if key == prev {
                return Err(LedgerIntegrityError::DuplicateOrderingKey {
                    instrument_key: instrument_key.to_string(),
                    transaction_id: tx.id.clone(),
                });
            }
            if key < prev {
                return Err(LedgerIntegrityError::OutOfOrder {
                    instrument_key: instrument_key.to_string(),
                    transaction_id: tx.id.clone(),
                });
            }
        }
        previous = Some(key);
    }
    Ok(txs)
}

/// Folds one instrument's entries, optionally on top of an earlier state.
///
/// Returns `None` only for an empty group with no earlier state.
fn fold_instrument(
    instrument_key: &str,
    txs: Vec<&Transaction>,
    start: Option<PositionAccumulator>,
    settings: &EngineSettings,
) -> std::result::Result<Option<PositionAccumulator>, LedgerIntegrityError> {
    let ordered = order_entries(instrument_key, txs, settings.ordering_policy)?;

    if let (Some(last_key), Some(first)) = (
        start.as_ref().and_then(|existing| existing.last_key),
        ordered.first(),
    ) {
        if first.ordering_key() <= last_key {
            return Err(LedgerIntegrityError::StaleAppend {
                instrument_key: instrument_key.to_string(),
                transaction_id: first.id.clone(),
            });
        }
    }

    let mut position = start;
    for tx in ordered {
        position
            .get_or_insert_with(|| PositionAccumulator::new(tx))
            .apply(tx, settings.oversell_policy)?;
    }
    Ok(position)
}
