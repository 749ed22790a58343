use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::LedgerIntegrityError;
use crate::transactions::{InstrumentClass, TransactionKind};

use super::PositionAccumulator;

/// Open position derived from a ledger replay.
///
/// Never persisted as a source of truth: equal inputs always yield an equal holding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub instrument_key: String,
    pub instrument_name: String,
    pub instrument_class: InstrumentClass,
    pub quantity: Decimal,
    /// Cost basis per unit, fees included.
    pub average_cost: Decimal,
    /// Total paid, fees included, for the units still held.
    pub total_cost_basis: Decimal,
    /// First buy since the position was last flat.
    pub first_acquired_at: Option<DateTime<Utc>>,
    pub last_transaction_at: Option<DateTime<Utc>>,
    pub transaction_count: usize,
}

/// Dividend and interest received, kept apart from positions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub total: Decimal,
    pub by_kind: BTreeMap<TransactionKind, Decimal>,
    pub by_instrument: BTreeMap<String, Decimal>,
}

impl IncomeSummary {
    /// Totals saturate at the decimal bounds instead of overflowing.
    pub fn add_income(&mut self, instrument_key: &str, kind: TransactionKind, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        self.total = self.total.saturating_add(amount);
        let by_kind = self.by_kind.entry(kind).or_insert(Decimal::ZERO);
        *by_kind = by_kind.saturating_add(amount);
        let by_instrument = self
            .by_instrument
            .entry(instrument_key.to_string())
            .or_insert(Decimal::ZERO);
        *by_instrument = by_instrument.saturating_add(amount);
    }
}

/// Output of a reconciliation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Open positions only; instruments with zero quantity are absent.
    pub holdings: BTreeMap<String, Holding>,
    /// Income from every instrument that reconciled, open or closed.
    pub income: IncomeSummary,
    /// Instruments whose fold aborted, with the reason.
    pub failures: BTreeMap<String, LedgerIntegrityError>,
    /// Running state per reconciled instrument, closed ones included.
    pub watermarks: BTreeMap<String, PositionAccumulator>,
}

impl ReconciliationResult {
    /// Builds holdings and income from folded per-instrument state.
    pub(crate) fn from_parts(
        watermarks: BTreeMap<String, PositionAccumulator>,
        failures: BTreeMap<String, LedgerIntegrityError>,
    ) -> Self {
        let mut holdings = BTreeMap::new();
        let mut income = IncomeSummary::default();

        for (key, position) in &watermarks {
            income.add_income(key, TransactionKind::Dividend, position.dividends);
            income.add_income(key, TransactionKind::Interest, position.interest);
            if let Some(holding) = position.to_holding() {
                holdings.insert(key.clone(), holding);
            }
        }

        Self {
            holdings,
            income,
            failures,
            watermarks,
        }
    }

    pub fn income_total(&self) -> Decimal {
        self.income.total
    }

    pub fn holding(&self, instrument_key: &str) -> Option<&Holding> {
        self.holdings.get(instrument_key)
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.holdings
            .values()
            .fold(Decimal::ZERO, |sum, h| sum.saturating_add(h.total_cost_basis))
    }
}
