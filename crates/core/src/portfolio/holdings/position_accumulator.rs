//! Weighted-average cost basis accounting for one instrument.
//!
//! Every monetary value is an unrounded `Decimal`. Fees on buys are capitalised
//! into the cost basis; fees on sells affect proceeds only and are not tracked.

use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::QUANTITY_THRESHOLD;
use crate::errors::LedgerIntegrityError;
use crate::settings::OversellPolicy;
use crate::transactions::{InstrumentClass, OrderingKey, Transaction, TransactionKind};

use super::Holding;

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    quantity.abs() >= QUANTITY_THRESHOLD
}

/// Running `(quantity, total_cost_basis)` for an instrument, plus the ordering
/// key of the last entry folded into it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionAccumulator {
    pub instrument_key: String,
    pub instrument_name: String,
    pub instrument_class: InstrumentClass,
    pub quantity: Decimal,
    pub total_cost_basis: Decimal,
    pub dividends: Decimal,
    pub interest: Decimal,
    pub first_acquired_at: Option<DateTime<Utc>>,
    pub last_key: Option<OrderingKey>,
    pub transaction_count: usize,
}

impl PositionAccumulator {
    /// Empty position seeded with the instrument identity of its first entry.
    pub fn new(first: &Transaction) -> Self {
        Self {
            instrument_key: first.instrument_key.clone(),
            instrument_name: first.instrument_name.clone(),
            instrument_class: first.instrument_class,
            quantity: Decimal::ZERO,
            total_cost_basis: Decimal::ZERO,
            dividends: Decimal::ZERO,
            interest: Decimal::ZERO,
            first_acquired_at: None,
            last_key: None,
            transaction_count: 0,
        }
    }

    /// Cost per unit. Zero whenever the position is flat.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            // `apply_buy` rejects any position whose average would not fit.
            self.total_cost_basis
                .checked_div(self.quantity)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    fn overflow(&self, transaction_id: &str) -> LedgerIntegrityError {
        LedgerIntegrityError::ArithmeticOverflow {
            instrument_key: self.instrument_key.clone(),
            transaction_id: transaction_id.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Folds one entry. The caller guarantees ordering and prior validation.
    pub fn apply(
        &mut self,
        tx: &Transaction,
        oversell_policy: OversellPolicy,
    ) -> Result<(), LedgerIntegrityError> {
        if tx.instrument_class != self.instrument_class {
            return Err(LedgerIntegrityError::InstrumentClassChanged {
                instrument_key: self.instrument_key.clone(),
                transaction_id: tx.id.clone(),
            });
        }

        match tx.kind {
            TransactionKind::Buy => {
                self.apply_buy(&tx.id, tx.qty(), tx.price(), tx.fees, tx.timestamp)?;
            }
            TransactionKind::Sell => {
                self.apply_sell(&tx.id, tx.qty(), oversell_policy)?;
            }
            TransactionKind::Dividend => {
                self.dividends = self
                    .dividends
                    .checked_add(tx.gross_amount)
                    .ok_or_else(|| self.overflow(&tx.id))?;
            }
            TransactionKind::Interest => {
                self.interest = self
                    .interest
                    .checked_add(tx.gross_amount)
                    .ok_or_else(|| self.overflow(&tx.id))?;
            }
        }

        if !tx.instrument_name.is_empty() {
            self.instrument_name = tx.instrument_name.clone();
        }
        self.last_key = Some(tx.ordering_key());
        self.transaction_count += 1;
        Ok(())
    }

    /// Adds units at `price` and capitalises `fees` into the cost basis.
    ///
    /// Fails without touching the position if any running figure, the
    /// average cost included, would leave decimal range.
    pub fn apply_buy(
        &mut self,
        transaction_id: &str,
        quantity: Decimal,
        price: Decimal,
        fees: Decimal,
        at: DateTime<Utc>,
    ) -> Result<(), LedgerIntegrityError> {
        let new_quantity = self.quantity.checked_add(quantity);
        let new_cost = quantity
            .checked_mul(price)
            .and_then(|cost| cost.checked_add(fees))
            .and_then(|cost| self.total_cost_basis.checked_add(cost));
        let (Some(new_quantity), Some(new_cost)) = (new_quantity, new_cost) else {
            return Err(self.overflow(transaction_id));
        };
        if new_quantity > Decimal::ZERO && new_cost.checked_div(new_quantity).is_none() {
            return Err(self.overflow(transaction_id));
        }

        if !self.is_open() {
            self.first_acquired_at = Some(at);
        }
        self.quantity = new_quantity;
        self.total_cost_basis = new_cost;
        Ok(())
    }

    /// Removes units at the running average cost and returns the cost relieved.
    ///
    /// The average cost of the remaining units is unchanged by a sell.
    pub fn apply_sell(
        &mut self,
        transaction_id: &str,
        quantity: Decimal,
        oversell_policy: OversellPolicy,
    ) -> Result<Decimal, LedgerIntegrityError> {
        let mut sold = quantity;
        if sold > self.quantity {
            match oversell_policy {
                OversellPolicy::Reject => {
                    return Err(LedgerIntegrityError::Oversell {
                        instrument_key: self.instrument_key.clone(),
                        transaction_id: transaction_id.to_string(),
                        requested: quantity,
                        available: self.quantity,
                    });
                }
                OversellPolicy::Clamp => {
                    warn!(
                        "Sell {} for {} requests {} units but only {} are held. Clamping to held quantity.",
                        transaction_id, self.instrument_key, quantity, self.quantity
                    );
                    sold = self.quantity;
                }
            }
        }

        let cost_of_sold_units = sold
            .checked_mul(self.average_cost())
            .ok_or_else(|| self.overflow(transaction_id))?;
        self.total_cost_basis -= cost_of_sold_units;
        self.quantity -= sold;

        if self.quantity > Decimal::ZERO && !is_quantity_significant(&self.quantity) {
            warn!(
                "Position {} left with dust quantity {} after sell {}. Closing it.",
                self.instrument_key, self.quantity, transaction_id
            );
            self.quantity = Decimal::ZERO;
        }
        if self.quantity.is_zero() {
            self.close();
        }
        Ok(cost_of_sold_units)
    }

    /// Flattens the position so rounding residue cannot leak into a re-entry.
    fn close(&mut self) {
        self.quantity = Decimal::ZERO;
        self.total_cost_basis = Decimal::ZERO;
        self.first_acquired_at = None;
    }

    /// The open position, or `None` when flat.
    pub fn to_holding(&self) -> Option<Holding> {
        if !self.is_open() {
            return None;
        }
        Some(Holding {
            instrument_key: self.instrument_key.clone(),
            instrument_name: self.instrument_name.clone(),
            instrument_class: self.instrument_class,
            quantity: self.quantity,
            average_cost: self.average_cost(),
            total_cost_basis: self.total_cost_basis,
            first_acquired_at: self.first_acquired_at,
            last_transaction_at: self.last_key.map(|key| key.timestamp),
            transaction_count: self.transaction_count,
        })
    }
}
