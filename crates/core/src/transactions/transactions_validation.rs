use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::errors::{Result, ValidationError};

use super::{NewTransaction, Transaction, TransactionKind};

fn invalid(tx: &Transaction, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidTransaction {
        transaction_id: tx.id.clone(),
        reason: reason.into(),
    }
}

fn missing(tx: &Transaction, field: &str) -> ValidationError {
    ValidationError::MissingField {
        transaction_id: tx.id.clone(),
        field: field.to_string(),
    }
}

/// Checks a single entry before it is folded.
pub fn validate_transaction(tx: &Transaction) -> Result<()> {
    if tx.id.trim().is_empty() {
        return Err(ValidationError::MissingField {
            transaction_id: "<blank>".to_string(),
            field: "id".to_string(),
        }
        .into());
    }
    if tx.instrument_key.trim().is_empty() {
        return Err(missing(tx, "instrumentKey").into());
    }
    if tx.fees < Decimal::ZERO {
        return Err(invalid(tx, format!("fees must not be negative, got {}", tx.fees)).into());
    }

    match tx.kind {
        TransactionKind::Buy | TransactionKind::Sell => {
            let quantity = tx.quantity.ok_or_else(|| missing(tx, "quantity"))?;
            if quantity <= Decimal::ZERO {
                return Err(invalid(
                    tx,
                    format!("{} quantity must be positive, got {}", tx.kind, quantity),
                )
                .into());
            }
            let price = tx.price_per_unit.ok_or_else(|| missing(tx, "pricePerUnit"))?;
            if price < Decimal::ZERO {
                return Err(invalid(
                    tx,
                    format!("pricePerUnit must not be negative, got {}", price),
                )
                .into());
            }
            if quantity
                .checked_mul(price)
                .and_then(|amount| amount.checked_add(tx.fees))
                .is_none()
            {
                return Err(
                    invalid(tx, "quantity * pricePerUnit + fees is out of decimal range").into(),
                );
            }
        }
        TransactionKind::Dividend | TransactionKind::Interest => {
            if let Some(price) = tx.price_per_unit {
                if price < Decimal::ZERO {
                    return Err(invalid(
                        tx,
                        format!("pricePerUnit must not be negative, got {}", price),
                    )
                    .into());
                }
            }
        }
    }
    Ok(())
}

/// Validates a whole batch, including id uniqueness. Stops at the first failure.
pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(transactions.len());
    for tx in transactions {
        validate_transaction(tx)?;
        if !seen.insert(tx.id.as_str()) {
            return Err(ValidationError::DuplicateTransactionId(tx.id.clone()).into());
        }
    }
    Ok(())
}

impl NewTransaction {
    /// Applies the pre-fold checks before the entry reaches the ledger.
    pub fn validate(&self) -> Result<()> {
        validate_transaction(&self.clone().into_transaction(0)?)
    }
}
