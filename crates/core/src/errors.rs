//! Core error types for the reconciliation engine.
//!
//! Hard failures (validation, ledger integrity, goal configuration) are typed so
//! callers can decide on user-facing messaging. Missing prices are not errors at
//! this level; they travel as a status flag on each valued holding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::portfolio::allocation::AssetClass;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine and its collaborators.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger integrity violation: {0}")]
    LedgerIntegrity(#[from] LedgerIntegrityError),

    #[error("Goal configuration is invalid: {0}")]
    GoalConfiguration(#[from] GoalConfigurationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Quote provider error: {0}")]
    Quote(String),

    #[error("Invalid engine settings: {0}")]
    Settings(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Malformed transactions, raised before any folding begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Transaction {transaction_id} is invalid: {reason}")]
    InvalidTransaction {
        transaction_id: String,
        reason: String,
    },

    #[error("Transaction {transaction_id} is missing required field '{field}'")]
    MissingField {
        transaction_id: String,
        field: String,
    },

    #[error("Transaction id {0} appears more than once in the batch")]
    DuplicateTransactionId(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Problems detected while folding one instrument's ordered history.
///
/// These abort the affected instrument only; other instruments in the same
/// batch still reconcile.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LedgerIntegrityError {
    #[error("Sell {transaction_id} for {instrument_key} requests {requested} units but only {available} are held")]
    Oversell {
        instrument_key: String,
        transaction_id: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Transaction {transaction_id} for {instrument_key} is ordered before its predecessor")]
    OutOfOrder {
        instrument_key: String,
        transaction_id: String,
    },

    #[error("Transaction {transaction_id} for {instrument_key} shares its (timestamp, sequence number) with another entry")]
    DuplicateOrderingKey {
        instrument_key: String,
        transaction_id: String,
    },

    #[error("Appended transaction {transaction_id} for {instrument_key} is not newer than the last folded entry")]
    StaleAppend {
        instrument_key: String,
        transaction_id: String,
    },

    #[error("Transaction {transaction_id} changes the instrument class of {instrument_key}")]
    InstrumentClassChanged {
        instrument_key: String,
        transaction_id: String,
    },

    #[error("Transaction {transaction_id} pushes a running total of {instrument_key} out of decimal range")]
    ArithmeticOverflow {
        instrument_key: String,
        transaction_id: String,
    },
}

impl LedgerIntegrityError {
    /// Instrument whose reconciliation was aborted.
    pub fn instrument_key(&self) -> &str {
        match self {
            LedgerIntegrityError::Oversell { instrument_key, .. }
            | LedgerIntegrityError::OutOfOrder { instrument_key, .. }
            | LedgerIntegrityError::DuplicateOrderingKey { instrument_key, .. }
            | LedgerIntegrityError::StaleAppend { instrument_key, .. }
            | LedgerIntegrityError::InstrumentClassChanged { instrument_key, .. }
            | LedgerIntegrityError::ArithmeticOverflow { instrument_key, .. } => {
                instrument_key
            }
        }
    }
}

/// A goal whose allocation targets cannot be compared against.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalConfigurationError {
    #[error("Targets of goal {goal_id} sum to {sum}%, expected 100%")]
    TargetSumMismatch { goal_id: String, sum: Decimal },

    #[error("Target for {asset_class} in goal {goal_id} is {percentage}%, outside 0-100")]
    TargetOutOfRange {
        goal_id: String,
        asset_class: AssetClass,
        percentage: Decimal,
    },

    #[error("Goal {goal_id} has more than one target for {asset_class}")]
    DuplicateAssetClass {
        goal_id: String,
        asset_class: AssetClass,
    },

    #[error("Goal {goal_id} has no allocation targets")]
    NoTargets { goal_id: String },
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
