//! Ledger entry domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, ValidationError};

use super::transactions_constants::*;

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
    Dividend,
    Interest,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => TRANSACTION_KIND_BUY,
            TransactionKind::Sell => TRANSACTION_KIND_SELL,
            TransactionKind::Dividend => TRANSACTION_KIND_DIVIDEND,
            TransactionKind::Interest => TRANSACTION_KIND_INTEREST,
        }
    }

    /// Buy and sell move the position; income kinds never do.
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }

    pub fn is_income(&self) -> bool {
        !self.is_trade()
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            TRANSACTION_KIND_BUY => Ok(TransactionKind::Buy),
            TRANSACTION_KIND_SELL => Ok(TransactionKind::Sell),
            TRANSACTION_KIND_DIVIDEND => Ok(TransactionKind::Dividend),
            TRANSACTION_KIND_INTEREST => Ok(TransactionKind::Interest),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

/// Fine-grained instrument type recorded with each ledger entry.
///
/// Parsing is total: anything unrecognised becomes `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InstrumentClass {
    Stock,
    Etf,
    Fund,
    Bond,
    Crypto,
    Commodity,
    Cash,
    RealEstate,
    Other,
}

impl InstrumentClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentClass::Stock => INSTRUMENT_CLASS_STOCK,
            InstrumentClass::Etf => INSTRUMENT_CLASS_ETF,
            InstrumentClass::Fund => INSTRUMENT_CLASS_FUND,
            InstrumentClass::Bond => INSTRUMENT_CLASS_BOND,
            InstrumentClass::Crypto => INSTRUMENT_CLASS_CRYPTO,
            InstrumentClass::Commodity => INSTRUMENT_CLASS_COMMODITY,
            InstrumentClass::Cash => INSTRUMENT_CLASS_CASH,
            InstrumentClass::RealEstate => INSTRUMENT_CLASS_REAL_ESTATE,
            InstrumentClass::Other => INSTRUMENT_CLASS_OTHER,
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "stock" | "stocks" | "equity" | "share" => InstrumentClass::Stock,
            "etf" | "etfs" | "etn" | "etc" => InstrumentClass::Etf,
            "fund" | "funds" | "mutual_fund" | "mutualfund" => InstrumentClass::Fund,
            "bond" | "bonds" | "fixed_income" => InstrumentClass::Bond,
            "crypto" | "cryptocurrency" => InstrumentClass::Crypto,
            "commodity" | "commodities" => InstrumentClass::Commodity,
            "cash" | "money_market" => InstrumentClass::Cash,
            "real_estate" | "realestate" | "reit" | "property" => InstrumentClass::RealEstate,
            _ => InstrumentClass::Other,
        })
    }
}

impl From<String> for InstrumentClass {
    fn from(value: String) -> Self {
        match InstrumentClass::from_str(&value) {
            Ok(class) => class,
            Err(never) => match never {},
        }
    }
}

impl From<InstrumentClass> for String {
    fn from(value: InstrumentClass) -> Self {
        value.as_str().to_string()
    }
}

/// Position of an entry in its instrument's history.
///
/// Ordering is by timestamp first, then by the ledger's sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderingKey {
    pub timestamp: DateTime<Utc>,
    pub sequence_number: i64,
}

/// Immutable ledger entry. Corrections are new offsetting entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub instrument_key: String,
    pub instrument_name: String,
    pub instrument_class: InstrumentClass,
    pub kind: TransactionKind,
    /// Units bought or sold. Unused for income kinds.
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Required for buy and sell.
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub fees: Decimal,
    /// Signed cash effect: negative for buys, positive for sells and income.
    pub gross_amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub sequence_number: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn ordering_key(&self) -> OrderingKey {
        OrderingKey {
            timestamp: self.timestamp,
            sequence_number: self.sequence_number,
        }
    }

    /// Get quantity, defaulting to zero if not set
    pub fn qty(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ZERO)
    }

    /// Get unit price, defaulting to zero if not set
    pub fn price(&self) -> Decimal {
        self.price_per_unit.unwrap_or(Decimal::ZERO)
    }
}

/// Input model for appending a new entry to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub instrument_key: String,
    pub instrument_name: String,
    pub instrument_class: InstrumentClass,
    pub kind: TransactionKind,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Unit price for trades, the paid amount for income kinds.
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub fees: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Signed cash effect of this entry, or `None` when it does not fit a `Decimal`.
    ///
    /// buy: `-(quantity * price + fees)`, sell: `quantity * price - fees`,
    /// dividend/interest: `amount - fees`.
    pub fn gross_amount(&self) -> Option<Decimal> {
        let quantity = self.quantity.unwrap_or(Decimal::ZERO);
        let price = self.price_per_unit.unwrap_or(Decimal::ZERO);
        match self.kind {
            TransactionKind::Buy => quantity
                .checked_mul(price)?
                .checked_add(self.fees)
                .map(|cost| -cost),
            TransactionKind::Sell => quantity.checked_mul(price)?.checked_sub(self.fees),
            TransactionKind::Dividend | TransactionKind::Interest => price.checked_sub(self.fees),
        }
    }

    /// Materializes the entry with the sequence number assigned by the ledger.
    pub fn into_transaction(self, sequence_number: i64) -> Result<Transaction> {
        let gross_amount = self.gross_amount().ok_or_else(|| {
            ValidationError::InvalidTransaction {
                transaction_id: self.id.clone().unwrap_or_else(|| "<new>".to_string()),
                reason: "gross amount is out of decimal range".to_string(),
            }
        })?;
        Ok(Transaction {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            instrument_key: self.instrument_key,
            instrument_name: self.instrument_name,
            instrument_class: self.instrument_class,
            kind: self.kind,
            quantity: if self.kind.is_trade() {
                self.quantity
            } else {
                None
            },
            price_per_unit: self.price_per_unit,
            fees: self.fees,
            gross_amount,
            timestamp: self.timestamp,
            sequence_number,
            currency: self.currency,
            notes: self.notes,
        })
    }
}
