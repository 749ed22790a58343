//! Maps fine-grained instrument classes to the coarse asset classes that
//! allocation goals are written against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::transactions::InstrumentClass;

/// Coarse grouping used by allocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetClass {
    Stocks,
    Etf,
    Funds,
    Bonds,
    Crypto,
    Cash,
    RealEstate,
    Commodities,
    Other,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Etf => "etf",
            AssetClass::Funds => "funds",
            AssetClass::Bonds => "bonds",
            AssetClass::Crypto => "crypto",
            AssetClass::Cash => "cash",
            AssetClass::RealEstate => "real_estate",
            AssetClass::Commodities => "commodities",
            AssetClass::Other => "other",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = std::convert::Infallible;

    /// Accepts both asset-class names and instrument-class names.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(classify_str(s))
    }
}

impl From<String> for AssetClass {
    fn from(value: String) -> Self {
        classify_str(&value)
    }
}

impl From<AssetClass> for String {
    fn from(value: AssetClass) -> Self {
        value.as_str().to_string()
    }
}

/// Total mapping from instrument class to asset class.
pub fn classify(instrument_class: InstrumentClass) -> AssetClass {
    match instrument_class {
        InstrumentClass::Stock => AssetClass::Stocks,
        InstrumentClass::Etf => AssetClass::Etf,
        InstrumentClass::Fund => AssetClass::Funds,
        InstrumentClass::Bond => AssetClass::Bonds,
        InstrumentClass::Crypto => AssetClass::Crypto,
        InstrumentClass::Cash => AssetClass::Cash,
        InstrumentClass::RealEstate => AssetClass::RealEstate,
        InstrumentClass::Commodity => AssetClass::Commodities,
        InstrumentClass::Other => AssetClass::Other,
    }
}

/// Classifies a free-form class name. Unrecognised names fall through to `Other`.
pub fn classify_str(raw: &str) -> AssetClass {
    classify(InstrumentClass::from(raw.to_string()))
}
