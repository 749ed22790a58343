/// Transaction kinds
///
/// Each constant is the canonical string form of one ledger entry kind.

/// Acquisition of units. Increases quantity and cost basis.
pub const TRANSACTION_KIND_BUY: &str = "buy";

/// Disposal of units. Decreases quantity and relieves cost basis at the running average.
pub const TRANSACTION_KIND_SELL: &str = "sell";

/// Cash dividend. Counted as income, no effect on the position.
pub const TRANSACTION_KIND_DIVIDEND: &str = "dividend";

/// Interest payment. Counted as income, no effect on the position.
pub const TRANSACTION_KIND_INTEREST: &str = "interest";

/// Instrument classes as recorded on the ledger.
pub const INSTRUMENT_CLASS_STOCK: &str = "stock";
pub const INSTRUMENT_CLASS_ETF: &str = "etf";
pub const INSTRUMENT_CLASS_FUND: &str = "fund";
pub const INSTRUMENT_CLASS_BOND: &str = "bond";
pub const INSTRUMENT_CLASS_CRYPTO: &str = "crypto";
pub const INSTRUMENT_CLASS_COMMODITY: &str = "commodity";
pub const INSTRUMENT_CLASS_CASH: &str = "cash";
pub const INSTRUMENT_CLASS_REAL_ESTATE: &str = "real_estate";
pub const INSTRUMENT_CLASS_OTHER: &str = "other";
