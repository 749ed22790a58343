//! Valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::LedgerIntegrityError;
use crate::portfolio::holdings::Holding;

/// Whether a holding could be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValuationStatus {
    Valued,
    /// No usable quote. Market value and gains are left empty, never estimated.
    PriceUnavailable,
}

/// A holding combined with its current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub current_price: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub unrealized_gain_loss: Option<Decimal>,
    /// Gain relative to cost basis, in percent.
    pub unrealized_gain_loss_pct: Option<Decimal>,
    pub status: ValuationStatus,
}

impl ValuedHolding {
    pub fn is_valued(&self) -> bool {
        self.status == ValuationStatus::Valued
    }

    pub fn instrument_key(&self) -> &str {
        &self.holding.instrument_key
    }

    /// Copy with monetary fields rounded for display.
    pub fn rounded_for_display(&self) -> Self {
        let round = |value: Option<Decimal>| value.map(|v| v.round_dp(DISPLAY_DECIMAL_PRECISION));
        Self {
            holding: Holding {
                average_cost: self.holding.average_cost.round_dp(DISPLAY_DECIMAL_PRECISION),
                total_cost_basis: self
                    .holding
                    .total_cost_basis
                    .round_dp(DISPLAY_DECIMAL_PRECISION),
                ..self.holding.clone()
            },
            current_price: self.current_price,
            market_value: round(self.market_value),
            unrealized_gain_loss: round(self.unrealized_gain_loss),
            unrealized_gain_loss_pct: round(self.unrealized_gain_loss_pct),
            status: self.status,
        }
    }
}

/// Totals across the priced part of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub holdings: Vec<ValuedHolding>,
    pub total_market_value: Decimal,
    /// Cost basis of priced holdings only, so gains compare like with like.
    pub total_cost_basis: Decimal,
    pub total_unrealized_gain_loss: Decimal,
    pub total_unrealized_gain_loss_pct: Decimal,
    pub unpriced_instruments: Vec<String>,
    /// Instruments whose ledger could not be reconciled. They have no holding
    /// here, so every total and allocation excludes them.
    #[serde(default)]
    pub failed_instruments: BTreeMap<String, LedgerIntegrityError>,
}

impl PortfolioValuation {
    /// True when every instrument in the ledger is reconciled and priced.
    pub fn is_complete(&self) -> bool {
        self.unpriced_instruments.is_empty() && self.failed_instruments.is_empty()
    }
}
