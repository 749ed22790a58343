use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};

use crate::portfolio::holdings::Holding;

use super::{PortfolioValuation, ValuationStatus, ValuedHolding};

/// Gain as a percentage of cost. A zero or negative cost basis yields zero.
///
/// `None` when the ratio leaves decimal range.
fn gain_pct(gain: Decimal, cost_basis: Decimal) -> Option<Decimal> {
    if cost_basis > Decimal::ZERO {
        gain.checked_div(cost_basis)?.checked_mul(dec!(100))
    } else {
        Some(Decimal::ZERO)
    }
}

/// Values a holding at `current_price`.
///
/// A price large enough to push market value or gain out of decimal range
/// leaves the holding unpriced.
pub fn valuate(holding: &Holding, current_price: Decimal) -> ValuedHolding {
    let figures = holding.quantity.checked_mul(current_price).and_then(|market_value| {
        let gain = market_value.checked_sub(holding.total_cost_basis)?;
        let pct = gain_pct(gain, holding.total_cost_basis)?;
        Some((market_value, gain, pct))
    });
    let Some((market_value, unrealized_gain_loss, unrealized_gain_loss_pct)) = figures else {
        warn!(
            "Price {} for {} puts its market value out of decimal range. Marking it unpriced.",
            current_price, holding.instrument_key
        );
        return valuate_unpriced(holding);
    };

    ValuedHolding {
        holding: holding.clone(),
        current_price: Some(current_price),
        market_value: Some(market_value),
        unrealized_gain_loss: Some(unrealized_gain_loss),
        unrealized_gain_loss_pct: Some(unrealized_gain_loss_pct),
        status: ValuationStatus::Valued,
    }
}

/// A holding whose price could not be obtained. No value is substituted.
pub fn valuate_unpriced(holding: &Holding) -> ValuedHolding {
    ValuedHolding {
        holding: holding.clone(),
        current_price: None,
        market_value: None,
        unrealized_gain_loss: None,
        unrealized_gain_loss_pct: None,
        status: ValuationStatus::PriceUnavailable,
    }
}

/// Values a holding when the price may be missing.
///
/// A negative quote is treated as unavailable.
pub fn valuate_with(holding: &Holding, current_price: Option<Decimal>) -> ValuedHolding {
    match current_price {
        Some(price) if price >= Decimal::ZERO => valuate(holding, price),
        Some(price) => {
            warn!(
                "Ignoring negative price {} for {}. Marking it unpriced.",
                price, holding.instrument_key
            );
            valuate_unpriced(holding)
        }
        None => {
            warn!(
                "No current price for {}. Market value left empty.",
                holding.instrument_key
            );
            valuate_unpriced(holding)
        }
    }
}

/// Values every holding against a price map keyed by instrument.
pub fn valuate_all<'a, I>(holdings: I, prices: &HashMap<String, Decimal>) -> Vec<ValuedHolding>
where
    I: IntoIterator<Item = &'a Holding>,
{
    holdings
        .into_iter()
        .map(|holding| valuate_with(holding, prices.get(&holding.instrument_key).copied()))
        .collect()
}

/// Aggregates valued holdings into portfolio totals.
///
/// Unpriced holdings are listed but excluded from every total. So is a priced
/// holding that would push a total out of decimal range.
pub fn summarize(holdings: Vec<ValuedHolding>) -> PortfolioValuation {
    let mut total_market_value = Decimal::ZERO;
    let mut total_cost_basis = Decimal::ZERO;
    let mut unpriced_instruments = Vec::new();

    for valued in &holdings {
        let totals = match valued.market_value {
            Some(market_value) if valued.is_valued() => total_market_value
                .checked_add(market_value)
                .zip(total_cost_basis.checked_add(valued.holding.total_cost_basis)),
            _ => {
                unpriced_instruments.push(valued.holding.instrument_key.clone());
                continue;
            }
        };
        match totals {
            Some((market_value, cost_basis)) => {
                total_market_value = market_value;
                total_cost_basis = cost_basis;
            }
            None => {
                warn!(
                    "Leaving {} out of portfolio totals: they would leave decimal range",
                    valued.holding.instrument_key
                );
                unpriced_instruments.push(valued.holding.instrument_key.clone());
            }
        }
    }

    // Both totals are non-negative, so the difference stays in range.
    let total_unrealized_gain_loss = total_market_value - total_cost_basis;
    debug!(
        "Valued {} holdings ({} unpriced): market value {}, cost basis {}",
        holdings.len(),
        unpriced_instruments.len(),
        total_market_value,
        total_cost_basis
    );

    PortfolioValuation {
        holdings,
        total_market_value,
        total_cost_basis,
        total_unrealized_gain_loss,
        total_unrealized_gain_loss_pct: gain_pct(total_unrealized_gain_loss, total_cost_basis)
            .unwrap_or(Decimal::ZERO),
        unpriced_instruments,
        failed_instruments: BTreeMap::new(),
    }
}
