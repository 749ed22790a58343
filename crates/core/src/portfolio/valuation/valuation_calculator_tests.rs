use super::*;
use crate::portfolio::holdings::Holding;
use crate::transactions::InstrumentClass;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn holding(key: &str, quantity: Decimal, total_cost_basis: Decimal) -> Holding {
    Holding {
        instrument_key: key.to_string(),
        instrument_name: key.to_string(),
        instrument_class: InstrumentClass::Stock,
        quantity,
        average_cost: if quantity > Decimal::ZERO {
            total_cost_basis / quantity
        } else {
            Decimal::ZERO
        },
        total_cost_basis,
        first_acquired_at: None,
        last_transaction_at: None,
        transaction_count: 1,
    }
}

#[test]
fn test_valuation_of_partially_sold_position() {
    let acme = holding("ACME", dec!(6), dec!(603));

    let valued = valuate(&acme, dec!(120));

    assert_eq!(valued.status, ValuationStatus::Valued);
    assert_eq!(valued.market_value, Some(dec!(720)));
    assert_eq!(valued.unrealized_gain_loss, Some(dec!(117)));
    assert_eq!(valued.unrealized_gain_loss_pct.unwrap().round_dp(1), dec!(19.4));
}

#[test]
fn test_loss_is_negative() {
    let valued = valuate(&holding("ACME", dec!(10), dec!(1000)), dec!(80));
    assert_eq!(valued.unrealized_gain_loss, Some(dec!(-200)));
    assert_eq!(valued.unrealized_gain_loss_pct, Some(dec!(-20)));
}

#[test]
fn test_zero_cost_basis_gives_zero_percentage() {
    let gifted = holding("GIFT", dec!(5), Decimal::ZERO);

    let valued = valuate(&gifted, dec!(10));

    assert_eq!(valued.market_value, Some(dec!(50)));
    assert_eq!(valued.unrealized_gain_loss, Some(dec!(50)));
    assert_eq!(valued.unrealized_gain_loss_pct, Some(Decimal::ZERO));
}

#[test]
fn test_missing_price_is_not_replaced_by_cost() {
    let acme = holding("ACME", dec!(6), dec!(603));

    let valued = valuate_with(&acme, None);

    assert_eq!(valued.status, ValuationStatus::PriceUnavailable);
    assert_eq!(valued.current_price, None);
    assert_eq!(valued.market_value, None);
    assert_eq!(valued.unrealized_gain_loss, None);
    assert_eq!(valued.unrealized_gain_loss_pct, None);
    assert_eq!(valued.holding, acme);
}

#[test]
fn test_negative_price_is_treated_as_unavailable() {
    let valued = valuate_with(&holding("ACME", dec!(1), dec!(1)), Some(dec!(-3)));
    assert!(!valued.is_valued());
}

#[test]
fn test_valuate_all_flags_only_the_unpriced_holding() {
    let holdings = vec![
        holding("ACME", dec!(6), dec!(603)),
        holding("BETA", dec!(2), dec!(100)),
    ];
    let prices = HashMap::from([("ACME".to_string(), dec!(120))]);

    let valued = valuate_all(&holdings, &prices);

    assert_eq!(valued.len(), 2);
    assert!(valued[0].is_valued());
    assert_eq!(valued[1].status, ValuationStatus::PriceUnavailable);
}

#[test]
fn test_summary_excludes_unpriced_holdings_from_totals() {
    let valued = vec![
        valuate(&holding("ACME", dec!(6), dec!(603)), dec!(120)),
        valuate(&holding("BETA", dec!(10), dec!(500)), dec!(40)),
        valuate_unpriced(&holding("GAMMA", dec!(1), dec!(999))),
    ];

    let summary = summarize(valued);

    assert_eq!(summary.total_market_value, dec!(1120));
    assert_eq!(summary.total_cost_basis, dec!(1103));
    assert_eq!(summary.total_unrealized_gain_loss, dec!(17));
    assert_eq!(summary.unpriced_instruments, vec!["GAMMA".to_string()]);
    assert_eq!(summary.holdings.len(), 3);
}

#[test]
fn test_summary_of_nothing_is_zero() {
    let summary = summarize(Vec::new());
    assert_eq!(summary.total_market_value, Decimal::ZERO);
    assert_eq!(summary.total_unrealized_gain_loss_pct, Decimal::ZERO);
}

#[test]
fn test_display_rounding_is_applied_only_on_request() {
    let valued = valuate(&holding("ACME", dec!(3), dec!(100)), dec!(33.3333));
    assert_eq!(valued.market_value, Some(dec!(99.9999)));

    let shown = valued.rounded_for_display();
    assert_eq!(shown.market_value, Some(dec!(100.00)));
    assert_eq!(shown.holding.average_cost, dec!(33.33));
}

#[test]
fn test_price_beyond_decimal_range_leaves_holding_unpriced() {
    let whale = holding("WHALE", dec!(1000000), dec!(1000000));

    let valued = valuate(&whale, dec!(70000000000000000000000000000));

    assert_eq!(valued.status, ValuationStatus::PriceUnavailable);
    assert_eq!(valued.market_value, None);
    assert_eq!(valued.holding, whale);
}

#[test]
fn test_summary_leaves_out_holding_that_would_overflow_totals() {
    let near_max = dec!(70000000000000000000000000000);
    let valued = vec![
        valuate(&holding("ACME", dec!(1), dec!(1)), near_max),
        valuate(&holding("BETA", dec!(1), dec!(1)), near_max),
        valuate(&holding("GAMMA", dec!(2), dec!(10)), dec!(10)),
    ];

    let summary = summarize(valued);

    assert_eq!(summary.total_market_value, near_max + dec!(20));
    assert_eq!(summary.unpriced_instruments, vec!["BETA".to_string()]);
    assert!(!summary.is_complete());
    assert!(summary.failed_instruments.is_empty());
}
