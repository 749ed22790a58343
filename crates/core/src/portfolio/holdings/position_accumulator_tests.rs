use super::*;
use crate::errors::LedgerIntegrityError;
use crate::settings::OversellPolicy;
use crate::transactions::{InstrumentClass, Transaction, TransactionKind};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(seq: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::days(seq)
}

fn trade(id: &str, seq: i64, kind: TransactionKind, qty: Decimal, price: Decimal, fees: Decimal) -> Transaction {
    let gross = match kind {
        TransactionKind::Buy => -(qty * price + fees),
        _ => qty * price - fees,
    };
    Transaction {
        id: id.to_string(),
        instrument_key: "ACME".to_string(),
        instrument_name: "Acme Corp".to_string(),
        instrument_class: InstrumentClass::Stock,
        kind,
        quantity: Some(qty),
        price_per_unit: Some(price),
        fees,
        gross_amount: gross,
        timestamp: at(seq),
        sequence_number: seq,
        currency: None,
        notes: None,
    }
}

fn income(id: &str, seq: i64, kind: TransactionKind, amount: Decimal) -> Transaction {
    Transaction {
        quantity: None,
        price_per_unit: Some(amount),
        fees: Decimal::ZERO,
        gross_amount: amount,
        ..trade(id, seq, kind, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    }
}

#[test]
fn test_buy_capitalises_fees_into_cost_basis() {
    let buy = trade("b1", 1, TransactionKind::Buy, dec!(10), dec!(100), dec!(5));
    let mut position = PositionAccumulator::new(&buy);
    position.apply(&buy, OversellPolicy::Reject).unwrap();

    assert_eq!(position.quantity, dec!(10));
    assert_eq!(position.total_cost_basis, dec!(1005));
    assert_eq!(position.average_cost(), dec!(100.5));
    assert_eq!(position.first_acquired_at, Some(at(1)));
}

#[test]
fn test_sell_relieves_cost_at_average_and_keeps_average() {
    let buy = trade("b1", 1, TransactionKind::Buy, dec!(10), dec!(100), dec!(5));
    let sell = trade("s1", 2, TransactionKind::Sell, dec!(4), dec!(150), dec!(3));
    let mut position = PositionAccumulator::new(&buy);
    position.apply(&buy, OversellPolicy::Reject).unwrap();

    let relieved = position.apply_sell(&sell.id, dec!(4), OversellPolicy::Reject).unwrap();

    assert_eq!(relieved, dec!(402));
    assert_eq!(position.quantity, dec!(6));
    assert_eq!(position.total_cost_basis, dec!(603));
    assert_eq!(position.average_cost(), dec!(100.5));
}

#[test]
fn test_second_buy_reweights_average_cost() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(10), dec!(100), dec!(0));
    let b2 = trade("b2", 2, TransactionKind::Buy, dec!(10), dec!(200), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Reject).unwrap();
    position.apply(&b2, OversellPolicy::Reject).unwrap();

    assert_eq!(position.quantity, dec!(20));
    assert_eq!(position.total_cost_basis, dec!(3000));
    assert_eq!(position.average_cost(), dec!(150));
}

#[test]
fn test_full_exit_resets_cost_to_exact_zero() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(3), dec!(10), dec!(1));
    let s1 = trade("s1", 2, TransactionKind::Sell, dec!(3), dec!(12), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Reject).unwrap();
    position.apply(&s1, OversellPolicy::Reject).unwrap();

    assert_eq!(position.quantity, Decimal::ZERO);
    assert_eq!(position.total_cost_basis, Decimal::ZERO);
    assert_eq!(position.average_cost(), Decimal::ZERO);
    assert!(position.to_holding().is_none());
    assert_eq!(position.first_acquired_at, None);
}

#[test]
fn test_reentry_after_exit_starts_from_clean_basis() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(3), dec!(10), dec!(1));
    let s1 = trade("s1", 2, TransactionKind::Sell, dec!(3), dec!(12), dec!(0));
    let b2 = trade("b2", 3, TransactionKind::Buy, dec!(2), dec!(50), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    for tx in [&b1, &s1, &b2] {
        position.apply(tx, OversellPolicy::Reject).unwrap();
    }

    let holding = position.to_holding().unwrap();
    assert_eq!(holding.quantity, dec!(2));
    assert_eq!(holding.total_cost_basis, dec!(100));
    assert_eq!(holding.average_cost, dec!(50));
    assert_eq!(holding.first_acquired_at, Some(at(3)));
    assert_eq!(holding.last_transaction_at, Some(at(3)));
    assert_eq!(holding.transaction_count, 3);
}

#[test]
fn test_oversell_is_rejected_by_default() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(5), dec!(10), dec!(0));
    let s1 = trade("s1", 2, TransactionKind::Sell, dec!(6), dec!(10), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Reject).unwrap();

    let err = position.apply(&s1, OversellPolicy::Reject).unwrap_err();
    assert_eq!(
        err,
        LedgerIntegrityError::Oversell {
            instrument_key: "ACME".to_string(),
            transaction_id: "s1".to_string(),
            requested: dec!(6),
            available: dec!(5),
        }
    );
    // The failed entry leaves the position untouched.
    assert_eq!(position.quantity, dec!(5));
    assert_eq!(position.transaction_count, 1);
}

#[test]
fn test_oversell_clamps_under_legacy_policy() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(5), dec!(10), dec!(0));
    let s1 = trade("s1", 2, TransactionKind::Sell, dec!(6), dec!(10), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Clamp).unwrap();
    position.apply(&s1, OversellPolicy::Clamp).unwrap();

    assert_eq!(position.quantity, Decimal::ZERO);
    assert_eq!(position.total_cost_basis, Decimal::ZERO);
}

#[test]
fn test_dust_remainder_is_swept_to_zero() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(1), dec!(30000), dec!(0));
    let s1 = trade("s1", 2, TransactionKind::Sell, dec!(0.999999999), dec!(31000), dec!(0));
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Reject).unwrap();
    position.apply(&s1, OversellPolicy::Reject).unwrap();

    assert_eq!(position.quantity, Decimal::ZERO);
    assert_eq!(position.total_cost_basis, Decimal::ZERO);
}

#[test]
fn test_income_is_tracked_apart_from_position() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(10), dec!(20), dec!(0));
    let d1 = income("d1", 2, TransactionKind::Dividend, dec!(7.5));
    let i1 = income("i1", 3, TransactionKind::Interest, dec!(1.25));
    let mut position = PositionAccumulator::new(&b1);
    for tx in [&b1, &d1, &i1] {
        position.apply(tx, OversellPolicy::Reject).unwrap();
    }

    assert_eq!(position.quantity, dec!(10));
    assert_eq!(position.total_cost_basis, dec!(200));
    assert_eq!(position.dividends, dec!(7.5));
    assert_eq!(position.interest, dec!(1.25));
}

#[test]
fn test_instrument_class_change_is_an_integrity_error() {
    let b1 = trade("b1", 1, TransactionKind::Buy, dec!(1), dec!(1), dec!(0));
    let mut b2 = trade("b2", 2, TransactionKind::Buy, dec!(1), dec!(1), dec!(0));
    b2.instrument_class = InstrumentClass::Etf;
    let mut position = PositionAccumulator::new(&b1);
    position.apply(&b1, OversellPolicy::Reject).unwrap();

    assert!(matches!(
        position.apply(&b2, OversellPolicy::Reject),
        Err(LedgerIntegrityError::InstrumentClassChanged { .. })
    ));
}

#[test]
fn test_buy_that_would_overflow_leaves_position_untouched() {
    let near_max = dec!(70000000000000000000000000000);
    let first = trade("b1", 1, TransactionKind::Buy, dec!(1), near_max, dec!(0));
    let mut position = PositionAccumulator::new(&first);
    position.apply(&first, OversellPolicy::Reject).unwrap();
    let before = position.clone();

    let err = position
        .apply_buy("b2", dec!(1), near_max / dec!(7), dec!(0), at(2))
        .unwrap_err();

    assert_eq!(
        err,
        LedgerIntegrityError::ArithmeticOverflow {
            instrument_key: "ACME".to_string(),
            transaction_id: "b2".to_string(),
        }
    );
    assert_eq!(position, before);
}

#[test]
fn test_quantity_significance_threshold() {
    assert!(is_quantity_significant(&dec!(0.00000001)));
    assert!(!is_quantity_significant(&dec!(0.000000009)));
    assert!(is_quantity_significant(&dec!(-1)));
}
