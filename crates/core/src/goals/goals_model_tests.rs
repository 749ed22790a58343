use super::*;
use crate::errors::GoalConfigurationError;
use crate::portfolio::allocation::AssetClass;
use rust_decimal_macros::dec;

fn goal(targets: Vec<(AssetClass, rust_decimal::Decimal)>) -> Goal {
    Goal {
        id: "goal-1".to_string(),
        title: "Balanced".to_string(),
        targets: targets
            .into_iter()
            .map(|(class, pct)| AllocationTarget::new(class, pct))
            .collect(),
    }
}

#[test]
fn test_targets_summing_to_hundred_are_valid() {
    let g = goal(vec![(AssetClass::Stocks, dec!(60)), (AssetClass::Bonds, dec!(40))]);
    assert_eq!(g.target_sum(), dec!(100));
    assert!(g.validate_targets(dec!(0.5)).is_ok());
}

#[test]
fn test_rounding_within_tolerance_is_accepted() {
    let g = goal(vec![
        (AssetClass::Stocks, dec!(33.33)),
        (AssetClass::Bonds, dec!(33.33)),
        (AssetClass::Cash, dec!(33.33)),
    ]);
    assert!(g.validate_targets(dec!(0.5)).is_ok());
}

#[test]
fn test_sum_outside_tolerance_is_rejected() {
    let g = goal(vec![(AssetClass::Stocks, dec!(60)), (AssetClass::Bonds, dec!(39))]);
    assert_eq!(
        g.validate_targets(dec!(0.5)),
        Err(GoalConfigurationError::TargetSumMismatch {
            goal_id: "goal-1".to_string(),
            sum: dec!(99),
        })
    );
}

#[test]
fn test_duplicate_and_out_of_range_targets_are_rejected() {
    let dup = goal(vec![(AssetClass::Stocks, dec!(50)), (AssetClass::Stocks, dec!(50))]);
    assert!(matches!(
        dup.validate_targets(dec!(0.5)),
        Err(GoalConfigurationError::DuplicateAssetClass { .. })
    ));

    let over = goal(vec![(AssetClass::Stocks, dec!(120)), (AssetClass::Bonds, dec!(-20))]);
    assert!(matches!(
        over.validate_targets(dec!(0.5)),
        Err(GoalConfigurationError::TargetOutOfRange { .. })
    ));
}

#[test]
fn test_goal_without_targets_is_rejected() {
    let empty = goal(vec![]);
    assert_eq!(
        empty.validate_targets(dec!(0.5)),
        Err(GoalConfigurationError::NoTargets {
            goal_id: "goal-1".to_string()
        })
    );
}
