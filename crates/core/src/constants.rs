use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: Decimal = dec!(0.00000001);

/// Default drift, in percentage points, above which a rebalance is suggested
pub const DEFAULT_DRIFT_THRESHOLD: Decimal = dec!(5);

/// Allowed distance of a goal's target sum from 100%
pub const DEFAULT_TARGET_SUM_TOLERANCE: Decimal = dec!(0.5);

/// Sum every allocation goal must reach
pub const FULL_ALLOCATION_PERCENT: Decimal = dec!(100);
