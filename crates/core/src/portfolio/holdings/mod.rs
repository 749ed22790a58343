//! Holdings module - ledger replay and weighted-average cost accounting.

mod holdings_model;
mod position_accumulator;
mod reconciler;

pub use holdings_model::*;
pub use position_accumulator::*;
pub use reconciler::{reconcile, reconcile_incremental, reconcile_with};

#[cfg(test)]
mod position_accumulator_tests;
