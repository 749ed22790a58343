//! Allocation module - asset-class classification and target comparison.

mod allocation_comparator;
mod allocation_model;
mod classifier;

pub use allocation_comparator::*;
pub use allocation_model::*;
pub use classifier::*;
