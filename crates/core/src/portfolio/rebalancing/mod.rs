//! Rebalancing module - turns allocation drift into suggestions.

mod rebalancing_advisor;
mod rebalancing_model;

pub use rebalancing_advisor::*;
pub use rebalancing_model::*;
