//! Portfolio module - reconciliation, valuation, allocation and rebalancing.

pub mod allocation;
pub mod holdings;
pub mod rebalancing;
pub mod valuation;

mod holdings_cache;
mod portfolio_service;

pub use holdings_cache::HoldingsCache;
pub use portfolio_service::{PortfolioService, PortfolioServiceTrait};
