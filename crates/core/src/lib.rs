//! Ledgerfolio Core - ledger-to-position reconciliation engine.
//!
//! Replays an append-only transaction ledger into weighted-average-cost
//! holdings, values them against current prices, compares the result with an
//! allocation goal and suggests rebalancing moves. The crate owns no storage;
//! it defines the collaborator traits (ledger, quotes, goals) that storage or
//! HTTP crates implement.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod portfolio;
pub mod quotes;
pub mod settings;
pub mod transactions;

// Re-export the engine surface
pub use portfolio::allocation::{
    classify, compare, compare_with, AllocationReport, AllocationSnapshot, AssetClass,
};
pub use portfolio::holdings::{
    reconcile, reconcile_incremental, reconcile_with, Holding, ReconciliationResult,
};
pub use portfolio::rebalancing::{
    advise, advise_default, RebalanceAction, RebalancingAdvice, Suggestion,
};
pub use portfolio::valuation::{valuate, valuate_with, PortfolioValuation, ValuedHolding};
pub use portfolio::{HoldingsCache, PortfolioService, PortfolioServiceTrait};
pub use settings::EngineSettings;
pub use transactions::{NewTransaction, Transaction, TransactionKind};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
