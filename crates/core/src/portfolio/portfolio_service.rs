use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::goals::GoalRepositoryTrait;
use crate::portfolio::allocation::{compare_with, AllocationReport};
use crate::portfolio::holdings::{reconcile_with, Holding, ReconciliationResult};
use crate::portfolio::rebalancing::{advise, RebalancingAdvice};
use crate::portfolio::valuation::{summarize, valuate_all, PortfolioValuation};
use crate::quotes::QuoteProviderTrait;
use crate::settings::EngineSettings;
use crate::transactions::{LedgerRepositoryTrait, NewTransaction, Transaction};

use super::HoldingsCache;

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Reconciled holdings for the user, served from cache when still current.
    async fn get_holdings(&self, user_id: &str) -> Result<Arc<ReconciliationResult>>;

    /// Values the reconciled holdings. Instruments that failed reconciliation
    /// are carried in `failed_instruments`.
    async fn get_valuation(&self, user_id: &str) -> Result<PortfolioValuation>;

    /// `None` when the user has no active allocation goal.
    async fn get_allocation(&self, user_id: &str) -> Result<Option<AllocationReport>>;

    /// No suggestions when the user has no active allocation goal.
    async fn get_rebalancing_advice(&self, user_id: &str) -> Result<RebalancingAdvice>;

    /// Validates and appends an entry, then drops the user's cached holdings.
    async fn record_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
}

pub struct PortfolioService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    quote_provider: Arc<dyn QuoteProviderTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    settings: EngineSettings,
    cache: HoldingsCache,
}

impl PortfolioService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        quote_provider: Arc<dyn QuoteProviderTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            ledger_repository,
            quote_provider,
            goal_repository,
            settings,
            cache: HoldingsCache::new(),
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn cache(&self) -> &HoldingsCache {
        &self.cache
    }

    /// Fetches current prices concurrently. Failed or missing quotes are left out.
    async fn fetch_prices<'a, I>(&self, holdings: I) -> HashMap<String, Decimal>
    where
        I: IntoIterator<Item = &'a Holding>,
    {
        let lookups = holdings.into_iter().map(|holding| {
            let provider = Arc::clone(&self.quote_provider);
            let key = holding.instrument_key.clone();
            async move {
                let price = provider.get_current_price(&key).await;
                (key, price)
            }
        });

        futures::future::join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(key, price)| match price {
                Ok(Some(price)) => Some((key, price)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Quote lookup for {} failed: {}. Treating it as unpriced.", key, e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn get_holdings(&self, user_id: &str) -> Result<Arc<ReconciliationResult>> {
        if let Some(cached) = self.cache.get(user_id) {
            debug!("Serving cached holdings for user {}", user_id);
            return Ok(cached);
        }

        let generation = self.cache.generation(user_id);
        let transactions = self.ledger_repository.list_transactions(user_id)?;
        let settings = self.settings.clone();

        let result = tokio::task::spawn_blocking(move || reconcile_with(&transactions, &settings))
            .await
            .map_err(|e| Error::Unexpected(format!("Reconciliation task failed: {}", e)))??;
        let result = Arc::new(result);

        if !self
            .cache
            .insert_if_current(user_id, generation, Arc::clone(&result))
        {
            debug!(
                "Ledger for user {} changed during reconciliation; result not cached",
                user_id
            );
        }
        Ok(result)
    }

    async fn get_valuation(&self, user_id: &str) -> Result<PortfolioValuation> {
        let reconciliation = self.get_holdings(user_id).await?;
        let prices = self.fetch_prices(reconciliation.holdings.values()).await;
        let valued = valuate_all(reconciliation.holdings.values(), &prices);
        if !reconciliation.failures.is_empty() {
            warn!(
                "Valuation for user {} excludes {} instruments that failed reconciliation",
                user_id,
                reconciliation.failures.len()
            );
        }
        Ok(PortfolioValuation {
            failed_instruments: reconciliation.failures.clone(),
            ..summarize(valued)
        })
    }

    async fn get_allocation(&self, user_id: &str) -> Result<Option<AllocationReport>> {
        let Some(goal) = self.goal_repository.get_active_allocation_goal(user_id)? else {
            debug!("User {} has no active allocation goal", user_id);
            return Ok(None);
        };
        debug!("Comparing user {} against goal {}", user_id, goal.id);

        let valuation = self.get_valuation(user_id).await?;
        let snapshots = compare_with(&valuation.holdings, &goal, &self.settings)?;
        Ok(Some(AllocationReport {
            goal_id: goal.id,
            snapshots,
            failed_instruments: valuation.failed_instruments.into_keys().collect(),
            unpriced_instruments: valuation.unpriced_instruments,
        }))
    }

    async fn get_rebalancing_advice(&self, user_id: &str) -> Result<RebalancingAdvice> {
        let Some(report) = self.get_allocation(user_id).await? else {
            return Ok(RebalancingAdvice::default());
        };
        Ok(RebalancingAdvice {
            suggestions: advise(&report.snapshots, self.settings.drift_threshold),
            failed_instruments: report.failed_instruments,
            unpriced_instruments: report.unpriced_instruments,
        })
    }

    async fn record_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;
        let recorded = self
            .ledger_repository
            .append_transaction(user_id, new_transaction)
            .await?;
        self.cache.invalidate(user_id);
        debug!(
            "Recorded {} {} for user {}",
            recorded.kind, recorded.instrument_key, user_id
        );
        Ok(recorded)
    }
}
