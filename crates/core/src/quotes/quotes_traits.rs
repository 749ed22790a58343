use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Source of current prices, consumed by the portfolio service.
#[async_trait]
pub trait QuoteProviderTrait: Send + Sync {
    /// Latest price for the instrument, or `None` when no quote is available.
    async fn get_current_price(&self, instrument_key: &str) -> Result<Option<Decimal>>;
}
