//! Pricing collaborator.
//!
//! The engine never fetches or fabricates prices. A provider that has no quote
//! for an instrument answers `Ok(None)`, and valuation marks that holding as
//! priced-unavailable instead of substituting a value.

mod quotes_traits;

pub use quotes_traits::QuoteProviderTrait;
