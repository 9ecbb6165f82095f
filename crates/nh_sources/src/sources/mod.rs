use async_trait::async_trait;
use nh_core::{Filters, Result};

pub mod guardian;
pub mod newsapi;

pub use guardian::GuardianSource;
pub use newsapi::NewsApiSource;

/// One upstream news provider.
///
/// `search` translates the filter state into a provider-specific query
/// and returns the provider's own article shape. Failures are returned
/// to the caller; the degrade-to-empty policy is the aggregator's
/// decision, not the adapter's.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Raw article shape this provider produces.
    type Item: Send;

    /// Display name of the provider.
    fn name(&self) -> &str;

    /// Run a search with the given filters. Absent filter fields are
    /// omitted from the query entirely.
    async fn search(&self, filters: &Filters) -> Result<Vec<Self::Item>>;
}
