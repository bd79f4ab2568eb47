use crate::domain::model::{Query, RawCandidate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Contract for one external offer provider.
///
/// Sources are mutually independent: they share no state, and a failure in
/// one carries no meaning for the others. Network access is confined to
/// [`FlightSource::fetch`]. Adding a provider means implementing this trait
/// and registering it in [`crate::sources::build_sources`]; the aggregator
/// never changes.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Registered name, stamped on every offer this source produces.
    fn name(&self) -> &str;

    /// Generic search-results URL for this query, used as the fallback
    /// booking link when a candidate carries no usable URL of its own.
    /// API sources without a browsable results page return `None`.
    fn results_url(&self, query: &Query) -> Option<String>;

    /// Retrieve raw candidates for the query. Zero candidates means the
    /// source answered but listed nothing; that is success, not an error.
    async fn fetch(&self, query: &Query) -> Result<Vec<RawCandidate>>;
}
