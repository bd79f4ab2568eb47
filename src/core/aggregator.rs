use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::core::dedup::finalize;
use crate::core::normalize::normalize;
use crate::domain::model::{FlightOffer, Query, SearchOutcome, SourceReport, SourceStatus};
use crate::domain::ports::FlightSource;

/// Per-source budget; a source past it is treated exactly like a failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Runs one query against every registered source concurrently and merges
/// whatever arrives. One task per source, so fan-out is bounded by the
/// source count. A source's failure or timeout is absorbed here and never
/// cancels or delays its siblings.
pub struct Aggregator {
    sources: Vec<Arc<dyn FlightSource>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn FlightSource>>) -> Self {
        Self {
            sources,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// One aggregation run. Waits for every source to reach a terminal
    /// state (fetched, failed, or timed out) before returning; the offer
    /// list is deduplicated and price-sorted, and `sources` records what
    /// each provider actually did.
    ///
    /// Never errors: the query was validated at construction, and
    /// per-source trouble only shrinks the result.
    pub async fn search(&self, query: &Query) -> SearchOutcome {
        info!(
            origin = query.origin(),
            destination = query.destination(),
            date = %query.date(),
            passengers = query.passengers(),
            sources = self.sources.len(),
            "dispatching search to all sources"
        );

        let settled = join_all(
            self.sources
                .iter()
                .map(|source| self.run_source(Arc::clone(source), query)),
        )
        .await;

        let mut merged = Vec::new();
        let mut reports = Vec::with_capacity(settled.len());
        for (offers, report) in settled {
            merged.extend(offers);
            reports.push(report);
        }

        let offers = finalize(merged);
        info!(total = offers.len(), "search complete");

        SearchOutcome {
            offers,
            sources: reports,
        }
    }

    async fn run_source(
        &self,
        source: Arc<dyn FlightSource>,
        query: &Query,
    ) -> (Vec<FlightOffer>, SourceReport) {
        let name = source.name().to_string();
        let started = Instant::now();

        let (offers, status) = match tokio::time::timeout(self.timeout, source.fetch(query)).await {
            Err(_elapsed) => {
                warn!(
                    source = %name,
                    timeout_secs = self.timeout.as_secs(),
                    "source timed out"
                );
                (Vec::new(), SourceStatus::TimedOut)
            }
            Ok(Err(error)) => {
                warn!(source = %name, error = %error, "source failed");
                (
                    Vec::new(),
                    SourceStatus::Failed {
                        message: error.to_string(),
                    },
                )
            }
            Ok(Ok(candidates)) => {
                let fallback = source.results_url(query);
                let mut offers = Vec::with_capacity(candidates.len());
                for candidate in &candidates {
                    match normalize(candidate, query, &name, fallback.as_deref()) {
                        Ok(offer) => offers.push(offer),
                        Err(rejection) => {
                            debug!(source = %name, reason = %rejection, "candidate rejected");
                        }
                    }
                }
                debug!(
                    source = %name,
                    candidates = candidates.len(),
                    accepted = offers.len(),
                    "source fetched"
                );
                let status = SourceStatus::Fetched {
                    candidates: candidates.len(),
                    accepted: offers.len(),
                };
                (offers, status)
            }
        };

        let report = SourceReport {
            source: name,
            status,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        (offers, report)
    }
}
