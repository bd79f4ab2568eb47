use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::error::Result;
use crate::utils::validation::{validate_airport_code, validate_passenger_count};

/// Airline label substituted when a source exposes none.
pub const MULTIPLE_AIRLINES: &str = "Multiple Airlines";

/// A validated search request. Construction through [`Query::new`] is the
/// validation boundary: holding a `Query` is proof the codes and passenger
/// count are well-formed, so the aggregator never re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    origin: String,
    destination: String,
    date: NaiveDate,
    passengers: u32,
}

impl Query {
    /// Validates and normalizes the request. Codes are stored uppercased.
    /// The date is deliberately not checked against "today".
    pub fn new(origin: &str, destination: &str, date: NaiveDate, passengers: u32) -> Result<Self> {
        validate_airport_code("origin", origin)?;
        validate_airport_code("destination", destination)?;
        validate_passenger_count("passengers", passengers)?;

        Ok(Self {
            origin: origin.to_ascii_uppercase(),
            destination: destination.to_ascii_uppercase(),
            date,
            passengers,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn passengers(&self) -> u32 {
        self.passengers
    }
}

/// One loosely-structured result as a source produced it. Every field is
/// optional; price and time fields hold raw text exactly as extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub airline: Option<String>,
    pub price: Option<String>,
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub booking_url: Option<String>,
}

/// The canonical offer record. Created once per accepted candidate by the
/// normalizer, immutable afterwards, owned by a single aggregation run.
/// `booking_link: None` is the "not available" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightOffer {
    pub airline: String,
    pub price: Decimal,
    pub departure: NaiveDateTime,
    pub arrival: NaiveDateTime,
    #[serde(rename = "link")]
    pub booking_link: Option<String>,
    pub source: String,
}

/// Terminal state of one source within an aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// The source responded; `candidates` raw records came back, of which
    /// `accepted` survived normalization.
    Fetched { candidates: usize, accepted: usize },
    Failed { message: String },
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub elapsed_ms: u64,
}

/// Result of one aggregation run: the deduplicated, price-sorted offers
/// plus one report per dispatched source. The offer list alone cannot
/// distinguish "no offers" from "every source failed"; the reports can.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub offers: Vec<FlightOffer>,
    pub sources: Vec<SourceReport>,
}

impl SearchOutcome {
    pub fn all_sources_failed(&self) -> bool {
        !self.sources.is_empty()
            && self
                .sources
                .iter()
                .all(|r| !matches!(r.status, SourceStatus::Fetched { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SearchError;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_query_new_uppercases_codes() {
        let query = Query::new("yyz", "lax", date(), 1).unwrap();
        assert_eq!(query.origin(), "YYZ");
        assert_eq!(query.destination(), "LAX");
        assert_eq!(query.passengers(), 1);
    }

    #[test]
    fn test_query_new_rejects_bad_codes() {
        assert!(matches!(
            Query::new("YY", "LAX", date(), 1),
            Err(SearchError::InvalidQuery { .. })
        ));
        assert!(matches!(
            Query::new("YYZ", "LAX1", date(), 1),
            Err(SearchError::InvalidQuery { .. })
        ));
        assert!(matches!(
            Query::new("Y2Z", "LAX", date(), 1),
            Err(SearchError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_query_new_rejects_zero_passengers() {
        assert!(matches!(
            Query::new("YYZ", "LAX", date(), 0),
            Err(SearchError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_query_accepts_past_dates() {
        let past = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        assert!(Query::new("YYZ", "LAX", past, 1).is_ok());
    }

    #[test]
    fn test_all_sources_failed() {
        let outcome = SearchOutcome {
            offers: vec![],
            sources: vec![
                SourceReport {
                    source: "A".to_string(),
                    status: SourceStatus::TimedOut,
                    elapsed_ms: 100,
                },
                SourceReport {
                    source: "B".to_string(),
                    status: SourceStatus::Failed {
                        message: "boom".to_string(),
                    },
                    elapsed_ms: 5,
                },
            ],
        };
        assert!(outcome.all_sources_failed());

        let outcome = SearchOutcome {
            offers: vec![],
            sources: vec![SourceReport {
                source: "A".to_string(),
                status: SourceStatus::Fetched {
                    candidates: 0,
                    accepted: 0,
                },
                elapsed_ms: 10,
            }],
        };
        assert!(!outcome.all_sources_failed());
    }
}
