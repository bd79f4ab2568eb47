use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::domain::model::{Query, RawCandidate};
use crate::domain::ports::FlightSource;
use crate::sources::util::{extract_clock_times, fetch_text, http_client};
use crate::utils::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.expedia.com";

const SOURCE_NAME: &str = "Expedia";
const MAX_RESULTS: usize = 10;

static AIRLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-test-id="airline-name"[^>]*>([^<]+)<"#).expect("valid pattern"));
static PRICE_PRIMARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"data-test-id="listing-price-dollars"[^>]*>([^<]+)<"#).expect("valid pattern")
});
static PRICE_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class="[^"]*price[^"]*"[^>]*>([^<]+)<"#).expect("valid pattern"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(https?://[^"]+)""#).expect("valid pattern"));

pub struct Expedia {
    client: Client,
    base_url: String,
}

impl Expedia {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn search_url(&self, query: &Query) -> String {
        format!(
            "{}/Flights-Search?trip=oneway&leg1=from:{},to:{},departure:{}&passengers=adults:{}&mode=search",
            self.base_url,
            query.origin(),
            query.destination(),
            query.date(),
            query.passengers()
        )
    }
}

#[async_trait]
impl FlightSource for Expedia {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn results_url(&self, query: &Query) -> Option<String> {
        Some(self.search_url(query))
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawCandidate>> {
        let url = self.search_url(query);
        let body = fetch_text(&self.client, SOURCE_NAME, &url).await?;
        let candidates = extract_candidates(&body);
        tracing::debug!(source = SOURCE_NAME, found = candidates.len(), "extracted offer listings");
        Ok(candidates)
    }
}

/// Offer blocks are tagged data-test-id="offer-listing".
fn extract_candidates(body: &str) -> Vec<RawCandidate> {
    body.split(r#"data-test-id="offer-listing""#)
        .skip(1)
        .take(MAX_RESULTS)
        .map(|block| {
            let airline = AIRLINE_RE.captures(block).map(|caps| caps[1].trim().to_string());
            let price = PRICE_PRIMARY_RE
                .captures(block)
                .or_else(|| PRICE_FALLBACK_RE.captures(block))
                .map(|caps| caps[1].trim().to_string());
            let (departure, arrival) = extract_clock_times(block);
            let booking_url = LINK_RE.captures(block).map(|caps| caps[1].to_string());

            RawCandidate {
                airline,
                price,
                departure,
                arrival,
                booking_url,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query() -> Query {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        Query::new("YYZ", "LAX", date, 2).unwrap()
    }

    #[test]
    fn test_search_url_format() {
        let source = Expedia::new(None).unwrap();
        assert_eq!(
            source.search_url(&query()),
            "https://www.expedia.com/Flights-Search?trip=oneway&leg1=from:YYZ,to:LAX,departure:2025-12-01&passengers=adults:2&mode=search"
        );
    }

    #[test]
    fn test_extract_candidates_from_offer_listing() {
        let body = concat!(
            r#"<li data-test-id="offer-listing">"#,
            r#"<span data-test-id="airline-name">Air Canada</span>"#,
            r#"<span data-test-id="departure-time">7:00 am</span>"#,
            r#"<span data-test-id="arrival-time">9:30 am</span>"#,
            r#"<span data-test-id="listing-price-dollars">$512</span>"#,
            r#"</li>"#,
            r#"<li data-test-id="offer-listing">"#,
            r#"<span class="uitk-price-display">$268.40</span>"#,
            r#"</li>"#,
        );

        let candidates = extract_candidates(body);
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].airline.as_deref(), Some("Air Canada"));
        assert_eq!(candidates[0].price.as_deref(), Some("$512"));
        assert_eq!(candidates[0].departure.as_deref(), Some("7:00 am"));
        assert_eq!(candidates[0].arrival.as_deref(), Some("9:30 am"));

        // fallback price pattern, no airline label in the block
        assert_eq!(candidates[1].airline, None);
        assert_eq!(candidates[1].price.as_deref(), Some("$268.40"));
    }

    #[test]
    fn test_extract_candidates_empty_page() {
        assert!(extract_candidates("<html><body></body></html>").is_empty());
    }
}
