use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::domain::model::{Query, RawCandidate};
use crate::domain::ports::FlightSource;
use crate::sources::util::{extract_clock_times, fetch_text, http_client};
use crate::utils::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.kayak.com";

const SOURCE_NAME: &str = "Kayak";
const MAX_RESULTS: usize = 10;

// Volatile markup patterns; the rest of the crate depends only on the
// FlightSource contract.
static AIRLINE_PRIMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"codeshares-airline-names[^>]*>([^<]+)<").expect("valid pattern"));
static AIRLINE_FALLBACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class="[^"]*[Aa]irline[^"]*"[^>]*>([^<]+)<"#).expect("valid pattern"));
static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class="[^"]*price[^"]*"[^>]*>([^<]+)<"#).expect("valid pattern"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(https?://[^"]+)""#).expect("valid pattern"));

pub struct Kayak {
    client: Client,
    base_url: String,
}

impl Kayak {
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
            "{}/flights/{}-{}/{}?sort=price_a",
            self.base_url,
            query.origin(),
            query.destination(),
            query.date()
        )
    }
}

#[async_trait]
impl FlightSource for Kayak {
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
        tracing::debug!(source = SOURCE_NAME, found = candidates.len(), "extracted result blocks");
        Ok(candidates)
    }
}

/// Result blocks are keyed by data-resultid.
fn extract_candidates(body: &str) -> Vec<RawCandidate> {
    body.split("data-resultid")
        .skip(1)
        .take(MAX_RESULTS)
        .map(|block| {
            let airline = AIRLINE_PRIMARY_RE
                .captures(block)
                .or_else(|| AIRLINE_FALLBACK_RE.captures(block))
                .map(|caps| caps[1].trim().to_string());
            let price = PRICE_RE.captures(block).map(|caps| caps[1].trim().to_string());
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
        Query::new("YYZ", "LAX", date, 1).unwrap()
    }

    #[test]
    fn test_search_url_format() {
        let source = Kayak::new(None).unwrap();
        assert_eq!(
            source.search_url(&query()),
            "https://www.kayak.com/flights/YYZ-LAX/2025-12-01?sort=price_a"
        );
    }

    #[test]
    fn test_extract_candidates_from_result_markup() {
        let body = concat!(
            r#"<div data-resultid="r1">"#,
            r#"<div class="codeshares-airline-names">Delta</div>"#,
            r#"<span class="depart-time">6:25 am</span>"#,
            r#"<span class="arrival-time">8:55 am</span>"#,
            r#"<div class="price-text">$438</div>"#,
            r#"<a href="https://www.kayak.com/book/f1">View Deal</a>"#,
            r#"</div>"#,
            r#"<div data-resultid="r2">"#,
            r#"<div class="some-airline-label">Air Canada</div>"#,
            r#"<div class="price-text">$512</div>"#,
            r#"</div>"#,
        );

        let candidates = extract_candidates(body);
        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].airline.as_deref(), Some("Delta"));
        assert_eq!(candidates[0].price.as_deref(), Some("$438"));
        assert_eq!(candidates[0].departure.as_deref(), Some("6:25 am"));
        assert_eq!(candidates[0].arrival.as_deref(), Some("8:55 am"));
        assert_eq!(
            candidates[0].booking_url.as_deref(),
            Some("https://www.kayak.com/book/f1")
        );

        // fallback airline pattern, no schedule or link in the block
        assert_eq!(candidates[1].airline.as_deref(), Some("Air Canada"));
        assert_eq!(candidates[1].price.as_deref(), Some("$512"));
        assert_eq!(candidates[1].departure, None);
        assert_eq!(candidates[1].booking_url, None);
    }

    #[test]
    fn test_extract_candidates_caps_results() {
        let block = r#"<div data-resultid="x"><div class="price-text">$100</div></div>"#;
        let body = block.repeat(25);
        assert_eq!(extract_candidates(&body).len(), MAX_RESULTS);
    }

    #[test]
    fn test_extract_candidates_empty_page() {
        assert!(extract_candidates("<html><body>No results</body></html>").is_empty());
    }
}
