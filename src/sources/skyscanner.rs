use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::domain::model::{Query, RawCandidate};
use crate::domain::ports::FlightSource;
use crate::sources::util::{extract_clock_times, fetch_text, http_client};
use crate::utils::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.skyscanner.com";

const SOURCE_NAME: &str = "Skyscanner";
const MAX_RESULTS: usize = 5;

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class="[^"]*[Pp]rice[^"]*"[^>]*>([^<]+)<"#).expect("valid pattern"));
static CARRIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"class="[^"]*[Cc]arrier[^"]*"[^>]*>([^<]+)<"#).expect("valid pattern"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(https?://[^"]+)""#).expect("valid pattern"));

pub struct Skyscanner {
    client: Client,
    base_url: String,
}

impl Skyscanner {
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// Route URLs use lowercased codes and the date compressed to YYMMDD.
    fn search_url(&self, query: &Query) -> String {
        format!(
            "{}/transport/flights/{}/{}/{}/",
            self.base_url,
            query.origin().to_ascii_lowercase(),
            query.destination().to_ascii_lowercase(),
            query.date().format("%y%m%d")
        )
    }
}

#[async_trait]
impl FlightSource for Skyscanner {
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
        tracing::debug!(source = SOURCE_NAME, found = candidates.len(), "extracted day-view cards");
        Ok(candidates)
    }
}

fn extract_candidates(body: &str) -> Vec<RawCandidate> {
    // Day-view cards are the current layout; FlightCard blocks the older one.
    let blocks: Vec<&str> = if body.contains("day-view-content") {
        body.split("day-view-content").skip(1).collect()
    } else {
        body.split("FlightCard").skip(1).collect()
    };

    blocks
        .into_iter()
        .take(MAX_RESULTS)
        .map(|block| {
            let airline = CARRIER_RE.captures(block).map(|caps| caps[1].trim().to_string());
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
        let date = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        Query::new("YYZ", "LAX", date, 1).unwrap()
    }

    #[test]
    fn test_search_url_compresses_date_and_lowercases_codes() {
        let source = Skyscanner::new(None).unwrap();
        assert_eq!(
            source.search_url(&query()),
            "https://www.skyscanner.com/transport/flights/yyz/lax/251115/"
        );
    }

    #[test]
    fn test_extract_candidates_from_day_view() {
        let body = concat!(
            r#"<div data-testid="day-view-content-0">"#,
            r#"<div class="carrier-name">WestJet</div>"#,
            r#"<span class="times">08:10</span><span class="times">10:45</span>"#,
            r#"<span class="price-amount">C$ 389</span>"#,
            r#"</div>"#,
        );

        let candidates = extract_candidates(body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].airline.as_deref(), Some("WestJet"));
        assert_eq!(candidates[0].price.as_deref(), Some("C$ 389"));
        assert_eq!(candidates[0].departure.as_deref(), Some("08:10"));
        assert_eq!(candidates[0].arrival.as_deref(), Some("10:45"));
    }

    #[test]
    fn test_extract_candidates_older_layout_fallback() {
        let body = concat!(
            r#"<div class="FlightCard_container">"#,
            r#"<div class="Carrier_logo_label">Porter</div>"#,
            r#"<span class="Price_mainPrice">$301</span>"#,
            r#"</div>"#,
        );

        let candidates = extract_candidates(body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].airline.as_deref(), Some("Porter"));
        assert_eq!(candidates[0].price.as_deref(), Some("$301"));
    }

    #[test]
    fn test_extract_candidates_caps_results() {
        let card = r#"<div data-testid="day-view-content"><span class="price">$88</span></div>"#;
        let body = card.repeat(9);
        assert_eq!(extract_candidates(&body).len(), MAX_RESULTS);
    }
}
