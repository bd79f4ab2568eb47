use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::utils::error::{Result, SearchError};

/// Desktop browser identity; several providers answer obvious automation
/// user-agents with an empty shell page.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request budget, well inside the orchestrator's per-source timeout.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Clock-time text as it appears in result markup: "6:25 am", "18:05", "6:25p".
static CLOCK_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,2}:\d{2}\s*(?:[AaPp][Mm]?)?").expect("clock-time pattern is valid")
});

/// Each source owns one of these; clients are never shared across sources.
pub(crate) fn http_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    Ok(client)
}

pub(crate) async fn fetch_text(client: &Client, source_name: &str, url: &str) -> Result<String> {
    tracing::debug!(source = source_name, url, "requesting results");
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(SearchError::source_unavailable(
            source_name,
            format!("unexpected status {}", response.status()),
        ));
    }

    Ok(response.text().await?)
}

/// First two clock-time strings in a result block, in document order:
/// departure first, arrival second when present.
pub(crate) fn extract_clock_times(block: &str) -> (Option<String>, Option<String>) {
    let mut times = CLOCK_TEXT_RE
        .find_iter(block)
        .map(|m| m.as_str().trim().to_string());
    let departure = times.next();
    let arrival = times.next();
    (departure, arrival)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_clock_times_orders_matches() {
        let block = r#"<span>6:25 am</span> nonstop <span>8:55 am</span> <span>11:10 pm</span>"#;
        let (departure, arrival) = extract_clock_times(block);
        assert_eq!(departure.as_deref(), Some("6:25 am"));
        assert_eq!(arrival.as_deref(), Some("8:55 am"));
    }

    #[test]
    fn test_extract_clock_times_handles_absence() {
        let (departure, arrival) = extract_clock_times("<div>no schedule shown</div>");
        assert_eq!(departure, None);
        assert_eq!(arrival, None);

        let (departure, arrival) = extract_clock_times("<span>18:05</span>");
        assert_eq!(departure.as_deref(), Some("18:05"));
        assert_eq!(arrival, None);
    }
}
