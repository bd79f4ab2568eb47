use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::domain::model::{FlightOffer, Query, RawCandidate, MULTIPLE_AIRLINES};

/// Matches clock-time text in any of the shapes sources emit:
/// "18:05", "6:05 pm", "6:05p".
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2})\s*([AaPp])?").expect("clock-time pattern is valid")
});

/// Why a candidate was dropped. Only the price can disqualify a candidate;
/// every other field has a substitution rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no price present")]
    MissingPrice,
    #[error("unparsable price text {0:?}")]
    UnparsablePrice(String),
    #[error("non-positive price {0}")]
    NonPositivePrice(Decimal),
}

/// Converts one raw candidate into a canonical offer, or rejects it.
///
/// A pure function of its inputs: re-normalizing the same candidate yields
/// an identical offer. Field rules, in order:
/// 1. price: tolerant numeric extraction, reject if unrecoverable or <= 0
/// 2. airline: non-empty label, else "Multiple Airlines"
/// 3. times: timestamp text as-is, or clock time on the query date,
///    or midnight of the query date; arrival before departure is tolerated
/// 4. booking link: candidate URL if usable, else `fallback_url`, else None
/// 5. source: always the fetcher's declared name
pub fn normalize(
    candidate: &RawCandidate,
    query: &Query,
    source_name: &str,
    fallback_url: Option<&str>,
) -> std::result::Result<FlightOffer, Rejection> {
    let price_text = candidate.price.as_deref().ok_or(Rejection::MissingPrice)?;
    let price = parse_price(price_text)
        .ok_or_else(|| Rejection::UnparsablePrice(price_text.to_string()))?;
    if price <= Decimal::ZERO {
        return Err(Rejection::NonPositivePrice(price));
    }

    let airline = match candidate.airline.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => MULTIPLE_AIRLINES.to_string(),
    };

    let departure = parse_offer_time(candidate.departure.as_deref(), query.date());
    let arrival = parse_offer_time(candidate.arrival.as_deref(), query.date());

    let booking_link = candidate
        .booking_url
        .as_deref()
        .filter(|u| is_usable_url(u))
        .or(fallback_url)
        .map(|u| u.trim().to_string());

    Ok(FlightOffer {
        airline,
        price,
        departure,
        arrival,
        booking_link,
        source: source_name.to_string(),
    })
}

/// Pulls a numeric amount out of price text, tolerating currency symbols
/// and thousands separators ("$1,234.56" -> 1234.56).
pub(crate) fn parse_price(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Resolves departure/arrival text against the query date. Full timestamps
/// (API sources) pass through; bare clock times combine with the query
/// date; anything unrecoverable becomes midnight of the query date.
pub(crate) fn parse_offer_time(text: Option<&str>, date: NaiveDate) -> NaiveDateTime {
    let midnight = date.and_time(NaiveTime::MIN);
    let text = match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => return midnight,
    };

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return timestamp;
        }
    }

    if let Some(caps) = CLOCK_RE.captures(text) {
        let hour: u32 = caps[1].parse().unwrap_or(0);
        let minute: u32 = caps[2].parse().unwrap_or(0);
        let meridiem = caps.get(3).map(|m| m.as_str().to_ascii_lowercase());
        let hour = match meridiem.as_deref() {
            Some("p") if hour < 12 => hour + 12,
            Some("a") if hour == 12 => 0,
            _ => hour,
        };
        if let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return date.and_time(time);
        }
    }

    midnight
}

fn is_usable_url(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "#" {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
