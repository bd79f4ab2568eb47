use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::model::{Query, RawCandidate};
use crate::domain::ports::FlightSource;
use crate::sources::util::http_client;
use crate::utils::error::{Result, SearchError};

pub const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

const SOURCE_NAME: &str = "Amadeus";
const MAX_OFFERS: u32 = 5;

/// API-based source: an OAuth2 client-credentials token request, then the
/// flight-offers search. Unlike the page sources there is no browsable
/// results URL, so `results_url` is `None` and offers without a link end up
/// with the "not available" sentinel.
pub struct Amadeus {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl Amadeus {
    pub fn new(base_url: Option<&str>, credentials: Option<(String, String)>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            credentials,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let (api_key, api_secret) = self.credentials.as_ref().ok_or_else(|| {
            SearchError::source_unavailable(SOURCE_NAME, "credentials not configured")
        })?;

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", api_key.as_str()),
            ("client_secret", api_secret.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::source_unavailable(
                SOURCE_NAME,
                format!("token request returned {}", response.status()),
            ));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl FlightSource for Amadeus {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn results_url(&self, _query: &Query) -> Option<String> {
        None
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RawCandidate>> {
        let token = self.access_token().await?;

        let url = format!("{}/v2/shopping/flight-offers", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("originLocationCode", query.origin().to_string()),
                ("destinationLocationCode", query.destination().to_string()),
                ("departureDate", query.date().to_string()),
                ("adults", query.passengers().to_string()),
                ("max", MAX_OFFERS.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::source_unavailable(
                SOURCE_NAME,
                format!("offer search returned {}", response.status()),
            ));
        }

        let payload: OffersResponse = response.json().await?;
        let candidates: Vec<RawCandidate> =
            payload.data.into_iter().map(offer_to_candidate).collect();
        tracing::debug!(source = SOURCE_NAME, found = candidates.len(), "mapped API offers");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<ApiOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiOffer {
    #[serde(default)]
    validating_airline_codes: Vec<String>,
    #[serde(default)]
    price: Option<ApiPrice>,
    #[serde(default)]
    itineraries: Vec<ApiItinerary>,
}

#[derive(Debug, Deserialize)]
struct ApiPrice {
    #[serde(default)]
    total: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiItinerary {
    #[serde(default)]
    segments: Vec<ApiSegment>,
}

#[derive(Debug, Deserialize)]
struct ApiSegment {
    #[serde(default)]
    departure: Option<ApiWaypoint>,
    #[serde(default)]
    arrival: Option<ApiWaypoint>,
}

#[derive(Debug, Deserialize)]
struct ApiWaypoint {
    #[serde(default)]
    at: Option<String>,
}

/// Maps the first segment of the first itinerary; the payload carries no
/// booking URL, which "#" encodes for the normalizer.
fn offer_to_candidate(offer: ApiOffer) -> RawCandidate {
    let (departure, arrival) = offer
        .itineraries
        .first()
        .and_then(|itinerary| itinerary.segments.first())
        .map(|segment| {
            (
                segment.departure.as_ref().and_then(|w| w.at.clone()),
                segment.arrival.as_ref().and_then(|w| w.at.clone()),
            )
        })
        .unwrap_or((None, None));

    RawCandidate {
        airline: offer
            .validating_airline_codes
            .into_iter()
            .next()
            .filter(|code| !code.trim().is_empty()),
        price: offer.price.and_then(|p| p.total),
        departure,
        arrival,
        booking_url: Some("#".to_string()),
    }
}
