//! HTTP client for the Google Places REST API.
//!
//! Wraps `reqwest` with API key management, status-envelope checking, and
//! typed response deserialization. Nearby search follows `next_page_token`
//! for a bounded number of continuation pages.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;
use crate::types::{
    ApiEnvelope, Coordinates, DetailField, DetailPayload, NearbyPage, PlaceDetail, PlaceSummary,
    RawPlace,
};

pub(crate) const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Request timeout applied to every Places and Geocoding call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Continuation pages fetched after the first one. Google serves at most
/// three pages per search, so one initial request plus two follow-ups.
pub const MAX_CONTINUATION_PAGES: usize = 2;

/// Wait before presenting a `next_page_token`; the token is not valid until
/// shortly after it is issued.
pub const DEFAULT_PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";
const DETAILS_PATH: &str = "place/details/json";

/// Client for the Google Places API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    page_delay: Duration,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            base_url: normalise_base_url(base_url)?,
            page_delay: DEFAULT_PAGE_TOKEN_DELAY,
        })
    }

    /// Overrides the wait before each continuation page.
    #[must_use]
    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    /// Searches for places of `place_type` within `radius_meters` of
    /// `location`, following continuation tokens for at most
    /// [`MAX_CONTINUATION_PAGES`] further pages.
    ///
    /// Results keep provider order across and within pages. Entries without
    /// a name are dropped.
    ///
    /// # Errors
    ///
    /// Any page failing (network, non-2xx, malformed JSON, provider error
    /// status) fails the whole search; earlier pages are discarded.
    pub async fn search_nearby(
        &self,
        location: Coordinates,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let first = self
            .fetch_nearby_page(location, radius_meters, place_type, None)
            .await?;

        let mut raw: Vec<RawPlace> = first.results;
        let mut token = first.next_page_token;
        let mut continuation_pages = 0usize;

        while let Some(next) = token.take().filter(|t| !t.is_empty()) {
            if continuation_pages >= MAX_CONTINUATION_PAGES {
                break;
            }
            tokio::time::sleep(self.page_delay).await;

            let page = self
                .fetch_nearby_page(location, radius_meters, place_type, Some(&next))
                .await?;
            raw.extend(page.results);
            token = page.next_page_token;
            continuation_pages += 1;
        }

        tracing::debug!(
            provider = "google_places",
            pages = continuation_pages + 1,
            results = raw.len(),
            "nearby search complete"
        );

        Ok(raw.into_iter().filter_map(PlaceSummary::from_raw).collect())
    }

    /// Fetches the named `fields` for `place_id`.
    ///
    /// Returns `None` when the provider reports an error, the payload has no
    /// named result, or the request fails. Failures are logged.
    pub async fn get_details(&self, place_id: &str, fields: &[DetailField]) -> Option<PlaceDetail> {
        match self.try_get_details(place_id, fields).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(
                    provider = "google_places",
                    place_id,
                    error = %e,
                    "place details request failed"
                );
                None
            }
        }
    }

    /// Fallible variant of [`PlacesClient::get_details`].
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the provider returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn try_get_details(
        &self,
        place_id: &str,
        fields: &[DetailField],
    ) -> Result<Option<PlaceDetail>, PlacesError> {
        let fields = DetailField::join(fields);
        let url = self.build_url(
            DETAILS_PATH,
            &[("place_id", place_id), ("fields", fields.as_str())],
        )?;
        let envelope: ApiEnvelope<DetailPayload> = self
            .request_json(&url, &format!("place details ({place_id})"))
            .await?;
        check_status(envelope.status.as_deref(), envelope.error_message.as_deref())?;

        Ok(envelope.data.result.and_then(PlaceDetail::from_raw))
    }

    async fn fetch_nearby_page(
        &self,
        location: Coordinates,
        radius_meters: u32,
        place_type: &str,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, PlacesError> {
        let location = location.as_query_value();
        let radius = radius_meters.to_string();
        let mut params = vec![
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("type", place_type),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }

        let url = self.build_url(NEARBY_SEARCH_PATH, &params)?;
        let envelope: ApiEnvelope<NearbyPage> =
            self.request_json(&url, "nearby search page").await?;
        check_status(envelope.status.as_deref(), envelope.error_message.as_deref())?;
        Ok(envelope.data)
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        endpoint_url(&self.base_url, path, &self.api_key, params)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, PlacesError> {
        request_json(&self.client, url, context).await
    }
}

/// Builds the shared `reqwest::Client` used by the Places and Geocoding clients.
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, PlacesError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent("medfinder/0.1 (hospital-lookup)")
        .build()
        .map_err(PlacesError::http)
}

/// Ensures the base URL ends with exactly one slash so relative endpoint
/// paths join beneath it instead of replacing its last segment.
pub(crate) fn normalise_base_url(base_url: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Joins `path` onto `base` and appends `params` followed by `key`, all
/// percent-encoded.
pub(crate) fn endpoint_url(
    base: &Url,
    path: &str,
    api_key: &str,
    params: &[(&str, &str)],
) -> Result<Url, PlacesError> {
    let mut url = base.join(path).map_err(|e| PlacesError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: e.to_string(),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("key", api_key);
    }
    Ok(url)
}

/// Sends a GET request, asserts a 2xx status, and parses the body as JSON.
pub(crate) async fn request_json<T: DeserializeOwned>(
    client: &Client,
    url: &Url,
    context: &str,
) -> Result<T, PlacesError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(PlacesError::http)?;
    let response = response.error_for_status().map_err(PlacesError::http)?;
    let body = response.text().await.map_err(PlacesError::http)?;
    serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Accepts `OK`, `ZERO_RESULTS`, or a missing status; anything else is
/// surfaced as [`PlacesError::ApiError`].
pub(crate) fn check_status(status: Option<&str>, message: Option<&str>) -> Result<(), PlacesError> {
    match status {
        None | Some("OK" | "ZERO_RESULTS") => Ok(()),
        Some(other) => Err(PlacesError::ApiError {
            status: other.to_owned(),
            message: message.unwrap_or("no error message").to_owned(),
        }),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
