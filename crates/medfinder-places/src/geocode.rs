//! Google Geocoding adapter: free-text name to a single coordinate pair.

use reqwest::{Client, Url};

use crate::client::{
    build_http_client, check_status, endpoint_url, normalise_base_url, request_json,
    DEFAULT_BASE_URL,
};
use crate::error::PlacesError;
use crate::types::{ApiEnvelope, Coordinates, GeocodePayload};

const GEOCODE_PATH: &str = "geocode/json";

pub struct GeocodingClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GeocodingClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            base_url: normalise_base_url(base_url)?,
        })
    }

    /// Resolves `address` to the first candidate's location.
    ///
    /// Returns `None` on zero candidates or any failure; failures are logged
    /// and never retried.
    pub async fn geocode(&self, address: &str) -> Option<Coordinates> {
        match self.try_geocode(address).await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!(
                    provider = "google_geocoding",
                    address,
                    error = %e,
                    "geocoding request failed"
                );
                None
            }
        }
    }

    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the provider returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] on an unexpected body shape.
    pub async fn try_geocode(&self, address: &str) -> Result<Option<Coordinates>, PlacesError> {
        let url = endpoint_url(
            &self.base_url,
            GEOCODE_PATH,
            &self.api_key,
            &[("address", address)],
        )?;
        let envelope: ApiEnvelope<GeocodePayload> =
            request_json(&self.client, &url, "geocode").await?;
        check_status(envelope.status.as_deref(), envelope.error_message.as_deref())?;

        Ok(envelope
            .data
            .results
            .into_iter()
            .next()
            .and_then(|candidate| candidate.geometry)
            .and_then(|geometry| geometry.location))
    }
}
