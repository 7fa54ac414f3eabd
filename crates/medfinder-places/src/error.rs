use thiserror::Error;

/// Errors returned by the Places and Geocoding clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network failure, timeout, or non-2xx HTTP status. The request URL is
    /// stripped before wrapping because it carries the API key.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The provider answered with a `status` other than `OK` / `ZERO_RESULTS`.
    #[error("Google API error {status}: {message}")]
    ApiError { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl PlacesError {
    pub(crate) fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
