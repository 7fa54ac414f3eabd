mod doctors;
mod hospitals;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use medfinder_directory::DirectoryScraper;
use medfinder_places::HospitalLookup;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

/// Shared handler state.
///
/// `hospitals` is `None` when no Google API key is configured; the hospital
/// routes then answer with a configuration error after validating input.
#[derive(Clone)]
pub struct AppState {
    pub hospitals: Option<Arc<HospitalLookup>>,
    pub directory: Arc<DirectoryScraper>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn bad_request(req_id: &RequestId, message: impl Into<String>) -> Self {
        Self::new(req_id.0.clone(), "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Treats an absent or blank query parameter as missing.
pub(super) fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Resolves the hospital lookup service or fails with a configuration error.
pub(super) fn require_hospitals<'a>(
    state: &'a AppState,
    req_id: &RequestId,
) -> Result<&'a HospitalLookup, ApiError> {
    state.hospitals.as_deref().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "configuration_error",
            "Google API Key not configured on the server.",
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/hospital/nearby", get(hospitals::nearby))
        .route("/hospital/details", get(hospitals::details))
        .route("/hospital/find_by_name", get(hospitals::find_by_name))
        .route("/doctors/lybrate", get(doctors::lybrate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct IndexData {
    message: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
    google_api_key_status: &'static str,
}

async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let endpoints = BTreeMap::from([
        (
            "/hospital/nearby",
            "GET (params: lat, lon, radius, type) - Find nearby hospitals.",
        ),
        (
            "/hospital/details",
            "GET (params: place_id) - Get details of a specific hospital.",
        ),
        (
            "/hospital/find_by_name",
            "GET (params: name, type) - Find hospital by name.",
        ),
        (
            "/doctors/lybrate",
            "GET (params: city, specialty, page) - Scrape doctor info from Lybrate.",
        ),
    ]);
    let google_api_key_status = if state.hospitals.is_some() {
        "CONFIGURED"
    } else {
        "NOT CONFIGURED (Functionality limited)"
    };

    Json(IndexData {
        message: "Welcome to the Hospital and Doctor Information API!",
        endpoints,
        google_api_key_status,
    })
}
