use axum::{
    extract::{Query, State},
    Extension, Json,
};
use medfinder_places::{Coordinates, LookupError, NameMatch, PlaceDetail, PlaceSummary};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{present, require_hospitals, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsQuery {
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FindByNameQuery {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

/// Reduced candidate shape returned when no name match was confirmed.
#[derive(Debug, Serialize)]
pub(super) struct PotentialMatch {
    pub name: String,
    pub place_id: String,
    pub rating: Option<f64>,
    pub vicinity: Option<String>,
}

impl From<PlaceSummary> for PotentialMatch {
    fn from(summary: PlaceSummary) -> Self {
        Self {
            name: summary.name,
            place_id: summary.place_id,
            rating: summary.rating,
            vicinity: summary.vicinity,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum FindByNameResponse {
    Exact(PlaceDetail),
    Candidates {
        message: String,
        potential_matches: Vec<PotentialMatch>,
    },
}

fn parse_coordinates(query: &NearbyQuery, req_id: &RequestId) -> Result<Coordinates, ApiError> {
    let (Some(lat), Some(lon)) = (present(query.lat.as_ref()), present(query.lon.as_ref())) else {
        return Err(ApiError::bad_request(
            req_id,
            "Missing latitude or longitude parameters",
        ));
    };
    let parse = |value: &str| value.parse::<f64>().ok().filter(|v| v.is_finite());
    match (parse(lat), parse(lon)) {
        (Some(lat), Some(lng)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) => {
            Ok(Coordinates::new(lat, lng))
        }
        _ => Err(ApiError::bad_request(
            req_id,
            "Invalid latitude or longitude parameters",
        )),
    }
}

fn parse_radius(query: &NearbyQuery, req_id: &RequestId) -> Result<Option<u32>, ApiError> {
    present(query.radius.as_ref())
        .map(|raw| {
            raw.parse::<u32>()
                .ok()
                .filter(|r| *r > 0)
                .ok_or_else(|| ApiError::bad_request(req_id, "Invalid radius parameter"))
        })
        .transpose()
}

fn upstream_error(req_id: &RequestId, error: &LookupError, message: &str) -> ApiError {
    tracing::error!(provider = "google_places", error = %error, "hospital lookup failed");
    ApiError::new(req_id.0.clone(), "upstream_error", message)
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<PlaceSummary>>, ApiError> {
    let location = parse_coordinates(&query, &req_id)?;
    let radius = parse_radius(&query, &req_id)?;
    let hospitals = require_hospitals(&state, &req_id)?;

    hospitals
        .lookup_nearby(location, radius, present(query.place_type.as_ref()))
        .await
        .map(Json)
        .map_err(|e| {
            upstream_error(
                &req_id,
                &e,
                "Failed to fetch data from Google Places API or no results.",
            )
        })
}

pub(super) async fn details(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<PlaceDetail>, ApiError> {
    let Some(place_id) = present(query.place_id.as_ref()) else {
        return Err(ApiError::bad_request(&req_id, "Missing place_id parameter"));
    };
    let hospitals = require_hospitals(&state, &req_id)?;

    match hospitals.lookup_details(place_id).await {
        Ok(detail) => Ok(Json(detail)),
        Err(LookupError::NotFound(_)) => Err(ApiError::new(
            req_id.0,
            "not_found",
            "Could not retrieve details for the given place_id",
        )),
        Err(e) => Err(upstream_error(
            &req_id,
            &e,
            "Failed to fetch data from Google Places API.",
        )),
    }
}

pub(super) async fn find_by_name(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FindByNameQuery>,
) -> Result<Json<FindByNameResponse>, ApiError> {
    let Some(name) = present(query.name.as_ref()) else {
        return Err(ApiError::bad_request(
            &req_id,
            "Missing 'name' parameter for hospital search",
        ));
    };
    let hospitals = require_hospitals(&state, &req_id)?;

    match hospitals
        .find_by_name(name, present(query.place_type.as_ref()))
        .await
    {
        Ok(NameMatch::Exact(detail)) => Ok(Json(FindByNameResponse::Exact(detail))),
        Ok(NameMatch::Candidates(nearby)) => Ok(Json(FindByNameResponse::Candidates {
            message: format!("Exact match for '{name}' not found. Returning nearby places."),
            potential_matches: nearby.into_iter().map(PotentialMatch::from).collect(),
        })),
        Err(LookupError::GeocodeFailed(_)) => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("Could not geocode hospital name: {name}"),
        )),
        Err(e) => Err(upstream_error(
            &req_id,
            &e,
            "Failed to fetch data from Google Places API after geocoding.",
        )),
    }
}
