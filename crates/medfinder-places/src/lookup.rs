//! Hospital lookup orchestration over injected search and geocoding
//! backends.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::geocode::GeocodingClient;
use crate::types::{Coordinates, DetailField, PlaceDetail, PlaceSummary};

pub const DEFAULT_RADIUS_METERS: u32 = 5000;
pub const DEFAULT_PLACE_TYPE: &str = "hospital";

/// Radius searched around a geocoded name before matching candidates.
pub const NAME_SEARCH_RADIUS_METERS: u32 = 500;

/// Fields served by the details lookup.
pub const DETAIL_FIELDS: &[DetailField] = &[
    DetailField::Name,
    DetailField::Website,
    DetailField::Phone,
    DetailField::Rating,
    DetailField::Reviews,
    DetailField::Vicinity,
    DetailField::Geometry,
];

/// Fields fetched to confirm a name match; includes the place id.
pub const NAME_MATCH_DETAIL_FIELDS: &[DetailField] = &[
    DetailField::Name,
    DetailField::Website,
    DetailField::Phone,
    DetailField::Rating,
    DetailField::Reviews,
    DetailField::Vicinity,
    DetailField::Geometry,
    DetailField::PlaceId,
];

/// Place search backend.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search_nearby(
        &self,
        location: Coordinates,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceSummary>, PlacesError>;

    async fn get_details(&self, place_id: &str, fields: &[DetailField]) -> Option<PlaceDetail>;
}

/// Geocoding backend.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Option<Coordinates>;
}

#[async_trait]
impl PlaceSearch for PlacesClient {
    async fn search_nearby(
        &self,
        location: Coordinates,
        radius_meters: u32,
        place_type: &str,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        PlacesClient::search_nearby(self, location, radius_meters, place_type).await
    }

    async fn get_details(&self, place_id: &str, fields: &[DetailField]) -> Option<PlaceDetail> {
        PlacesClient::get_details(self, place_id, fields).await
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        GeocodingClient::geocode(self, address).await
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("could not geocode hospital name: {0}")]
    GeocodeFailed(String),

    #[error("could not retrieve details for place_id {0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] PlacesError),
}

/// Outcome of [`HospitalLookup::find_by_name`].
#[derive(Debug, Clone, PartialEq)]
pub enum NameMatch {
    /// A candidate whose summary and detail names both matched the query.
    Exact(PlaceDetail),
    /// No confirmed match; every nearby result, in provider order.
    Candidates(Vec<PlaceSummary>),
}

/// Case-insensitive containment in either direction.
///
/// Short names over-match ("City" matches "Inter-City Hospital"); first
/// match wins with no ranking.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

pub struct HospitalLookup {
    search: Arc<dyn PlaceSearch>,
    geocoder: Arc<dyn Geocoder>,
}

impl HospitalLookup {
    #[must_use]
    pub fn new(search: Arc<dyn PlaceSearch>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { search, geocoder }
    }

    /// Nearby search with `radius_meters` defaulting to
    /// [`DEFAULT_RADIUS_METERS`] and `place_type` to [`DEFAULT_PLACE_TYPE`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Upstream`] if the search fails.
    pub async fn lookup_nearby(
        &self,
        location: Coordinates,
        radius_meters: Option<u32>,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, LookupError> {
        let radius = radius_meters.unwrap_or(DEFAULT_RADIUS_METERS);
        let place_type = place_type.unwrap_or(DEFAULT_PLACE_TYPE);
        Ok(self.search.search_nearby(location, radius, place_type).await?)
    }

    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if no detail record is available.
    pub async fn lookup_details(&self, place_id: &str) -> Result<PlaceDetail, LookupError> {
        self.search
            .get_details(place_id, DETAIL_FIELDS)
            .await
            .ok_or_else(|| LookupError::NotFound(place_id.to_owned()))
    }

    /// Geocodes `query`, searches within [`NAME_SEARCH_RADIUS_METERS`], and
    /// returns the first candidate whose summary name and detail name both
    /// contain (or are contained in) the query.
    ///
    /// # Errors
    ///
    /// - [`LookupError::GeocodeFailed`] if the name cannot be geocoded.
    /// - [`LookupError::Upstream`] if the nearby search fails.
    pub async fn find_by_name(
        &self,
        query: &str,
        place_type: Option<&str>,
    ) -> Result<NameMatch, LookupError> {
        let place_type = place_type.unwrap_or(DEFAULT_PLACE_TYPE);

        let Some(location) = self.geocoder.geocode(query).await else {
            return Err(LookupError::GeocodeFailed(query.to_owned()));
        };

        let nearby = self
            .search
            .search_nearby(location, NAME_SEARCH_RADIUS_METERS, place_type)
            .await?;

        for candidate in nearby.iter().filter(|c| names_match(query, &c.name)) {
            let Some(detail) = self
                .search
                .get_details(&candidate.place_id, NAME_MATCH_DETAIL_FIELDS)
                .await
            else {
                continue;
            };

            if names_match(query, &detail.name) {
                return Ok(NameMatch::Exact(detail));
            }
            tracing::debug!(
                query,
                summary_name = %candidate.name,
                detail_name = %detail.name,
                "detail name did not confirm summary match"
            );
        }

        Ok(NameMatch::Candidates(nearby))
    }
}
