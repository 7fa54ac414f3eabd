//! Google Places / Geocoding wire types and the normalized shapes served to
//! API callers.
//!
//! Every provider response is wrapped in a `{"status": "OK", ...}` envelope;
//! [`ApiEnvelope`] captures that pattern generically. The `Raw*` types mirror
//! the provider JSON and are converted into [`PlaceSummary`] / [`PlaceDetail`]
//! only when the provider supplied a non-empty name.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in the provider's `{lat, lng}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Renders the `location=lat,lng` query value.
    pub(crate) fn as_query_value(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

// ---------------------------------------------------------------------------
// Provider envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    #[serde(default)]
    pub location: Option<Coordinates>,
}

/// One page of `place/nearbysearch` results.
#[derive(Debug, Deserialize)]
pub(crate) struct NearbyPage {
    #[serde(default)]
    pub results: Vec<RawPlace>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// `place/details` payload: `{ "result": { ... } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct DetailPayload {
    #[serde(default)]
    pub result: Option<RawDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// `geocode` payload: `{ "results": [ { "geometry": { "location": ... } } ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodePayload {
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeCandidate {
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

// ---------------------------------------------------------------------------
// Normalized output
// ---------------------------------------------------------------------------

/// A single nearby-search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub name: String,
    pub place_id: String,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub vicinity: Option<String>,
    pub location: Option<Coordinates>,
}

/// A provider review, passed through as received.
///
/// The commonly used fields are typed; anything else the provider sends is
/// kept in `extra` and serialized back at the top level. Absent fields stay
/// absent in the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full record for one place, limited to the fields that were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetail {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub website: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Vec<Review>,
    pub vicinity: Option<String>,
    pub location: Option<Coordinates>,
}

fn non_empty(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

impl PlaceSummary {
    pub(crate) fn from_raw(raw: RawPlace) -> Option<Self> {
        let name = non_empty(raw.name)?;
        Some(Self {
            name,
            place_id: raw.place_id.unwrap_or_default(),
            rating: raw.rating,
            user_ratings_total: raw.user_ratings_total,
            vicinity: raw.vicinity,
            location: raw.geometry.and_then(|g| g.location),
        })
    }
}

impl PlaceDetail {
    pub(crate) fn from_raw(raw: RawDetail) -> Option<Self> {
        let name = non_empty(raw.name)?;
        Some(Self {
            name,
            place_id: raw.place_id,
            website: raw.website,
            formatted_phone_number: raw.formatted_phone_number,
            rating: raw.rating,
            reviews: raw.reviews,
            vicinity: raw.vicinity,
            location: raw.geometry.and_then(|g| g.location),
        })
    }
}

/// Fields that may be requested from `place/details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Name,
    PlaceId,
    Website,
    Phone,
    Rating,
    Reviews,
    Vicinity,
    Geometry,
}

impl DetailField {
    /// Provider name of the field as used in the `fields=` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DetailField::Name => "name",
            DetailField::PlaceId => "place_id",
            DetailField::Website => "website",
            DetailField::Phone => "formatted_phone_number",
            DetailField::Rating => "rating",
            DetailField::Reviews => "reviews",
            DetailField::Vicinity => "vicinity",
            DetailField::Geometry => "geometry",
        }
    }

    /// Joins `fields` into the comma-separated `fields=` query value.
    #[must_use]
    pub fn join(fields: &[DetailField]) -> String {
        fields
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_requires_name() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "place_id": "abc",
            "vicinity": "Somewhere"
        }))
        .expect("raw place");
        assert!(PlaceSummary::from_raw(raw).is_none());
    }

    #[test]
    fn summary_rejects_blank_name() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "name": "   ",
            "place_id": "abc"
        }))
        .expect("raw place");
        assert!(PlaceSummary::from_raw(raw).is_none());
    }

    #[test]
    fn summary_flattens_geometry_location() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "name": "City Hospital",
            "place_id": "p1",
            "rating": 4.2,
            "user_ratings_total": 310,
            "vicinity": "MG Road",
            "geometry": { "location": { "lat": 12.97, "lng": 77.59 } }
        }))
        .expect("raw place");
        let summary = PlaceSummary::from_raw(raw).expect("named place");
        assert_eq!(summary.name, "City Hospital");
        assert_eq!(summary.user_ratings_total, Some(310));
        assert_eq!(summary.location, Some(Coordinates::new(12.97, 77.59)));
    }

    #[test]
    fn detail_field_join_uses_provider_names() {
        let joined = DetailField::join(&[DetailField::Name, DetailField::Phone, DetailField::Geometry]);
        assert_eq!(joined, "name,formatted_phone_number,geometry");
    }

    #[test]
    fn place_detail_omits_absent_place_id() {
        let detail = PlaceDetail {
            name: "City Hospital".to_string(),
            place_id: None,
            website: None,
            formatted_phone_number: Some("080 1234".to_string()),
            rating: None,
            reviews: vec![],
            vicinity: None,
            location: None,
        };
        let json = serde_json::to_value(&detail).expect("serialize");
        assert!(json.get("place_id").is_none());
        assert_eq!(json["formatted_phone_number"], "080 1234");
    }

    #[test]
    fn review_round_trips_every_provider_field() {
        let raw = serde_json::json!({
            "author_name": "R. Rao",
            "author_url": "https://www.google.com/maps/contrib/1",
            "profile_photo_url": "https://lh3.googleusercontent.com/a/photo",
            "language": "en",
            "original_language": "kn",
            "translated": true,
            "rating": 5,
            "relative_time_description": "a month ago",
            "text": "Quick service",
            "time": 1_700_000_000,
            "author_attribution": { "display_name": "R. Rao" }
        });
        let review: Review = serde_json::from_value(raw.clone()).expect("review");
        assert_eq!(review.author_url.as_deref(), Some("https://www.google.com/maps/contrib/1"));
        assert_eq!(review.translated, Some(true));
        assert_eq!(serde_json::to_value(&review).expect("serialize"), raw);
    }

    #[test]
    fn review_omits_fields_the_provider_left_out() {
        let review: Review =
            serde_json::from_value(serde_json::json!({ "rating": 4 })).expect("review");
        assert_eq!(
            serde_json::to_value(&review).expect("serialize"),
            serde_json::json!({ "rating": 4 })
        );
    }
}
