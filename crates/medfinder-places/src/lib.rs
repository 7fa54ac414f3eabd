//! Google Places and Geocoding clients plus the hospital lookup service
//! built on top of them.

pub mod client;
pub mod error;
pub mod geocode;
pub mod lookup;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use geocode::GeocodingClient;
pub use lookup::{names_match, Geocoder, HospitalLookup, LookupError, NameMatch, PlaceSearch};
pub use types::{Coordinates, DetailField, PlaceDetail, PlaceSummary, Review};
