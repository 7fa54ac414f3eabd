use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use medfinder_core::AppConfig;
use medfinder_places::{
    Coordinates, GeocodingClient, HospitalLookup, NameMatch, PlacesClient,
};
use serde_json::json;

use crate::print_json;

fn build_lookup(config: &AppConfig) -> anyhow::Result<HospitalLookup> {
    let api_key = config
        .google_api_key
        .as_deref()
        .context("GOOGLE_API_KEY is not set; hospital commands need a Google API key")?;

    let places = PlacesClient::with_base_url(
        api_key,
        config.places_timeout_secs,
        &config.places_base_url,
    )?
    .with_page_delay(Duration::from_millis(config.places_page_delay_ms));
    let geocoder =
        GeocodingClient::with_base_url(api_key, config.places_timeout_secs, &config.places_base_url)?;

    Ok(HospitalLookup::new(Arc::new(places), Arc::new(geocoder)))
}

/// Prints nearby places as a JSON array.
///
/// # Errors
///
/// Returns an error if the key is missing or the search fails.
pub(crate) async fn run_nearby(
    config: &AppConfig,
    lat: f64,
    lon: f64,
    radius: Option<u32>,
    place_type: Option<&str>,
) -> anyhow::Result<()> {
    let lookup = build_lookup(config)?;
    let places = lookup
        .lookup_nearby(Coordinates::new(lat, lon), radius, place_type)
        .await
        .context("nearby search failed")?;
    tracing::info!(count = places.len(), "nearby search complete");
    print_json(&places)
}

/// # Errors
///
/// Returns an error if the key is missing or no details are available.
pub(crate) async fn run_details(config: &AppConfig, place_id: &str) -> anyhow::Result<()> {
    let lookup = build_lookup(config)?;
    let detail = lookup.lookup_details(place_id).await?;
    print_json(&detail)
}

/// Prints the confirmed match, or the nearby candidates when no name was
/// confirmed.
///
/// # Errors
///
/// Returns an error if the key is missing, the name cannot be geocoded, or
/// the nearby search fails.
pub(crate) async fn run_find(
    config: &AppConfig,
    name: &str,
    place_type: Option<&str>,
) -> anyhow::Result<()> {
    let lookup = build_lookup(config)?;
    match lookup.find_by_name(name, place_type).await? {
        NameMatch::Exact(detail) => print_json(&detail),
        NameMatch::Candidates(nearby) => {
            eprintln!("no confirmed match for '{name}'; listing {} nearby places", nearby.len());
            print_json(&json!({ "potential_matches": nearby }))
        }
    }
}
