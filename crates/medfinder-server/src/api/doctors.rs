use axum::{
    extract::{Query, State},
    Extension, Json,
};
use medfinder_directory::{slugify, ScrapeResult};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{present, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LybrateQuery {
    pub city: Option<String>,
    pub specialty: Option<String>,
    pub page: Option<String>,
}

/// Scrapes one directory listing page.
///
/// A failed fetch is still a 200: the body carries an empty `doctors` list
/// and an `error` message.
pub(super) async fn lybrate(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LybrateQuery>,
) -> Result<Json<ScrapeResult>, ApiError> {
    let (Some(city), Some(specialty)) = (
        present(query.city.as_ref()),
        present(query.specialty.as_ref()),
    ) else {
        return Err(ApiError::bad_request(
            &req_id,
            "Missing city or specialty parameters",
        ));
    };
    if slugify(city).is_empty() || slugify(specialty).is_empty() {
        return Err(ApiError::bad_request(
            &req_id,
            "city and specialty must contain letters or digits",
        ));
    }

    let page = match present(query.page.as_ref()) {
        None => 1,
        Some(raw) => match raw.parse::<u32>() {
            Ok(page) if page >= 1 => page,
            _ => return Err(ApiError::bad_request(&req_id, "Invalid page number")),
        },
    };

    Ok(Json(state.directory.scrape_page(city, specialty, page).await))
}
