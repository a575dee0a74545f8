// SPDX-License-Identifier: MIT

//! Geocoding proxy routes.
//!
//! The frontend never talks to the geocoder directly; proxying keeps the
//! upstream contact policy (user agent, rate behavior) in one place.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::routes::require_profile;
use crate::services::Place;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const MAX_SEARCH_RESULTS: u32 = 5;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/geo/search", get(search))
        .route("/api/geo/reverse", get(reverse))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

/// Forward geocoding: free-text query to candidate places.
async fn search(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Place>>> {
    require_profile(&state, &auth)?;

    if query.q.trim().is_empty() {
        return Err(AppError::Validation(
            "Search query must not be empty".to_string(),
        ));
    }

    let places = state.geocoder.search(&query.q, MAX_SEARCH_RESULTS).await?;
    Ok(Json(places))
}

#[derive(Deserialize)]
struct ReverseQuery {
    lat: f64,
    lon: f64,
}

/// Reverse geocoding: coordinates to the nearest named place.
async fn reverse(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<Place>> {
    require_profile(&state, &auth)?;

    if !(-90.0..=90.0).contains(&query.lat) || !(-180.0..=180.0).contains(&query.lon) {
        return Err(AppError::Validation(
            "Coordinates out of range".to_string(),
        ));
    }

    let place = state.geocoder.reverse(query.lat, query.lon).await?;
    Ok(Json(place))
}
