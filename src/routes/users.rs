// SPDX-License-Identifier: MIT

//! Profile and location-preference routes.

use crate::error::{AppError, Result};
use crate::geo::{Coordinates, NamedLocation};
use crate::middleware::auth::AuthUser;
use crate::models::{LocationPreference, User};
use crate::routes::require_profile;
use crate::services::NoticeLevel;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).post(upsert_me))
        .route("/api/me/location", put(update_location))
        .route("/api/me/profile", put(update_profile))
        .route("/api/me/preferences", put(update_preferences))
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>> {
    let user = require_profile(&state, &auth)?;
    Ok(Json(user))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpsertProfileRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email)]
    email: Option<String>,
    avatar_url: Option<String>,
}

/// Create or update the profile for the authenticated subject. Location
/// state survives profile updates.
async fn upsert_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<Json<User>> {
    body.validate()?;

    let user = match state.store.get_user(&auth.user_id) {
        Some(mut existing) => {
            if existing.is_deactivated {
                return Err(AppError::Forbidden(
                    "This account has been deactivated".to_string(),
                ));
            }
            existing.name = body.name;
            existing.email = body.email;
            existing.avatar_url = body.avatar_url;
            existing
        }
        None => User {
            id: auth.user_id.clone(),
            name: body.name,
            email: body.email,
            avatar_url: body.avatar_url,
            current_location: None,
            home_location: None,
            location_preference: LocationPreference::Current,
            view_radius_km: None,
            is_admin: auth.is_admin,
            is_deactivated: false,
        },
    };

    state.store.upsert_user(user.clone());
    tracing::info!(user_id = %user.id, "Profile saved");
    Ok(Json(user))
}

#[derive(Deserialize, Validate)]
struct LocationUpdateRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    lon: f64,
}

/// Refresh the user's current location.
async fn update_location(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<LocationUpdateRequest>,
) -> Result<Json<User>> {
    body.validate()?;
    let mut user = require_profile(&state, &auth)?;

    user.current_location = Some(Coordinates {
        lat: body.lat,
        lon: body.lon,
    });
    state.store.upsert_user(user.clone());
    Ok(Json(user))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    avatar_url: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    lon: Option<f64>,
    /// Display name for the home location; reverse-geocoded when absent.
    location_name: Option<String>,
}

/// Update profile details and the home location. When coordinates arrive
/// without a name the geocoder fills one in; a geocoder failure falls
/// back to raw coordinates rather than blocking the save.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<User>> {
    body.validate()?;
    let mut user = require_profile(&state, &auth)?;

    if let Some(name) = body.name {
        user.name = name;
    }
    if let Some(avatar_url) = body.avatar_url {
        user.avatar_url = Some(avatar_url);
    }

    if let (Some(lat), Some(lon)) = (body.lat, body.lon) {
        let name = match body.location_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => match state.geocoder.reverse(lat, lon).await {
                Ok(place) => place.display_name,
                Err(e) => {
                    tracing::warn!(error = %e, "Reverse geocoding failed, using raw coordinates");
                    state.notifier.notify(
                        "Could not look up a name for your home location.",
                        NoticeLevel::Error,
                    );
                    format!("{}, {}", lat, lon)
                }
            },
        };

        user.home_location = Some(NamedLocation { lat, lon, name });
    }

    state.store.upsert_user(user.clone());
    Ok(Json(user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferencesRequest {
    location_preference: Option<LocationPreference>,
    view_radius_km: Option<f64>,
}

/// Update search preferences: which location anchors the nearby view and
/// how far it reaches.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<PreferencesRequest>,
) -> Result<Json<User>> {
    let mut user = require_profile(&state, &auth)?;

    if let Some(preference) = body.location_preference {
        if preference == LocationPreference::Home && user.home_location.is_none() {
            return Err(AppError::Validation(
                "Set a home location before selecting the home preference".to_string(),
            ));
        }
        user.location_preference = preference;
    }

    if let Some(radius) = body.view_radius_km {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AppError::Validation(
                "Search radius must be a positive number of kilometers".to_string(),
            ));
        }
        user.view_radius_km = Some(radius);
    }

    state.store.upsert_user(user.clone());
    Ok(Json(user))
}
