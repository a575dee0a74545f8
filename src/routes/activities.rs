// SPDX-License-Identifier: MIT

//! Activity and matching routes.

use crate::error::Result;
use crate::geo::Coordinates;
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, Sport};
use crate::routes::require_profile;
use crate::services::{ActivityPatch, NearbyActivity, NewActivity};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sports", get(list_sports))
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/nearby", get(nearby_activities))
        .route("/api/activities/mine", get(my_activities))
        .route(
            "/api/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
        .route("/api/activities/{id}/join", post(join_activity))
        .route("/api/activities/{id}/leave", post(leave_activity))
}

/// Sport catalog for activity creation forms.
async fn list_sports(State(state): State<Arc<AppState>>) -> Json<Vec<Sport>> {
    Json(state.store.list_sports())
}

/// All activities, unfiltered. The nearby and mine views are the usual
/// entry points; this one backs admin tooling.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Activity>>> {
    require_profile(&state, &auth)?;
    Ok(Json(state.store.list_activities()))
}

/// Activities within the user's search radius, nearest first.
async fn nearby_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<NearbyActivity>>> {
    let user = require_profile(&state, &auth)?;
    Ok(Json(state.matching.nearby_activities(&user)))
}

/// Activities the user created or joined, newest first.
async fn my_activities(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Activity>>> {
    let user = require_profile(&state, &auth)?;
    Ok(Json(state.matching.my_activities(&user)))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateActivityRequest {
    sport_id: Option<String>,
    other_sport_name: Option<String>,
    #[validate(length(min = 1, max = 120))]
    title: String,
    date_time: DateTime<Utc>,
    #[validate(length(min = 1, max = 200))]
    location_name: String,
    location_coords: Coordinates,
    activity_type: String,
    level: String,
    #[serde(default)]
    partners_needed: u32,
}

/// Create an activity. The creator joins automatically.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateActivityRequest>,
) -> Result<Json<Activity>> {
    body.validate()?;
    let user = require_profile(&state, &auth)?;

    let activity = state.participation.create(
        &user,
        NewActivity {
            sport_id: body.sport_id,
            other_sport_name: body.other_sport_name,
            title: body.title,
            date_time: body.date_time,
            location_name: body.location_name,
            location_coords: body.location_coords,
            activity_type: body.activity_type,
            level: body.level,
            partners_needed: body.partners_needed,
        },
    )?;
    Ok(Json(activity))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateActivityRequest {
    sport_id: Option<String>,
    other_sport_name: Option<String>,
    #[validate(length(min = 1, max = 120))]
    title: Option<String>,
    date_time: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 200))]
    location_name: Option<String>,
    location_coords: Option<Coordinates>,
    activity_type: Option<String>,
    level: Option<String>,
    partners_needed: Option<u32>,
}

/// Edit an activity. Creator-only; the participant list is not editable
/// through this route.
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateActivityRequest>,
) -> Result<Json<Activity>> {
    body.validate()?;
    let user = require_profile(&state, &auth)?;

    // Supplying a sport id clears any free-text sport name and vice
    // versa, so an edit can switch between the two forms.
    let (sport_id, other_sport_name) = match (body.sport_id, body.other_sport_name) {
        (Some(id), other) => (Some(Some(id)), Some(other)),
        (None, Some(name)) => (Some(None), Some(Some(name))),
        (None, None) => (None, None),
    };

    let patch = ActivityPatch {
        sport_id,
        other_sport_name,
        title: body.title,
        date_time: body.date_time,
        location_name: body.location_name,
        location_coords: body.location_coords,
        activity_type: body.activity_type,
        level: body.level,
        partners_needed: body.partners_needed,
    };

    let updated = state.participation.edit(&user, &id, patch)?;
    Ok(Json(updated))
}

/// Delete an activity and its chat. Creator or admin only.
async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    let user = require_profile(&state, &auth)?;
    let deleted = state.participation.delete(&user, &id)?;
    Ok(Json(deleted))
}

/// Join an activity.
async fn join_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    let user = require_profile(&state, &auth)?;
    let activity = state.participation.join(&user, &id)?;
    Ok(Json(activity))
}

/// Leave an activity. The chat stays behind as history.
async fn leave_activity(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Activity>> {
    let user = require_profile(&state, &auth)?;
    let activity = state.participation.leave(&user, &id)?;
    Ok(Json(activity))
}
