// SPDX-License-Identifier: MIT

//! Curated event listing routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::Event;
use crate::routes::require_profile;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", put(update_event).delete(delete_event))
}

/// Upcoming events, soonest first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Event>>> {
    require_profile(&state, &auth)?;
    Ok(Json(state.store.list_events()))
}

fn require_admin(auth: &AuthUser) -> Result<()> {
    if !auth.is_admin {
        return Err(AppError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct EventRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1, max = 100))]
    sport: String,
    #[validate(length(min = 1, max = 100))]
    city: String,
    date: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    registration_url: String,
}

impl EventRequest {
    fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            sport: self.sport,
            city: self.city,
            date: self.date,
            description: self.description,
            image_url: self.image_url,
            registration_url: self.registration_url,
        }
    }
}

/// Publish a curated event. Admin only.
async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<EventRequest>,
) -> Result<Json<Event>> {
    require_admin(&auth)?;
    body.validate()?;

    let event = body.into_event(Uuid::new_v4().to_string());
    state.store.insert_event(event.clone());
    tracing::info!(event_id = %event.id, "Event published");
    Ok(Json(event))
}

/// Replace an event. Admin only.
async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<EventRequest>,
) -> Result<Json<Event>> {
    require_admin(&auth)?;
    body.validate()?;

    let updated = state.store.replace_event(body.into_event(id))?;
    Ok(Json(updated))
}

/// Remove an event. Admin only.
async fn delete_event(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Event>> {
    require_admin(&auth)?;
    let removed = state.store.delete_event(&id)?;
    tracing::info!(event_id = %id, "Event removed");
    Ok(Json(removed))
}
