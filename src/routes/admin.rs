// SPDX-License-Identifier: MIT

//! Administration routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::User;
use crate::routes::require_profile;
use crate::store::StoreStats;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", delete(remove_user))
        .route("/api/admin/stats", get(get_stats))
}

fn require_admin(auth: &AuthUser) -> Result<()> {
    if !auth.is_admin {
        return Err(AppError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }
    Ok(())
}

/// All registered users, sorted by name.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<User>>> {
    require_admin(&auth)?;
    require_profile(&state, &auth)?;
    Ok(Json(state.store.list_users()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveUserResponse {
    success: bool,
    message: String,
}

/// Remove a user and everything they own: their activities, those
/// activities' chats, and their spots in other activities.
async fn remove_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RemoveUserResponse>> {
    require_admin(&auth)?;
    let admin = require_profile(&state, &auth)?;

    state.participation.remove_user(&admin, &id)?;

    Ok(Json(RemoveUserResponse {
        success: true,
        message: format!("User {} and all associated data removed", id),
    }))
}

/// Store-wide counters for the admin dashboard.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StoreStats>> {
    require_admin(&auth)?;
    require_profile(&state, &auth)?;
    Ok(Json(state.store.stats()))
}
