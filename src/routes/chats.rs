// SPDX-License-Identifier: MIT

//! Chat routes: snapshots for poll-based sync, SSE for push.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{Chat, Message};
use crate::routes::require_profile;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chats", get(list_chats))
        .route("/api/chats/{activity_id}", get(get_chat))
        .route("/api/chats/{activity_id}/messages", post(send_message))
        .route("/api/chats/{activity_id}/subscribe", get(subscribe_chat))
}

/// Chats for the user's current activities.
async fn list_chats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Chat>>> {
    let user = require_profile(&state, &auth)?;
    Ok(Json(state.chat.chats_for_user(&user)))
}

/// Full chat snapshot. Serves both the initial hydration and the
/// poll-based refetch path; history stays readable after leaving.
async fn get_chat(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
) -> Result<Json<Chat>> {
    require_profile(&state, &auth)?;
    Ok(Json(state.chat.chat(&activity_id)?))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    text: String,
    /// Client-generated idempotency key; retries with the same key return
    /// the original message.
    client_key: Option<String>,
}

/// Send a message. Current participants only.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<Message>> {
    body.validate()?;
    let user = require_profile(&state, &auth)?;

    let message = state
        .chat
        .send_message(&user, &activity_id, &body.text, body.client_key)?;
    Ok(Json(message))
}

/// Subscribe to a chat's push feed over SSE. Each appended message
/// arrives as a `message` event; lagged gaps are dropped and the client
/// recovers by refetching the snapshot.
async fn subscribe_chat(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(activity_id): Path<String>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    require_profile(&state, &auth)?;
    let subscription = state.chat.subscribe(&activity_id)?;

    let stream = subscription.filter_map(|received| {
        std::future::ready(match received {
            Ok(message) => Event::default()
                .event("message")
                .json_data(&message)
                .ok()
                .map(Ok),
            // Lagged receiver: skip; the snapshot endpoint fills the gap.
            Err(_) => None,
        })
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
