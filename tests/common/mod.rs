// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request};
use fitmatch::config::Config;
use fitmatch::geo::Coordinates;
use fitmatch::middleware::auth::create_jwt;
use fitmatch::models::{LocationPreference, Sport, User};
use fitmatch::routes::create_router;
use fitmatch::services::{
    ChatFeed, ChatService, GeocodeService, MatchingService, ParticipationService,
    RecordingNotifier,
};
use fitmatch::store::EntityStore;
use fitmatch::AppState;
use std::sync::Arc;

/// Coordinates used as the test neighborhood center.
#[allow(dead_code)]
pub const CHENNAI: Coordinates = Coordinates {
    lat: 13.0471,
    lon: 80.1873,
};

/// Create a test app with an empty store and a recording notifier.
/// Returns the router, the shared state, and the notifier for assertions.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<RecordingNotifier>) {
    let config = Config::test_default();
    let store = EntityStore::new();
    store.seed_sports(test_sports());

    let feed = ChatFeed::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let matching = MatchingService::new(store.clone(), config.default_view_radius_km);
    let participation = ParticipationService::new(store.clone(), feed.clone(), notifier.clone());
    let chat = ChatService::new(store.clone(), feed.clone());
    let geocoder = GeocodeService::new(&config.geocoder_base_url, config.geocoder_timeout_secs)
        .expect("geocoder client");

    let state = Arc::new(AppState {
        config,
        store,
        feed,
        matching,
        participation,
        chat,
        geocoder,
        notifier: notifier.clone(),
    });

    (create_router(state.clone()), state, notifier)
}

/// Sports seeded into every test store.
#[allow(dead_code)]
pub fn test_sports() -> Vec<Sport> {
    vec![
        Sport {
            id: "sport-running".to_string(),
            name: "Running".to_string(),
            is_team_sport: false,
            activity_types: vec!["Easy Run".to_string(), "Long Run".to_string()],
            levels: vec!["Beginner".to_string(), "Intermediate".to_string()],
        },
        Sport {
            id: "sport-football".to_string(),
            name: "Football".to_string(),
            is_team_sport: true,
            activity_types: vec!["5-a-side".to_string(), "11-a-side".to_string()],
            levels: vec!["Casual".to_string(), "Competitive".to_string()],
        },
    ]
}

/// Seed a user with a current location near the test center.
#[allow(dead_code)]
pub fn seed_user(state: &AppState, id: &str, is_admin: bool) -> User {
    let user = User {
        id: id.to_string(),
        name: id.to_string(),
        email: None,
        avatar_url: None,
        current_location: Some(CHENNAI),
        home_location: None,
        location_preference: LocationPreference::Current,
        view_radius_km: None,
        is_admin,
        is_deactivated: false,
    };
    state.store.upsert_user(user.clone());
    user
}

/// Mint a session token for a seeded user.
#[allow(dead_code)]
pub fn auth_token(state: &AppState, user_id: &str, is_admin: bool) -> String {
    create_jwt(user_id, is_admin, &state.config.jwt_signing_key).expect("sign test JWT")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build an authenticated request with no body.
#[allow(dead_code)]
pub fn bare_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
