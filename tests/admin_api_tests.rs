// SPDX-License-Identifier: MIT

//! Admin surface tests: access control, cascading user removal, stats.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{auth_token, bare_request, create_test_app, json_request, response_json, seed_user};

async fn create_activity(app: &axum::Router, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/activities",
            token,
            &json!({
                "sportId": "sport-running",
                "title": title,
                "dateTime": (Utc::now() + Duration::hours(24)).to_rfc3339(),
                "locationName": "Marina Beach",
                "locationCoords": {"lat": 13.0535, "lon": 80.2826},
                "activityType": "Easy Run",
                "level": "Beginner",
                "partnersNeeded": 0
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_admin_routes_reject_non_admins() {
    let (app, state, _) = create_test_app();
    seed_user(&state, "plain", false);
    let token = auth_token(&state, "plain", false);

    for (method, uri) in [
        ("GET", "/api/admin/users"),
        ("GET", "/api/admin/stats"),
        ("DELETE", "/api/admin/users/someone"),
    ] {
        let response = app
            .clone()
            .oneshot(bare_request(method, uri, &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_user_removal_cascades() {
    let (app, state, notifier) = create_test_app();
    seed_user(&state, "admin", true);
    seed_user(&state, "target", false);
    seed_user(&state, "bystander", false);
    let admin_token = auth_token(&state, "admin", true);
    let target_token = auth_token(&state, "target", false);
    let bystander_token = auth_token(&state, "bystander", false);

    // The target creates one activity (with a chat) and joins another.
    let owned = create_activity(&app, &target_token, "Owned by target").await;
    app.clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/activities/{}/join", owned),
            &bystander_token,
        ))
        .await
        .unwrap();

    let other = create_activity(&app, &bystander_token, "Someone else's").await;
    app.clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/activities/{}/join", other),
            &target_token,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            "/api/admin/users/target",
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Profile gone, owned activity and its chat gone, spot vacated.
    assert!(state.store.get_user("target").is_none());
    assert!(state.store.get_activity(&owned).is_none());
    assert!(state.store.get_chat(&owned).is_none());
    let remaining = state.store.get_activity(&other).unwrap();
    assert_eq!(remaining.participants, vec!["bystander"]);

    assert!(notifier.contains("User \"target\" has been deleted."));
}

#[tokio::test]
async fn test_admin_cannot_remove_self() {
    let (app, state, _) = create_test_app();
    seed_user(&state, "admin", true);
    let admin_token = auth_token(&state, "admin", true);

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            "/api/admin/users/admin",
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(state.store.get_user("admin").is_some());
}

#[tokio::test]
async fn test_removing_unknown_user_is_not_found() {
    let (app, state, _) = create_test_app();
    seed_user(&state, "admin", true);
    let admin_token = auth_token(&state, "admin", true);

    let response = app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            "/api/admin/users/ghost",
            &admin_token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_reflect_store_contents() {
    let (app, state, _) = create_test_app();
    seed_user(&state, "admin", true);
    seed_user(&state, "joiner", false);
    let admin_token = auth_token(&state, "admin", true);
    let joiner_token = auth_token(&state, "joiner", false);

    let id = create_activity(&app, &admin_token, "Counted").await;
    app.clone()
        .oneshot(bare_request(
            "POST",
            &format!("/api/activities/{}/join", id),
            &joiner_token,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/admin/stats", &admin_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = response_json(response).await;
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["activities"], 1);
    assert_eq!(stats["chats"], 1);
    assert_eq!(stats["events"], 0);
}

#[tokio::test]
async fn test_admin_user_listing_sorted_by_name() {
    let (app, state, _) = create_test_app();
    seed_user(&state, "zoe", true);
    seed_user(&state, "anna", false);
    seed_user(&state, "mira", false);
    let token = auth_token(&state, "zoe", true);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/api/admin/users", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let users = response_json(response).await;
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["anna", "mira", "zoe"]);
}
