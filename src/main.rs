// SPDX-License-Identifier: MIT

//! FitMatch API Server
//!
//! Matches people with nearby sport activities and keeps each activity's
//! group chat in sync across participants.

use fitmatch::{
    config::Config,
    services::{
        ChatFeed, ChatService, GeocodeService, MatchingService, ParticipationService,
        SportCatalog, TracingNotifier,
    },
    store::EntityStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting FitMatch API");

    // Authoritative in-memory store
    let store = EntityStore::new();

    // Seed the sport catalog
    tracing::info!(path = %config.sports_catalog_path, "Loading sport catalog");
    let catalog = SportCatalog::load_from_file(&config.sports_catalog_path)
        .expect("Failed to load sport catalog");
    store.seed_sports(catalog.into_sports());

    let feed = ChatFeed::new();
    let notifier = Arc::new(TracingNotifier);
    let matching = MatchingService::new(store.clone(), config.default_view_radius_km);
    let participation =
        ParticipationService::new(store.clone(), feed.clone(), notifier.clone());
    let chat = ChatService::new(store.clone(), feed.clone());
    let geocoder = GeocodeService::new(&config.geocoder_base_url, config.geocoder_timeout_secs)
        .expect("Failed to initialize geocoder client");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        feed,
        matching,
        participation,
        chat,
        geocoder,
        notifier,
    });

    // Build router
    let app = fitmatch::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitmatch=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
