// SPDX-License-Identifier: MIT

//! FitMatch: location-aware sports partner matching
//!
//! This crate provides the backend API for finding nearby sport
//! activities, managing participation, and synchronizing activity chats.

pub mod config;
pub mod error;
pub mod geo;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use services::{
    ChatFeed, ChatService, GeocodeService, MatchingService, Notifier, ParticipationService,
};
use std::sync::Arc;
use store::EntityStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: EntityStore,
    pub feed: ChatFeed,
    pub matching: MatchingService,
    pub participation: ParticipationService,
    pub chat: ChatService,
    pub geocoder: GeocodeService,
    pub notifier: Arc<dyn Notifier>,
}
