// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod catalog;
pub mod chat;
pub mod geocode;
pub mod matching;
pub mod notify;
pub mod participation;

pub use catalog::{CatalogError, SportCatalog};
pub use chat::{ChatFeed, ChatService, ChatSubscription};
pub use geocode::{GeocodeService, Place};
pub use matching::{MatchingService, NearbyActivity};
pub use notify::{NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use participation::{ActivityPatch, NewActivity, ParticipationService};
