// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod chat;
pub mod event;
pub mod sport;
pub mod user;

pub use activity::Activity;
pub use chat::{Chat, DeliveryStatus, Message};
pub use event::Event;
pub use sport::Sport;
pub use user::{LocationPreference, User};
