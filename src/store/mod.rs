// SPDX-License-Identifier: MIT

//! Entity store layer.
//!
//! The store is the single shared mutable resource: every mutation to
//! users, activities, events, or chats goes through its operations, which
//! serialize capacity checks and apply cascades atomically.

pub mod memory;

pub use memory::{
    ActivityEdit, AppendOutcome, EntityStore, JoinEffect, LeaveEffect, StoreStats, UserRemoval,
};
