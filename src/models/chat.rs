// SPDX-License-Identifier: MIT

//! Chat and message models.
//!
//! A chat shares its activity's id (1:1, lazily created when the activity
//! reaches two participants). Messages are append-only, ordered by a
//! server-assigned monotonic sequence number rather than client clocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery state of a message, relevant for optimistic clients.
/// The store marks every accepted message `Sent`; `Pending` and `Failed`
/// exist for client-side optimistic records awaiting confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Client-generated correlation key, used to de-duplicate retries and
    /// reconcile optimistic records with confirmed ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    /// `None` for system messages (join/leave notices)
    pub sender_id: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Server-assigned monotonic ordering
    pub seq: u64,
    pub status: DeliveryStatus,
}

impl Message {
    /// Build a system notice. The sequence number is assigned on append.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_key: None,
            sender_id: None,
            text: text.into(),
            timestamp: Utc::now(),
            seq: 0,
            status: DeliveryStatus::Sent,
        }
    }

    pub fn is_system(&self) -> bool {
        self.sender_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// Same as `activity_id`
    pub id: String,
    pub activity_id: String,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(activity_id: impl Into<String>) -> Self {
        let activity_id = activity_id.into();
        Self {
            id: activity_id.clone(),
            activity_id,
            messages: Vec::new(),
        }
    }
}
