// SPDX-License-Identifier: MIT

//! In-memory authoritative entity store.
//!
//! All collections live behind one lock so that multi-collection
//! operations (join + chat creation, delete cascades, admin user removal)
//! are atomic from the caller's point of view. Critical sections are
//! short and never suspend.

use crate::error::AppError;
use crate::models::{Activity, Chat, DeliveryStatus, Event, Message, Sport, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Outcome of a successful join: the updated activity plus the chat side
/// effect that happened inside the same critical section.
#[derive(Debug, Clone)]
pub struct JoinEffect {
    pub activity: Activity,
    /// Whether this join created the chat (second participant)
    pub chat_created: bool,
    /// The system notice appended to the chat, if a chat was touched
    pub message: Option<Message>,
}

/// Outcome of a successful leave.
#[derive(Debug, Clone)]
pub struct LeaveEffect {
    pub activity: Activity,
    /// The system notice appended to the surviving chat, if one exists
    pub message: Option<Message>,
}

/// Outcome of appending a message: a fresh record, or the existing one
/// when the client key matched a previous append (idempotent retry).
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    Appended(Message),
    Duplicate(Message),
}

/// Editable activity fields. Participants and creator are never part of
/// an edit.
#[derive(Debug, Clone)]
pub struct ActivityEdit {
    pub sport_id: Option<String>,
    pub other_sport_name: Option<String>,
    pub title: String,
    pub date_time: chrono::DateTime<Utc>,
    pub location_name: String,
    pub location_coords: crate::geo::Coordinates,
    pub activity_type: String,
    pub level: String,
    pub partners_needed: u32,
}

/// Result of an admin user removal cascade.
#[derive(Debug, Clone)]
pub struct UserRemoval {
    pub user: User,
    /// Activities (and chats) deleted because the user created them
    pub removed_activity_ids: Vec<String>,
}

/// Collection counts for the admin dashboard.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct StoreStats {
    pub users: usize,
    pub activities: usize,
    pub events: usize,
    pub chats: usize,
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<String, User>,
    sports: HashMap<String, Sport>,
    activities: HashMap<String, Activity>,
    events: HashMap<String, Event>,
    chats: HashMap<String, Chat>,
    /// Monotonic message sequence, assigned under the write lock
    next_seq: u64,
}

/// In-memory entity store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct EntityStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Users ───────────────────────────────────────────────────

    pub fn upsert_user(&self, user: User) {
        self.write().users.insert(user.id.clone(), user);
    }

    pub fn get_user(&self, user_id: &str) -> Option<User> {
        self.read().users.get(user_id).cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    /// Remove a user and everything that depends on them, atomically:
    /// their created activities (with chats), their membership in every
    /// other activity, and finally the user record itself.
    pub fn remove_user_cascade(&self, user_id: &str) -> Result<UserRemoval, AppError> {
        let mut inner = self.write();

        if !inner.users.contains_key(user_id) {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let removed_activity_ids: Vec<String> = inner
            .activities
            .values()
            .filter(|a| a.creator_id == user_id)
            .map(|a| a.id.clone())
            .collect();

        for id in &removed_activity_ids {
            inner.activities.remove(id);
            inner.chats.remove(id);
        }

        for activity in inner.activities.values_mut() {
            activity.participants.retain(|p| p != user_id);
        }

        // contains_key checked above
        let user = inner
            .users
            .remove(user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        Ok(UserRemoval {
            user,
            removed_activity_ids,
        })
    }

    // ─── Sports ──────────────────────────────────────────────────

    pub fn seed_sports(&self, sports: Vec<Sport>) {
        let mut inner = self.write();
        for sport in sports {
            inner.sports.insert(sport.id.clone(), sport);
        }
    }

    pub fn get_sport(&self, sport_id: &str) -> Option<Sport> {
        self.read().sports.get(sport_id).cloned()
    }

    pub fn list_sports(&self) -> Vec<Sport> {
        let mut sports: Vec<Sport> = self.read().sports.values().cloned().collect();
        sports.sort_by(|a, b| a.name.cmp(&b.name));
        sports
    }

    // ─── Activities ──────────────────────────────────────────────

    pub fn insert_activity(&self, activity: Activity) {
        self.write()
            .activities
            .insert(activity.id.clone(), activity);
    }

    pub fn get_activity(&self, activity_id: &str) -> Option<Activity> {
        self.read().activities.get(activity_id).cloned()
    }

    pub fn list_activities(&self) -> Vec<Activity> {
        self.read().activities.values().cloned().collect()
    }

    /// Apply an edit without touching the participant set.
    pub fn apply_activity_edit(
        &self,
        activity_id: &str,
        edit: ActivityEdit,
    ) -> Result<Activity, AppError> {
        let mut inner = self.write();
        let activity = inner
            .activities
            .get_mut(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        activity.sport_id = edit.sport_id;
        activity.other_sport_name = edit.other_sport_name;
        activity.title = edit.title;
        activity.date_time = edit.date_time;
        activity.location_name = edit.location_name;
        activity.location_coords = edit.location_coords;
        activity.activity_type = edit.activity_type;
        activity.level = edit.level;
        activity.partners_needed = edit.partners_needed;

        Ok(activity.clone())
    }

    /// Delete an activity and purge its chat.
    pub fn delete_activity_cascade(&self, activity_id: &str) -> Result<Activity, AppError> {
        let mut inner = self.write();
        let activity = inner
            .activities
            .remove(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;
        inner.chats.remove(activity_id);
        Ok(activity)
    }

    /// Authoritative join: membership, capacity, chat creation, and the
    /// system notice are all decided under one write lock, so concurrent
    /// joins against a capacity-limited activity serialize here.
    ///
    /// A retried join finds the user already present and mutates nothing.
    pub fn join_activity(&self, activity_id: &str, user: &User) -> Result<JoinEffect, AppError> {
        let mut inner = self.write();

        let activity = inner
            .activities
            .get_mut(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        if activity.is_participant(&user.id) {
            return Err(AppError::AlreadyJoined);
        }
        if activity.is_full() {
            return Err(AppError::CapacityFull);
        }

        activity.participants.push(user.id.clone());
        let updated = activity.clone();
        let participant_count = updated.participants.len();

        let mut notice = Message::system(format!("{} has joined the activity!", user.name));
        inner.next_seq += 1;
        notice.seq = inner.next_seq;

        let (chat_created, message) = if let Some(chat) = inner.chats.get_mut(activity_id) {
            chat.messages.push(notice.clone());
            (false, Some(notice))
        } else if participant_count >= 2 {
            let mut chat = Chat::new(activity_id);
            chat.messages.push(notice.clone());
            inner.chats.insert(activity_id.to_string(), chat);
            (true, Some(notice))
        } else {
            (false, None)
        };

        Ok(JoinEffect {
            activity: updated,
            chat_created,
            message,
        })
    }

    /// Remove a participant. The chat is never deleted by a leave; it is
    /// an append-only historical record.
    pub fn leave_activity(&self, activity_id: &str, user: &User) -> Result<LeaveEffect, AppError> {
        let mut inner = self.write();

        let activity = inner
            .activities
            .get_mut(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        if !activity.is_participant(&user.id) {
            return Err(AppError::Conflict(
                "You are not a participant of this activity".to_string(),
            ));
        }
        if activity.creator_id == user.id {
            return Err(AppError::Conflict(
                "The creator cannot leave their own activity".to_string(),
            ));
        }

        activity.participants.retain(|p| p != &user.id);
        let updated = activity.clone();

        let message = if inner.chats.contains_key(activity_id) {
            inner.next_seq += 1;
            let mut notice = Message::system(format!("{} has left the activity.", user.name));
            notice.seq = inner.next_seq;
            if let Some(chat) = inner.chats.get_mut(activity_id) {
                chat.messages.push(notice.clone());
            }
            Some(notice)
        } else {
            None
        };

        Ok(LeaveEffect {
            activity: updated,
            message,
        })
    }

    // ─── Events ──────────────────────────────────────────────────

    pub fn insert_event(&self, event: Event) {
        self.write().events.insert(event.id.clone(), event);
    }

    pub fn get_event(&self, event_id: &str) -> Option<Event> {
        self.read().events.get(event_id).cloned()
    }

    /// Events sorted ascending by date.
    pub fn list_events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.read().events.values().cloned().collect();
        events.sort_by_key(|e| e.date);
        events
    }

    pub fn replace_event(&self, event: Event) -> Result<Event, AppError> {
        let mut inner = self.write();
        if !inner.events.contains_key(&event.id) {
            return Err(AppError::NotFound(format!("Event {} not found", event.id)));
        }
        inner.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    pub fn delete_event(&self, event_id: &str) -> Result<Event, AppError> {
        self.write()
            .events
            .remove(event_id)
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", event_id)))
    }

    // ─── Chats ───────────────────────────────────────────────────

    pub fn get_chat(&self, activity_id: &str) -> Option<Chat> {
        self.read().chats.get(activity_id).cloned()
    }

    /// Chats for activities the user currently participates in.
    pub fn chats_for_user(&self, user_id: &str) -> Vec<Chat> {
        let inner = self.read();
        inner
            .chats
            .values()
            .filter(|chat| {
                inner
                    .activities
                    .get(&chat.activity_id)
                    .is_some_and(|a| a.is_participant(user_id))
            })
            .cloned()
            .collect()
    }

    /// Append a user message. The sender must be a current participant of
    /// the associated activity; a user who has left may view history but
    /// not send. Retries carrying the same client key return the original
    /// record instead of appending twice.
    pub fn append_message(
        &self,
        activity_id: &str,
        sender_id: &str,
        text: &str,
        client_key: Option<String>,
    ) -> Result<AppendOutcome, AppError> {
        let mut inner = self.write();

        let activity = inner
            .activities
            .get(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;
        if !activity.is_participant(sender_id) {
            return Err(AppError::Forbidden(
                "Only current participants can send messages".to_string(),
            ));
        }

        if !inner.chats.contains_key(activity_id) {
            return Err(AppError::NotFound(format!(
                "No chat exists for activity {}",
                activity_id
            )));
        }

        if let Some(key) = client_key.as_deref() {
            let chat = &inner.chats[activity_id];
            if let Some(existing) = chat.messages.iter().find(|m| {
                m.client_key.as_deref() == Some(key) && m.sender_id.as_deref() == Some(sender_id)
            }) {
                return Ok(AppendOutcome::Duplicate(existing.clone()));
            }
        }

        inner.next_seq += 1;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            client_key,
            sender_id: Some(sender_id.to_string()),
            text: text.to_string(),
            timestamp: Utc::now(),
            seq: inner.next_seq,
            status: DeliveryStatus::Sent,
        };

        // contains_key checked above
        if let Some(chat) = inner.chats.get_mut(activity_id) {
            chat.messages.push(message.clone());
        }

        Ok(AppendOutcome::Appended(message))
    }

    // ─── Stats ───────────────────────────────────────────────────

    pub fn stats(&self) -> StoreStats {
        let inner = self.read();
        StoreStats {
            users: inner.users.len(),
            activities: inner.activities.len(),
            events: inner.events.len(),
            chats: inner.chats.len(),
        }
    }
}
