// SPDX-License-Identifier: MIT

//! Chat synchronization: message sending and the realtime push feed.
//!
//! Each open chat holds one broadcast channel keyed by activity id.
//! Subscriptions are scoped handles: dropping the last subscriber for an
//! activity releases its channel. Snapshot reads (`chat`,
//! `chats_for_user`) cover the poll/refetch strategy; the feed covers
//! push.

use crate::error::{AppError, Result};
use crate::models::{Chat, Message, User};
use crate::store::{AppendOutcome, EntityStore};
use dashmap::DashMap;
use futures_util::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

const FEED_CHANNEL_CAPACITY: usize = 64;

/// Registry of per-activity broadcast channels.
#[derive(Clone, Default)]
pub struct ChatFeed {
    channels: Arc<DashMap<String, broadcast::Sender<Message>>>,
}

impl ChatFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a message to current subscribers of an activity's chat.
    /// No-op when nobody is subscribed.
    pub fn publish(&self, activity_id: &str, message: &Message) {
        if let Some(tx) = self.channels.get(activity_id) {
            let _ = tx.send(message.clone());
        }
    }

    /// Acquire a scoped subscription to an activity's chat.
    pub fn subscribe(&self, activity_id: &str) -> ChatSubscription {
        let tx = self
            .channels
            .entry(activity_id.to_string())
            .or_insert_with(|| broadcast::channel(FEED_CHANNEL_CAPACITY).0)
            .clone();

        ChatSubscription {
            activity_id: activity_id.to_string(),
            channels: Arc::clone(&self.channels),
            stream: BroadcastStream::new(tx.subscribe()),
        }
    }

    /// Tear down an activity's channel (activity deleted). Existing
    /// subscriber streams end once the sender is gone.
    pub fn remove(&self, activity_id: &str) {
        self.channels.remove(activity_id);
    }

    pub fn open_channels(&self) -> usize {
        self.channels.len()
    }
}

/// A live subscription to one activity's chat. Yields messages as they
/// are published; lagged gaps surface as errors the consumer can skip.
/// Dropping the last subscription for an activity releases its channel.
pub struct ChatSubscription {
    activity_id: String,
    channels: Arc<DashMap<String, broadcast::Sender<Message>>>,
    stream: BroadcastStream<Message>,
}

impl Stream for ChatSubscription {
    type Item = std::result::Result<Message, BroadcastStreamRecvError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().stream).poll_next(cx)
    }
}

impl Drop for ChatSubscription {
    fn drop(&mut self) {
        // Our receiver is still alive here, so a count of 1 means we are
        // the last subscriber.
        self.channels
            .remove_if(&self.activity_id, |_, tx| tx.receiver_count() <= 1);
    }
}

/// Chat operations over the store plus the push feed.
#[derive(Clone)]
pub struct ChatService {
    store: EntityStore,
    feed: ChatFeed,
}

impl ChatService {
    pub fn new(store: EntityStore, feed: ChatFeed) -> Self {
        Self { store, feed }
    }

    /// Append a user message and push it to subscribers.
    ///
    /// A retry carrying the same client key returns the original record
    /// without re-appending or re-broadcasting.
    pub fn send_message(
        &self,
        sender: &User,
        activity_id: &str,
        text: &str,
        client_key: Option<String>,
    ) -> Result<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Message text must not be empty".to_string(),
            ));
        }

        match self
            .store
            .append_message(activity_id, &sender.id, text, client_key)?
        {
            AppendOutcome::Appended(message) => {
                tracing::debug!(
                    activity_id,
                    sender_id = %sender.id,
                    seq = message.seq,
                    "Message sent"
                );
                self.feed.publish(activity_id, &message);
                Ok(message)
            }
            AppendOutcome::Duplicate(message) => {
                tracing::debug!(activity_id, sender_id = %sender.id, "Duplicate send ignored");
                Ok(message)
            }
        }
    }

    /// Full chat snapshot for hydration. History stays viewable for users
    /// who have left the activity.
    pub fn chat(&self, activity_id: &str) -> Result<Chat> {
        self.store
            .get_chat(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("No chat exists for activity {}", activity_id)))
    }

    /// Chats for activities the user currently participates in.
    pub fn chats_for_user(&self, user: &User) -> Vec<Chat> {
        self.store.chats_for_user(&user.id)
    }

    /// Subscribe to an existing chat's push feed.
    pub fn subscribe(&self, activity_id: &str) -> Result<ChatSubscription> {
        if self.store.get_chat(activity_id).is_none() {
            return Err(AppError::NotFound(format!(
                "No chat exists for activity {}",
                activity_id
            )));
        }
        Ok(self.feed.subscribe(activity_id))
    }
}
