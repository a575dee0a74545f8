// SPDX-License-Identifier: MIT

//! Participation protocol: create/edit/join/leave/delete activities and
//! admin user removal.
//!
//! Handles the workflow around each store mutation:
//! 1. Validate fields and authorization
//! 2. Apply the serialized mutation through the store
//! 3. Push chat side effects to the realtime feed
//! 4. Emit the user-facing notice

use crate::error::{AppError, Result};
use crate::geo::Coordinates;
use crate::models::{Activity, User};
use crate::services::chat::ChatFeed;
use crate::services::notify::{NoticeLevel, Notifier};
use crate::store::{ActivityEdit, EntityStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Validated input for creating an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub sport_id: Option<String>,
    pub other_sport_name: Option<String>,
    pub title: String,
    pub date_time: DateTime<Utc>,
    pub location_name: String,
    pub location_coords: Coordinates,
    pub activity_type: String,
    pub level: String,
    pub partners_needed: u32,
}

/// Partial update for an activity; unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ActivityPatch {
    pub sport_id: Option<Option<String>>,
    pub other_sport_name: Option<Option<String>>,
    pub title: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location_name: Option<String>,
    pub location_coords: Option<Coordinates>,
    pub activity_type: Option<String>,
    pub level: Option<String>,
    pub partners_needed: Option<u32>,
}

#[derive(Clone)]
pub struct ParticipationService {
    store: EntityStore,
    feed: ChatFeed,
    notifier: Arc<dyn Notifier>,
}

impl ParticipationService {
    pub fn new(store: EntityStore, feed: ChatFeed, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            feed,
            notifier,
        }
    }

    /// Create an activity. The creator auto-joins.
    pub fn create(&self, user: &User, input: NewActivity) -> Result<Activity> {
        self.validate_fields(
            &input.title,
            input.sport_id.as_deref(),
            input.other_sport_name.as_deref(),
            &input.activity_type,
            &input.level,
            input.date_time,
            &input.location_name,
        )?;

        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            sport_id: input.sport_id,
            other_sport_name: input.other_sport_name,
            title: input.title,
            creator_id: user.id.clone(),
            date_time: input.date_time,
            location_name: input.location_name,
            location_coords: input.location_coords,
            activity_type: input.activity_type,
            level: input.level,
            partners_needed: input.partners_needed,
            participants: vec![user.id.clone()],
        };

        self.store.insert_activity(activity.clone());
        tracing::info!(activity_id = %activity.id, creator = %user.id, "Activity created");
        self.notifier
            .notify("Activity created successfully!", NoticeLevel::Success);
        Ok(activity)
    }

    /// Edit an activity. Creator-only; participants are never touched.
    pub fn edit(&self, user: &User, activity_id: &str, patch: ActivityPatch) -> Result<Activity> {
        let current = self
            .store
            .get_activity(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        if current.creator_id != user.id {
            return Err(AppError::Forbidden(
                "Only the creator can edit this activity".to_string(),
            ));
        }

        let edit = ActivityEdit {
            sport_id: patch.sport_id.unwrap_or(current.sport_id),
            other_sport_name: patch.other_sport_name.unwrap_or(current.other_sport_name),
            title: patch.title.unwrap_or(current.title),
            date_time: patch.date_time.unwrap_or(current.date_time),
            location_name: patch.location_name.unwrap_or(current.location_name),
            location_coords: patch.location_coords.unwrap_or(current.location_coords),
            activity_type: patch.activity_type.unwrap_or(current.activity_type),
            level: patch.level.unwrap_or(current.level),
            partners_needed: patch.partners_needed.unwrap_or(current.partners_needed),
        };

        self.validate_fields(
            &edit.title,
            edit.sport_id.as_deref(),
            edit.other_sport_name.as_deref(),
            &edit.activity_type,
            &edit.level,
            edit.date_time,
            &edit.location_name,
        )?;

        let updated = self.store.apply_activity_edit(activity_id, edit)?;
        self.notifier
            .notify("Activity updated successfully!", NoticeLevel::Success);
        Ok(updated)
    }

    /// Join an activity. The store owns the capacity decision; this layer
    /// pushes the chat notice and emits feedback.
    pub fn join(&self, user: &User, activity_id: &str) -> Result<Activity> {
        let effect = self.store.join_activity(activity_id, user)?;

        if let Some(message) = &effect.message {
            self.feed.publish(activity_id, message);
        }

        tracing::info!(
            activity_id,
            user_id = %user.id,
            chat_created = effect.chat_created,
            "User joined activity"
        );
        self.notifier.notify(
            &format!("Successfully joined \"{}\"!", effect.activity.title),
            NoticeLevel::Success,
        );
        Ok(effect.activity)
    }

    /// Leave an activity. The chat survives as a historical record.
    pub fn leave(&self, user: &User, activity_id: &str) -> Result<Activity> {
        let effect = self.store.leave_activity(activity_id, user)?;

        if let Some(message) = &effect.message {
            self.feed.publish(activity_id, message);
        }

        tracing::info!(activity_id, user_id = %user.id, "User left activity");
        self.notifier.notify(
            &format!("You have left \"{}\".", effect.activity.title),
            NoticeLevel::Info,
        );
        Ok(effect.activity)
    }

    /// Delete an activity and purge its chat. Creator or admin only.
    pub fn delete(&self, user: &User, activity_id: &str) -> Result<Activity> {
        let activity = self
            .store
            .get_activity(activity_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", activity_id)))?;

        if activity.creator_id != user.id && !user.is_admin {
            return Err(AppError::Forbidden(
                "Only the creator or an admin can delete this activity".to_string(),
            ));
        }

        let deleted = self.store.delete_activity_cascade(activity_id)?;
        self.feed.remove(activity_id);

        tracing::info!(activity_id, user_id = %user.id, "Activity deleted");
        self.notifier.notify(
            &format!("Activity \"{}\" deleted.", deleted.title),
            NoticeLevel::Info,
        );
        Ok(deleted)
    }

    /// Admin-only cascading user removal. Self-targeting is rejected
    /// before any mutation.
    pub fn remove_user(&self, admin: &User, target_id: &str) -> Result<()> {
        if !admin.is_admin {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        if admin.id == target_id {
            return Err(AppError::Forbidden(
                "Administrators cannot remove their own account".to_string(),
            ));
        }

        let removal = self.store.remove_user_cascade(target_id)?;
        for activity_id in &removal.removed_activity_ids {
            self.feed.remove(activity_id);
        }

        tracing::info!(
            target = target_id,
            admin = %admin.id,
            removed_activities = removal.removed_activity_ids.len(),
            "User removed"
        );
        self.notifier.notify(
            &format!("User \"{}\" has been deleted.", removal.user.name),
            NoticeLevel::Info,
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn validate_fields(
        &self,
        title: &str,
        sport_id: Option<&str>,
        other_sport_name: Option<&str>,
        activity_type: &str,
        level: &str,
        date_time: DateTime<Utc>,
        location_name: &str,
    ) -> Result<()> {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if activity_type.trim().is_empty() {
            return Err(AppError::Validation(
                "Activity type is required".to_string(),
            ));
        }
        if level.trim().is_empty() {
            return Err(AppError::Validation("Level is required".to_string()));
        }
        if location_name.trim().is_empty() {
            return Err(AppError::Validation("Location is required".to_string()));
        }
        if date_time <= Utc::now() {
            return Err(AppError::Validation(
                "Date must be in the future".to_string(),
            ));
        }

        match sport_id {
            Some(id) => {
                let sport = self.store.get_sport(id).ok_or_else(|| {
                    AppError::Validation(format!("Unknown sport: {}", id))
                })?;
                if !sport.allows_activity_type(activity_type) {
                    return Err(AppError::Validation(format!(
                        "\"{}\" is not a valid activity type for {}",
                        activity_type, sport.name
                    )));
                }
                if !sport.allows_level(level) {
                    return Err(AppError::Validation(format!(
                        "\"{}\" is not a valid level for {}",
                        level, sport.name
                    )));
                }
            }
            None => {
                // Free-text sport: catalog constraints do not apply, but a
                // name is required.
                if other_sport_name.map_or(true, |n| n.trim().is_empty()) {
                    return Err(AppError::Validation(
                        "Please specify the sport name".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationPreference, Sport};
    use crate::services::notify::RecordingNotifier;
    use chrono::Duration;

    fn test_user(id: &str, is_admin: bool) -> User {
        User {
            id: id.to_string(),
            name: id.to_string(),
            email: None,
            avatar_url: None,
            current_location: None,
            home_location: None,
            location_preference: LocationPreference::Current,
            view_radius_km: None,
            is_admin,
            is_deactivated: false,
        }
    }

    fn new_activity(sport_id: Option<&str>, hours_ahead: i64) -> NewActivity {
        NewActivity {
            sport_id: sport_id.map(|s| s.to_string()),
            other_sport_name: None,
            title: "Morning run".to_string(),
            date_time: Utc::now() + Duration::hours(hours_ahead),
            location_name: "Marina Beach".to_string(),
            location_coords: Coordinates {
                lat: 13.0535,
                lon: 80.2826,
            },
            activity_type: "Easy Run".to_string(),
            level: "Beginner".to_string(),
            partners_needed: 2,
        }
    }

    fn setup() -> (ParticipationService, EntityStore, Arc<RecordingNotifier>) {
        let store = EntityStore::new();
        store.seed_sports(vec![Sport {
            id: "sport-1".to_string(),
            name: "Running".to_string(),
            is_team_sport: false,
            activity_types: vec!["Easy Run".to_string(), "Long Run".to_string()],
            levels: vec!["Beginner".to_string(), "Advanced".to_string()],
        }]);
        let notifier = Arc::new(RecordingNotifier::new());
        let service =
            ParticipationService::new(store.clone(), ChatFeed::new(), notifier.clone());
        (service, store, notifier)
    }

    #[test]
    fn test_create_auto_joins_creator() {
        let (service, _store, notifier) = setup();
        let user = test_user("creator", false);

        let activity = service.create(&user, new_activity(Some("sport-1"), 3)).unwrap();
        assert_eq!(activity.creator_id, "creator");
        assert_eq!(activity.participants, vec!["creator"]);
        assert!(notifier.contains("Activity created successfully!"));
    }

    #[test]
    fn test_create_rejects_past_date() {
        let (service, _store, _notifier) = setup();
        let user = test_user("creator", false);

        let err = service
            .create(&user, new_activity(Some("sport-1"), -1))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_create_rejects_level_outside_catalog() {
        let (service, _store, _notifier) = setup();
        let user = test_user("creator", false);

        let mut input = new_activity(Some("sport-1"), 3);
        input.level = "Galactic".to_string();
        let err = service.create(&user, input).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_create_other_sport_needs_name() {
        let (service, _store, _notifier) = setup();
        let user = test_user("creator", false);

        let err = service.create(&user, new_activity(None, 3)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut input = new_activity(None, 3);
        input.other_sport_name = Some("Ultimate Frisbee".to_string());
        // Free-text sports skip catalog type/level checks.
        input.activity_type = "Pickup game".to_string();
        input.level = "Any".to_string();
        assert!(service.create(&user, input).is_ok());
    }

    #[test]
    fn test_edit_is_creator_only() {
        let (service, _store, _notifier) = setup();
        let creator = test_user("creator", false);
        let intruder = test_user("intruder", false);

        let activity = service.create(&creator, new_activity(Some("sport-1"), 3)).unwrap();

        let patch = ActivityPatch {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        };
        let err = service.edit(&intruder, &activity.id, patch).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_edit_revalidates_patched_fields() {
        let (service, _store, _notifier) = setup();
        let creator = test_user("creator", false);
        let activity = service.create(&creator, new_activity(Some("sport-1"), 3)).unwrap();

        let patch = ActivityPatch {
            date_time: Some(Utc::now() - Duration::hours(1)),
            ..Default::default()
        };
        let err = service.edit(&creator, &activity.id, patch).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let patch = ActivityPatch {
            title: Some("Evening run".to_string()),
            ..Default::default()
        };
        let updated = service.edit(&creator, &activity.id, patch).unwrap();
        assert_eq!(updated.title, "Evening run");
    }

    #[test]
    fn test_join_and_leave_notices() {
        let (service, store, notifier) = setup();
        let creator = test_user("creator", false);
        let joiner = test_user("joiner", false);
        store.upsert_user(creator.clone());
        store.upsert_user(joiner.clone());

        let activity = service.create(&creator, new_activity(Some("sport-1"), 3)).unwrap();

        service.join(&joiner, &activity.id).unwrap();
        assert!(notifier.contains("Successfully joined \"Morning run\"!"));

        service.leave(&joiner, &activity.id).unwrap();
        assert!(notifier.contains("You have left \"Morning run\"."));
    }

    #[test]
    fn test_delete_requires_creator_or_admin() {
        let (service, _store, notifier) = setup();
        let creator = test_user("creator", false);
        let other = test_user("other", false);
        let admin = test_user("admin", true);

        let a1 = service.create(&creator, new_activity(Some("sport-1"), 3)).unwrap();
        let a2 = service.create(&creator, new_activity(Some("sport-1"), 4)).unwrap();

        let err = service.delete(&other, &a1.id).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        service.delete(&creator, &a1.id).unwrap();
        service.delete(&admin, &a2.id).unwrap();
        assert!(notifier.contains("Activity \"Morning run\" deleted."));
    }

    #[test]
    fn test_admin_cannot_remove_self() {
        let (service, store, _notifier) = setup();
        let admin = test_user("admin", true);
        store.upsert_user(admin.clone());

        let err = service.remove_user(&admin, "admin").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(store.get_user("admin").is_some());
    }

    #[test]
    fn test_remove_user_requires_admin() {
        let (service, store, _notifier) = setup();
        let plain = test_user("plain", false);
        let target = test_user("target", false);
        store.upsert_user(plain.clone());
        store.upsert_user(target.clone());

        let err = service.remove_user(&plain, "target").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
