// SPDX-License-Identifier: MIT

//! Activity model: a single proposed meetup.

use crate::geo::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    /// Catalog sport reference; `None` when an "other" sport name is used
    pub sport_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_sport_name: Option<String>,
    pub title: String,
    pub creator_id: String,
    pub date_time: DateTime<Utc>,
    pub location_name: String,
    pub location_coords: Coordinates,
    pub activity_type: String,
    pub level: String,
    /// 0 means unlimited
    pub partners_needed: u32,
    /// Participant user ids, order irrelevant. The creator is always a member.
    pub participants: Vec<String>,
}

impl Activity {
    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// Whether join operations must be rejected for capacity.
    pub fn is_full(&self) -> bool {
        self.partners_needed > 0 && self.participants.len() as u32 >= self.partners_needed
    }
}
