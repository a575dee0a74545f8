// SPDX-License-Identifier: MIT

//! Sport catalog entry. Immutable reference data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub is_team_sport: bool,
    /// Valid activity-type labels for this sport
    pub activity_types: Vec<String>,
    /// Valid skill-level labels for this sport
    pub levels: Vec<String>,
}

impl Sport {
    pub fn allows_activity_type(&self, activity_type: &str) -> bool {
        self.activity_types.iter().any(|t| t == activity_type)
    }

    pub fn allows_level(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }
}
