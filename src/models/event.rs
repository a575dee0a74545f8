// SPDX-License-Identifier: MIT

//! Admin-curated public event listing. Purely informational.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub sport: String,
    pub city: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub image_url: String,
    pub registration_url: String,
}
