// SPDX-License-Identifier: MIT

//! Matching engine: derives the nearby and my-activities views.
//!
//! Views are recomputed from the current store snapshot on every read, so
//! they always reflect the latest committed state.

use crate::geo::distance_km;
use crate::models::{Activity, User};
use crate::store::EntityStore;
use serde::Serialize;

/// An activity inside the user's search radius, annotated with its
/// distance from the search origin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyActivity {
    #[serde(flatten)]
    pub activity: Activity,
    pub distance_km: f64,
}

#[derive(Clone)]
pub struct MatchingService {
    store: EntityStore,
    default_radius_km: f64,
}

impl MatchingService {
    pub fn new(store: EntityStore, default_radius_km: f64) -> Self {
        Self {
            store,
            default_radius_km,
        }
    }

    /// Activities within the user's effective radius that the user has not
    /// joined, sorted nearest first. Empty when no search origin is
    /// available.
    pub fn nearby_activities(&self, user: &User) -> Vec<NearbyActivity> {
        let Some(origin) = user.search_origin() else {
            return Vec::new();
        };
        let radius = user.effective_radius_km(self.default_radius_km);

        let mut nearby: Vec<NearbyActivity> = self
            .store
            .list_activities()
            .into_iter()
            .filter(|a| !a.is_participant(&user.id))
            .filter_map(|a| {
                let d = distance_km(origin, a.location_coords);
                (d <= radius).then_some(NearbyActivity {
                    activity: a,
                    distance_km: d,
                })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby
    }

    /// Activities the user created or joined, newest first.
    pub fn my_activities(&self, user: &User) -> Vec<Activity> {
        let mut mine: Vec<Activity> = self
            .store
            .list_activities()
            .into_iter()
            .filter(|a| a.creator_id == user.id || a.is_participant(&user.id))
            .collect();
        mine.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        mine
    }
}
