// SPDX-License-Identifier: MIT

//! User model and location-preference rules.

use crate::geo::{Coordinates, NamedLocation};
use serde::{Deserialize, Serialize};

/// Which coordinate basis the radius filter uses as its search origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPreference {
    #[default]
    Current,
    Home,
}

/// User profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Subject id from the identity provider (also the store key)
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Live coordinates, refreshed opportunistically after login
    pub current_location: Option<Coordinates>,
    /// Named home location, set explicitly by the user
    pub home_location: Option<NamedLocation>,
    #[serde(default)]
    pub location_preference: LocationPreference,
    /// Per-user search radius override in km
    pub view_radius_km: Option<f64>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_deactivated: bool,
}

impl User {
    /// The coordinate basis for the radius filter.
    ///
    /// `Home` falls back to the current location when no home location is
    /// set; `None` when neither is available.
    pub fn search_origin(&self) -> Option<Coordinates> {
        match self.location_preference {
            LocationPreference::Home => self
                .home_location
                .as_ref()
                .map(NamedLocation::coords)
                .or(self.current_location),
            LocationPreference::Current => self.current_location,
        }
    }

    /// Per-user radius override, or the system default.
    pub fn effective_radius_km(&self, default_radius_km: f64) -> f64 {
        self.view_radius_km.unwrap_or(default_radius_km)
    }
}
