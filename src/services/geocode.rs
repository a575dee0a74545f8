// SPDX-License-Identifier: MIT

//! Forward and reverse geocoding against a Nominatim-compatible endpoint.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const USER_AGENT: &str = concat!("fitmatch/", env!("CARGO_PKG_VERSION"));

/// A resolved place: coordinates plus a display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Nominatim serializes coordinates as JSON strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_place(self) -> Result<Place> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| AppError::Upstream(format!("Invalid latitude in geocoder response: {}", e)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| AppError::Upstream(format!("Invalid longitude in geocoder response: {}", e)))?;
        Ok(Place {
            lat,
            lon,
            display_name: self.display_name,
        })
    }
}

#[derive(Clone)]
pub struct GeocodeService {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeService {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search places matching a free-text query.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Place>> {
        let url = format!(
            "{}/search?q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        let results: Vec<NominatimPlace> = self.fetch(&url).await?;
        results.into_iter().map(NominatimPlace::into_place).collect()
    }

    /// Resolve coordinates into the nearest named place.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Place> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json",
            self.base_url, lat, lon
        );

        let result: NominatimPlace = self.fetch(&url).await?;
        result.into_place()
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Geocoder request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Geocoder returned status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("Invalid geocoder response: {}", e)))
    }
}
