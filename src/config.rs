// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// JWT verification key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Search radius applied when a user has no per-user override, in km
    pub default_view_radius_km: f64,
    /// Base URL of the Nominatim-format geocoding provider
    pub geocoder_base_url: String,
    /// Bounded wait for geocoding lookups, in seconds
    pub geocoder_timeout_secs: u64,
    /// Path to the sport catalog data file
    pub sports_catalog_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            default_view_radius_km: env::var("DEFAULT_VIEW_RADIUS_KM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5.0),
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            geocoder_timeout_secs: env::var("GEOCODER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            sports_catalog_path: env::var("SPORTS_CATALOG_PATH")
                .unwrap_or_else(|_| "data/sports.json".to_string()),
        })
    }

    /// Default config for tests.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            default_view_radius_km: 5.0,
            geocoder_base_url: "http://127.0.0.1:1".to_string(),
            geocoder_timeout_secs: 1,
            sports_catalog_path: "data/sports.json".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
