// SPDX-License-Identifier: MIT

//! Sport catalog loading.

use crate::models::Sport;
use std::fs;
use std::path::Path;

/// Loader for the sport reference data seeded into the store at startup.
#[derive(Debug, Default, Clone)]
pub struct SportCatalog {
    sports: Vec<Sport>,
}

impl SportCatalog {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let sports: Vec<Sport> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        tracing::info!(count = sports.len(), "Loaded sport catalog");
        Ok(Self { sports })
    }

    pub fn sports(&self) -> &[Sport] {
        &self.sports
    }

    pub fn into_sports(self) -> Vec<Sport> {
        self.sports
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse sport catalog: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_json() {
        let json = r#"[
            {
                "id": "sport-1",
                "name": "Running",
                "isTeamSport": false,
                "activityTypes": ["Easy Run"],
                "levels": ["Beginner"]
            }
        ]"#;
        let catalog = SportCatalog::load_from_json(json).unwrap();
        assert_eq!(catalog.sports().len(), 1);
        assert_eq!(catalog.sports()[0].name, "Running");
        assert!(!catalog.sports()[0].is_team_sport);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = SportCatalog::load_from_json("not json").unwrap_err();
        assert!(matches!(err, CatalogError::ParseError(_)));
    }
}
