use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One roster entry as written in `hotels.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelConfig {
    pub name: String,
    /// Search query sent to the listing service. Defaults to `"<name> hotel reviews"`.
    pub query: Option<String>,
    pub region: Option<String>,
    pub notes: Option<String>,
}

impl HotelConfig {
    /// Generate a URL-safe slug from the hotel name.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

#[derive(Debug, Deserialize)]
pub struct HotelsFile {
    pub hotels: Vec<HotelConfig>,
}

impl HotelsFile {
    /// Convert the validated roster into retrieval targets, preserving order.
    #[must_use]
    pub fn targets(&self) -> Vec<HotelTarget> {
        self.hotels.iter().map(HotelTarget::from).collect()
    }
}

/// A hotel to retrieve, as handed to the retrieval pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelTarget {
    pub slug: String,
    pub name: String,
    pub query: String,
    pub region: Option<String>,
}

impl HotelTarget {
    /// Build a target with the default search query.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            slug: slugify(name),
            name: name.to_string(),
            query: default_query(name),
            region: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }
}

impl From<&HotelConfig> for HotelTarget {
    fn from(hotel: &HotelConfig) -> Self {
        let query = hotel
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map_or_else(|| default_query(&hotel.name), str::to_string);
        Self {
            slug: hotel.slug(),
            name: hotel.name.clone(),
            query,
            region: hotel.region.clone(),
        }
    }
}

fn default_query(name: &str) -> String {
    format!("{} hotel reviews", name.trim())
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load and validate the hotel roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_roster(path: &Path) -> Result<HotelsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RosterFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let hotels_file: HotelsFile = serde_yaml::from_str(&content)?;

    validate_roster(&hotels_file)?;

    Ok(hotels_file)
}

fn validate_roster(hotels_file: &HotelsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for hotel in &hotels_file.hotels {
        if hotel.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hotel name must be non-empty".to_string(),
            ));
        }

        let slug = hotel.slug();
        if slug.is_empty() {
            return Err(ConfigError::Validation(format!(
                "hotel '{}' produces an empty slug",
                hotel.name
            )));
        }

        if !seen_names.insert(hotel.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hotel name: '{}'",
                hotel.name
            )));
        }

        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate hotel slug: '{}' (from hotel '{}')",
                slug, hotel.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "hotels_test.rs"]
mod tests;
