//! Map configuration loaded from TOML.
//!
//! A default configuration is baked into the binary at compile time via
//! [`include_str!`]. A user file replaces it wholesale; sections other than
//! `[data]` fall back to their defaults when omitted.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::fetch::{FileFetcher, HttpFetcher, TextFetcher};

/// Default configuration embedded at compile time.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Where the four data tables live.
    pub data: DataSources,
    /// Valid query year range.
    #[serde(default)]
    pub years: YearBounds,
    /// Marker size scale.
    #[serde(default)]
    pub size: SizeConfig,
    /// Default clustering parameters.
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Timeline auto-advance settings.
    #[serde(default)]
    pub playback: PlaybackConfig,
}

/// How table locations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    /// Relative to a local directory.
    Directory,
    /// Relative to a base URL.
    Http,
}

/// Locations of the four data tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    /// Transport used to fetch the tables.
    pub origin: DataOrigin,
    /// Directory or base URL the locations are relative to.
    pub base: String,
    /// Settlement table.
    pub settlements: String,
    /// Migration arrow table.
    pub migrations: String,
    /// Ellipse event table.
    pub ellipse_events: String,
    /// Polygon event table.
    pub polygon_events: String,
}

impl DataSources {
    /// Builds the fetcher for this origin. `base_override` replaces the
    /// configured base (used for the `KEHILOT_MAP_DATA_DIR` variable).
    #[must_use]
    pub fn fetcher(&self, base_override: Option<&str>) -> Arc<dyn TextFetcher> {
        let base = base_override.unwrap_or(&self.base);
        match self.origin {
            DataOrigin::Directory => Arc::new(FileFetcher::new(base)),
            DataOrigin::Http => Arc::new(HttpFetcher::new(base)),
        }
    }
}

/// Inclusive range of selectable years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: -3000,
            max: 2024,
        }
    }
}

/// Constants of the logarithmic marker size scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeConfig {
    /// Smallest radius in pixels.
    pub base_size: f64,
    /// Multiplier applied to `ln(population)`.
    pub k: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            base_size: 8.0,
            k: 2.388_62,
        }
    }
}

/// Default clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Merge radius in screen pixels.
    pub radius_px: u32,
    /// Map zoom level the radius applies at.
    pub zoom: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_px: 40,
            zoom: 4.0,
        }
    }
}

/// Timeline auto-advance settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Years advanced per tick.
    pub step_years: i32,
    /// Milliseconds between ticks.
    pub interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_years: 1,
            interval_ms: 100,
        }
    }
}

impl MapConfig {
    /// Returns the built-in configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded default is malformed (a compile-time
    /// guarantee since the file is embedded and covered by tests).
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse built-in config: {e}"))
    }

    /// Parses and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the TOML is malformed or the values are
    /// inconsistent.
    pub fn from_toml(text: &str) -> Result<Self, SourceError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`, or the built-in one when no
    /// path is given.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, SourceError> {
        match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)
            }
            None => Ok(Self::builtin()),
        }
    }

    fn validate(&self) -> Result<(), SourceError> {
        if self.years.min > self.years.max {
            return Err(SourceError::InvalidConfig {
                message: format!(
                    "years.min ({}) is after years.max ({})",
                    self.years.min, self.years.max
                ),
            });
        }
        if self.size.base_size <= 0.0 || self.size.k <= 0.0 {
            return Err(SourceError::InvalidConfig {
                message: "size.base_size and size.k must be positive".to_string(),
            });
        }
        if self.playback.step_years == 0 || self.playback.interval_ms == 0 {
            return Err(SourceError::InvalidConfig {
                message: "playback.step_years and playback.interval_ms must be non-zero"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = MapConfig::builtin();
        assert_eq!(config.data.origin, DataOrigin::Directory);
        assert_eq!(config.data.settlements, "kehilot.csv");
        assert_eq!(config.years, YearBounds::default());
        assert_eq!(config.size, SizeConfig::default());
    }

    #[test]
    fn omitted_sections_use_defaults() {
        let config = MapConfig::from_toml(
            r#"
            [data]
            origin = "http"
            base = "https://example.org/data"
            settlements = "s.csv"
            migrations = "m.csv"
            ellipse_events = "e.csv"
            polygon_events = "p.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.origin, DataOrigin::Http);
        assert_eq!(config.cluster, ClusterConfig::default());
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn rejects_inverted_year_range() {
        let text = DEFAULT_CONFIG.replace("min = -3000", "min = 3000");
        assert!(matches!(
            MapConfig::from_toml(&text),
            Err(SourceError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_missing_data_section() {
        assert!(matches!(
            MapConfig::from_toml("[years]\nmin = 0\nmax = 1\n"),
            Err(SourceError::Config(_))
        ));
    }
}
