#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Historical data tables for the kehilot map.
//!
//! The map is backed by four flat CSV tables (settlements, migration
//! arrows, ellipse events and polygon events). This crate tokenizes those
//! tables, normalizes rows into the typed entities from
//! [`kehilot_map_history_models`], and loads each table exactly once
//! through a [`store::DataStore`].

pub mod config;
pub mod convert;
pub mod fetch;
pub mod normalize;
pub mod parsing;
pub mod polygon;
pub mod reference;
pub mod sort;
pub mod store;
pub mod tables;
pub mod towns;

/// Errors that can occur while fetching or transforming data tables.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration values are inconsistent.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// Data normalization error.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}
