#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Temporal query engine for the kehilot map.
//!
//! Given a year, reduces the loaded tables to the entities active in that
//! year, interpolates settlement populations across their spans, and maps
//! the results onto visual buckets (marker size, confidence colour,
//! compact population labels).

pub mod classify;
pub mod query;
pub mod temporal;

pub use query::{QueryEngine, QueryError, QueryResult, YearRange};
