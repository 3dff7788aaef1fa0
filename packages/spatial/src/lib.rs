#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial aggregation for the kehilot map.
//!
//! Groups settlement projections that would overlap on screen into
//! [`ClusterGroup`]s using an R-tree over Web-Mercator pixel positions, and
//! provides the geometric helpers renderers need for area events (polygon
//! centroids and ellipse outlines).

pub mod cluster;
pub mod geometry;

pub use cluster::{ClusterParams, cluster_projections, to_pixels};
pub use kehilot_map_history_models::ClusterGroup;
