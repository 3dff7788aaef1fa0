#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The timeline control behind the map.
//!
//! [`ruler`] holds the fixed catalogue of landmark events drawn on the
//! timeline with their positions and Hebrew year numerals. [`playback`]
//! auto-advances the selected year on a timer that can be cancelled and
//! restarted at any point.

pub mod playback;
pub mod ruler;

pub use playback::{Playback, PlaybackSettings};
pub use ruler::{TimelineMarker, historical_events, marker_position, markers, nearest_event};
