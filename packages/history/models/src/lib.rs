#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Historical entity types and temporal validity rules.
//!
//! Every entity the map can show (settlements, migration arrows, area
//! events) lives here together with the [`TemporalSpan`] trait that decides
//! whether an entity is visible in a given year. The per-year derived views
//! ([`Projection`], [`ClusterGroup`]) are defined here as well so that the
//! engine and the spatial layer share a single vocabulary.

mod sorted;

use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use sorted::SortedByStart;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a position from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ── Temporal validity ────────────────────────────────────────────────────

/// How an entity's lifetime is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Validity {
    /// Active from `start` onwards with no upper bound.
    Open {
        /// First active year.
        start: i32,
    },
    /// Active over the inclusive range `[start, end]`.
    Range {
        /// First active year.
        start: i32,
        /// Last active year.
        end: i32,
    },
    /// Inclusive range, plus one extra year after `end` when the event is
    /// instantaneous (`start == end`).
    Event {
        /// First active year.
        start: i32,
        /// Last active year.
        end: i32,
    },
    /// The start year is missing or unparsable; never active.
    Unknown,
}

impl Validity {
    /// Returns `true` if the span covers `year`.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        match self {
            Self::Open { start } => start <= year,
            Self::Range { start, end } => start <= year && year <= end,
            Self::Event { start, end } => {
                (start <= year && year <= end)
                    || (start == end && matches!(end.checked_add(1), Some(next) if next == year))
            }
            Self::Unknown => false,
        }
    }

    /// Returns the first active year, if known.
    #[must_use]
    pub const fn start(self) -> Option<i32> {
        match self {
            Self::Open { start } | Self::Range { start, .. } | Self::Event { start, .. } => {
                Some(start)
            }
            Self::Unknown => None,
        }
    }
}

/// Common temporal behaviour shared by every entity kind.
pub trait TemporalSpan {
    /// Returns the entity's validity interval.
    fn validity(&self) -> Validity;

    /// Returns the first active year, used for ordering.
    fn year_start(&self) -> Option<i32> {
        self.validity().start()
    }

    /// Returns `true` if the entity is visible in `year`.
    fn is_active_at(&self, year: i32) -> bool {
        self.validity().contains(year)
    }
}

/// Builds a grace-period validity from optional bounds. Both bounds are
/// required for range-bounded entities.
const fn event_validity(start: Option<i32>, end: Option<i32>) -> Validity {
    match (start, end) {
        (Some(start), Some(end)) => Validity::Event { start, end },
        _ => Validity::Unknown,
    }
}

// ── Categorical codes ────────────────────────────────────────────────────

/// Confidence bucket for a settlement record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Confidence {
    /// Well-sourced figures.
    High,
    /// Estimates with reasonable backing.
    Medium,
    /// Weakly supported figures.
    Low,
    /// Missing or unrecognised confidence.
    #[default]
    Unknown,
}

impl Confidence {
    /// Maps a raw confidence string to a bucket. Unrecognised values fall
    /// back to [`Confidence::Unknown`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        Self::from_str(code.trim()).unwrap_or_default()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low, Self::Unknown]
    }
}

/// Fixed lexicon of area-event categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum EventCategory {
    /// Forced exile of a population
    Exile,
    /// Riot against a community
    Riot,
    /// Formal expulsion decree
    Expulsion,
    /// Voluntary or mass migration
    Migration,
    /// Religious or legal persecution
    Persecution,
    /// Founding or fall of a state
    StateEvent,
    /// Establishment of a ghetto
    Ghetto,
    /// Revolution or uprising
    Revolution,
    /// Pogrom
    Pogrom,
    /// Kingdom or sovereign rule
    Kingdom,
    /// Intellectual and religious history
    IntellectualHistory,
}

impl EventCategory {
    /// Returns all variants in code order (code 1 is [`EventCategory::Exile`]).
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Exile,
            Self::Riot,
            Self::Expulsion,
            Self::Migration,
            Self::Persecution,
            Self::StateEvent,
            Self::Ghetto,
            Self::Revolution,
            Self::Pogrom,
            Self::Kingdom,
            Self::IntellectualHistory,
        ]
    }

    /// Resolves a raw `type` column value: either a 1-based numeric code or
    /// the kebab-case category name.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if let Ok(n) = code.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::all().get(i)).copied();
        }
        Self::from_str(code).ok()
    }

    /// Human-readable English label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exile => "Exile",
            Self::Riot => "Riot",
            Self::Expulsion => "Expulsion",
            Self::Migration => "Migration",
            Self::Persecution => "Persecution",
            Self::StateEvent => "State event",
            Self::Ghetto => "Ghetto",
            Self::Revolution => "Revolution",
            Self::Pogrom => "Pogrom",
            Self::Kingdom => "Kingdom",
            Self::IntellectualHistory => "Intellectual history",
        }
    }
}

/// Display language for localized titles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Language {
    /// English
    #[default]
    En,
    /// Hebrew
    He,
    /// French
    Fr,
}

impl Language {
    /// Returns `true` for right-to-left scripts.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::He)
    }
}

// ── Settlements ──────────────────────────────────────────────────────────

/// The names a community was known by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementNames {
    /// Local name as recorded in the `city` column.
    pub local: String,
    /// Hebrew name.
    pub hebrew: Option<String>,
    /// English name.
    pub english: Option<String>,
    /// Yiddish name.
    pub yiddish: Option<String>,
    /// German name.
    pub german: Option<String>,
    /// Any other historical name.
    pub other: Option<String>,
}

impl SettlementNames {
    /// Picks the best name for `language`, falling back to the local name.
    #[must_use]
    pub fn display(&self, language: Language) -> &str {
        let preferred = match language {
            Language::He => self.hebrew.as_deref(),
            Language::En => self.english.as_deref(),
            Language::Fr => None,
        };
        preferred.unwrap_or(&self.local)
    }
}

/// A community's demographic record over a span of years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementRecord {
    /// Row index in load order.
    pub id: usize,
    /// Country name.
    pub country: String,
    /// Community names.
    pub names: SettlementNames,
    /// Position, absent when the coordinates did not parse.
    pub location: Option<LatLng>,
    /// Year the community was founded.
    pub year_established: Option<i32>,
    /// First year this record covers.
    pub year_start: Option<i32>,
    /// Last year this record covers; `None` means ongoing.
    pub year_end: Option<i32>,
    /// Population at `year_start`.
    pub population_start: Option<u64>,
    /// Population at `year_end` (defaults to `population_start`).
    pub population_end: Option<u64>,
    /// Confidence bucket.
    pub confidence: Confidence,
    /// Raw `type` code.
    pub kind: Option<String>,
    /// Raw `symbol` code.
    pub symbol: Option<String>,
    /// Source citation or URL.
    pub source: String,
    /// Free-text comment.
    pub comment: String,
}

impl TemporalSpan for SettlementRecord {
    fn validity(&self) -> Validity {
        match (self.year_start, self.year_end) {
            (Some(start), Some(end)) => Validity::Range { start, end },
            (Some(start), None) => Validity::Open { start },
            (None, _) => Validity::Unknown,
        }
    }
}

/// Per-year view of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection<'a> {
    /// The underlying record.
    pub settlement: &'a SettlementRecord,
    /// The query year this view was derived for.
    pub year: i32,
    /// Population interpolated at `year`.
    pub interpolated_population: Option<u64>,
}

/// A proximity-based group of settlement projections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroup {
    /// Settlement ids of the members, ascending.
    pub member_ids: Vec<usize>,
    /// Number of members.
    pub count: usize,
    /// Sum of the members' interpolated populations.
    pub population: u64,
    /// Mean position of the members.
    pub center: LatLng,
}

// ── Migrations ───────────────────────────────────────────────────────────

/// A directed historical movement drawn as a curved arrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationArrow {
    /// Row index in load order.
    pub id: usize,
    /// Origin.
    pub start: Option<LatLng>,
    /// Destination.
    pub end: Option<LatLng>,
    /// Bezier control point.
    pub control: Option<LatLng>,
    /// First active year.
    pub year_start: Option<i32>,
    /// Last active year.
    pub year_end: Option<i32>,
    /// English title.
    pub title_en: String,
    /// Hebrew title.
    pub title_he: String,
    /// Colour category.
    pub color: String,
    /// Description.
    pub description: String,
    /// Reference URL, explicit or derived from the English title.
    pub reference_url: Option<String>,
}

impl TemporalSpan for MigrationArrow {
    fn validity(&self) -> Validity {
        event_validity(self.year_start, self.year_end)
    }
}

// ── Area events ──────────────────────────────────────────────────────────

/// Fields shared by every area event regardless of shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    /// First active year.
    pub year_start: Option<i32>,
    /// Last active year.
    pub year_end: Option<i32>,
    /// English description.
    pub description_en: String,
    /// Hebrew description.
    pub description_he: String,
    /// Source citation.
    pub source: String,
    /// Category, `None` when the code is not part of the lexicon.
    pub category: Option<EventCategory>,
    /// Outline colour.
    pub stroke_color: String,
    /// Fill colour.
    pub fill_color: String,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: Option<f64>,
    /// Reference URL derived from the English description.
    pub reference_url: Option<String>,
}

/// An ellipse around a centre point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    /// Centre.
    pub center: LatLng,
    /// Semi-major radius in metres.
    pub radius_major_m: f64,
    /// Semi-minor radius in metres.
    pub radius_minor_m: f64,
    /// Clockwise tilt from north, in degrees.
    pub tilt_deg: f64,
}

/// The geometric form of an area event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum EventGeometry {
    /// Ellipse form.
    Ellipse(Ellipse),
    /// Implicitly closed ring of positions. Fewer than three points means
    /// there is nothing to draw.
    Polygon {
        /// Ring vertices.
        ring: Vec<LatLng>,
    },
}

impl EventGeometry {
    /// Returns `true` if a renderer can draw this geometry.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        match self {
            Self::Ellipse(_) => true,
            Self::Polygon { ring } => ring.len() >= 3,
        }
    }
}

/// A historical event that covers a geographic area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaEvent {
    /// Row index in load order within its table.
    pub id: usize,
    /// Shape-independent fields.
    pub details: EventDetails,
    /// Shape.
    pub geometry: EventGeometry,
}

impl TemporalSpan for AreaEvent {
    fn validity(&self) -> Validity {
        event_validity(self.details.year_start, self.details.year_end)
    }
}

// ── Timeline markers ─────────────────────────────────────────────────────

/// A point-in-time marker on the timeline ruler. Never filtered by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalEvent {
    /// Gregorian year (negative for BCE).
    pub year: i32,
    /// English title.
    pub title_en: String,
    /// Hebrew title.
    pub title_he: String,
    /// French title.
    pub title_fr: String,
    /// Optional reference URL.
    pub reference_url: Option<String>,
}

impl HistoricalEvent {
    /// Returns the title in `language`.
    #[must_use]
    pub fn title(&self, language: Language) -> &str {
        match language {
            Language::En => &self.title_en,
            Language::He => &self.title_he,
            Language::Fr => &self.title_fr,
        }
    }
}
