//! Landmark events on the timeline ruler.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use kehilot_map_calendar::{dual_year_label, to_hebrew_year, to_letter_numeral};
use kehilot_map_history_models::HistoricalEvent;
use serde::Serialize;

fn landmark(
    year: i32,
    title_en: &str,
    title_he: &str,
    title_fr: &str,
    page: &str,
) -> HistoricalEvent {
    HistoricalEvent {
        year,
        title_en: title_en.to_string(),
        title_he: title_he.to_string(),
        title_fr: title_fr.to_string(),
        reference_url: Some(format!("https://en.wikipedia.org/wiki/{page}")),
    }
}

static HISTORICAL_EVENTS: LazyLock<Vec<HistoricalEvent>> = LazyLock::new(|| {
    let mut events = vec![
        landmark(-1313, "Exodus", "יציאת מצרים", "Exode", "The_Exodus"),
        landmark(
            -1813,
            "Abraham Born",
            "לידת אברהם אבינו",
            "Naissance d'Abraham",
            "Abraham",
        ),
        landmark(
            70,
            "Temple Destruction",
            "חורבן בית המקדש",
            "Destruction du Temple",
            "Siege_of_Jerusalem_(70_CE)",
        ),
        landmark(
            1492,
            "Exile from Spain",
            "גירוש ספרד",
            "Expulsion d'Espagne",
            "Alhambra_Decree",
        ),
        landmark(1939, "The Holocaust", "השואה", "La Shoah", "The_Holocaust"),
        landmark(
            1948,
            "Israel Independence",
            "הקמת מדינת ישראל",
            "Indépendance d'Israël",
            "Israeli_Declaration_of_Independence",
        ),
    ];
    events.sort_by_key(|event| event.year);
    events
});

/// The built-in landmark events, ascending by year.
#[must_use]
pub fn historical_events() -> &'static [HistoricalEvent] {
    &HISTORICAL_EVENTS
}

/// Horizontal position of `year` on a ruler spanning `range`, in percent.
///
/// Years outside the range are clamped to the ends. A single-year range
/// puts everything at the start.
#[must_use]
pub fn marker_position(year: i32, range: &RangeInclusive<i32>) -> f64 {
    let (min, max) = (*range.start(), *range.end());
    if max <= min {
        return 0.0;
    }
    let offset = f64::from(year.clamp(min, max)) - f64::from(min);
    offset / (f64::from(max) - f64::from(min)) * 100.0
}

/// The event closest to `year`. Ties go to the earlier event.
#[must_use]
pub fn nearest_event(events: &[HistoricalEvent], year: i32) -> Option<&HistoricalEvent> {
    events
        .iter()
        .min_by_key(|event| (event.year.abs_diff(year), event.year))
}

/// A landmark event prepared for display on the ruler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMarker {
    /// The event.
    pub event: HistoricalEvent,
    /// Position on the ruler in percent.
    pub position: f64,
    /// Hebrew year in letter numerals, when representable.
    pub hebrew_year: Option<String>,
    /// Combined Gregorian and Hebrew year label.
    pub label: String,
}

/// Lays out `events` on a ruler spanning `range`.
#[must_use]
pub fn markers(events: &[HistoricalEvent], range: &RangeInclusive<i32>) -> Vec<TimelineMarker> {
    events
        .iter()
        .map(|event| TimelineMarker {
            position: marker_position(event.year, range),
            hebrew_year: to_letter_numeral(to_hebrew_year(event.year)).ok(),
            label: dual_year_label(event.year),
            event: event.clone(),
        })
        .collect()
}
