//! Active-set filtering and population interpolation.

use kehilot_map_history_models::{
    AreaEvent, MigrationArrow, SettlementRecord, SortedByStart, TemporalSpan,
};

/// Interpolates a settlement's population at `year`.
///
/// Records without an end year report `population_start` unconditionally.
/// A zero-length span reports `population_start` as well. Returns `None`
/// when the start population is unknown, or when `year` falls outside the
/// record's span; callers only interpolate active records, so debug builds
/// assert on the latter.
#[must_use]
pub fn interpolate(record: &SettlementRecord, year: i32) -> Option<u64> {
    let start_population = record.population_start?;
    let end_population = record.population_end.unwrap_or(start_population);

    let (Some(start), Some(end)) = (record.year_start, record.year_end) else {
        return Some(start_population);
    };

    if year < start || year > end {
        debug_assert!(
            false,
            "interpolating settlement {} at {year} outside {start}..={end}",
            record.id
        );
        return None;
    }
    if start == end {
        return Some(start_population);
    }

    let span = u128::from(end.abs_diff(start));
    let before = u128::from(end.abs_diff(year));
    let after = u128::from(year.abs_diff(start));
    let weighted = before * u128::from(start_population) + after * u128::from(end_population);

    u64::try_from(weighted / span).ok()
}

/// The value an active entity contributes to aggregates.
///
/// Settlements contribute their interpolated population; arrows and area
/// events only have presence.
pub trait Magnitude: TemporalSpan {
    /// Returns the magnitude at `year`.
    fn magnitude_at(&self, _year: i32) -> Option<u64> {
        None
    }
}

impl Magnitude for SettlementRecord {
    fn magnitude_at(&self, year: i32) -> Option<u64> {
        interpolate(self, year)
    }
}

impl Magnitude for MigrationArrow {}

impl Magnitude for AreaEvent {}

/// Filters `entities` to those active in `year` by scanning every entry.
///
/// Input order is preserved.
#[must_use]
pub fn active_at<T: Magnitude>(year: i32, entities: &[T]) -> Vec<(&T, Option<u64>)> {
    entities
        .iter()
        .filter(|entity| entity.is_active_at(year))
        .map(|entity| (entity, entity.magnitude_at(year)))
        .collect()
}

/// Filters a start-sorted table to the entities active in `year`.
///
/// Scanning stops at the first entity that starts after `year`, so later
/// entries are never inspected.
#[must_use]
pub fn active_in<T: Magnitude>(year: i32, entities: &SortedByStart<T>) -> Vec<(&T, Option<u64>)> {
    entities
        .started_by(year)
        .filter(|entity| entity.is_active_at(year))
        .map(|entity| (entity, entity.magnitude_at(year)))
        .collect()
}
