//! The query boundary: one call per timeline position.
//!
//! [`QueryEngine::set_query_year`] is the single entry point the
//! presentation layer uses. It validates the year, then derives the
//! per-year view of every table from an immutable [`Snapshot`]. Results
//! borrow from the snapshot and nothing is cached between calls, so the
//! same year always yields the same result.

use kehilot_map_history_models::{AreaEvent, MigrationArrow, Projection};
use kehilot_map_source::config::YearBounds;
use kehilot_map_source::store::Snapshot;
use serde::Serialize;

use crate::temporal::active_in;

/// Errors returned at the query boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The requested year lies outside the timeline.
    #[error("Year {year} is outside the timeline ({min} to {max})")]
    YearOutOfRange {
        /// Requested year.
        year: i32,
        /// Earliest selectable year.
        min: i32,
        /// Latest selectable year.
        max: i32,
    },
}

/// Inclusive range of selectable years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

impl YearRange {
    /// Returns `true` if `year` can be selected.
    #[must_use]
    pub const fn contains(self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Number of years covered.
    #[must_use]
    pub const fn span(self) -> u32 {
        self.max.abs_diff(self.min)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::from(YearBounds::default())
    }
}

impl From<YearBounds> for YearRange {
    fn from(bounds: YearBounds) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
        }
    }
}

/// Everything visible at one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<'a> {
    /// The query year.
    pub year: i32,
    /// Active settlements with their interpolated populations, in start
    /// order.
    pub settlements: Vec<Projection<'a>>,
    /// Active migration arrows.
    pub arrows: Vec<&'a MigrationArrow>,
    /// Active area events: ellipses first, then polygons.
    pub events: Vec<&'a AreaEvent>,
}

impl QueryResult<'_> {
    /// Sum of the known interpolated populations.
    #[must_use]
    pub fn total_population(&self) -> u64 {
        self.settlements
            .iter()
            .filter_map(|p| p.interpolated_population)
            .fold(0, u64::saturating_add)
    }
}

/// Answers year queries over a loaded snapshot.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    snapshot: Snapshot,
    range: YearRange,
}

impl QueryEngine {
    /// Creates an engine over `snapshot` accepting years in `range`.
    #[must_use]
    pub const fn new(snapshot: Snapshot, range: YearRange) -> Self {
        Self { snapshot, range }
    }

    /// The selectable year range.
    #[must_use]
    pub const fn range(&self) -> YearRange {
        self.range
    }

    /// The tables this engine queries.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Computes the active entities for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::YearOutOfRange`] if `year` is not selectable.
    pub fn set_query_year(&self, year: i32) -> Result<QueryResult<'_>, QueryError> {
        if !self.range.contains(year) {
            return Err(QueryError::YearOutOfRange {
                year,
                min: self.range.min,
                max: self.range.max,
            });
        }

        let settlements: Vec<Projection<'_>> = active_in(year, &self.snapshot.settlements)
            .into_iter()
            .map(|(settlement, magnitude)| Projection {
                settlement,
                year,
                interpolated_population: magnitude,
            })
            .collect();

        let arrows: Vec<&MigrationArrow> = active_in(year, &self.snapshot.migrations)
            .into_iter()
            .map(|(arrow, _)| arrow)
            .collect();

        let events: Vec<&AreaEvent> = active_in(year, &self.snapshot.ellipse_events)
            .into_iter()
            .chain(active_in(year, &self.snapshot.polygon_events))
            .map(|(event, _)| event)
            .collect();

        let result = QueryResult {
            year,
            settlements,
            arrows,
            events,
        };

        log::debug!(
            "Year {year}: {} settlements (population {}), {} arrows, {} events",
            result.settlements.len(),
            result.total_population(),
            result.arrows.len(),
            result.events.len(),
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use kehilot_map_history_models::{
        Confidence, Ellipse, EventDetails, EventGeometry, LatLng, SettlementNames, SettlementRecord,
    };

    use super::*;

    fn settlement(id: usize, start: i32, end: Option<i32>, pops: (u64, u64)) -> SettlementRecord {
        SettlementRecord {
            id,
            country: "Germany".to_string(),
            names: SettlementNames {
                local: format!("Gemeinde {id}"),
                ..SettlementNames::default()
            },
            location: Some(LatLng::new(50.0, 8.0)),
            year_established: None,
            year_start: Some(start),
            year_end: end,
            population_start: Some(pops.0),
            population_end: Some(pops.1),
            confidence: Confidence::Medium,
            kind: None,
            symbol: None,
            source: String::new(),
            comment: String::new(),
        }
    }

    fn arrow(id: usize, start: i32, end: i32) -> MigrationArrow {
        MigrationArrow {
            id,
            start: Some(LatLng::new(40.4, -3.7)),
            end: Some(LatLng::new(41.0, 28.9)),
            control: None,
            year_start: Some(start),
            year_end: Some(end),
            title_en: format!("Arrow {id}"),
            title_he: String::new(),
            color: "blue".to_string(),
            description: String::new(),
            reference_url: None,
        }
    }

    fn event(id: usize, start: i32, end: i32, geometry: EventGeometry) -> AreaEvent {
        AreaEvent {
            id,
            details: EventDetails {
                year_start: Some(start),
                year_end: Some(end),
                description_en: format!("Event {id}"),
                description_he: String::new(),
                source: String::new(),
                category: None,
                stroke_color: String::new(),
                fill_color: String::new(),
                fill_opacity: None,
                reference_url: None,
            },
            geometry,
        }
    }

    fn engine() -> QueryEngine {
        let snapshot = Snapshot::from_entities(
            vec![
                settlement(0, 1800, Some(1900), (1_000, 3_000)),
                settlement(1, 1096, None, (500, 500)),
                settlement(2, 1933, Some(1945), (10_000, 100)),
            ],
            vec![arrow(0, 1492, 1492), arrow(1, 1881, 1914)],
            vec![event(
                0,
                70,
                70,
                EventGeometry::Ellipse(Ellipse {
                    center: LatLng::new(31.78, 35.23),
                    radius_major_m: 20_000.0,
                    radius_minor_m: 10_000.0,
                    tilt_deg: 0.0,
                }),
            )],
            vec![event(
                1,
                1290,
                1290,
                EventGeometry::Polygon {
                    ring: vec![
                        LatLng::new(50.0, -5.0),
                        LatLng::new(55.0, -1.0),
                        LatLng::new(51.0, 1.5),
                    ],
                },
            )],
        );
        QueryEngine::new(snapshot, YearRange::default())
    }

    #[test]
    fn projects_active_settlements() {
        let engine = engine();
        let result = engine.set_query_year(1850).unwrap();
        let ids: Vec<usize> = result.settlements.iter().map(|p| p.settlement.id).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(result.settlements[1].interpolated_population, Some(2_000));
        assert_eq!(result.settlements[0].interpolated_population, Some(500));
        assert!(result.settlements.iter().all(|p| p.year == 1850));
        assert_eq!(result.total_population(), 2_500);
    }

    #[test]
    fn total_population_saturates() {
        let snapshot = Snapshot::from_entities(
            vec![
                settlement(0, 1800, None, (u64::MAX, u64::MAX)),
                settlement(1, 1800, None, (1, 1)),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let engine = QueryEngine::new(snapshot, YearRange::default());
        let result = engine.set_query_year(1900).unwrap();
        assert_eq!(result.settlements.len(), 2);
        assert_eq!(result.total_population(), u64::MAX);
    }

    #[test]
    fn instantaneous_events_linger_one_year() {
        let engine = engine();
        let ids = |year| -> Vec<usize> {
            engine
                .set_query_year(year)
                .unwrap()
                .arrows
                .iter()
                .map(|a| a.id)
                .collect()
        };
        assert_eq!(ids(1492), vec![0]);
        assert_eq!(ids(1493), vec![0]);
        assert_eq!(ids(1494), Vec::<usize>::new());
        assert_eq!(ids(1914), vec![1]);
        assert_eq!(ids(1915), Vec::<usize>::new());
    }

    #[test]
    fn merges_ellipse_and_polygon_events() {
        let engine = engine();
        assert_eq!(engine.set_query_year(71).unwrap().events.len(), 1);
        let result = engine.set_query_year(1291).unwrap();
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].id, 1);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let engine = engine();
        let first = engine.set_query_year(1940).unwrap();
        let _ = engine.set_query_year(1200).unwrap();
        let again = engine.set_query_year(1940).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn rejects_years_off_the_timeline() {
        let engine = engine();
        let err = engine.set_query_year(2025).unwrap_err();
        assert_eq!(
            err,
            QueryError::YearOutOfRange {
                year: 2025,
                min: -3000,
                max: 2024,
            }
        );
        assert_eq!(
            err.to_string(),
            "Year 2025 is outside the timeline (-3000 to 2024)"
        );
        assert!(engine.set_query_year(-3000).is_ok());
        assert!(engine.set_query_year(-3001).is_err());
    }

    #[test]
    fn results_serialize_to_camel_case_json() {
        let engine = engine();
        let result = engine.set_query_year(1900).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["year"], 1900);
        assert_eq!(json["settlements"][1]["interpolatedPopulation"], 3_000);
        assert_eq!(json["arrows"][0]["titleEn"], "Arrow 1");
    }

    #[test]
    fn year_range_span() {
        assert_eq!(YearRange::default().span(), 5_024);
        assert!(YearRange { min: 0, max: 0 }.contains(0));
    }
}
