//! Normalizes tokenized table rows into typed entities.
//!
//! Numeric fields that are empty or unparsable become `None` rather than
//! aborting the row; the entity is still built from whatever parsed.

use kehilot_map_history_models::{
    AreaEvent, Confidence, Ellipse, EventCategory, EventDetails, EventGeometry, LatLng,
    MigrationArrow, SettlementNames, SettlementRecord,
};

use crate::parsing::{FieldRow, parse_table, strip_quotes};
use crate::polygon::parse_polygon_coordinates;
use crate::reference::reference_url;
use crate::tables::{ellipse, migration, polygon, settlement};

/// Builds a position from a longitude and latitude column pair.
fn position(row: &FieldRow<'_>, lon: usize, lat: usize) -> Option<LatLng> {
    Some(LatLng::new(row.number(lat)?, row.number(lon)?))
}

/// Normalizes one settlement row.
#[must_use]
pub fn settlement_from_fields(id: usize, fields: &[String]) -> SettlementRecord {
    let row = FieldRow::new(fields);

    let year_start = row.year(settlement::YEAR_START);
    let year_end = row.year(settlement::YEAR_END);
    if let (Some(start), Some(end)) = (year_start, year_end)
        && start > end
    {
        log::warn!(
            "Settlement row {id} ({}) ends before it starts: {start} > {end}",
            row.text(settlement::CITY)
        );
    }

    let population_start = row.count(settlement::POPULATION_START);
    let population_end = row.count(settlement::POPULATION_END).or(population_start);

    SettlementRecord {
        id,
        country: row.text(settlement::COUNTRY).to_string(),
        names: SettlementNames {
            local: row.text(settlement::CITY).to_string(),
            hebrew: row.optional_text(settlement::NAME_HEBREW),
            english: row.optional_text(settlement::NAME_ENGLISH),
            yiddish: row.optional_text(settlement::NAME_YIDDISH),
            german: row.optional_text(settlement::NAME_GERMAN),
            other: row.optional_text(settlement::NAME_OTHER),
        },
        location: position(&row, settlement::LON, settlement::LAT),
        year_established: row.year(settlement::YEAR_ESTABLISHED),
        year_start,
        year_end,
        population_start,
        population_end,
        confidence: Confidence::from_code(row.text(settlement::CONFIDENCE)),
        kind: row.optional_text(settlement::TYPE),
        symbol: row.optional_text(settlement::SYMBOL),
        source: strip_quotes(row.text(settlement::SOURCE)),
        comment: row.text(settlement::COMMENT).to_string(),
    }
}

/// Normalizes one migration arrow row.
#[must_use]
pub fn migration_from_fields(id: usize, fields: &[String]) -> MigrationArrow {
    let row = FieldRow::new(fields);
    let title_en = row.text(migration::TITLE_EN).to_string();

    MigrationArrow {
        id,
        start: position(&row, migration::START_LON, migration::START_LAT),
        end: position(&row, migration::END_LON, migration::END_LAT),
        control: position(&row, migration::MID_LON, migration::MID_LAT),
        year_start: row.year(migration::YEAR_START),
        year_end: row.year(migration::YEAR_END),
        reference_url: reference_url(row.text(migration::SOURCE), &title_en),
        title_en,
        title_he: row.text(migration::TITLE_HE).to_string(),
        color: row.text(migration::COLOR).to_string(),
        description: strip_quotes(row.text(migration::DESCRIPTION)),
    }
}

/// Column positions of the fields every area event table shares.
struct DetailColumns {
    stroke_color: usize,
    fill_color: usize,
    fill_opacity: usize,
    year_start: usize,
    year_end: usize,
    description_en: usize,
    description_he: usize,
    source: usize,
    kind: usize,
}

const ELLIPSE_DETAILS: DetailColumns = DetailColumns {
    stroke_color: ellipse::STROKE_COLOR,
    fill_color: ellipse::FILL_COLOR,
    fill_opacity: ellipse::FILL_OPACITY,
    year_start: ellipse::YEAR_START,
    year_end: ellipse::YEAR_END,
    description_en: ellipse::DESCRIPTION_EN,
    description_he: ellipse::DESCRIPTION_HE,
    source: ellipse::SOURCE,
    kind: ellipse::TYPE,
};

const POLYGON_DETAILS: DetailColumns = DetailColumns {
    stroke_color: polygon::STROKE_COLOR,
    fill_color: polygon::FILL_COLOR,
    fill_opacity: polygon::FILL_OPACITY,
    year_start: polygon::YEAR_START,
    year_end: polygon::YEAR_END,
    description_en: polygon::DESCRIPTION_EN,
    description_he: polygon::DESCRIPTION_HE,
    source: polygon::SOURCE,
    kind: polygon::TYPE,
};

fn event_details(row: &FieldRow<'_>, columns: &DetailColumns) -> EventDetails {
    let description_en = strip_quotes(row.text(columns.description_en));
    let source = strip_quotes(row.text(columns.source));
    let kind = row.text(columns.kind);
    let category = EventCategory::from_code(kind);
    if category.is_none() && !kind.is_empty() {
        log::debug!("Unrecognised event type code {kind:?}");
    }

    EventDetails {
        year_start: row.year(columns.year_start),
        year_end: row.year(columns.year_end),
        reference_url: reference_url(&source, &description_en),
        description_en,
        description_he: strip_quotes(row.text(columns.description_he)),
        source,
        category,
        stroke_color: row.text(columns.stroke_color).to_string(),
        fill_color: row.text(columns.fill_color).to_string(),
        fill_opacity: row.number(columns.fill_opacity),
    }
}

/// Normalizes one ellipse event row. Returns `None` when the centre is
/// missing, since there is nothing to place.
#[must_use]
pub fn ellipse_event_from_fields(id: usize, fields: &[String]) -> Option<AreaEvent> {
    let row = FieldRow::new(fields);
    let Some(center) = position(&row, ellipse::CENTER_LON, ellipse::CENTER_LAT) else {
        log::warn!("Ellipse event row {id} has no usable centre, skipping");
        return None;
    };

    Some(AreaEvent {
        id,
        details: event_details(&row, &ELLIPSE_DETAILS),
        geometry: EventGeometry::Ellipse(Ellipse {
            center,
            radius_major_m: row.number(ellipse::RADIUS_MAJOR).unwrap_or(0.0),
            radius_minor_m: row.number(ellipse::RADIUS_MINOR).unwrap_or(0.0),
            tilt_deg: row.number(ellipse::TILT).unwrap_or(0.0),
        }),
    })
}

/// Normalizes one polygon event row. A malformed coordinate string leaves
/// the ring empty; the event is kept and renderers skip it.
#[must_use]
pub fn polygon_event_from_fields(id: usize, fields: &[String]) -> AreaEvent {
    let row = FieldRow::new(fields);
    let ring = parse_polygon_coordinates(row.text(polygon::COORDINATES));
    if ring.len() < 3 {
        log::warn!(
            "Polygon event row {id} has {} point(s); it will not be drawn",
            ring.len()
        );
    }

    AreaEvent {
        id,
        details: event_details(&row, &POLYGON_DETAILS),
        geometry: EventGeometry::Polygon { ring },
    }
}

/// Parses and normalizes a whole settlement table.
#[must_use]
pub fn normalize_settlements(text: &str) -> Vec<SettlementRecord> {
    parse_table(text)
        .iter()
        .enumerate()
        .map(|(id, fields)| settlement_from_fields(id, fields))
        .collect()
}

/// Parses and normalizes a whole migration arrow table.
#[must_use]
pub fn normalize_migrations(text: &str) -> Vec<MigrationArrow> {
    parse_table(text)
        .iter()
        .enumerate()
        .map(|(id, fields)| migration_from_fields(id, fields))
        .collect()
}

/// Parses and normalizes a whole ellipse event table.
#[must_use]
pub fn normalize_ellipse_events(text: &str) -> Vec<AreaEvent> {
    parse_table(text)
        .iter()
        .enumerate()
        .filter_map(|(id, fields)| ellipse_event_from_fields(id, fields))
        .collect()
}

/// Parses and normalizes a whole polygon event table.
#[must_use]
pub fn normalize_polygon_events(text: &str) -> Vec<AreaEvent> {
    parse_table(text)
        .iter()
        .enumerate()
        .map(|(id, fields)| polygon_event_from_fields(id, fields))
        .collect()
}
