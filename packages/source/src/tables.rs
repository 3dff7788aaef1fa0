//! Column layouts of the four data tables and a shared table writer.

use crate::SourceError;

/// Settlement table header.
pub const SETTLEMENT_HEADER: [&str; 19] = [
    "country",
    "city",
    "lon",
    "lat",
    "year_established",
    "year_start",
    "year_end",
    "population_start",
    "population_end",
    "confidence",
    "type",
    "symbol",
    "name_english",
    "name_hebrew",
    "name_yiddish",
    "name_german",
    "name_other",
    "source",
    "comment",
];

/// Column indexes of the settlement table.
pub mod settlement {
    pub const COUNTRY: usize = 0;
    pub const CITY: usize = 1;
    pub const LON: usize = 2;
    pub const LAT: usize = 3;
    pub const YEAR_ESTABLISHED: usize = 4;
    pub const YEAR_START: usize = 5;
    pub const YEAR_END: usize = 6;
    pub const POPULATION_START: usize = 7;
    pub const POPULATION_END: usize = 8;
    pub const CONFIDENCE: usize = 9;
    pub const TYPE: usize = 10;
    pub const SYMBOL: usize = 11;
    pub const NAME_ENGLISH: usize = 12;
    pub const NAME_HEBREW: usize = 13;
    pub const NAME_YIDDISH: usize = 14;
    pub const NAME_GERMAN: usize = 15;
    pub const NAME_OTHER: usize = 16;
    pub const SOURCE: usize = 17;
    pub const COMMENT: usize = 18;
}

/// Column indexes of the ellipse event table.
pub mod ellipse {
    pub const CENTER_LON: usize = 0;
    pub const CENTER_LAT: usize = 1;
    pub const RADIUS_MAJOR: usize = 2;
    pub const RADIUS_MINOR: usize = 3;
    pub const TILT: usize = 4;
    pub const STROKE_COLOR: usize = 5;
    pub const FILL_COLOR: usize = 6;
    pub const FILL_OPACITY: usize = 7;
    pub const YEAR_START: usize = 8;
    pub const YEAR_END: usize = 9;
    pub const DESCRIPTION_EN: usize = 10;
    pub const DESCRIPTION_HE: usize = 11;
    pub const SOURCE: usize = 12;
    pub const TYPE: usize = 13;
}

/// Column indexes of the polygon event table.
pub mod polygon {
    pub const COORDINATES: usize = 0;
    pub const STROKE_COLOR: usize = 1;
    pub const FILL_COLOR: usize = 2;
    pub const FILL_OPACITY: usize = 3;
    pub const YEAR_START: usize = 4;
    pub const YEAR_END: usize = 5;
    pub const DESCRIPTION_EN: usize = 6;
    pub const DESCRIPTION_HE: usize = 7;
    pub const SOURCE: usize = 8;
    pub const TYPE: usize = 9;
}

/// Column indexes of the migration arrow table.
pub mod migration {
    pub const START_LON: usize = 0;
    pub const START_LAT: usize = 1;
    pub const END_LON: usize = 2;
    pub const END_LAT: usize = 3;
    pub const MID_LON: usize = 4;
    pub const MID_LAT: usize = 5;
    pub const COLOR: usize = 6;
    pub const YEAR_START: usize = 7;
    pub const YEAR_END: usize = 8;
    pub const TITLE_EN: usize = 9;
    pub const TITLE_HE: usize = 10;
    pub const DESCRIPTION: usize = 11;
    pub const SOURCE: usize = 12;
}

/// The tables that carry a `year_start` column and can be re-sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTable {
    /// Ellipse event table.
    Ellipse,
    /// Polygon event table.
    Polygon,
    /// Migration arrow table.
    Migration,
}

impl EventTable {
    /// Index of the `year_start` column.
    #[must_use]
    pub const fn year_start_column(self) -> usize {
        match self {
            Self::Ellipse => ellipse::YEAR_START,
            Self::Polygon => polygon::YEAR_START,
            Self::Migration => migration::YEAR_START,
        }
    }
}

/// Writes a header and rows as CSV text with `\n` line endings.
///
/// # Errors
///
/// Returns [`SourceError`] if a record cannot be written.
pub fn write_table<H, R>(header: &[H], rows: &[R]) -> Result<String, SourceError>
where
    H: AsRef<[u8]>,
    R: AsRef<[String]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row.as_ref())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SourceError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| SourceError::Normalization {
        message: format!("table is not valid UTF-8: {e}"),
    })
}
