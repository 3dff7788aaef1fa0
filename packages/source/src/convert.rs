//! Conversion of census observation rows into settlement rows.
//!
//! Researchers collect data as one row per observation:
//! `country, city, lon, lat, year_established, year, population, notes,
//! source`. Successive observations of the same city are chained into
//! settlement spans: each observation runs until the year before the next
//! one and interpolates towards the next population.

use crate::SourceError;
use crate::parsing::{parse_line, parse_year};
use crate::tables::{SETTLEMENT_HEADER, write_table};

/// Year used to close the last span of a city.
pub const OPEN_END_YEAR: i32 = 2024;

/// Number of columns in an observation row.
const OBSERVATION_COLUMNS: usize = 9;

/// Words whose presence in the first cell marks a header row.
const HEADER_WORDS: [&str; 3] = ["country", "town", "name"];

/// Words in the notes that lower confidence to `medium`.
const HEDGE_WORDS: [&str; 4] = ["uncertain", "unknown", "estimated", "approx"];

/// One observation row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Observation {
    country: String,
    city: String,
    lon: String,
    lat: String,
    year_established: String,
    year: String,
    population: String,
    notes: String,
    source: String,
}

impl Observation {
    fn from_fields(fields: &[String]) -> Option<Self> {
        if fields.len() < OBSERVATION_COLUMNS {
            return None;
        }
        let f = |i: usize| fields[i].trim().to_string();
        Some(Self {
            country: f(0),
            city: f(1),
            lon: f(2),
            lat: f(3),
            year_established: f(4),
            year: f(5),
            population: f(6),
            notes: f(7),
            source: f(8),
        })
    }
}

/// Result of converting an observation table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    /// Settlement rows in table column order.
    pub rows: Vec<Vec<String>>,
    /// Number of input rows with too few columns.
    pub skipped: usize,
}

impl Conversion {
    /// Renders the converted rows as a settlement table.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the table cannot be written.
    pub fn to_table(&self) -> Result<String, SourceError> {
        write_table(&SETTLEMENT_HEADER, &self.rows)
    }
}

/// Treats `NA` and blanks as missing.
fn present(value: &str) -> Option<&str> {
    (!value.is_empty() && value != "NA").then_some(value)
}

fn looks_like_header(fields: &[String]) -> bool {
    fields.first().is_some_and(|first| {
        let first = first.to_lowercase();
        HEADER_WORDS.iter().any(|word| first.contains(word))
    })
}

fn confidence_for(notes: &str) -> &'static str {
    let notes = notes.to_lowercase();
    if HEDGE_WORDS.iter().any(|word| notes.contains(word)) {
        "medium"
    } else {
        "high"
    }
}

/// Converts an observation table into settlement rows.
#[must_use]
pub fn convert_observations(text: &str) -> Conversion {
    let mut lines: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect();
    if lines.first().is_some_and(|first| looks_like_header(first)) {
        lines.remove(0);
    }

    let mut skipped = 0;
    let observations: Vec<Observation> = lines
        .iter()
        .filter_map(|fields| {
            let observation = Observation::from_fields(fields);
            if observation.is_none() {
                skipped += 1;
            }
            observation
        })
        .collect();
    if skipped > 0 {
        log::warn!(
            "Skipped {skipped} observation row(s) with fewer than {OBSERVATION_COLUMNS} columns"
        );
    }

    let rows = observations
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let next = observations[i + 1..].iter().find(|o| o.city == obs.city);
            settlement_row(obs, next)
        })
        .collect();

    Conversion { rows, skipped }
}

fn settlement_row(obs: &Observation, next: Option<&Observation>) -> Vec<String> {
    let year_start = present(&obs.year).unwrap_or(&obs.year_established);

    let year_end = next
        .and_then(|n| present(&n.year))
        .and_then(parse_year)
        .map_or(OPEN_END_YEAR, |year| year - 1);
    let population_end = next
        .and_then(|n| present(&n.population))
        .unwrap_or_default();

    vec![
        obs.country.clone(),
        obs.city.clone(),
        obs.lon.clone(),
        obs.lat.clone(),
        obs.year_established.clone(),
        year_start.to_string(),
        year_end.to_string(),
        present(&obs.population).unwrap_or_default().to_string(),
        population_end.to_string(),
        confidence_for(&obs.notes).to_string(),
        "1".to_string(),
        "1".to_string(),
        obs.city.clone(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        obs.source.clone(),
        obs.notes.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::settlement;

    const INPUT: &str = "country,city,lon,lat,year_estab,year,population,notes,source\n\
                         Poland,Lodz,19.45,51.76,1780,1793,11,,census\n\
                         Poland,Lodz,19.45,51.76,1780,1857,2775,estimated,census\n\
                         Poland,Plock,19.7,52.5,1237,NA,500,approx.,survey\n\
                         Poland,Lodz,19.45,51.76,1780,1897,98677,,census\n\
                         broken,row\n";

    #[test]
    fn chains_observations_of_the_same_city() {
        let conversion = convert_observations(INPUT);
        assert_eq!(conversion.skipped, 1);
        assert_eq!(conversion.rows.len(), 4);

        let first = &conversion.rows[0];
        assert_eq!(first[settlement::YEAR_START], "1793");
        assert_eq!(first[settlement::YEAR_END], "1856");
        assert_eq!(first[settlement::POPULATION_START], "11");
        assert_eq!(first[settlement::POPULATION_END], "2775");
        assert_eq!(first[settlement::CONFIDENCE], "high");
        assert_eq!(first[settlement::NAME_ENGLISH], "Lodz");
        assert_eq!(first.len(), SETTLEMENT_HEADER.len());

        let second = &conversion.rows[1];
        assert_eq!(second[settlement::YEAR_END], "1896");
        assert_eq!(second[settlement::CONFIDENCE], "medium");

        let last = &conversion.rows[3];
        assert_eq!(last[settlement::YEAR_END], "2024");
        assert_eq!(last[settlement::POPULATION_END], "");
    }

    #[test]
    fn missing_year_falls_back_to_establishment() {
        let conversion = convert_observations(INPUT);
        let plock = &conversion.rows[2];
        assert_eq!(plock[settlement::YEAR_START], "1237");
        assert_eq!(plock[settlement::YEAR_END], "2024");
        assert_eq!(plock[settlement::CONFIDENCE], "medium");
    }

    #[test]
    fn converted_table_normalizes() {
        let table = convert_observations(INPUT).to_table().unwrap();
        let records = crate::normalize::normalize_settlements(&table);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].year_end, Some(1856));
        assert_eq!(records[3].population_end, records[3].population_start);
    }
}
