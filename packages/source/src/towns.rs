//! Finds towns backed by a single settlement row.
//!
//! A town with one row is drawn with a flat population for its whole span,
//! which usually means more census data is needed. This report lists them
//! for curators.

use std::collections::HashMap;

use serde::Serialize;

use crate::parsing::{parse_count, parse_table};
use crate::tables::settlement;

/// A town that appears in exactly one settlement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleRowTown {
    /// Country column.
    pub country: String,
    /// City column.
    pub city: String,
    /// Starting population of the only row.
    pub population_start: Option<u64>,
}

/// Lists towns with exactly one row in a settlement table, in order of
/// first appearance. Rows with fewer than two columns are ignored.
#[must_use]
pub fn single_row_towns(text: &str) -> Vec<SingleRowTown> {
    let rows = parse_table(text);

    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut order = Vec::new();
    for row in &rows {
        let [country, city, ..] = row.as_slice() else {
            continue;
        };
        let key = (country.trim(), city.trim());
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push((key, row));
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|(key, _)| counts.get(key) == Some(&1))
        .map(|((country, city), row)| SingleRowTown {
            country: country.to_string(),
            city: city.to_string(),
            population_start: row
                .get(settlement::POPULATION_START)
                .and_then(|p| parse_count(p)),
        })
        .collect()
}
