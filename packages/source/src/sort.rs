//! Re-sorting event tables by start year.
//!
//! The loader sorts tables in memory regardless, but keeping the files
//! themselves in order makes them easier to review and diff.

use crate::SourceError;
use crate::parsing::{parse_line, parse_year};
use crate::tables::{EventTable, write_table};

/// Rewrites an event table sorted ascending by `year_start`.
///
/// The header row is kept first. Rows whose start year does not parse go
/// last; rows with equal years keep their relative order.
///
/// # Errors
///
/// Returns [`SourceError`] if the sorted table cannot be written.
pub fn sort_events_by_year(text: &str, table: EventTable) -> Result<String, SourceError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Ok(String::new());
    };
    let header = parse_line(header);

    let column = table.year_start_column();
    let mut rows: Vec<Vec<String>> = lines.map(parse_line).collect();
    rows.sort_by_key(|row| {
        let year = row.get(column).and_then(|v| parse_year(v));
        (year.is_none(), year)
    });

    log::info!("Sorted {} {table:?} rows by year_start", rows.len());
    write_table(&header, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_polygon_rows_by_start_year() {
        let text = "polygon_coordinates,stroke,fill,opacity,year_start,year_end\n\
                    \"((1,2),(3,4),(5,6))\",a,b,0.1,1492,1492\n\
                    \"((1,2),(3,4),(5,6))\",a,b,0.1,-586,-538\n\
                    \"((1,2),(3,4),(5,6))\",a,b,0.1,unknown,\n\
                    \"((1,2),(3,4),(5,6))\",a,b,0.1,70,70\n";
        let sorted = sort_events_by_year(text, EventTable::Polygon).unwrap();
        let starts: Vec<String> = sorted
            .lines()
            .skip(1)
            .map(|line| parse_line(line)[4].clone())
            .collect();
        assert_eq!(starts, vec!["-586", "70", "1492", "unknown"]);
        assert!(sorted.starts_with("polygon_coordinates,stroke,fill"));
    }

    #[test]
    fn equal_years_keep_file_order() {
        let text = "h\n\
                    a,,,,,,,1096,1096\n\
                    b,,,,,,,1096,1100\n";
        let sorted = sort_events_by_year(text, EventTable::Migration).unwrap();
        let firsts: Vec<String> = sorted
            .lines()
            .skip(1)
            .map(|line| parse_line(line)[0].clone())
            .collect();
        assert_eq!(firsts, vec!["a", "b"]);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sort_events_by_year("", EventTable::Ellipse).unwrap(), "");
    }
}
