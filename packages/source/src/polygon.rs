//! Parser for the polygon coordinate mini-language.
//!
//! Polygons are stored as `((lon,lat),(lon,lat),...)`. Positions come out in
//! `(lat, lon)` order. A malformed string yields an empty ring, which
//! renderers skip.

use kehilot_map_history_models::LatLng;

/// Parses a polygon coordinate string into a ring of positions.
///
/// Whitespace anywhere in the string is ignored. Returns an empty vector
/// (and logs a warning) when the string is malformed.
#[must_use]
pub fn parse_polygon_coordinates(input: &str) -> Vec<LatLng> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Vec::new();
    }

    parse_ring(&compact).unwrap_or_else(|| {
        log::warn!("Malformed polygon coordinates: {input}");
        Vec::new()
    })
}

fn parse_ring(compact: &str) -> Option<Vec<LatLng>> {
    let inner = compact.strip_prefix("((")?.strip_suffix("))")?;

    inner
        .split("),(")
        .map(|pair| {
            let (lon, lat) = pair.split_once(',')?;
            let lon = lon.parse::<f64>().ok().filter(|v| v.is_finite())?;
            let lat = lat.parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(LatLng::new(lat, lon))
        })
        .collect()
}
