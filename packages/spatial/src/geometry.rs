//! Geometry helpers for area events.

use std::f64::consts::TAU;

use geo::{Centroid, LineString, Polygon};
use kehilot_map_history_models::{AreaEvent, Ellipse, EventGeometry, LatLng};

/// Metres per degree of latitude.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Builds a `geo` polygon from a ring of positions (x = longitude,
/// y = latitude). Returns `None` for rings with fewer than three points.
#[must_use]
pub fn ring_polygon(ring: &[LatLng]) -> Option<Polygon<f64>> {
    if ring.len() < 3 {
        return None;
    }
    let exterior: LineString<f64> = ring.iter().map(|p| (p.lng, p.lat)).collect();
    Some(Polygon::new(exterior, vec![]))
}

/// Centroid of a polygon ring, used for label placement.
#[must_use]
pub fn ring_centroid(ring: &[LatLng]) -> Option<LatLng> {
    let point = ring_polygon(ring)?.centroid()?;
    Some(LatLng::new(point.y(), point.x()))
}

/// Approximates an ellipse outline with `segments` points.
///
/// Radii are converted from metres to degrees with an equirectangular
/// approximation around the centre, which is accurate enough for the
/// region-sized shapes the event tables describe. The tilt rotates the
/// major axis clockwise from north.
#[must_use]
pub fn ellipse_ring(ellipse: &Ellipse, segments: usize) -> Vec<LatLng> {
    if segments < 3 {
        return Vec::new();
    }

    let center = ellipse.center;
    let metres_per_degree_lng = METRES_PER_DEGREE * center.lat.to_radians().cos().max(1e-6);
    let (sin_tilt, cos_tilt) = ellipse.tilt_deg.to_radians().sin_cos();

    (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = TAU * i as f64 / segments as f64;
            let along_major = ellipse.radius_major_m * t.cos();
            let along_minor = ellipse.radius_minor_m * t.sin();

            let north = along_major.mul_add(cos_tilt, -(along_minor * sin_tilt));
            let east = along_major.mul_add(sin_tilt, along_minor * cos_tilt);

            LatLng::new(
                center.lat + north / METRES_PER_DEGREE,
                center.lng + east / metres_per_degree_lng,
            )
        })
        .collect()
}

/// Where to anchor an event's label: the ellipse centre or the polygon
/// centroid. Polygons without geometry have no anchor.
#[must_use]
pub fn label_position(event: &AreaEvent) -> Option<LatLng> {
    match &event.geometry {
        EventGeometry::Ellipse(ellipse) => Some(ellipse.center),
        EventGeometry::Polygon { ring } => ring_centroid(ring),
    }
}

#[cfg(test)]
mod tests {
    use kehilot_map_history_models::EventDetails;

    use super::*;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(30.0, 34.0),
            LatLng::new(30.0, 36.0),
            LatLng::new(32.0, 36.0),
            LatLng::new(32.0, 34.0),
        ]
    }

    #[test]
    fn centroid_of_square() {
        let c = ring_centroid(&square()).unwrap();
        assert!((c.lat - 31.0).abs() < 1e-9);
        assert!((c.lng - 35.0).abs() < 1e-9);
    }

    #[test]
    fn short_rings_have_no_polygon() {
        assert!(ring_polygon(&square()[..2]).is_none());
        assert!(ring_centroid(&[]).is_none());
    }

    #[test]
    fn ellipse_ring_spans_its_radii() {
        let ellipse = Ellipse {
            center: LatLng::new(0.0, 10.0),
            radius_major_m: 111_320.0,
            radius_minor_m: 55_660.0,
            tilt_deg: 0.0,
        };
        let ring = ellipse_ring(&ellipse, 4);
        assert_eq!(ring.len(), 4);
        // t = 0 points north along the major axis
        assert!((ring[0].lat - 1.0).abs() < 1e-9);
        assert!((ring[0].lng - 10.0).abs() < 1e-9);
        // t = pi/2 points east along the minor axis
        assert!(ring[1].lat.abs() < 1e-9);
        assert!((ring[1].lng - 10.5).abs() < 1e-9);
    }

    #[test]
    fn tilt_rotates_clockwise_from_north() {
        let ellipse = Ellipse {
            center: LatLng::new(0.0, 0.0),
            radius_major_m: 111_320.0,
            radius_minor_m: 0.0,
            tilt_deg: 90.0,
        };
        let ring = ellipse_ring(&ellipse, 8);
        assert!(ring[0].lat.abs() < 1e-9);
        assert!((ring[0].lng - 1.0).abs() < 1e-9);
    }

    #[test]
    fn label_positions() {
        let details = EventDetails {
            year_start: Some(1290),
            year_end: Some(1290),
            description_en: String::new(),
            description_he: String::new(),
            source: String::new(),
            category: None,
            stroke_color: String::new(),
            fill_color: String::new(),
            fill_opacity: None,
            reference_url: None,
        };
        let polygon = AreaEvent {
            id: 0,
            details: details.clone(),
            geometry: EventGeometry::Polygon { ring: square() },
        };
        let empty = AreaEvent {
            id: 1,
            details,
            geometry: EventGeometry::Polygon { ring: Vec::new() },
        };
        assert!(label_position(&polygon).is_some());
        assert!(label_position(&empty).is_none());
    }
}
