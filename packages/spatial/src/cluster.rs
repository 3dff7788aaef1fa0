//! Greedy proximity clustering of settlement projections.
//!
//! Positions are projected to Web-Mercator pixels at the requested zoom
//! and bulk-loaded into an R-tree. Seeds are visited largest population
//! first (ties broken by id), and each seed absorbs every unassigned
//! projection within the pixel radius. Because the seed order is derived
//! from the data rather than the input order, shuffling the input yields
//! the same groups.

use std::f64::consts::PI;

use kehilot_map_history_models::{ClusterGroup, LatLng, Projection};
use rstar::RTree;
use rstar::primitives::GeomWithData;

/// Web-Mercator latitude limit.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// World size in pixels at zoom 0.
const TILE_SIZE: f64 = 256.0;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Clustering inputs supplied per call by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Merge radius in screen pixels. Zero disables merging.
    pub radius_px: f64,
    /// Map zoom level.
    pub zoom: f64,
}

/// Projects a position to Web-Mercator pixel coordinates at `zoom`.
#[must_use]
pub fn to_pixels(position: LatLng, zoom: f64) -> [f64; 2] {
    let world = TILE_SIZE * zoom.exp2();
    let lat = position.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (position.lng + 180.0) / 360.0 * world;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
    [x, y]
}

/// A projection that can be placed on the map.
struct Placed {
    id: usize,
    position: LatLng,
    population: u64,
}

/// Groups projections that lie within `params.radius_px` of a seed.
///
/// Projections without a location are left out. Member ids are ascending
/// within each group; groups are returned in seed order.
#[must_use]
pub fn cluster_projections(
    projections: &[Projection<'_>],
    params: ClusterParams,
) -> Vec<ClusterGroup> {
    let placed: Vec<Placed> = projections
        .iter()
        .filter_map(|p| {
            Some(Placed {
                id: p.settlement.id,
                position: p.settlement.location?,
                population: p.interpolated_population.unwrap_or(0),
            })
        })
        .collect();

    let skipped = projections.len() - placed.len();
    if skipped > 0 {
        log::debug!("{skipped} projection(s) without a location left out of clustering");
    }

    let mut seeds: Vec<usize> = (0..placed.len()).collect();
    seeds.sort_by(|&a, &b| {
        placed[b]
            .population
            .cmp(&placed[a].population)
            .then(placed[a].id.cmp(&placed[b].id))
    });

    if params.radius_px <= 0.0 {
        return seeds
            .into_iter()
            .map(|i| group(&placed, vec![i]))
            .collect();
    }

    let pixels: Vec<[f64; 2]> = placed
        .iter()
        .map(|p| to_pixels(p.position, params.zoom))
        .collect();
    let tree: RTree<IndexedPoint> = RTree::bulk_load(
        pixels
            .iter()
            .enumerate()
            .map(|(i, point)| GeomWithData::new(*point, i))
            .collect(),
    );

    let radius_2 = params.radius_px * params.radius_px;
    let mut assigned = vec![false; placed.len()];
    let mut groups = Vec::new();

    for seed in seeds {
        if assigned[seed] {
            continue;
        }
        let members: Vec<usize> = tree
            .locate_within_distance(pixels[seed], radius_2)
            .map(|neighbour| neighbour.data)
            .filter(|&i| !assigned[i])
            .collect();
        for &i in &members {
            assigned[i] = true;
        }
        groups.push(group(&placed, members));
    }

    log::debug!(
        "Clustered {} projection(s) into {} group(s) at zoom {}",
        placed.len(),
        groups.len(),
        params.zoom
    );

    groups
}

fn group(placed: &[Placed], mut members: Vec<usize>) -> ClusterGroup {
    members.sort_unstable_by_key(|&i| placed[i].id);
    let member_ids: Vec<usize> = members.iter().map(|&i| placed[i].id).collect();

    #[allow(clippy::cast_precision_loss)]
    let count = members.len() as f64;
    let (lat, lng) = members.iter().fold((0.0, 0.0), |(lat, lng), &i| {
        (lat + placed[i].position.lat, lng + placed[i].position.lng)
    });

    ClusterGroup {
        count: member_ids.len(),
        member_ids,
        population: members
            .iter()
            .fold(0_u64, |total, &i| total.saturating_add(placed[i].population)),
        center: LatLng::new(lat / count, lng / count),
    }
}
