//! Movement-cost calculator.
//!
//! The authoritative cost of moving between two points is a least-cost walk
//! over built track (and ferry virtual edges): one movement point per
//! traversed edge plus the edge's water-crossing surcharge. When no track
//! data is available or no path exists, callers fall back to plain grid
//! distance — a degraded mode, not the rule.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::network::TrackNetwork;
use crate::types::{MapCatalog, PointId};

/// Least movement cost from `from` to `to` along the given (usually union)
/// track network. `None` when no track is available, either endpoint is off
/// the network, or the points are not connected over it.
pub fn movement_cost(
    from: &PointId,
    to: &PointId,
    track: Option<&TrackNetwork>,
    catalog: &MapCatalog,
) -> Option<u32> {
    let network = track?;
    if !network.contains(from) || !network.contains(to) {
        return None;
    }
    if from == to {
        return Some(0);
    }

    let mut best: AHashMap<PointId, u32> = AHashMap::new();
    let mut heap: BinaryHeap<Reverse<(u32, PointId)>> = BinaryHeap::new();
    best.insert(from.clone(), 0);
    heap.push(Reverse((0, from.clone())));

    while let Some(Reverse((cost, point))) = heap.pop() {
        if &point == to {
            return Some(cost);
        }
        if best.get(&point).is_some_and(|&known| cost > known) {
            continue;
        }
        for (next, step) in traversal_edges(network, &point, catalog) {
            let tentative = cost + step;
            if best.get(&next).is_some_and(|&known| tentative >= known) {
                continue;
            }
            best.insert(next.clone(), tentative);
            heap.push(Reverse((tentative, next)));
        }
    }
    None
}

/// Track cost when computable, otherwise Chebyshev grid distance.
/// `None` only when a point is missing from the catalog entirely.
pub fn movement_cost_or_grid(
    from: &PointId,
    to: &PointId,
    track: Option<&TrackNetwork>,
    catalog: &MapCatalog,
) -> Option<u32> {
    movement_cost(from, to, track, catalog).or_else(|| catalog.grid_distance(from, to))
}

/// Outgoing traversal edges from `point`: built neighbors at cost
/// 1 + crossing surcharge, plus the zero-cost ferry virtual edge.
fn traversal_edges<'a>(
    network: &'a TrackNetwork,
    point: &'a PointId,
    catalog: &'a MapCatalog,
) -> impl Iterator<Item = (PointId, u32)> + 'a {
    let ferry = catalog
        .ferry_pair(point)
        .filter(|pair| network.contains(pair))
        .map(|pair| (pair.clone(), 0));
    network
        .neighbors(point)
        .map(move |neighbor| (neighbor.clone(), 1 + catalog.crossing_surcharge(point, neighbor)))
        .chain(ferry)
}
