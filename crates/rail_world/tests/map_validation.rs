//! Validation tests for the shipped map data.
//!
//! These load the actual `content/*.json` files and check:
//! 1. Schema validity — the files deserialize and pass `validate_map`
//! 2. Range constraints — non-empty IDs and names, sane resource lists
//! 3. Cross-reference integrity — ferry pairs and crossings resolve
//! 4. Map invariants — the map is playable

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

use rail_core::{MapCatalog, Milepost, PointId, Terrain};
use rail_world::load_map;

/// Resolve the map directory relative to the workspace root. Integration
/// tests run from the crate directory, so we go up two levels.
fn map_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

/// Shared catalog loaded once across all tests in this module.
fn shipped_map() -> &'static MapCatalog {
    static CATALOG: OnceLock<MapCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| load_map(&map_dir()).expect("shipped map should load"))
}

// =========================================================================
// 1. Schema validation
// =========================================================================

#[test]
fn map_loads_successfully() {
    let catalog = shipped_map();
    assert!(!catalog.version().is_empty());
}

// =========================================================================
// 2. Range constraints
// =========================================================================

#[test]
fn milepost_ids_are_non_empty() {
    for post in shipped_map().mileposts() {
        assert!(!post.id.0.is_empty(), "milepost has empty id");
    }
}

#[test]
fn city_names_are_non_empty() {
    for post in shipped_map().mileposts() {
        if let Some(city) = &post.city {
            assert!(!city.name.is_empty(), "city at '{}' has empty name", post.id);
        }
    }
}

#[test]
fn city_resources_are_non_empty_strings() {
    for post in shipped_map().mileposts() {
        if let Some(city) = &post.city {
            for resource in &city.resources {
                assert!(
                    !resource.is_empty(),
                    "city '{}' lists an empty resource",
                    city.name
                );
            }
        }
    }
}

#[test]
fn no_duplicate_city_names() {
    let mut seen = HashSet::new();
    for post in shipped_map().mileposts() {
        if let Some(city) = &post.city {
            assert!(seen.insert(&city.name), "duplicate city name: '{}'", city.name);
        }
    }
}

// =========================================================================
// 3. Cross-reference integrity
// =========================================================================

#[test]
fn ferry_pairs_are_symmetric_and_cross_water() {
    let catalog = shipped_map();
    for post in catalog.mileposts() {
        let Some(pair_id) = &post.ferry_to else {
            continue;
        };
        assert_eq!(post.terrain, Terrain::FerryPort);
        assert_eq!(
            catalog.ferry_pair(pair_id),
            Some(&post.id),
            "ferry pair '{}' <-> '{pair_id}' is not symmetric",
            post.id
        );
        assert!(
            !catalog.are_adjacent(&post.id, pair_id),
            "ferry '{}' <-> '{pair_id}' joins adjacent points; plain track would do",
            post.id
        );
    }
}

#[test]
fn crossings_join_adjacent_land_points() {
    let catalog = shipped_map();
    let posts: Vec<&Milepost> = catalog.mileposts().collect();
    for a in &posts {
        for b in &posts {
            if a.id >= b.id {
                continue;
            }
            if catalog.crossing(&a.id, &b.id).is_some() {
                assert!(
                    catalog.are_adjacent(&a.id, &b.id),
                    "crossing '{}'-'{}' is not between adjacent points",
                    a.id,
                    b.id
                );
                assert_ne!(a.terrain, Terrain::Water, "crossing endpoint '{}' is water", a.id);
                assert_ne!(b.terrain, Terrain::Water, "crossing endpoint '{}' is water", b.id);
            }
        }
    }
}

// =========================================================================
// 4. Map invariants — the map is playable
// =========================================================================

#[test]
fn at_least_two_major_cities_exist() {
    let majors = shipped_map()
        .mileposts()
        .filter(|m| m.terrain == Terrain::MajorCity)
        .count();
    assert!(majors >= 2, "a game needs at least two major cities, found {majors}");
}

#[test]
fn water_points_carry_no_metadata() {
    for post in shipped_map().mileposts() {
        if post.terrain == Terrain::Water {
            assert!(post.city.is_none(), "water point '{}' has city metadata", post.id);
            assert!(post.ferry_to.is_none(), "water point '{}' has a ferry pair", post.id);
        }
    }
}

/// Every buildable point must reach a major city over land adjacency alone;
/// otherwise some mileposts could never legally hold track.
#[test]
fn every_land_point_reaches_a_major_city_over_land() {
    let catalog = shipped_map();
    let land: Vec<&Milepost> = catalog
        .mileposts()
        .filter(|m| m.terrain != Terrain::Water)
        .collect();
    let by_cell: HashMap<(i32, i32), &Milepost> =
        land.iter().map(|m| ((m.row, m.col), *m)).collect();

    // BFS out from every major city simultaneously.
    let mut reached: HashSet<&PointId> = HashSet::new();
    let mut queue: VecDeque<&Milepost> = land
        .iter()
        .filter(|m| m.terrain == Terrain::MajorCity)
        .copied()
        .collect();
    for major in &queue {
        reached.insert(&major.id);
    }
    while let Some(post) = queue.pop_front() {
        for dr in -1..=1 {
            for dc in -1..=1 {
                let Some(neighbor) = by_cell.get(&(post.row + dr, post.col + dc)) else {
                    continue;
                };
                if reached.insert(&neighbor.id) {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    for post in &land {
        assert!(
            reached.contains(&post.id),
            "'{}' cannot reach any major city over land",
            post.id
        );
    }
}

#[test]
fn at_least_one_ferry_route_exists() {
    let has_ferry = shipped_map()
        .mileposts()
        .any(|m| m.terrain == Terrain::FerryPort);
    assert!(has_ferry, "no ferry route; the map's water is impassable");
}
