//! Map loading and validation shared by the CLI and session tooling.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use rail_core::{CityInfo, CrossingKind, MapCatalog, Milepost, PointId, Terrain};

#[derive(Deserialize)]
struct MilepostsFile {
    map_version: String,
    mileposts: Vec<Milepost>,
}

#[derive(Deserialize)]
struct CrossingEntry {
    a: PointId,
    b: PointId,
    kind: CrossingKind,
}

#[derive(Deserialize)]
struct WaterCrossingsFile {
    crossings: Vec<CrossingEntry>,
}

/// Validates a loaded map, panicking on any authoring error.
///
/// Catches mistakes like: a ferry port pointing at a missing or non-ferry
/// pair, a crossing between non-adjacent points, or a city milepost without
/// city metadata.
pub fn validate_map(catalog: &MapCatalog) {
    let mut coordinates: HashMap<(i32, i32), &PointId> = HashMap::new();
    for post in catalog.mileposts() {
        assert!(!post.id.0.is_empty(), "milepost has an empty id");
        if let Some(other) = coordinates.insert((post.row, post.col), &post.id) {
            panic!(
                "mileposts '{}' and '{}' share grid cell ({}, {})",
                other, post.id, post.row, post.col,
            );
        }

        assert_eq!(
            post.city.is_some(),
            post.terrain.is_city(),
            "milepost '{}' city metadata does not match terrain {:?}",
            post.id,
            post.terrain,
        );
        if let Some(city) = &post.city {
            assert!(!city.name.is_empty(), "city at '{}' has an empty name", post.id);
        }

        match (&post.ferry_to, post.terrain) {
            (Some(pair_id), Terrain::FerryPort) => {
                let pair = catalog.milepost(pair_id).unwrap_or_else(|| {
                    panic!("ferry port '{}' pairs with unknown point '{pair_id}'", post.id)
                });
                assert_eq!(
                    pair.terrain,
                    Terrain::FerryPort,
                    "ferry port '{}' pairs with non-ferry point '{pair_id}'",
                    post.id,
                );
                assert_eq!(
                    pair.ferry_to.as_ref(),
                    Some(&post.id),
                    "ferry pair '{}' <-> '{pair_id}' is not symmetric",
                    post.id,
                );
            }
            (Some(_), _) => panic!("non-ferry milepost '{}' has a ferry pair", post.id),
            (None, Terrain::FerryPort) => panic!("ferry port '{}' has no pair", post.id),
            (None, _) => {}
        }
    }

    for (a, b, kind) in crossing_entries(catalog) {
        assert_ne!(a, b, "crossing on '{a}' joins a point to itself");
        assert!(
            catalog.are_adjacent(&a, &b),
            "{kind:?} crossing '{a}'-'{b}' joins points that are not adjacent",
        );
    }

    assert!(
        catalog
            .mileposts()
            .any(|m| m.terrain == Terrain::MajorCity),
        "map '{}' has no major city; no player could start building",
        catalog.version(),
    );
}

/// Every crossing in the catalog as (a, b, kind), reconstructed by probing
/// each unordered milepost pair once.
fn crossing_entries(catalog: &MapCatalog) -> Vec<(PointId, PointId, CrossingKind)> {
    let mut entries = Vec::new();
    let posts: Vec<&Milepost> = catalog.mileposts().collect();
    for a in &posts {
        for b in &posts {
            if a.id >= b.id {
                continue;
            }
            if let Some(kind) = catalog.crossing(&a.id, &b.id) {
                entries.push((a.id.clone(), b.id.clone(), kind));
            }
        }
    }
    entries
}

/// Loads `mileposts.json` and `water_crossings.json` from `map_dir` and
/// validates the result.
pub fn load_map(map_dir: &str) -> Result<MapCatalog> {
    let dir = Path::new(map_dir);
    let mileposts_file: MilepostsFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("mileposts.json")).context("reading mileposts.json")?,
    )
    .context("parsing mileposts.json")?;
    let crossings_file: WaterCrossingsFile = serde_json::from_str(
        &std::fs::read_to_string(dir.join("water_crossings.json"))
            .context("reading water_crossings.json")?,
    )
    .context("parsing water_crossings.json")?;

    let catalog = MapCatalog::new(
        mileposts_file.map_version,
        mileposts_file.mileposts,
        crossings_file
            .crossings
            .into_iter()
            .map(|c| (c.a, c.b, c.kind))
            .collect(),
    );
    validate_map(&catalog);
    Ok(catalog)
}

fn post(id: &str, row: i32, col: i32, terrain: Terrain) -> Milepost {
    Milepost {
        id: PointId(id.to_string()),
        row,
        col,
        terrain,
        city: None,
        ferry_to: None,
    }
}

fn city(id: &str, row: i32, col: i32, terrain: Terrain, name: &str, resources: &[&str]) -> Milepost {
    Milepost {
        city: Some(CityInfo {
            name: name.to_string(),
            resources: resources.iter().map(|r| (*r).to_string()).collect(),
        }),
        ..post(id, row, col, terrain)
    }
}

fn ferry(id: &str, row: i32, col: i32, pair: &str) -> Milepost {
    Milepost {
        ferry_to: Some(PointId(pair.to_string())),
        ..post(id, row, col, Terrain::FerryPort)
    }
}

/// Compact built-in map for demo replays and tests that must not touch the
/// filesystem. A Rhine valley strip: two major cities, one of each city
/// tier, mountains, a river crossing, and a lake ferry.
pub fn starter_map() -> MapCatalog {
    let mileposts = vec![
        city("koeln", 0, 0, Terrain::MajorCity, "Köln", &["machinery"]),
        post("rhein_w", 0, 1, Terrain::Clear),
        post("rhein_e", 0, 2, Terrain::Clear),
        city("koblenz", 0, 3, Terrain::SmallCity, "Koblenz", &["wine"]),
        city("mainz", 0, 4, Terrain::MediumCity, "Mainz", &["wine"]),
        city("frankfurt", 0, 5, Terrain::MajorCity, "Frankfurt", &["steel"]),
        post("taunus_low", 1, 2, Terrain::Mountain),
        post("taunus_high", 1, 3, Terrain::Alpine),
        ferry("konstanz", 2, 1, "meersburg"),
        post("bodensee", 2, 2, Terrain::Water),
        ferry("meersburg", 2, 3, "konstanz"),
        post("uferweg", 2, 4, Terrain::Clear),
        post("alb", 1, 4, Terrain::Mountain),
        post("vorland", 1, 1, Terrain::Clear),
        post("seeufer", 1, 0, Terrain::Clear),
    ];
    let crossings = vec![(
        PointId("rhein_w".to_string()),
        PointId("rhein_e".to_string()),
        CrossingKind::River,
    )];
    let catalog = MapCatalog::new("starter_v1", mileposts, crossings);
    validate_map(&catalog);
    catalog
}
