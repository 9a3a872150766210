//! Type definitions for `rail_core`.
//!
//! Map-catalog types, ID newtypes, and the per-player state records shared by
//! the building and movement services.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::network::TrackNetwork;

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PointId);
string_id!(PlayerId);
string_id!(GameId);

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Clear,
    Mountain,
    Alpine,
    SmallCity,
    MediumCity,
    MajorCity,
    FerryPort,
    Water,
}

impl Terrain {
    /// Cost of building a segment whose destination has this terrain.
    /// Water is never buildable; its zero here is unreachable in practice
    /// because the building service rejects water destinations first.
    pub fn build_cost(self) -> u32 {
        match self {
            Terrain::Clear => 1,
            Terrain::Mountain => 2,
            Terrain::Alpine | Terrain::MajorCity => 5,
            Terrain::SmallCity | Terrain::MediumCity => 3,
            Terrain::FerryPort | Terrain::Water => 0,
        }
    }

    pub fn is_city(self) -> bool {
        matches!(
            self,
            Terrain::SmallCity | Terrain::MediumCity | Terrain::MajorCity
        )
    }

    /// Maximum number of distinct players that may connect track to a city of
    /// this terrain. `None` means uncapped (major cities and non-cities).
    pub fn connection_cap(self) -> Option<usize> {
        match self {
            Terrain::SmallCity => Some(2),
            Terrain::MediumCity => Some(3),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Map catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    /// Goods available for pickup at this city. Consumed by the economic
    /// layer; carried in the catalog because it is per-milepost static data.
    #[serde(default)]
    pub resources: Vec<String>,
}

/// One addressable point on the map grid. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milepost {
    pub id: PointId,
    pub row: i32,
    pub col: i32,
    pub terrain: Terrain,
    #[serde(default)]
    pub city: Option<CityInfo>,
    /// Paired ferry port on the opposite shore, when this is a `FerryPort`.
    #[serde(default)]
    pub ferry_to: Option<PointId>,
}

impl Milepost {
    pub fn planar(&self) -> (f32, f32) {
        (self.col as f32, self.row as f32)
    }
}

/// Extra cost for an edge that crosses water, additive on top of terrain cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingKind {
    River,
    /// Lake or ocean inlet.
    Inlet,
}

impl CrossingKind {
    pub fn surcharge(self) -> u32 {
        match self {
            CrossingKind::River => 2,
            CrossingKind::Inlet => 3,
        }
    }
}

/// Canonical, direction-independent lookup key for an edge between two points.
pub fn crossing_key(a: &PointId, b: &PointId) -> String {
    if a.0 <= b.0 {
        format!("{}|{}", a.0, b.0)
    } else {
        format!("{}|{}", b.0, a.0)
    }
}

/// Read-only terrain/city/ferry catalog, injected into every service.
///
/// Owns nothing mutable: services read it, nothing writes it after load.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    version: String,
    mileposts: HashMap<PointId, Milepost>,
    crossings: HashMap<String, CrossingKind>,
}

impl MapCatalog {
    pub fn new(
        version: impl Into<String>,
        mileposts: Vec<Milepost>,
        crossings: Vec<(PointId, PointId, CrossingKind)>,
    ) -> Self {
        let mileposts = mileposts.into_iter().map(|m| (m.id.clone(), m)).collect();
        let crossings = crossings
            .into_iter()
            .map(|(a, b, kind)| (crossing_key(&a, &b), kind))
            .collect();
        Self {
            version: version.into(),
            mileposts,
            crossings,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn milepost(&self, id: &PointId) -> Option<&Milepost> {
        self.mileposts.get(id)
    }

    pub fn mileposts(&self) -> impl Iterator<Item = &Milepost> {
        self.mileposts.values()
    }

    pub fn terrain(&self, id: &PointId) -> Option<Terrain> {
        self.mileposts.get(id).map(|m| m.terrain)
    }

    pub fn ferry_pair(&self, id: &PointId) -> Option<&PointId> {
        self.mileposts.get(id).and_then(|m| m.ferry_to.as_ref())
    }

    pub fn crossing(&self, a: &PointId, b: &PointId) -> Option<CrossingKind> {
        self.crossings.get(&crossing_key(a, b)).copied()
    }

    /// Additive water-crossing surcharge for the edge `a`–`b` (0 = no crossing).
    pub fn crossing_surcharge(&self, a: &PointId, b: &PointId) -> u32 {
        self.crossing(a, b).map_or(0, CrossingKind::surcharge)
    }

    /// Two mileposts are map-adjacent iff their Chebyshev grid distance is
    /// exactly 1. Unknown points are never adjacent to anything.
    pub fn are_adjacent(&self, a: &PointId, b: &PointId) -> bool {
        self.grid_distance(a, b) == Some(1)
    }

    /// Chebyshev distance between two catalog points.
    pub fn grid_distance(&self, a: &PointId, b: &PointId) -> Option<u32> {
        let ma = self.mileposts.get(a)?;
        let mb = self.mileposts.get(b)?;
        let dr = (ma.row - mb.row).unsigned_abs();
        let dc = (ma.col - mb.col).unsigned_abs();
        Some(dr.max(dc))
    }

    /// Straight-line distance on the planar projection, used as the path
    /// search heuristic. `None` when either point is unknown.
    pub fn planar_distance(&self, a: &PointId, b: &PointId) -> Option<f32> {
        let (ax, ay) = self.mileposts.get(a)?.planar();
        let (bx, by) = self.mileposts.get(b)?.planar();
        Some(((ax - bx).powi(2) + (ay - by).powi(2)).sqrt())
    }
}

// ---------------------------------------------------------------------------
// Per-player state
// ---------------------------------------------------------------------------

/// One traversed or built edge between two adjacent map points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub from: PointId,
    pub to: PointId,
    /// Terrain of the destination point at the time the segment was recorded.
    pub terrain: Terrain,
    /// Build cost or movement cost attributed to this segment.
    pub cost: u32,
}

/// Persisted wrapper around one player's accumulated track in one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTrackState {
    pub player: PlayerId,
    pub game: GameId,
    pub network: TrackNetwork,
    /// Cumulative build cost over the whole game.
    pub total_build_cost: u32,
    /// Build cost spent so far this turn; reset by the session layer.
    pub turn_build_cost: u32,
    /// Turn number of the most recent successful build.
    pub last_build_turn: u64,
}

impl PlayerTrackState {
    pub fn new(player: PlayerId, game: GameId) -> Self {
        Self {
            player,
            game,
            network: TrackNetwork::new(),
            total_build_cost: 0,
            turn_build_cost: 0,
            last_build_turn: 0,
        }
    }
}
