//! `rail_core` — rail-network and movement-validation engine.
//!
//! Pure computation: no IO, no clocks, no ambient global state. The terrain
//! catalog and water-crossing lookup are injected read-only dependencies;
//! every rule violation is returned as a tagged value, never thrown.

mod building;
mod costs;
mod errors;
mod movement;
mod network;
mod store;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;

pub use building::{BuildOptions, TrackBuildingService, DEFAULT_TURN_BUDGET};
pub use costs::{movement_cost, movement_cost_or_grid};
pub use errors::{BuildError, MoveError};
pub use movement::{
    FerryStatus, TrainClass, TrainMovementManager, TrainState, FAST_FREIGHT_BASE_MOVEMENT,
    FREIGHT_BASE_MOVEMENT,
};
pub use network::{SerializedNetwork, TrackNetwork};
pub use store::{MemoryTrackStore, TrackStore};
pub use types::{
    crossing_key, CityInfo, CrossingKind, GameId, MapCatalog, Milepost, PlayerId,
    PlayerTrackState, PointId, Terrain, TrackSegment,
};

#[cfg(test)]
mod tests;
