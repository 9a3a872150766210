//! Track building rules, layered on the pure network operations.
//!
//! Checks run in order and short-circuit on the first failure; the store is
//! only written after every check has passed, so a rejected build leaves the
//! persisted network untouched.

use crate::errors::BuildError;
use crate::network::TrackNetwork;
use crate::store::TrackStore;
use crate::types::{GameId, MapCatalog, PlayerId, PlayerTrackState, PointId, Terrain};

/// Default per-player build budget per turn, in cost units.
pub const DEFAULT_TURN_BUDGET: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    pub turn_budget: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            turn_budget: DEFAULT_TURN_BUDGET,
        }
    }
}

pub struct TrackBuildingService<'a> {
    catalog: &'a MapCatalog,
}

impl<'a> TrackBuildingService<'a> {
    pub fn new(catalog: &'a MapCatalog) -> Self {
        Self { catalog }
    }

    /// Validate and apply one build action for `player` in `game`.
    ///
    /// Rule order: connection legality (adjacency, no water destination,
    /// start-from-major-city / touch-existing-network), city connection cap,
    /// turn budget. On success the segment is applied, a ferry destination is
    /// auto-linked to its paired port for free, and the updated state is
    /// persisted. Catalog misses reject conservatively as
    /// `InvalidConnection`.
    pub fn add_player_track(
        &self,
        store: &mut dyn TrackStore,
        player: &PlayerId,
        game: &GameId,
        from: &PointId,
        to: &PointId,
        options: BuildOptions,
    ) -> Result<TrackNetwork, BuildError> {
        let mut state = store
            .player_track(player, game)
            .unwrap_or_else(|| PlayerTrackState::new(player.clone(), game.clone()));

        if self.catalog.milepost(from).is_none() {
            return Err(BuildError::InvalidConnection);
        }
        let destination = self
            .catalog
            .milepost(to)
            .ok_or(BuildError::InvalidConnection)?;

        if destination.terrain == Terrain::Water
            || !self.catalog.are_adjacent(from, to)
            || !state.network.can_add_segment(from, to, self.catalog)
        {
            return Err(BuildError::InvalidConnection);
        }

        if !self.city_slot_available(&*store, player, game, &state.network, to, destination.terrain)
        {
            return Err(BuildError::InvalidConnection);
        }

        let cost = destination.terrain.build_cost() + self.catalog.crossing_surcharge(from, to);
        if state.turn_build_cost + cost > options.turn_budget {
            return Err(BuildError::ExceedsTurnBudget);
        }

        let mut network = state.network.with_segment(from, to);
        // Free link across the water so connectivity and movement can reach
        // the far shore before any track exists there.
        if destination.terrain == Terrain::FerryPort {
            if let Some(pair) = &destination.ferry_to {
                network = network.with_segment(to, pair);
            }
        }

        state.network = network.clone();
        state.total_build_cost += cost;
        state.turn_build_cost += cost;
        store.save_player_track(state);
        Ok(network)
    }

    /// Distinct-player cap for small (2) and medium (3) cities; major cities
    /// and non-cities are uncapped. A player already connected to the city
    /// keeps building without consuming another slot.
    fn city_slot_available(
        &self,
        store: &dyn TrackStore,
        player: &PlayerId,
        game: &GameId,
        own_network: &TrackNetwork,
        city: &PointId,
        terrain: Terrain,
    ) -> bool {
        let Some(cap) = terrain.connection_cap() else {
            return true;
        };
        if own_network.contains(city) {
            return true;
        }
        let connected_others = store
            .tracks_in_game(game)
            .iter()
            .filter(|state| &state.player != player && state.network.contains(city))
            .count();
        connected_others < cap
    }
}
