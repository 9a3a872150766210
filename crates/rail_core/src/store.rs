//! Persistence seam for player track state.
//!
//! The engine never performs IO itself; callers hand it a store and it reads
//! the latest persisted state and writes back fully-consistent values. The
//! caller is responsible for serializing build requests per (game, player).

use std::collections::HashMap;

use crate::types::{GameId, PlayerId, PlayerTrackState};

pub trait TrackStore {
    fn player_track(&self, player: &PlayerId, game: &GameId) -> Option<PlayerTrackState>;
    fn save_player_track(&mut self, state: PlayerTrackState);
    /// Every player's track state in a game, for union-track movement and
    /// city-connection counting. Read-only.
    fn tracks_in_game(&self, game: &GameId) -> Vec<PlayerTrackState>;
}

/// In-memory store used by tests, the session layer, and the CLI.
#[derive(Debug, Default, Clone)]
pub struct MemoryTrackStore {
    entries: HashMap<(PlayerId, GameId), PlayerTrackState>,
}

impl MemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackStore for MemoryTrackStore {
    fn player_track(&self, player: &PlayerId, game: &GameId) -> Option<PlayerTrackState> {
        self.entries.get(&(player.clone(), game.clone())).cloned()
    }

    fn save_player_track(&mut self, state: PlayerTrackState) {
        self.entries
            .insert((state.player.clone(), state.game.clone()), state);
    }

    fn tracks_in_game(&self, game: &GameId) -> Vec<PlayerTrackState> {
        let mut tracks: Vec<PlayerTrackState> = self
            .entries
            .values()
            .filter(|state| &state.game == game)
            .cloned()
            .collect();
        // Sorted for determinism.
        tracks.sort_by(|a, b| a.player.cmp(&b.player));
        tracks
    }
}
