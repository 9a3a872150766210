//! Turn sequencing over the pure engine.
//!
//! `GameSession` owns the per-game state (track store, trains, turn order)
//! and applies replayable [`Action`]s, delegating every rules decision to
//! `rail_core`. Rejections are outcomes, not errors: a replay keeps going
//! and the caller decides what to do with them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rail_core::{
    BuildError, BuildOptions, FerryStatus, GameId, MapCatalog, MemoryTrackStore, MoveError,
    PlayerId, PointId, TrackBuildingService, TrackNetwork, TrackStore, TrainClass,
    TrainMovementManager, TrainState,
};

/// One player action, as recorded in a replay script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    BuildTrack {
        player: PlayerId,
        from: PointId,
        to: PointId,
    },
    MoveTrain {
        player: PlayerId,
        to: PointId,
    },
    EndTurn {
        player: PlayerId,
    },
}

impl Action {
    pub fn player(&self) -> &PlayerId {
        match self {
            Action::BuildTrack { player, .. }
            | Action::MoveTrain { player, .. }
            | Action::EndTurn { player } => player,
        }
    }
}

/// What applying an [`Action`] did. Every variant is serializable so replays
/// can be checked against recorded outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    TrackBuilt {
        player: PlayerId,
        from: PointId,
        to: PointId,
        spent_this_turn: u32,
    },
    TrainMoved {
        player: PlayerId,
        to: PointId,
        cost: u32,
        remaining_movement: u32,
    },
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
        turn: u64,
    },
    BuildRejected {
        player: PlayerId,
        reason: BuildError,
    },
    MoveRejected {
        player: PlayerId,
        reason: MoveError,
    },
    OutOfTurn {
        player: PlayerId,
        expected: PlayerId,
    },
}

impl ActionOutcome {
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ActionOutcome::BuildRejected { .. }
                | ActionOutcome::MoveRejected { .. }
                | ActionOutcome::OutOfTurn { .. }
        )
    }
}

/// A running game: fixed players in a fixed turn order, one train each.
///
/// Trains move over the union of every player's built track. Turn starts
/// reset the acting player's build spend and movement points, and resolve a
/// pending ferry crossing by carrying the train to the far shore with half
/// movement.
pub struct GameSession {
    game: GameId,
    catalog: MapCatalog,
    store: MemoryTrackStore,
    turn_order: Vec<PlayerId>,
    trains: Vec<TrainState>,
    current: usize,
    turn: u64,
    build_options: BuildOptions,
}

impl GameSession {
    /// Starts a session on turn 1 with the first listed player to act.
    ///
    /// # Panics
    /// Panics if `players` is empty or contains a duplicate ID.
    pub fn new(game: GameId, catalog: MapCatalog, players: &[(PlayerId, TrainClass)]) -> Self {
        assert!(!players.is_empty(), "a session needs at least one player");
        let turn_order: Vec<PlayerId> = players.iter().map(|(id, _)| id.clone()).collect();
        {
            let mut seen = turn_order.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), turn_order.len(), "duplicate player ID");
        }
        let trains = players
            .iter()
            .map(|(_, class)| TrainState::new(*class))
            .collect();
        let mut session = Self {
            game,
            catalog,
            store: MemoryTrackStore::new(),
            turn_order,
            trains,
            current: 0,
            turn: 1,
            build_options: BuildOptions::default(),
        };
        session.begin_turn(0);
        session
    }

    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    pub fn game(&self) -> &GameId {
        &self.game
    }

    pub fn catalog(&self) -> &MapCatalog {
        &self.catalog
    }

    pub fn current_player(&self) -> &PlayerId {
        &self.turn_order[self.current]
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn train(&self, player: &PlayerId) -> Option<&TrainState> {
        self.player_index(player).map(|i| &self.trains[i])
    }

    pub fn store(&self) -> &MemoryTrackStore {
        &self.store
    }

    /// Union of every player's built track; trains may run on any of it.
    pub fn combined_track(&self) -> TrackNetwork {
        let tracks = self.store.tracks_in_game(&self.game);
        TrackNetwork::union(tracks.iter().map(|state| &state.network))
    }

    /// Apply one action and report what happened. Out-of-turn actions are
    /// rejected without touching any state.
    pub fn apply(&mut self, action: &Action) -> ActionOutcome {
        let expected = self.current_player().clone();
        if action.player() != &expected {
            return ActionOutcome::OutOfTurn {
                player: action.player().clone(),
                expected,
            };
        }
        match action {
            Action::BuildTrack { player, from, to } => self.build_track(player, from, to),
            Action::MoveTrain { player, to } => self.move_train(player, to),
            Action::EndTurn { player } => self.end_turn(player),
        }
    }

    fn build_track(&mut self, player: &PlayerId, from: &PointId, to: &PointId) -> ActionOutcome {
        let service = TrackBuildingService::new(&self.catalog);
        match service.add_player_track(
            &mut self.store,
            player,
            &self.game,
            from,
            to,
            self.build_options,
        ) {
            Ok(_) => {
                let spent_this_turn = self.stamp_build_turn(player);
                debug!(%player, %from, %to, spent_this_turn, "track built");
                ActionOutcome::TrackBuilt {
                    player: player.clone(),
                    from: from.clone(),
                    to: to.clone(),
                    spent_this_turn,
                }
            }
            Err(reason) => {
                debug!(%player, %from, %to, %reason, "build rejected");
                ActionOutcome::BuildRejected {
                    player: player.clone(),
                    reason,
                }
            }
        }
    }

    /// Record which turn the player last built in, returning the turn spend.
    /// The engine tracks costs; which turn it is only exists up here.
    fn stamp_build_turn(&mut self, player: &PlayerId) -> u32 {
        let Some(mut state) = self.store.player_track(player, &self.game) else {
            return 0;
        };
        state.last_build_turn = self.turn;
        let spent = state.turn_build_cost;
        self.store.save_player_track(state);
        spent
    }

    fn move_train(&mut self, player: &PlayerId, to: &PointId) -> ActionOutcome {
        let track = self.combined_track();
        let manager = TrainMovementManager::new(&self.catalog);
        let train = &mut self.trains[self.current];
        match manager.move_to(train, Some(&track), to) {
            Ok(cost) => {
                let remaining_movement = train.remaining_movement;
                debug!(%player, %to, cost, remaining_movement, "train moved");
                ActionOutcome::TrainMoved {
                    player: player.clone(),
                    to: to.clone(),
                    cost,
                    remaining_movement,
                }
            }
            Err(reason) => {
                debug!(%player, %to, %reason, "move rejected");
                ActionOutcome::MoveRejected {
                    player: player.clone(),
                    reason,
                }
            }
        }
    }

    fn end_turn(&mut self, player: &PlayerId) -> ActionOutcome {
        self.current = (self.current + 1) % self.turn_order.len();
        self.turn += 1;
        self.begin_turn(self.current);
        let next_player = self.current_player().clone();
        debug!(%player, %next_player, turn = self.turn, "turn ended");
        ActionOutcome::TurnEnded {
            player: player.clone(),
            next_player,
            turn: self.turn,
        }
    }

    /// Start-of-turn bookkeeping for the player at `index`: build spend back
    /// to zero, movement refilled, and a pending ferry crossing resolved by
    /// carrying the train to the far shore at half movement.
    fn begin_turn(&mut self, index: usize) {
        let player = self.turn_order[index].clone();
        if let Some(mut state) = self.store.player_track(&player, &self.game) {
            state.turn_build_cost = 0;
            self.store.save_player_track(state);
        }
        let train = &mut self.trains[index];
        match std::mem::replace(&mut train.ferry, FerryStatus::None) {
            FerryStatus::JustArrived { far_side, .. } => {
                train.position = Some(far_side);
                train.remaining_movement = train.class.base_movement() / 2;
            }
            FerryStatus::None => {
                train.remaining_movement = train.class.base_movement();
            }
        }
    }

    fn player_index(&self, player: &PlayerId) -> Option<usize> {
        self.turn_order.iter().position(|p| p == player)
    }
}

/// Summary counters for a finished replay.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub actions: usize,
    pub rejections: usize,
    pub rejection_reasons: HashMap<String, usize>,
}

/// Apply a recorded action sequence, collecting outcomes and counters.
pub fn run_replay(session: &mut GameSession, actions: &[Action]) -> (Vec<ActionOutcome>, ReplaySummary) {
    let mut outcomes = Vec::with_capacity(actions.len());
    let mut summary = ReplaySummary {
        actions: actions.len(),
        ..ReplaySummary::default()
    };
    for action in actions {
        let outcome = session.apply(action);
        if outcome.is_rejection() {
            summary.rejections += 1;
            let reason = match &outcome {
                ActionOutcome::BuildRejected { reason, .. } => reason.to_string(),
                ActionOutcome::MoveRejected { reason, .. } => reason.to_string(),
                _ => "out_of_turn".to_string(),
            };
            *summary.rejection_reasons.entry(reason).or_insert(0) += 1;
        }
        outcomes.push(outcome);
    }
    (outcomes, summary)
}
