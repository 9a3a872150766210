//! Train movement legality state machine.
//!
//! Driven by repeated `can_move_to`/`move_to` calls within a turn. The
//! session layer resets movement points, clears the ferry-arrival flag, and
//! carries the train to the far shore at the start of the next turn.

use serde::{Deserialize, Serialize};

use crate::costs::movement_cost_or_grid;
use crate::errors::MoveError;
use crate::network::TrackNetwork;
use crate::types::{MapCatalog, PointId, Terrain, TrackSegment};

pub const FREIGHT_BASE_MOVEMENT: u32 = 9;
pub const FAST_FREIGHT_BASE_MOVEMENT: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainClass {
    Freight,
    FastFreight,
}

impl TrainClass {
    /// Movement points allotted at the start of a normal turn.
    pub fn base_movement(self) -> u32 {
        match self {
            TrainClass::Freight => FREIGHT_BASE_MOVEMENT,
            TrainClass::FastFreight => FAST_FREIGHT_BASE_MOVEMENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FerryStatus {
    None,
    /// Set when a move ends on a ferry port. One-shot: blocks all further
    /// movement this turn; cleared at the next turn start.
    JustArrived {
        near_side: PointId,
        far_side: PointId,
    },
}

impl FerryStatus {
    pub fn is_blocked(&self) -> bool {
        matches!(self, FerryStatus::JustArrived { .. })
    }
}

/// Per-player transient turn state. Position persists across turns; movement
/// points and the ferry flag are reset by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainState {
    pub class: TrainClass,
    pub position: Option<PointId>,
    pub remaining_movement: u32,
    /// Segments actually traversed this game, in order.
    pub history: Vec<TrackSegment>,
    pub ferry: FerryStatus,
    /// Goods on board. Owned by the economic layer; carried here because it
    /// travels with the train.
    pub loads: Vec<String>,
}

impl TrainState {
    pub fn new(class: TrainClass) -> Self {
        Self {
            class,
            position: None,
            remaining_movement: class.base_movement(),
            history: Vec::new(),
            ferry: FerryStatus::None,
            loads: Vec::new(),
        }
    }
}

pub struct TrainMovementManager<'a> {
    catalog: &'a MapCatalog,
}

impl<'a> TrainMovementManager<'a> {
    pub fn new(catalog: &'a MapCatalog) -> Self {
        Self { catalog }
    }

    /// Check whether `train` may move to `target` over `track` (the union of
    /// all players' built networks). Returns the movement cost that the move
    /// would consume; placement moves cost 0.
    pub fn can_move_to(
        &self,
        train: &TrainState,
        track: Option<&TrackNetwork>,
        target: &PointId,
    ) -> Result<u32, MoveError> {
        if train.ferry.is_blocked() {
            return Err(MoveError::FerryBlocked);
        }
        let target_terrain = self.catalog.terrain(target).ok_or(MoveError::UnknownPoint)?;

        let Some(current) = &train.position else {
            // Start-of-game placement: major city only, free of movement cost.
            return if target_terrain == Terrain::MajorCity {
                Ok(0)
            } else {
                Err(MoveError::InvalidStart)
            };
        };

        let cost = movement_cost_or_grid(current, target, track, self.catalog)
            .ok_or(MoveError::UnknownPoint)?;
        if cost > train.remaining_movement {
            return Err(MoveError::NotEnoughMovement);
        }
        if self.is_reversal(train, current, target) && !self.pivot_allowed(current) {
            return Err(MoveError::InvalidReversal);
        }
        Ok(cost)
    }

    /// Apply a legal move: deduct movement, append to history, and handle
    /// ferry arrival (movement zeroed, `JustArrived` flag set).
    pub fn move_to(
        &self,
        train: &mut TrainState,
        track: Option<&TrackNetwork>,
        target: &PointId,
    ) -> Result<u32, MoveError> {
        let cost = self.can_move_to(train, track, target)?;
        let terrain = self.catalog.terrain(target).ok_or(MoveError::UnknownPoint)?;

        if let Some(current) = train.position.clone() {
            train.remaining_movement -= cost;
            train.history.push(TrackSegment {
                from: current,
                to: target.clone(),
                terrain,
                cost,
            });
        }
        train.position = Some(target.clone());

        if terrain == Terrain::FerryPort {
            train.remaining_movement = 0;
            if let Some(far_side) = self.catalog.ferry_pair(target) {
                train.ferry = FerryStatus::JustArrived {
                    near_side: target.clone(),
                    far_side: far_side.clone(),
                };
            }
        }
        Ok(cost)
    }

    /// A move is a reversal when the proposed direction points against the
    /// last traveled direction (negative dot product). With no usable last
    /// direction the answer is always false.
    fn is_reversal(&self, train: &TrainState, current: &PointId, target: &PointId) -> bool {
        let Some(last) = train.history.last() else {
            return false;
        };
        // After a session-layer ferry carry-over the last segment does not
        // end at the current position; there is no direction to reverse.
        if &last.to != current {
            return false;
        }
        let (Some(proposed), Some(traveled)) = (
            self.direction(current, target),
            self.direction(&last.from, current),
        ) else {
            return false;
        };
        i64::from(proposed.0) * i64::from(traveled.0)
            + i64::from(proposed.1) * i64::from(traveled.1)
            < 0
    }

    /// Reversal is always legal at any city tier or at a ferry port.
    fn pivot_allowed(&self, at: &PointId) -> bool {
        self.catalog
            .terrain(at)
            .is_some_and(|t| t.is_city() || t == Terrain::FerryPort)
    }

    fn direction(&self, from: &PointId, to: &PointId) -> Option<(i32, i32)> {
        let a = self.catalog.milepost(from)?;
        let b = self.catalog.milepost(to)?;
        Some((b.row - a.row, b.col - a.col))
    }
}
