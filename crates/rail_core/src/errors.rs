//! Tagged rule-violation values.
//!
//! Every operation that can be legally rejected returns one of these as data;
//! the engine never panics or logs on an expected rule violation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection reasons for track building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BuildError {
    /// Structural violation: non-adjacent points, water destination,
    /// disconnected start, unknown point, or city connection cap reached.
    #[error("invalid connection")]
    InvalidConnection,
    /// Segment cost would push this turn's build spend over the budget.
    #[error("build cost exceeds remaining turn budget")]
    ExceedsTurnBudget,
}

/// Rejection reasons for train movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// Requested move costs more than the remaining movement points.
    #[error("not enough movement points")]
    NotEnoughMovement,
    /// Direction change attempted away from a city or ferry port.
    #[error("trains may only reverse at a city or ferry port")]
    InvalidReversal,
    /// First-ever placement must be at a major city.
    #[error("trains must start at a major city")]
    InvalidStart,
    /// No movement permitted in the turn a train arrives at a ferry port.
    #[error("movement blocked after ferry arrival")]
    FerryBlocked,
    /// Target point missing from the map catalog. Indicates a data-loading
    /// bug upstream; the move is rejected rather than crashing.
    #[error("point not present in map catalog")]
    UnknownPoint,
}
