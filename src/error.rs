//! Simulation Errors
//!
//! All failures are reported synchronously from `start()` / population
//! generation and leave the controller in `Stopped`. A run in progress has
//! no recoverable per-generation errors.

use thiserror::Error;

use crate::grid::Pos;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// The configured density produces zero persons; nothing to simulate.
    #[error("no persons to place: the configured density produces an empty population")]
    EmptyPopulation,

    /// More persons requested than the grid has cells.
    #[error("population of {requested} persons exceeds the {capacity}-cell grid")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// Slow mode seeds the rumor from an S1 person, and none was assigned.
    #[error("no eligible bootstrap spreader: slow mode requires at least one S1 person")]
    NoEligibleSpreader,

    /// The skepticism proportions cannot form a weighted distribution
    /// (all zero, negative, or non-finite).
    #[error("skepticism proportions do not form a usable weight set")]
    InvalidProportions,

    /// Placement invariant violation: the generator wrote to an occupied
    /// cell. This indicates a programming error, not a user condition.
    #[error("cell at {0} is already occupied")]
    OccupiedCell(Pos),

    /// A position outside the grid was used for placement.
    #[error("position {0} lies outside the {dim}x{dim} grid", dim = crate::grid::DIM)]
    OutOfBounds(Pos),

    /// `start()` was called while a run was in progress.
    #[error("simulation is already running; stop it before starting a new run")]
    AlreadyRunning,
}
