//! Rumor Propagation Simulation Engine Library
//!
//! Stochastic cellular automaton modelling how a rumor spreads through a
//! population placed on a fixed grid. Each person carries a skepticism
//! class that governs whether it re-transmits a rumor it hears, and a
//! cooldown that throttles how often it may re-transmit. The front-end
//! (window, widgets, cell rendering, plotting) is an external consumer of
//! the snapshots this crate produces.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod grid;
pub mod output;
pub mod person;
pub mod population;

pub use config::{RunMode, SimConfig};
pub use controller::{SimState, SimulationController, TickOutcome};
pub use error::SimError;
pub use grid::{Grid, PersonId, Pos, DIM};
pub use output::{CellView, Snapshot, TelemetrySeries};
pub use person::{Person, Skepticism, SpreadState};
pub use population::Population;
