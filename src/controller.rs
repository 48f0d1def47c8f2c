//! Simulation Controller
//!
//! Owns the run/pause/stop state machine and drives the generation loop.
//! The controller exposes a synchronous `tick()`; the real-time cadence is
//! the caller's responsibility (the binary sleeps `tick_interval()`
//! between ticks, tests call `tick()` in a tight loop).

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::engine;
use crate::error::SimError;
use crate::output::{CellView, Snapshot, TelemetrySeries};
use crate::population::Population;

/// Run state. Exactly one holds at a time; `Stopped` is initial, and
/// stopping discards all simulation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A generation was computed; its snapshot is for the renderer.
    Advanced(Snapshot),
    /// The generation limit was reached: the final generation's snapshot
    /// plus the full telemetry series for the plotting collaborator. The
    /// controller is back in `Stopped`.
    Completed {
        snapshot: Snapshot,
        series: TelemetrySeries,
    },
    /// Not running; nothing happened.
    Idle,
}

/// Drives generations over an exclusively owned population.
#[derive(Debug)]
pub struct SimulationController {
    state: SimState,
    config: SimConfig,
    rng: SmallRng,
    population: Option<Population>,
    generation: u64,
    telemetry: TelemetrySeries,
}

impl SimulationController {
    pub fn new() -> Self {
        let config = SimConfig::default();
        Self {
            state: SimState::Stopped,
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            population: None,
            generation: 0,
            telemetry: TelemetrySeries::default(),
        }
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    /// Index of the generation the next tick will compute; 0 while
    /// stopped (the bootstrap spread is generation 0).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Cadence metadata for real-time drivers.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    /// Generates the population and starts the run. Any generation
    /// failure is reported here and leaves the controller `Stopped` with
    /// no state mutated.
    pub fn start(&mut self, config: SimConfig) -> Result<(), SimError> {
        if self.state != SimState::Stopped {
            return Err(SimError::AlreadyRunning);
        }
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let population = Population::generate(&config, &mut rng)?;

        info!(
            n_persons = population.len(),
            mode = ?config.mode,
            seed = config.seed,
            "simulation started"
        );
        self.telemetry = TelemetrySeries::new(population.len());
        self.rng = rng;
        self.population = Some(population);
        self.generation = 1;
        self.config = config;
        self.state = SimState::Running;
        Ok(())
    }

    /// Freezes the loop at the current tick boundary. All data retained.
    pub fn pause(&mut self) {
        if self.state == SimState::Running {
            debug!(generation = self.generation, "simulation paused");
            self.state = SimState::Paused;
        }
    }

    /// Continues a paused run from the exact frozen state; no generation
    /// is skipped or repeated.
    pub fn resume(&mut self) {
        if self.state == SimState::Paused {
            debug!(generation = self.generation, "simulation resumed");
            self.state = SimState::Running;
        }
    }

    /// Stops the run, discarding grid, persons and generation counter
    /// atomically, and returns the telemetry series for the plotting
    /// collaborator. Valid in any state; stopping a stopped controller
    /// yields an empty series.
    pub fn stop(&mut self) -> TelemetrySeries {
        if self.state != SimState::Stopped {
            info!(
                generations = self.telemetry.len(),
                "simulation stopped"
            );
        }
        self.state = SimState::Stopped;
        self.population = None;
        self.generation = 0;
        std::mem::take(&mut self.telemetry)
    }

    /// Advances one generation: emits the generation's snapshot, appends
    /// its infected count to the telemetry, and auto-stops once the
    /// generation counter passes the configured limit. Does nothing
    /// unless running. Generations are strictly sequential; a tick fully
    /// applies generation N before N+1 can start.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != SimState::Running {
            return TickOutcome::Idle;
        }
        let Some(population) = self.population.as_mut() else {
            return TickOutcome::Idle;
        };

        let infected = engine::advance_one_generation(population, &mut self.rng);
        let snapshot = Snapshot::new(self.generation, infected, population.len());
        self.telemetry.record(infected);
        self.generation += 1;

        if let Some(limit) = self.config.generation_limit {
            if self.generation > limit {
                info!(limit, "generation limit reached");
                let series = self.stop();
                return TickOutcome::Completed { snapshot, series };
            }
        }
        TickOutcome::Advanced(snapshot)
    }

    /// Current-state snapshot without advancing, for renderers that
    /// refresh outside the tick cadence.
    pub fn snapshot(&self) -> Option<Snapshot> {
        let population = self.population.as_ref()?;
        Some(Snapshot::new(
            self.generation,
            population.infected_count(),
            population.len(),
        ))
    }

    /// Owned render view of every placed person.
    pub fn render_view(&self) -> Vec<CellView> {
        match &self.population {
            Some(population) => population
                .people()
                .iter()
                .map(|p| CellView {
                    pos: p.pos,
                    has_rumor: p.has_rumor,
                })
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Default for SimulationController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;

    fn small_config() -> SimConfig {
        SimConfig {
            density: 0.05,
            generation_limit: Some(5),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_initial_state_is_stopped() {
        let controller = SimulationController::new();
        assert_eq!(controller.state(), SimState::Stopped);
        assert_eq!(controller.generation(), 0);
        assert!(controller.snapshot().is_none());
        assert!(controller.render_view().is_empty());
    }

    #[test]
    fn test_start_transitions_to_running() {
        let mut controller = SimulationController::new();
        controller.start(small_config()).unwrap();
        assert_eq!(controller.state(), SimState::Running);
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.render_view().len(), 500);
    }

    #[test]
    fn test_start_while_running_fails() {
        let mut controller = SimulationController::new();
        controller.start(small_config()).unwrap();
        assert_eq!(
            controller.start(small_config()).unwrap_err(),
            SimError::AlreadyRunning
        );
        // the running simulation is untouched
        assert_eq!(controller.state(), SimState::Running);
    }

    #[test]
    fn test_failed_start_leaves_controller_stopped() {
        let mut controller = SimulationController::new();
        let config = SimConfig {
            density: 0.0,
            ..SimConfig::default()
        };
        assert_eq!(
            controller.start(config).unwrap_err(),
            SimError::EmptyPopulation
        );
        assert_eq!(controller.state(), SimState::Stopped);
        assert!(controller.render_view().is_empty());
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut controller = SimulationController::new();
        controller.start(small_config()).unwrap();
        assert!(matches!(controller.tick(), TickOutcome::Advanced(_)));
        assert!(matches!(controller.tick(), TickOutcome::Advanced(_)));
        let frozen_generation = controller.generation();
        let frozen_view = controller.render_view();

        controller.pause();
        assert_eq!(controller.state(), SimState::Paused);
        assert_eq!(controller.tick(), TickOutcome::Idle);
        assert_eq!(controller.generation(), frozen_generation);
        assert_eq!(controller.render_view(), frozen_view);

        controller.resume();
        match controller.tick() {
            TickOutcome::Advanced(snapshot) => {
                assert_eq!(snapshot.generation, frozen_generation);
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_pause_outside_running_is_noop() {
        let mut controller = SimulationController::new();
        controller.pause();
        assert_eq!(controller.state(), SimState::Stopped);
        controller.resume();
        assert_eq!(controller.state(), SimState::Stopped);
    }

    #[test]
    fn test_stop_discards_everything() {
        let mut controller = SimulationController::new();
        controller.start(small_config()).unwrap();
        controller.tick();
        controller.tick();
        let series = controller.stop();
        assert_eq!(series.len(), 2);
        assert_eq!(controller.state(), SimState::Stopped);
        assert_eq!(controller.generation(), 0);
        assert!(controller.render_view().is_empty());
        // a second stop yields an empty series
        assert!(controller.stop().is_empty());
    }

    #[test]
    fn test_run_completes_at_generation_limit() {
        let mut controller = SimulationController::new();
        controller.start(small_config()).unwrap();
        let mut snapshots = Vec::new();
        let series = loop {
            match controller.tick() {
                TickOutcome::Advanced(snapshot) => snapshots.push(snapshot),
                TickOutcome::Completed { snapshot, series } => {
                    snapshots.push(snapshot);
                    break series;
                }
                TickOutcome::Idle => panic!("run should complete on its own"),
            }
        };
        // limit 5: generations 1..=5 were computed, one entry each
        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots.last().map(|s| s.generation), Some(5));
        assert_eq!(series.len(), 5);
        assert_eq!(controller.state(), SimState::Stopped);
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_unbounded_run_keeps_advancing() {
        let mut controller = SimulationController::new();
        let config = SimConfig {
            density: 0.05,
            generation_limit: None,
            mode: RunMode::Random,
            ..SimConfig::default()
        };
        controller.start(config).unwrap();
        for _ in 0..50 {
            assert!(matches!(controller.tick(), TickOutcome::Advanced(_)));
        }
        assert_eq!(controller.generation(), 51);
    }
}
