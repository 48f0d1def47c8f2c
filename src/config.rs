//! Configuration System
//!
//! Typed simulation parameters, loadable from a TOML file so experiments
//! can be adjusted without recompiling. Widget-level validation and
//! formatting belong to the front-end; the core only derives counts and
//! rejects configurations it cannot run (see `population::generate`).

use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::grid::DIM;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "rumor.toml";

/// Population-generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Weighted-random class per person; proportions hold in expectation.
    #[serde(alias = "r")]
    #[value(alias = "r")]
    Random,
    /// Clustered by neighbor degree: resistant classes fill the densest
    /// spots first, so the rumor spreads slowly.
    #[serde(alias = "s")]
    #[value(alias = "s")]
    Slow,
    /// Round-robin over a position-sorted walk: classes interleave, so
    /// the rumor spreads fast.
    #[serde(alias = "f")]
    #[value(alias = "f")]
    Fast,
}

/// Simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Population density P: fraction of grid cells occupied, 0 to 1.
    pub density: f64,
    /// Cooldown length L: generations a spreader waits before it may
    /// re-transmit.
    pub cooldown: u32,
    /// Skepticism-class proportions. Should sum to 1; not enforced.
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    /// Stop automatically once the generation counter passes this limit.
    /// `None` runs unbounded.
    pub generation_limit: Option<u64>,
    /// Population-generation strategy.
    pub mode: RunMode,
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Cadence between generation ticks, for real-time drivers.
    pub tick_interval_ms: u64,
}

impl SimConfig {
    /// Number of persons to place: floor(DIM² · density).
    ///
    /// Callers must not assume the class targets sum to this; flooring
    /// may leave a remainder.
    pub fn n_persons(&self) -> usize {
        ((DIM * DIM) as f64 * self.density).floor() as usize
    }

    /// Per-class target counts: floor(n_persons · S_i), indexed S1..S4.
    pub fn class_targets(&self) -> [usize; 4] {
        let n = self.n_persons() as f64;
        [
            (n * self.s1).floor() as usize,
            (n * self.s2).floor() as usize,
            (n * self.s3).floor() as usize,
            (n * self.s4).floor() as usize,
        ]
    }

    /// Class weights for the random strategy's weighted draw.
    pub fn class_weights(&self) -> [f64; 4] {
        [self.s1, self.s2, self.s3, self.s4]
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from the default path, or use defaults if the
    /// file is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            if Path::new(DEFAULT_CONFIG_PATH).exists() {
                eprintln!("Warning: {}. Using defaults.", e);
            }
            Self::default()
        })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            density: 0.6,
            cooldown: 2,
            s1: 0.3,
            s2: 0.25,
            s3: 0.2,
            s4: 0.25,
            generation_limit: Some(100),
            mode: RunMode::Random,
            seed: 42,
            tick_interval_ms: 100,
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
    #[error("could not parse {path}: {message}")]
    Parse { path: String, message: String },
}
