//! Output Types
//!
//! Serialization structs handed to the external renderer and plotting
//! collaborators. Everything here is an owned copy of simulation state;
//! consumers never hold references into the live grid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::grid::Pos;

/// Default path the binary writes the final telemetry to.
pub const TELEMETRY_OUTPUT_PATH: &str = "output/telemetry.json";

/// Per-generation snapshot emitted on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u64,
    pub infected_count: usize,
    pub infected_percentage: f32,
}

impl Snapshot {
    pub fn new(generation: u64, infected_count: usize, n_persons: usize) -> Self {
        let infected_percentage = if n_persons == 0 {
            0.0
        } else {
            infected_count as f32 * 100.0 / n_persons as f32
        };
        Self {
            generation,
            infected_count,
            infected_percentage,
        }
    }
}

/// Render view of one placed person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub pos: Pos,
    pub has_rumor: bool,
}

/// Ordered infected counts, one per completed generation. Handed to the
/// external plotting collaborator when a run stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySeries {
    n_persons: usize,
    infected_per_generation: Vec<usize>,
}

impl TelemetrySeries {
    pub fn new(n_persons: usize) -> Self {
        Self {
            n_persons,
            infected_per_generation: Vec::new(),
        }
    }

    pub fn record(&mut self, infected: usize) {
        self.infected_per_generation.push(infected);
    }

    pub fn counts(&self) -> &[usize] {
        &self.infected_per_generation
    }

    pub fn n_persons(&self) -> usize {
        self.n_persons
    }

    pub fn len(&self) -> usize {
        self.infected_per_generation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infected_per_generation.is_empty()
    }

    /// Counts converted to percentages of the population, the series the
    /// original plot displays.
    pub fn percentages(&self) -> Vec<f32> {
        if self.n_persons == 0 {
            return Vec::new();
        }
        self.infected_per_generation
            .iter()
            .map(|&c| c as f32 * 100.0 / self.n_persons as f32)
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes a telemetry series as pretty JSON, creating parent directories.
pub fn write_telemetry(series: &TelemetrySeries, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = series
        .to_json_pretty()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
