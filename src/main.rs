//! Rumor Propagation Simulation Engine
//!
//! Headless driver for the cellular automaton: loads configuration,
//! runs the generation loop at the configured cadence, and writes the
//! final telemetry series for plotting.

use clap::Parser;
use std::thread;
use tracing_subscriber::EnvFilter;

use rumor_sim::output::{self, TELEMETRY_OUTPUT_PATH};
use rumor_sim::{RunMode, SimConfig, SimulationController, TickOutcome};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "rumor_sim")]
#[command(about = "Rumor propagation on a cellular automaton grid")]
struct Args {
    /// Configuration file (TOML); defaults are used if absent
    #[arg(long)]
    config: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Population-generation strategy
    #[arg(long, value_enum)]
    mode: Option<RunMode>,

    /// Population density (fraction of cells occupied)
    #[arg(long)]
    density: Option<f64>,

    /// Generation limit (overrides the configured limit)
    #[arg(long)]
    generations: Option<u64>,

    /// Run as fast as possible instead of at the tick cadence
    #[arg(long)]
    no_delay: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::load_or_default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(density) = args.density {
        config.density = density;
    }
    if let Some(generations) = args.generations {
        config.generation_limit = Some(generations);
    }

    println!("Rumor Propagation Simulation");
    println!("============================");
    println!("Seed: {}", config.seed);
    println!("Mode: {:?}", config.mode);
    println!("Density: {} ({} persons)", config.density, config.n_persons());
    println!("Cooldown: {}", config.cooldown);
    match config.generation_limit {
        Some(limit) => println!("Generations: {}", limit),
        None => println!("Generations: unbounded"),
    }
    println!();

    let mut controller = SimulationController::new();
    if let Err(e) = controller.start(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let interval = controller.tick_interval();

    let series = loop {
        match controller.tick() {
            TickOutcome::Advanced(snapshot) => {
                if snapshot.generation % 10 == 0 {
                    println!(
                        "[Generation {:>4}] infected: {} ({:.1}%)",
                        snapshot.generation, snapshot.infected_count, snapshot.infected_percentage
                    );
                }
                if !args.no_delay {
                    thread::sleep(interval);
                }
            }
            TickOutcome::Completed { snapshot, series } => {
                println!(
                    "[Generation {:>4}] infected: {} ({:.1}%)",
                    snapshot.generation, snapshot.infected_count, snapshot.infected_percentage
                );
                break series;
            }
            TickOutcome::Idle => break controller.stop(),
        }
    };

    println!();
    println!("Simulation complete. Ran {} generations.", series.len());
    if let Err(e) = output::write_telemetry(&series, TELEMETRY_OUTPUT_PATH) {
        eprintln!("Warning: Could not write telemetry: {}", e);
    } else {
        println!("Wrote {}", TELEMETRY_OUTPUT_PATH);
    }
}
