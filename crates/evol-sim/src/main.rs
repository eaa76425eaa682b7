//! Command-line driver: load a scene, run it, print the final state.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use evol_core::SimulationConfig;
use evol_world::{parse, SceneDescription, Simulation, DEMO_SCENE};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "evol-sim", version, about = "Run a creature scene through the simulator")]
struct Args {
    /// Scene file (text format, or JSON with a .json extension); the demo scene when omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// JSON simulation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured number of ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.log_json)?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(ticks) = args.ticks {
        config.num_ticks = ticks;
    }

    let description = match &args.scene {
        Some(path) => load_scene(path)?,
        None => {
            info!("No scene given, using the demo scene");
            parse(DEMO_SCENE)?
        }
    };

    let scene = description.build(&config).context("building scene")?;
    let mut simulation = Simulation::new(scene, config)?;
    let result = simulation.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", result.final_state);
    }

    Ok(())
}

fn load_scene(path: &Path) -> Result<SceneDescription> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let description = if is_json {
        SceneDescription::from_json_str(&text)
    } else {
        parse(&text)
    };
    description.with_context(|| format!("parsing scene {}", path.display()))
}
