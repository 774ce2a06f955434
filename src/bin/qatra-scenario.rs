//! Headless scenario runner
//!
//! Runs the engine for a fixed number of ticks, optionally switching leaks
//! on part-way, and prints the outcome as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use qatra::alerts::Alert;
use qatra::core::config::EngineConfig;
use qatra::core::error::Result;
use qatra::household::{TankLevel, TankReport};
use qatra::simulation::{Engine, EngineEvent, SimulationState};

/// Headless Scenario Runner - simulate a stretch of household water usage
#[derive(Parser, Debug)]
#[command(name = "qatra-scenario")]
#[command(about = "Run the water-monitoring engine headless and report alerts")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Daily goal in liters (overrides the config file)
    #[arg(long)]
    goal: Option<f64>,

    /// Tick at which the simulated leak is switched on
    #[arg(long)]
    leak_at: Option<u64>,

    /// Tick at which the simulated large leak is switched on
    #[arg(long)]
    major_at: Option<u64>,

    /// Tick at which any leak is switched off again
    #[arg(long)]
    stop_at: Option<u64>,

    /// Engine config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every engine event
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResult {
    ticks: u64,
    elapsed_ms: u64,
    seed: u64,
    daily_goal: f64,
    state: SimulationState,
    tank_level: TankLevel,
    alerts: Vec<Alert>,
    events: Vec<EngineEvent>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(goal) = args.goal {
        config.daily_goal = goal;
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);

    let mut engine = Engine::new(config)?;
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        if args.leak_at == Some(tick) && !engine.state().is_leaking {
            events.extend(engine.toggle_leak());
        }
        if args.major_at == Some(tick) && !engine.is_large_leak() {
            events.extend(engine.toggle_large_leak());
        }
        if args.stop_at == Some(tick) {
            if engine.is_large_leak() {
                events.extend(engine.toggle_large_leak());
            } else if engine.state().is_leaking {
                events.extend(engine.toggle_leak());
            }
        }
        events.extend(engine.tick());
    }
    engine.shutdown();

    let snapshot = engine.snapshot();
    let result = ScenarioResult {
        ticks: snapshot.ticks,
        elapsed_ms: snapshot.elapsed_ms,
        seed,
        daily_goal: snapshot.daily_goal,
        tank_level: TankReport::new(None, snapshot.state.total_today).level,
        state: snapshot.state,
        alerts: snapshot.alerts,
        events: if args.verbose { events } else { Vec::new() },
    };

    if args.format == "text" {
        print_text(&result);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

fn print_text(result: &ScenarioResult) {
    println!(
        "{} ticks ({:.1}s), seed {}",
        result.ticks,
        result.elapsed_ms as f64 / 1000.0,
        result.seed
    );
    println!(
        "Flow {:.1} L/min, today {:.1} L of {:.0} L, tank {:?}",
        result.state.current_flow_rate,
        result.state.total_today,
        result.daily_goal,
        result.tank_level
    );
    for event in &result.events {
        println!("  {:?}", event);
    }
    if result.alerts.is_empty() {
        println!("No alerts");
    }
    for alert in &result.alerts {
        println!(
            "  [{}] {}{}",
            alert.kind,
            alert.message,
            if alert.active { "" } else { " (resolved)" }
        );
    }
}
