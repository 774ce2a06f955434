//! Qatra - Entry Point
//!
//! Interactive terminal front-end for the water-monitoring engine. Ticks
//! the simulation on demand (or in real time with `live`), toggles simulated
//! leaks and shows alerts, tank levels and advice.

use qatra::advisor::{self, AdvisorClient};
use qatra::alerts::{Alert, AlertKind, Notifier, SoundCue};
use qatra::core::config::EngineConfig;
use qatra::core::error::Result;
use qatra::household::{sample_history, HistorySummary, TankReport};
use qatra::settings::{parse_tank_count, FileStore, SettingsRepository, UserSettings, Weekday};
use qatra::simulation::{self, Engine, Snapshot};

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Prints raised alerts straight to the terminal
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert_raised(&mut self, alert: &Alert, cue: SoundCue) {
        let bell = if cue == SoundCue::Alert { "\x07" } else { "" };
        println!("{}!! [{}] {}", bell, alert.kind, alert.message);
    }

    fn alerts_cleared(&mut self, kind: AlertKind, count: usize) {
        println!("-- {} {} alert(s) cleared", count, kind);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qatra=info".into()),
        )
        .init();

    tracing::info!("Qatra starting...");

    // Runtime for live mode and advisor calls
    let rt = Runtime::new()?;

    let config = match std::env::var("QATRA_CONFIG") {
        Ok(path) => EngineConfig::load(&PathBuf::from(path))?,
        Err(_) => EngineConfig::default(),
    };
    let major_threshold = config.major_leak_threshold;

    let store_path = std::env::var("QATRA_STORE").unwrap_or_else(|_| "qatra_store.json".into());
    let mut settings_repo = SettingsRepository::new(FileStore::new(store_path));
    let mut settings = settings_repo.load()?;

    let mut engine = Engine::new(config)?.with_notifier(Box::new(ConsoleNotifier));

    // Remote advice is optional - local rules work without it
    let advisor_client = AdvisorClient::from_env().ok();
    if advisor_client.is_none() {
        tracing::warn!("QATRA_ADVISOR_KEY not set - using local advice only");
    }

    println!("\n=== QATRA ===");
    match &settings {
        Some(s) => println!("Welcome back, {}.", s.name),
        None => println!("No household set up yet. Use: setup <name> <tanks> <refill day>"),
    }
    println!();
    println!("Commands:");
    println!("  tick / t              - Advance the simulation by one tick");
    println!("  run <n>               - Run n ticks");
    println!("  live <seconds>        - Run in real time");
    println!("  leak                  - Toggle the simulated leak");
    println!("  major                 - Toggle the simulated large leak");
    println!("  goal <liters>         - Set the daily goal");
    println!("  status / s            - Show flow, total and goal");
    println!("  alerts / a            - List alerts");
    println!("  tank                  - Show tank levels");
    println!("  history               - Summarize monthly usage");
    println!("  advice                - Show advice and tips");
    println!("  setup <name> <tanks> <day> - Save household settings");
    println!("  quit / q              - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "quit" | "q" => break,

            "tick" | "t" => {
                engine.tick();
                display_status(&engine.snapshot());
            }

            "run" => match words.next().and_then(|n| n.parse::<u32>().ok()) {
                Some(n) => {
                    for _ in 0..n {
                        engine.tick();
                    }
                    display_status(&engine.snapshot());
                }
                None => println!("Usage: run <number>"),
            },

            "live" => match words.next().and_then(|n| n.parse::<u64>().ok()) {
                Some(secs) => {
                    println!("Running live for {}s...", secs);
                    engine = rt.block_on(async move {
                        let handle = simulation::spawn(engine);
                        tokio::time::sleep(Duration::from_secs(secs)).await;
                        handle.stop().await
                    })?;
                    display_status(&engine.snapshot());
                }
                None => println!("Usage: live <seconds>"),
            },

            "leak" => {
                engine.toggle_leak();
                println!(
                    "Leak simulation {}",
                    if engine.state().is_leaking { "on" } else { "off" }
                );
            }

            "major" => {
                engine.toggle_large_leak();
                println!(
                    "Large leak simulation {}",
                    if engine.is_large_leak() { "on" } else { "off" }
                );
            }

            "goal" => match words.next().and_then(|g| g.parse::<f64>().ok()) {
                Some(goal) => match engine.set_daily_goal(goal) {
                    Ok(_) => println!("Daily goal set to {:.0} L", goal),
                    Err(e) => println!("{}", e),
                },
                None => println!("Usage: goal <liters>"),
            },

            "status" | "s" => display_status(&engine.snapshot()),

            "alerts" | "a" => display_alerts(&engine.snapshot()),

            "tank" => display_tank(&TankReport::new(
                settings.as_ref(),
                engine.state().total_today,
            )),

            "history" => {
                let months = sample_history();
                for m in &months {
                    println!(
                        "  {:<10} {:>7.0} L (limit {:.0}){}",
                        m.month,
                        m.usage,
                        m.limit,
                        if m.over_limit() { "  OVER" } else { "" }
                    );
                }
                if let Some(summary) = HistorySummary::from_months(&months) {
                    println!(
                        "Average {:.0} L, peak {} ({:.0} L), {} month(s) over limit",
                        summary.average_usage,
                        summary.peak_month,
                        summary.peak_usage,
                        summary.months_over_limit
                    );
                }
            }

            "advice" => {
                let state = engine.state().clone();
                let local = advisor::local_advice(
                    &state,
                    settings.as_ref(),
                    major_threshold,
                    &mut rand::thread_rng(),
                );
                println!();
                println!(
                    "{}: {}",
                    if local.urgent { "URGENT" } else { "Status" },
                    local.headline
                );
                let tips = match &advisor_client {
                    Some(client) => {
                        let (summary, tips) = rt.block_on(async {
                            tokio::join!(
                                client.analyze_or_fallback(&state, settings.as_ref()),
                                client.tips_or_fallback(&state)
                            )
                        });
                        println!("Advisor: {}", summary);
                        tips
                    }
                    None => local.tips,
                };
                for tip in &tips {
                    println!("  * {}", tip);
                }
                println!();
            }

            "setup" => {
                let args: Vec<&str> = words.collect();
                if args.len() < 3 {
                    println!("Usage: setup <name> <tanks> <refill day>");
                    continue;
                }
                let Some(day) = Weekday::parse(args[2]) else {
                    println!("Unknown day: {}", args[2]);
                    continue;
                };
                let new_settings = UserSettings {
                    refill_stop_info: args[3..].join(" "),
                    ..UserSettings::new(args[0], parse_tank_count(args[1]), day)
                };
                match settings_repo.save(&new_settings) {
                    Ok(()) => {
                        println!("Saved settings for {}", new_settings.name);
                        settings = Some(new_settings);
                    }
                    Err(e) => println!("{}", e),
                }
            }

            _ => println!("Unknown command: {}", command),
        }
    }

    engine.shutdown();
    let snapshot = engine.snapshot();
    println!(
        "\nGoodbye! {:.1} L used, {} alert(s), {} ticks elapsed.",
        snapshot.state.total_today,
        snapshot.alerts.len(),
        snapshot.ticks
    );
    Ok(())
}

fn display_status(snapshot: &Snapshot) {
    let state = &snapshot.state;
    println!();
    println!(
        "--- {:.1}s | Flow {:.1} L/min{} | Today {:.0} L of {:.0} L ({:.0}%) ---",
        snapshot.elapsed_ms as f64 / 1000.0,
        state.current_flow_rate,
        if state.is_flowing() { " (flowing)" } else { "" },
        state.total_today,
        snapshot.daily_goal,
        snapshot.goal_percentage()
    );
    match snapshot.active_leak() {
        Some(alert) => println!("  WARNING: {}", alert.message),
        None if snapshot.leak_watch => println!("  Watching sustained flow..."),
        None => println!("  System stable, no leaks detected."),
    }
    println!();
}

fn display_alerts(snapshot: &Snapshot) {
    if snapshot.alerts.is_empty() {
        println!("No alerts.");
        return;
    }
    for alert in &snapshot.alerts {
        println!(
            "  {} [{}] {}{}",
            alert.timestamp.format("%H:%M:%S"),
            alert.kind,
            alert.message,
            if alert.active { "" } else { " (resolved)" }
        );
    }
}

fn display_tank(report: &TankReport) {
    println!(
        "{} tank(s): {:.0} of {:.0} L left ({:.0}%, {:?})",
        report.tank_count, report.remaining, report.capacity, report.percent_full, report.level
    );
    if report.is_low() {
        println!("  Water is running low. Reduce usage until the next refill.");
    }
}
