//! Integration tests for leak and excess alerting
//!
//! These tests drive the engine tick by tick:
//! - No alerts from background usage alone
//! - Minor and major leaks confirmed after the debounce window
//! - Leak alerts cleared (not removed) when flow stops
//! - The excess alert raised once per session

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use qatra::alerts::{Alert, AlertKind, Notifier, SoundCue};
use qatra::core::config::EngineConfig;
use qatra::simulation::{Engine, EngineEvent, FlowSource, LeakSeverity};

/// Replays `leak_flow` in a loop while leaking, reads zero otherwise
struct Scripted {
    leak_flow: Vec<f64>,
    next: usize,
}

impl Scripted {
    fn new(leak_flow: &[f64]) -> Self {
        Self {
            leak_flow: leak_flow.to_vec(),
            next: 0,
        }
    }
}

impl FlowSource for Scripted {
    fn sample(&mut self, leaking: bool) -> f64 {
        if !leaking {
            return 0.0;
        }
        let value = self.leak_flow[self.next % self.leak_flow.len()];
        self.next += 1;
        value
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(String, SoundCue)>>>);

impl Notifier for Recorder {
    fn alert_raised(&mut self, alert: &Alert, cue: SoundCue) {
        self.0.lock().unwrap().push((alert.id.clone(), cue));
    }
}

fn engine_with(config: EngineConfig, leak_flow: &[f64]) -> Engine {
    Engine::new(config)
        .unwrap()
        .with_source(Box::new(Scripted::new(leak_flow)))
        .with_start_time(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

fn leak_alerts(engine: &Engine) -> Vec<&Alert> {
    engine
        .alerts()
        .iter()
        .filter(|a| a.kind == AlertKind::Leak)
        .collect()
}

#[test]
fn test_background_usage_raises_nothing() {
    let config = EngineConfig {
        seed: Some(2024),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config).unwrap();
    assert_eq!(engine.state().total_today, 150.0);

    let mut previous = engine.state().total_today;
    for _ in 0..20 {
        engine.tick();
        let state = engine.state();
        assert!(state.total_today >= previous, "total must not decrease");
        assert!(
            state.current_flow_rate == 0.0
                || (state.current_flow_rate > 0.5 && state.current_flow_rate < 2.0),
            "unexpected background flow {}",
            state.current_flow_rate
        );
        previous = state.total_today;
    }

    assert!(engine.alerts().is_empty());
    assert!(engine.state().total_today < 151.0);
}

#[test]
fn test_minor_leak_confirmed_once() {
    let mut engine = engine_with(EngineConfig::default(), &[3.0, 7.5, 9.9, 1.2]);
    engine.toggle_leak();

    // Window opens on the first tick (500 ms) and elapses at 5500 ms
    engine.advance(5000);
    assert!(leak_alerts(&engine).is_empty());

    let events = engine.tick();
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::LeakConfirmed {
            severity: LeakSeverity::Minor,
            ..
        }
    )));

    // Later windows of the same episode do not add alerts
    engine.advance(20_000);
    let leaks = leak_alerts(&engine);
    assert_eq!(leaks.len(), 1);
    assert!(leaks[0].active);
    assert!(leaks[0].message.contains("pipe or fixture"));
}

#[test]
fn test_major_leak_toggle_raises_and_clears() {
    let mut engine = engine_with(EngineConfig::default(), &[3.0]);
    engine.toggle_large_leak();

    // Window opened by the intent at 0 ms elapses on the tick at 5000 ms
    engine.advance(5000);
    let leaks = leak_alerts(&engine);
    assert_eq!(leaks.len(), 1);
    assert!(leaks[0].message.contains("tank overflow"));

    engine.advance(10_000);
    assert_eq!(leak_alerts(&engine).len(), 1);

    let events = engine.toggle_large_leak();
    assert_eq!(engine.state().current_flow_rate, 0.0);
    assert!(!engine.state().is_leaking);
    assert!(!engine.is_watching());
    assert!(events.contains(&EngineEvent::LeakCleared { count: 1 }));

    let leaks = leak_alerts(&engine);
    assert_eq!(leaks.len(), 1, "cleared alerts stay in the log");
    assert!(!leaks[0].active);
}

#[test]
fn test_flow_stopping_cancels_window() {
    let mut engine = engine_with(EngineConfig::default(), &[4.0]);
    engine.toggle_leak();
    engine.advance(2000);
    assert!(engine.is_watching());

    engine.toggle_leak();
    let events = engine.tick();
    assert_eq!(engine.state().current_flow_rate, 0.0);
    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::LeakWatchCancelled { .. })));
    assert!(!engine.is_watching());

    engine.advance(10_000);
    assert!(engine.alerts().is_empty());
}

#[test]
fn test_new_episode_after_clear_raises_new_alert() {
    let mut engine = engine_with(EngineConfig::default(), &[4.0]);

    engine.toggle_leak();
    engine.advance(6000);
    engine.toggle_leak();
    engine.tick();
    assert!(!engine.alerts().find_active(AlertKind::Leak));

    engine.toggle_leak();
    engine.advance(6000);

    let leaks = leak_alerts(&engine);
    assert_eq!(leaks.len(), 2);
    assert!(leaks[0].active, "newest alert is first and active");
    assert!(!leaks[1].active);
    assert_ne!(leaks[0].id, leaks[1].id);
}

#[test]
fn test_clear_without_alert_is_noop() {
    let mut engine = engine_with(EngineConfig::default(), &[4.0]);
    engine.toggle_leak();
    let events = engine.toggle_leak();

    assert!(events.is_empty());
    assert!(engine.alerts().is_empty());
}

#[test]
fn test_excess_alert_is_one_shot() {
    let config = EngineConfig {
        initial_total: 499.9,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(config, &[9.0]);
    engine.toggle_leak();
    engine.advance(60_000);

    let excess: Vec<_> = engine
        .alerts()
        .iter()
        .filter(|a| a.kind == AlertKind::Excess)
        .collect();
    assert_eq!(excess.len(), 1);
    assert_eq!(excess[0].id, "excess");

    // Raising and lowering the goal again does not re-arm it
    engine.set_daily_goal(10_000.0).unwrap();
    engine.advance(1000);
    engine.set_daily_goal(100.0).unwrap();
    engine.advance(1000);

    let count = engine
        .alerts()
        .iter()
        .filter(|a| a.kind == AlertKind::Excess)
        .count();
    assert_eq!(count, 1);
}

#[test]
fn test_notifier_hears_each_raised_alert() {
    let recorder = Recorder::default();
    let config = EngineConfig {
        initial_total: 499.0,
        ..EngineConfig::default()
    };
    let mut engine = engine_with(config, &[3.0]).with_notifier(Box::new(recorder.clone()));

    engine.toggle_large_leak();
    engine.advance(30_000);

    let heard = recorder.0.lock().unwrap().clone();
    let ids: Vec<_> = heard.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids.len(), 2, "one leak and one excess alert, got {:?}", ids);
    assert!(ids.contains(&"excess"));
    assert!(ids.iter().any(|id| id.starts_with("leak-")));
    assert!(heard.iter().all(|(_, cue)| *cue == SoundCue::Alert));
}
