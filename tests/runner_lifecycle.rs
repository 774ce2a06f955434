//! Integration tests for the real-time engine runner
//!
//! All tests use start_paused so the tokio clock only moves when every
//! task is idle, which makes tick counts deterministic.

use std::time::Duration;

use qatra::alerts::AlertKind;
use qatra::core::config::EngineConfig;
use qatra::simulation::{self, Engine, FlowSource};

struct LeakOnly(f64);

impl FlowSource for LeakOnly {
    fn sample(&mut self, leaking: bool) -> f64 {
        if leaking {
            self.0
        } else {
            0.0
        }
    }
}

fn engine() -> Engine {
    Engine::new(EngineConfig::default())
        .unwrap()
        .with_source(Box::new(LeakOnly(4.0)))
}

#[tokio::test(start_paused = true)]
async fn test_ticks_follow_the_interval() {
    let handle = simulation::spawn(engine());

    tokio::time::sleep(Duration::from_millis(2250)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.ticks, 4);
    assert_eq!(snapshot.elapsed_ms, 2000);

    let engine = handle.stop().await.unwrap();
    assert_eq!(engine.ticks(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_large_leak_alert_published_in_snapshot() {
    let handle = simulation::spawn(engine());
    handle.toggle_large_leak().unwrap();

    tokio::time::sleep(Duration::from_millis(6250)).await;
    let snapshot = handle.snapshot();
    assert!(snapshot.state.is_leaking);
    assert_eq!(snapshot.state.current_flow_rate, 15.0);
    let alert = snapshot.active_leak().expect("leak alert after debounce");
    assert!(alert.message.contains("tank overflow"));

    handle.toggle_large_leak().unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.state.current_flow_rate, 0.0);
    assert!(snapshot.active_leak().is_none());
    assert_eq!(snapshot.count(AlertKind::Leak), 1);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_pending_window() {
    let handle = simulation::spawn(engine());
    handle.toggle_leak().unwrap();

    tokio::time::sleep(Duration::from_millis(1250)).await;
    assert!(handle.snapshot().leak_watch);

    let engine = handle.stop().await.unwrap();
    assert!(!engine.is_watching());
    assert!(engine.alerts().is_empty());
    assert_eq!(engine.ticks(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_goal_is_ignored() {
    let handle = simulation::spawn(engine());
    handle.set_daily_goal(-5.0).unwrap();
    handle.set_daily_goal(100.0).unwrap();

    tokio::time::sleep(Duration::from_millis(750)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.daily_goal, 100.0);
    assert_eq!(snapshot.count(AlertKind::Excess), 1);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_updates() {
    let handle = simulation::spawn(engine());
    let mut updates = handle.subscribe();

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow().ticks, 1);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_final_snapshot_outlives_task() {
    let handle = simulation::spawn(engine());
    let updates = handle.subscribe();
    assert!(handle.is_running());

    let engine = handle.stop().await.unwrap();
    assert_eq!(engine.ticks(), 0);
    assert_eq!(updates.borrow().ticks, 0);
    assert!(!updates.borrow().leak_watch);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_cancels_pending_window() {
    let handle = simulation::spawn(engine());
    let mut updates = handle.subscribe();
    handle.toggle_large_leak().unwrap();

    tokio::time::sleep(Duration::from_millis(1250)).await;
    assert!(handle.snapshot().leak_watch);
    drop(handle);

    // Drain until the task ends and the sender closes
    while updates.changed().await.is_ok() {}

    let last = updates.borrow();
    assert!(!last.leak_watch);
    assert_eq!(last.ticks, 2);
    assert!(last.alerts.is_empty());
}
