//! Real-time driver for the engine
//!
//! A tokio task owns the [`Engine`], ticks it on an interval, applies
//! intents from a channel and publishes a [`Snapshot`] after every change.
//! Stopping the task (or dropping the handle) cancels the engine's timers,
//! so nothing fires into a discarded session.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::error::{QatraError, Result};
use crate::core::types::Liters;
use crate::simulation::engine::{Engine, Intent};
use crate::simulation::snapshot::Snapshot;

/// Handle to a running engine task
#[derive(Debug)]
pub struct EngineHandle {
    intents: mpsc::UnboundedSender<Intent>,
    snapshots: watch::Receiver<Snapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Engine>,
}

/// Start ticking `engine` on the current tokio runtime
pub fn spawn(engine: Engine) -> EngineHandle {
    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run(engine, intent_rx, snapshot_tx, shutdown_rx));

    EngineHandle {
        intents: intent_tx,
        snapshots: snapshot_rx,
        shutdown: Some(shutdown_tx),
        task,
    }
}

async fn run(
    mut engine: Engine,
    mut intents: mpsc::UnboundedReceiver<Intent>,
    snapshots: watch::Sender<Snapshot>,
    mut shutdown: oneshot::Receiver<()>,
) -> Engine {
    let period = Duration::from_millis(engine.config().tick_period_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(period_ms = engine.config().tick_period_ms, "engine running");

    loop {
        tokio::select! {
            biased;

            // A dropped handle also lands here
            _ = &mut shutdown => break,

            Some(intent) = intents.recv() => {
                if let Err(e) = engine.apply(intent) {
                    tracing::warn!(?intent, "intent rejected: {}", e);
                    continue;
                }
            }

            _ = ticker.tick() => {
                engine.tick();
            }
        }
        snapshots.send_replace(engine.snapshot());
    }

    engine.shutdown();
    snapshots.send_replace(engine.snapshot());
    engine
}

impl EngineHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn toggle_leak(&self) -> Result<()> {
        self.send(Intent::ToggleLeak)
    }

    pub fn toggle_large_leak(&self) -> Result<()> {
        self.send(Intent::ToggleLargeLeak)
    }

    pub fn set_daily_goal(&self, goal: Liters) -> Result<()> {
        self.send(Intent::SetDailyGoal(goal))
    }

    pub fn send(&self, intent: Intent) -> Result<()> {
        self.intents
            .send(intent)
            .map_err(|_| QatraError::EngineStopped)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop ticking and get the engine back, with its timers cancelled
    pub async fn stop(mut self) -> Result<Engine> {
        if let Some(shutdown) = self.shutdown.take() {
            // The task may already be gone; joining reports that
            let _ = shutdown.send(());
        }
        self.task
            .await
            .map_err(|e| QatraError::Runtime(e.to_string()))
    }
}
