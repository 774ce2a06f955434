//! The simulation and alerting engine
//!
//! Owns the simulation state, the alert log and the debounce timer, and is
//! their only writer. Front-ends read [`Snapshot`]s and change things only
//! through intents. Within a tick, due timers fire first, then the flow
//! reading is taken, then both detectors react to the new state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{AlertKind, AlertLog, LogNotifier, Notifier, SoundCue};
use crate::core::clock::SimClock;
use crate::core::config::{check_goal, EngineConfig};
use crate::core::error::Result;
use crate::core::timer::TimerQueue;
use crate::core::types::{Liters, SimMillis};
use crate::simulation::events::{EngineEvent, EngineTimer};
use crate::simulation::excess::ExcessDetector;
use crate::simulation::flow::{FlowSimulator, FlowSource, RandomFlow};
use crate::simulation::leak::LeakDetector;
use crate::simulation::snapshot::Snapshot;
use crate::simulation::state::SimulationState;

/// State changes a front-end may request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    ToggleLeak,
    ToggleLargeLeak,
    SetDailyGoal(Liters),
}

pub struct Engine {
    config: EngineConfig,
    clock: SimClock,
    timers: TimerQueue<EngineTimer>,
    state: SimulationState,
    flow: FlowSimulator,
    leak: LeakDetector,
    excess: ExcessDetector,
    log: AlertLog,
    notifier: Box<dyn Notifier>,
    started_at: DateTime<Utc>,
}

impl Engine {
    /// Engine with random flow readings and log-only notifications
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let source = RandomFlow::from_config(&config);

        Ok(Self {
            clock: SimClock::new(config.tick_period_ms),
            timers: TimerQueue::new(),
            state: SimulationState::new(config.initial_total),
            flow: FlowSimulator::new(Box::new(source), config.noise_gate),
            leak: LeakDetector::new(config.debounce_ms, config.major_leak_threshold),
            excess: ExcessDetector::new(config.daily_goal),
            log: AlertLog::new(),
            notifier: Box::new(LogNotifier),
            started_at: Utc::now(),
            config,
        })
    }

    /// Replace the flow source (telemetry, scripted readings)
    pub fn with_source(mut self, source: Box<dyn FlowSource>) -> Self {
        self.flow = FlowSimulator::new(source, self.config.noise_gate);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Wall-clock time that simulated time zero maps to
    pub fn with_start_time(mut self, started_at: DateTime<Utc>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.log
    }

    pub fn daily_goal(&self) -> Liters {
        self.excess.daily_goal()
    }

    pub fn now_ms(&self) -> SimMillis {
        self.clock.now_ms()
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn is_large_leak(&self) -> bool {
        self.flow.pinned().is_some()
    }

    pub fn is_watching(&self) -> bool {
        self.leak.is_watching()
    }

    /// Wall-clock time of the current simulated instant, saturating at the
    /// latest representable time
    pub fn wall_time(&self) -> DateTime<Utc> {
        i64::try_from(self.clock.now_ms())
            .ok()
            .and_then(Duration::try_milliseconds)
            .and_then(|elapsed| self.started_at.checked_add_signed(elapsed))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            alerts: self.log.to_vec(),
            daily_goal: self.excess.daily_goal(),
            elapsed_ms: self.clock.now_ms(),
            ticks: self.clock.ticks(),
            leak_watch: self.leak.is_watching(),
        }
    }

    /// Advance one tick period
    pub fn tick(&mut self) -> Vec<EngineEvent> {
        self.clock.advance();
        let now = self.clock.now_ms();
        let at = self.wall_time();
        let mut events = Vec::new();

        while let Some((id, timer)) = self.timers.pop_due(now) {
            match timer {
                EngineTimer::LeakDebounce => {
                    self.leak
                        .window_elapsed(id, &self.state, &mut self.log, at, now, &mut events)
                }
            }
        }

        let added = self.flow.step(&mut self.state, self.config.tick_seconds());
        tracing::trace!(
            tick = self.clock.ticks(),
            flow = self.state.current_flow_rate,
            added,
            total = self.state.total_today,
            "flow tick"
        );

        self.react(&mut events);
        self.dispatch(&events);
        events
    }

    /// Run every whole tick that fits in `duration_ms`
    pub fn advance(&mut self, duration_ms: SimMillis) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for _ in 0..self.clock.ticks_in(duration_ms) {
            events.extend(self.tick());
        }
        events
    }

    /// Flip the leak signal. Switching it off also ends a large leak.
    pub fn toggle_leak(&mut self) -> Vec<EngineEvent> {
        self.state.is_leaking = !self.state.is_leaking;
        if !self.state.is_leaking {
            self.flow.unpin();
        }
        tracing::info!(leaking = self.state.is_leaking, "leak simulation toggled");
        self.react_now()
    }

    /// Start or stop a large leak with its flow forced above the major threshold
    pub fn toggle_large_leak(&mut self) -> Vec<EngineEvent> {
        if self.flow.pinned().is_some() {
            self.flow.unpin();
            self.state.is_leaking = false;
            self.state.current_flow_rate = 0.0;
        } else {
            let rate = self.config.large_leak_flow;
            self.flow.pin(rate);
            self.state.is_leaking = true;
            self.state.current_flow_rate = rate;
        }
        tracing::info!(large = self.is_large_leak(), "large leak simulation toggled");
        self.react_now()
    }

    pub fn set_daily_goal(&mut self, goal: Liters) -> Result<Vec<EngineEvent>> {
        check_goal(goal)?;
        self.excess.set_daily_goal(goal);
        tracing::info!(goal, "daily goal updated");
        Ok(self.react_now())
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Vec<EngineEvent>> {
        match intent {
            Intent::ToggleLeak => Ok(self.toggle_leak()),
            Intent::ToggleLargeLeak => Ok(self.toggle_large_leak()),
            Intent::SetDailyGoal(goal) => self.set_daily_goal(goal),
        }
    }

    /// Cancel every outstanding timer. Returns how many were dropped.
    pub fn shutdown(&mut self) -> usize {
        self.leak.reset();
        let dropped = self.timers.clear();
        tracing::info!(dropped, ticks = self.clock.ticks(), "engine stopped");
        dropped
    }

    fn react_now(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.react(&mut events);
        self.dispatch(&events);
        events
    }

    fn react(&mut self, events: &mut Vec<EngineEvent>) {
        let now = self.clock.now_ms();
        let at = self.wall_time();
        self.leak
            .observe(&self.state, &mut self.log, &mut self.timers, now, events);
        self.excess.check(&self.state, &mut self.log, at, events);
    }

    fn dispatch(&mut self, events: &[EngineEvent]) {
        for event in events {
            if let Some(alert) = event.raised_alert() {
                self.notifier
                    .alert_raised(alert, SoundCue::for_alert(alert.kind));
            } else if let EngineEvent::LeakCleared { count } = event {
                self.notifier.alerts_cleared(AlertKind::Leak, *count);
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("ticks", &self.clock.ticks())
            .field("state", &self.state)
            .field("alerts", &self.log.len())
            .field("flow", &self.flow)
            .finish_non_exhaustive()
    }
}
