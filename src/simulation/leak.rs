//! Leak detector
//!
//! ```text
//!            flow > 0                 window elapsed, leak signal set
//!  Idle ─────────────────► Watching ────────────────────────────► Confirmed
//!   ▲                        │                                       │
//!   │      flow == 0         │                                       │
//!   └────────────────────────┘                                       │
//!   ▲            flow == 0 and no leak signal: alert switched off    │
//!   └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only a return to exactly zero flow cancels the window or clears the
//! alert. Flow that drops but stays non-zero keeps the episode alive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{Alert, AlertKind, AlertLog};
use crate::core::timer::{TimerId, TimerQueue};
use crate::core::types::{LitersPerMinute, SimMillis};
use crate::simulation::events::{EngineEvent, EngineTimer};
use crate::simulation::state::SimulationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeakSeverity {
    Minor,
    Major,
}

impl LeakSeverity {
    /// Flow strictly above `major_threshold` is a major leak
    pub fn classify(rate: LitersPerMinute, major_threshold: LitersPerMinute) -> Self {
        if rate > major_threshold {
            LeakSeverity::Major
        } else {
            LeakSeverity::Minor
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LeakSeverity::Major => {
                "Major leak: probable tank overflow. Check the main tank and float valves immediately."
            }
            LeakSeverity::Minor => {
                "Minor leak: probable seepage from a pipe or fixture. Check taps, sinks and cisterns."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeakDetector {
    debounce_ms: SimMillis,
    major_threshold: LitersPerMinute,
    pending: Option<TimerId>,
}

impl LeakDetector {
    pub fn new(debounce_ms: SimMillis, major_threshold: LitersPerMinute) -> Self {
        Self {
            debounce_ms,
            major_threshold,
            pending: None,
        }
    }

    /// Whether a debounce window is running
    pub fn is_watching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn major_threshold(&self) -> LitersPerMinute {
        self.major_threshold
    }

    /// React to the state left by a tick or an intent
    pub fn observe(
        &mut self,
        state: &SimulationState,
        log: &mut AlertLog,
        timers: &mut TimerQueue<EngineTimer>,
        now: SimMillis,
        events: &mut Vec<EngineEvent>,
    ) {
        if !state.is_flowing() {
            if let Some(id) = self.pending.take() {
                if timers.cancel(id) {
                    tracing::debug!(at = now, "flow stopped, leak watch cancelled");
                    events.push(EngineEvent::LeakWatchCancelled { at: now });
                }
            }
            if !state.is_leaking {
                let count = log.deactivate_all(AlertKind::Leak);
                if count > 0 {
                    events.push(EngineEvent::LeakCleared { count });
                }
            }
        } else if self.pending.is_none() {
            let deadline = now + self.debounce_ms;
            self.pending = Some(timers.schedule(deadline, EngineTimer::LeakDebounce));
            tracing::debug!(at = now, deadline, "flow detected, leak watch started");
            events.push(EngineEvent::LeakWatchStarted { at: now, deadline });
        }
    }

    /// The debounce timer `id` fired
    pub fn window_elapsed(
        &mut self,
        id: TimerId,
        state: &SimulationState,
        log: &mut AlertLog,
        at: DateTime<Utc>,
        now: SimMillis,
        events: &mut Vec<EngineEvent>,
    ) {
        if self.pending == Some(id) {
            self.pending = None;
        }

        if !state.is_leaking {
            events.push(EngineEvent::LeakDismissed { at: now });
            return;
        }

        let severity = LeakSeverity::classify(state.current_flow_rate, self.major_threshold);
        if log.find_active(AlertKind::Leak) {
            events.push(EngineEvent::LeakSuppressed { severity });
            return;
        }

        let alert = Alert::leak(severity.message(), at);
        tracing::info!(
            severity = ?severity,
            flow = state.current_flow_rate,
            "leak confirmed"
        );
        log.prepend(alert.clone());
        events.push(EngineEvent::LeakConfirmed { severity, alert });
    }

    /// Forget the running window; the caller clears the timer queue
    pub fn reset(&mut self) {
        self.pending = None;
    }
}
