//! Events reported by the engine after each state change

use serde::Serialize;

use crate::alerts::Alert;
use crate::core::types::{Liters, SimMillis};
use crate::simulation::leak::LeakSeverity;

/// Payload of the engine's one-shot timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTimer {
    LeakDebounce,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Flow appeared; the debounce window is running
    LeakWatchStarted { at: SimMillis, deadline: SimMillis },
    /// Flow returned to zero before the window elapsed
    LeakWatchCancelled { at: SimMillis },
    /// Window elapsed while the leak signal was still set
    LeakConfirmed { severity: LeakSeverity, alert: Alert },
    /// Window elapsed with a leak already reported
    LeakSuppressed { severity: LeakSeverity },
    /// Window elapsed on ordinary usage, no leak signal
    LeakDismissed { at: SimMillis },
    /// Active leak alerts switched off
    LeakCleared { count: usize },
    /// Daily total passed the goal for the first time this session
    ExcessRaised { total: Liters, alert: Alert },
}

impl EngineEvent {
    /// The alert this event raised, if any
    pub fn raised_alert(&self) -> Option<&Alert> {
        match self {
            EngineEvent::LeakConfirmed { alert, .. } | EngineEvent::ExcessRaised { alert, .. } => {
                Some(alert)
            }
            _ => None,
        }
    }
}
