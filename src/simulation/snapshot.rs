//! Read-only view of the engine handed to front-ends

use serde::Serialize;

use crate::alerts::{Alert, AlertKind};
use crate::core::types::{Liters, SimMillis};
use crate::simulation::state::SimulationState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: SimulationState,
    /// Newest first
    pub alerts: Vec<Alert>,
    pub daily_goal: Liters,
    pub elapsed_ms: SimMillis,
    pub ticks: u64,
    pub leak_watch: bool,
}

impl Snapshot {
    /// Share of the daily goal used so far, in percent (may exceed 100)
    pub fn goal_percentage(&self) -> f64 {
        self.state.total_today / self.daily_goal * 100.0
    }

    pub fn active_leak(&self) -> Option<&Alert> {
        self.alerts
            .iter()
            .find(|a| a.kind == AlertKind::Leak && a.active)
    }

    pub fn count(&self, kind: AlertKind) -> usize {
        self.alerts.iter().filter(|a| a.kind == kind).count()
    }
}
