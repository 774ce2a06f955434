//! Excess-usage detector
//!
//! Raises the excess alert the first time the daily total passes the goal.
//! The alert is never withdrawn and never raised twice in a session.

use chrono::{DateTime, Utc};

use crate::alerts::{Alert, AlertKind, AlertLog};
use crate::core::types::Liters;
use crate::simulation::events::EngineEvent;
use crate::simulation::state::SimulationState;

#[derive(Debug, Clone)]
pub struct ExcessDetector {
    daily_goal: Liters,
}

impl ExcessDetector {
    pub fn new(daily_goal: Liters) -> Self {
        Self { daily_goal }
    }

    pub fn daily_goal(&self) -> Liters {
        self.daily_goal
    }

    pub fn set_daily_goal(&mut self, goal: Liters) {
        self.daily_goal = goal;
    }

    pub fn check(
        &self,
        state: &SimulationState,
        log: &mut AlertLog,
        at: DateTime<Utc>,
        events: &mut Vec<EngineEvent>,
    ) {
        if state.total_today <= self.daily_goal || log.contains(AlertKind::Excess) {
            return;
        }

        let alert = Alert::excess(
            format!(
                "Daily usage of {:.0} L has passed your goal of {:.0} L.",
                state.total_today, self.daily_goal
            ),
            at,
        );
        tracing::info!(total = state.total_today, goal = self.daily_goal, "daily goal exceeded");
        log.prepend(alert.clone());
        events.push(EngineEvent::ExcessRaised {
            total: state.total_today,
            alert,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: f64) -> SimulationState {
        SimulationState {
            current_flow_rate: 0.0,
            is_leaking: false,
            total_today: total,
        }
    }

    #[test]
    fn test_at_goal_is_not_excess() {
        let detector = ExcessDetector::new(500.0);
        let mut log = AlertLog::new();
        let mut events = Vec::new();

        detector.check(&with_total(500.0), &mut log, Utc::now(), &mut events);
        assert!(log.is_empty());
    }

    #[test]
    fn test_raised_once_per_session() {
        let detector = ExcessDetector::new(500.0);
        let mut log = AlertLog::new();
        let mut events = Vec::new();

        for total in [501.0, 520.0, 900.0] {
            detector.check(&with_total(total), &mut log, Utc::now(), &mut events);
        }

        assert_eq!(log.len(), 1);
        assert_eq!(events.len(), 1);
        assert!(log.find_active(AlertKind::Excess));
    }

    #[test]
    fn test_inactive_excess_still_blocks_new_one() {
        let detector = ExcessDetector::new(500.0);
        let mut log = AlertLog::new();
        let mut events = Vec::new();
        log.prepend(Alert::excess("old", Utc::now()));
        log.deactivate_all(AlertKind::Excess);

        detector.check(&with_total(600.0), &mut log, Utc::now(), &mut events);
        assert_eq!(log.len(), 1);
        assert!(events.is_empty());
    }
}
