//! Newest-first alert store
//!
//! Alerts are never removed. Leak alerts are switched off in place when the
//! flow they reported stops.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::alert::{Alert, AlertKind};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alert in front of every existing one
    pub fn prepend(&mut self, alert: Alert) {
        self.alerts.push_front(alert);
    }

    /// Whether an active alert of `kind` exists
    pub fn find_active(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind && a.active)
    }

    /// Whether any alert of `kind` exists, active or not
    pub fn contains(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }

    /// Newest active alert of `kind`
    pub fn active(&self, kind: AlertKind) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.kind == kind && a.active)
    }

    /// Mark every alert of `kind` inactive. Returns how many were active.
    pub fn deactivate_all(&mut self, kind: AlertKind) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut().filter(|a| a.kind == kind) {
            if alert.active {
                alert.active = false;
                changed += 1;
            }
        }
        changed
    }

    /// Alerts, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let mut log = AlertLog::new();
        log.prepend(Alert::leak("first", at(0)));
        log.prepend(Alert::excess("second", at(1)));

        let messages: Vec<_> = log.iter().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_deactivate_keeps_alert_in_log() {
        let mut log = AlertLog::new();
        log.prepend(Alert::leak("leak", at(0)));
        assert!(log.find_active(AlertKind::Leak));

        assert_eq!(log.deactivate_all(AlertKind::Leak), 1);
        assert!(!log.find_active(AlertKind::Leak));
        assert!(log.contains(AlertKind::Leak));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_deactivate_only_touches_kind() {
        let mut log = AlertLog::new();
        log.prepend(Alert::leak("leak", at(0)));
        log.prepend(Alert::excess("excess", at(1)));

        log.deactivate_all(AlertKind::Leak);
        assert!(log.find_active(AlertKind::Excess));
    }

    #[test]
    fn test_deactivate_on_empty_log_is_noop() {
        let mut log = AlertLog::new();
        assert_eq!(log.deactivate_all(AlertKind::Leak), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_active_returns_newest_active() {
        let mut log = AlertLog::new();
        log.prepend(Alert::leak("old", at(0)));
        log.deactivate_all(AlertKind::Leak);
        log.prepend(Alert::leak("new", at(10)));

        assert_eq!(log.active(AlertKind::Leak).unwrap().message, "new");
    }
}
