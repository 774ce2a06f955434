//! Alert records shown to the household

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the singleton excess alert
pub const EXCESS_ALERT_ID: &str = "excess";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Leak,
    Excess,
    Info,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlertKind::Leak => "leak",
            AlertKind::Excess => "excess",
            AlertKind::Info => "info",
        };
        f.write_str(name)
    }
}

/// An alert. Only `active` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub active: bool,
}

impl Alert {
    /// Leak alert whose id is derived from its creation time
    pub fn leak(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("leak-{}", timestamp.timestamp_millis()),
            kind: AlertKind::Leak,
            message: message.into(),
            timestamp,
            active: true,
        }
    }

    /// The one excess alert of a session
    pub fn excess(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: EXCESS_ALERT_ID.to_string(),
            kind: AlertKind::Excess,
            message: message.into(),
            timestamp,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_leak_id_from_timestamp() {
        let at = Utc.timestamp_millis_opt(1_700_000_005_000).unwrap();
        let alert = Alert::leak("pipe", at);
        assert_eq!(alert.id, "leak-1700000005000");
        assert!(alert.active);
        assert_eq!(alert.kind, AlertKind::Leak);
    }

    #[test]
    fn test_excess_id_is_fixed() {
        let a = Alert::excess("over", Utc::now());
        let b = Alert::excess("over", Utc::now());
        assert_eq!(a.id, EXCESS_ALERT_ID);
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_kind_serializes_as_type_field() {
        let at = Utc.timestamp_millis_opt(0).unwrap();
        let json = serde_json::to_value(Alert::excess("over", at)).unwrap();
        assert_eq!(json["type"], "excess");
        assert_eq!(json["active"], true);
    }
}
