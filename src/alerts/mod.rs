//! Alert records, the alert log and notifications

pub mod alert;
pub mod log;
pub mod notify;

pub use alert::{Alert, AlertKind, EXCESS_ALERT_ID};
pub use log::AlertLog;
pub use notify::{LogNotifier, Notifier, SoundCue};
