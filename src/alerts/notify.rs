//! Alert notifications
//!
//! The engine calls a [`Notifier`] whenever it raises or clears alerts.
//! Front-ends map the requested [`SoundCue`] onto whatever output they have.

use super::alert::{Alert, AlertKind};

/// Short interface sounds a front-end may play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Warning buzz
    Alert,
    /// Ascending chime
    Success,
}

impl SoundCue {
    /// Cue for a newly raised alert of `kind`
    pub fn for_alert(kind: AlertKind) -> Self {
        match kind {
            AlertKind::Leak | AlertKind::Excess => SoundCue::Alert,
            AlertKind::Info => SoundCue::Success,
        }
    }
}

pub trait Notifier: Send {
    fn alert_raised(&mut self, alert: &Alert, cue: SoundCue);

    fn alerts_cleared(&mut self, _kind: AlertKind, _count: usize) {}
}

/// Notifier that only writes to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert_raised(&mut self, alert: &Alert, cue: SoundCue) {
        tracing::warn!(
            id = %alert.id,
            kind = %alert.kind,
            cue = ?cue,
            "{}",
            alert.message
        );
    }

    fn alerts_cleared(&mut self, kind: AlertKind, count: usize) {
        tracing::info!(kind = %kind, count, "alerts cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_cue_for_leak_and_excess() {
        assert_eq!(SoundCue::for_alert(AlertKind::Leak), SoundCue::Alert);
        assert_eq!(SoundCue::for_alert(AlertKind::Excess), SoundCue::Alert);
        assert_eq!(SoundCue::for_alert(AlertKind::Info), SoundCue::Success);
    }
}
