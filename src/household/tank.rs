//! Storage-tank levels derived from today's usage
//!
//! Tanks are assumed to start the day 80% full and only drain; refills are
//! not modelled.

use serde::Serialize;

use crate::core::types::Liters;
use crate::settings::UserSettings;

/// Capacity of one household tank
pub const TANK_CAPACITY: Liters = 3000.0;

/// Fill level at the start of the day
pub const INITIAL_FILL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TankLevel {
    Low,
    Medium,
    Normal,
}

impl TankLevel {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 20.0 {
            TankLevel::Low
        } else if percent < 50.0 {
            TankLevel::Medium
        } else {
            TankLevel::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TankReport {
    pub tank_count: u32,
    pub capacity: Liters,
    pub remaining: Liters,
    pub percent_full: f64,
    pub level: TankLevel,
}

impl TankReport {
    /// Missing settings or a zero tank count are treated as one tank
    pub fn new(settings: Option<&UserSettings>, total_today: Liters) -> Self {
        let tank_count = settings.map(|s| s.tank_count).unwrap_or(0).max(1);
        let capacity = tank_count as f64 * TANK_CAPACITY;
        let remaining = (capacity * INITIAL_FILL - total_today).max(0.0);
        let percent_full = (remaining / capacity * 100.0).clamp(0.0, 100.0);

        Self {
            tank_count,
            capacity,
            remaining,
            percent_full,
            level: TankLevel::from_percent(percent_full),
        }
    }

    pub fn is_low(&self) -> bool {
        self.level == TankLevel::Low
    }
}
