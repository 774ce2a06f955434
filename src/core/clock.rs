//! Simulated clock for the flow ticker
//!
//! Time advances only in whole tick periods, so every reading the engine
//! produces lines up with a tick boundary.

use serde::{Deserialize, Serialize};

use crate::core::types::SimMillis;

/// Clock tracks simulated time with tick granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    ticks: u64,
    tick_period_ms: SimMillis,
}

impl SimClock {
    pub fn new(tick_period_ms: SimMillis) -> Self {
        Self {
            ticks: 0,
            tick_period_ms,
        }
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn now_ms(&self) -> SimMillis {
        self.ticks * self.tick_period_ms
    }

    pub fn tick_period_ms(&self) -> SimMillis {
        self.tick_period_ms
    }

    /// Number of whole ticks that fit in `duration_ms`
    pub fn ticks_in(&self, duration_ms: SimMillis) -> u64 {
        duration_ms / self.tick_period_ms
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(500)
    }
}
