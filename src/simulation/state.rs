//! Mutable simulation state owned by the engine

use serde::{Deserialize, Serialize};

use crate::core::types::{Liters, LitersPerMinute};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    /// Flow at the current tick (L/min), zero below the noise gate
    pub current_flow_rate: LitersPerMinute,
    /// Manual leak toggle, standing in for a sensor fault signal
    pub is_leaking: bool,
    /// Liters used since the start of the simulated day
    pub total_today: Liters,
}

impl SimulationState {
    pub fn new(initial_total: Liters) -> Self {
        Self {
            current_flow_rate: 0.0,
            is_leaking: false,
            total_today: initial_total,
        }
    }

    pub fn is_flowing(&self) -> bool {
        self.current_flow_rate > 0.0
    }
}
