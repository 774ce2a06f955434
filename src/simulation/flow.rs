//! Flow simulator
//!
//! Produces one flow reading per tick and folds it into the daily total.
//! Readings come from a [`FlowSource`]; [`RandomFlow`] fabricates them, a
//! telemetry-backed source can replace it without touching the detectors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::EngineConfig;
use crate::core::types::{volume_over, Liters, LitersPerMinute};
use crate::simulation::state::SimulationState;

/// Source of raw (ungated) flow readings
pub trait FlowSource: Send {
    fn sample(&mut self, leaking: bool) -> LitersPerMinute;
}

/// Parameters of the fabricated flow distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParams {
    pub leak_base_flow: LitersPerMinute,
    pub leak_spike_max: LitersPerMinute,
    pub background_probability: f64,
    pub background_spike_max: LitersPerMinute,
}

impl From<&EngineConfig> for FlowParams {
    fn from(config: &EngineConfig) -> Self {
        Self {
            leak_base_flow: config.leak_base_flow,
            leak_spike_max: config.leak_spike_max,
            background_probability: config.background_probability,
            background_spike_max: config.background_spike_max,
        }
    }
}

/// Random readings: a steady base plus spikes while leaking, occasional
/// small background draws otherwise.
#[derive(Debug, Clone)]
pub struct RandomFlow {
    rng: ChaCha8Rng,
    params: FlowParams,
}

impl RandomFlow {
    pub fn new(params: FlowParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng, params }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(FlowParams::from(config), config.seed)
    }
}

impl FlowSource for RandomFlow {
    fn sample(&mut self, leaking: bool) -> LitersPerMinute {
        let p = &self.params;
        if leaking {
            p.leak_base_flow + self.rng.gen_range(0.0..p.leak_spike_max)
        } else if self.rng.gen_bool(p.background_probability) {
            self.rng.gen_range(0.0..p.background_spike_max)
        } else {
            0.0
        }
    }
}

pub struct FlowSimulator {
    source: Box<dyn FlowSource>,
    noise_gate: LitersPerMinute,
    pinned: Option<LitersPerMinute>,
}

impl FlowSimulator {
    pub fn new(source: Box<dyn FlowSource>, noise_gate: LitersPerMinute) -> Self {
        Self {
            source,
            noise_gate,
            pinned: None,
        }
    }

    /// Hold the reading at `rate` instead of sampling the source
    pub fn pin(&mut self, rate: LitersPerMinute) {
        self.pinned = Some(rate);
    }

    pub fn unpin(&mut self) {
        self.pinned = None;
    }

    pub fn pinned(&self) -> Option<LitersPerMinute> {
        self.pinned
    }

    /// Apply the noise gate to a raw reading
    pub fn gate(&self, raw: LitersPerMinute) -> LitersPerMinute {
        if raw > self.noise_gate {
            raw
        } else {
            0.0
        }
    }

    /// Take one reading and accumulate it. Returns the liters added.
    pub fn step(&mut self, state: &mut SimulationState, tick_seconds: f64) -> Liters {
        let raw = match self.pinned {
            Some(rate) => rate,
            None => self.source.sample(state.is_leaking),
        };
        let rate = self.gate(raw);
        let added = volume_over(rate, tick_seconds);

        state.current_flow_rate = rate;
        state.total_today += added;
        added
    }
}

impl std::fmt::Debug for FlowSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSimulator")
            .field("noise_gate", &self.noise_gate)
            .field("pinned", &self.pinned)
            .finish_non_exhaustive()
    }
}
