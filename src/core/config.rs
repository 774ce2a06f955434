//! Engine configuration with documented constants
//!
//! All magic numbers of the flow simulation and the detectors are collected
//! here with explanations of their purpose and how they interact.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{QatraError, Result};
use crate::core::types::{Liters, LitersPerMinute, SimMillis};

/// Longest accepted tick period or debounce window (one day)
pub const MAX_PERIOD_MS: SimMillis = 24 * 60 * 60 * 1000;

/// Configuration for the simulation and alerting engine
///
/// Every field is optional in TOML; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === CLOCK ===
    /// Period of the flow-simulation tick (milliseconds)
    ///
    /// Each tick samples one flow reading and adds the volume delivered
    /// during the period to the daily total.
    pub tick_period_ms: SimMillis,

    /// How long non-zero flow must persist before a leak is confirmed
    ///
    /// At the default (5000 ms) and a 500 ms tick, flow has to be seen on
    /// ten consecutive ticks. Must be at least one tick period.
    pub debounce_ms: SimMillis,

    // === FLOW SIMULATION ===
    /// Readings at or below this rate are reported as zero flow
    ///
    /// Keeps simulation jitter from looking like water moving.
    pub noise_gate: LitersPerMinute,

    /// Constant flow present while a leak is simulated
    pub leak_base_flow: LitersPerMinute,

    /// Upper bound (exclusive) of the random spike added while leaking
    pub leak_spike_max: LitersPerMinute,

    /// Chance per tick of background usage (taps, appliances) without a leak
    pub background_probability: f64,

    /// Upper bound (exclusive) of a background usage spike
    pub background_spike_max: LitersPerMinute,

    // === DETECTION ===
    /// Confirmed leaks above this rate are classified as major
    ///
    /// The advisor and the tank overflow warning use the same boundary.
    pub major_leak_threshold: LitersPerMinute,

    /// Rate forced by the large-leak intent
    ///
    /// Must stay above `major_leak_threshold` so that a forced large leak
    /// classifies as major.
    pub large_leak_flow: LitersPerMinute,

    /// Liters per day above which the excess alert is raised
    pub daily_goal: Liters,

    /// Daily total at engine start
    pub initial_total: Liters,

    /// Seed for the flow RNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 500,
            debounce_ms: 5000,

            noise_gate: 0.5,
            leak_base_flow: 2.5,
            leak_spike_max: 15.0,
            background_probability: 0.05,
            background_spike_max: 2.0,

            major_leak_threshold: 10.0,
            large_leak_flow: 15.0,
            daily_goal: 500.0,
            initial_total: 150.0,

            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick period in seconds
    pub fn tick_seconds(&self) -> f64 {
        self.tick_period_ms as f64 / 1000.0
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(QatraError::InvalidConfig(
                "tick_period_ms must be positive".into(),
            ));
        }

        if self.tick_period_ms > MAX_PERIOD_MS || self.debounce_ms > MAX_PERIOD_MS {
            return Err(QatraError::InvalidConfig(format!(
                "tick_period_ms ({}) and debounce_ms ({}) must not exceed {} ms",
                self.tick_period_ms, self.debounce_ms, MAX_PERIOD_MS
            )));
        }

        if self.debounce_ms < self.tick_period_ms {
            return Err(QatraError::InvalidConfig(format!(
                "debounce_ms ({}) should be >= tick_period_ms ({})",
                self.debounce_ms, self.tick_period_ms
            )));
        }

        let rates = [
            ("noise_gate", self.noise_gate),
            ("leak_base_flow", self.leak_base_flow),
            ("leak_spike_max", self.leak_spike_max),
            ("background_spike_max", self.background_spike_max),
            ("major_leak_threshold", self.major_leak_threshold),
            ("large_leak_flow", self.large_leak_flow),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(QatraError::InvalidConfig(format!(
                "{} must be a finite rate, got {}",
                name, value
            )));
        }

        // NaN fails the range check too
        if !(0.0..=1.0).contains(&self.background_probability) {
            return Err(QatraError::InvalidConfig(format!(
                "background_probability ({}) must be within [0, 1]",
                self.background_probability
            )));
        }

        if self.noise_gate < 0.0
            || self.leak_base_flow < 0.0
            || self.leak_spike_max <= 0.0
            || self.background_spike_max <= 0.0
        {
            return Err(QatraError::InvalidConfig(
                "Flow parameters must be non-negative and spike bounds positive".into(),
            ));
        }

        if self.large_leak_flow <= self.major_leak_threshold {
            return Err(QatraError::InvalidConfig(format!(
                "large_leak_flow ({}) should be > major_leak_threshold ({})",
                self.large_leak_flow, self.major_leak_threshold
            )));
        }

        check_goal(self.daily_goal)?;

        if !self.initial_total.is_finite() || self.initial_total < 0.0 {
            return Err(QatraError::InvalidConfig(
                "initial_total must be a non-negative number".into(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }
}

/// A daily goal must be a finite, positive number of liters
pub fn check_goal(goal: Liters) -> Result<()> {
    if goal.is_finite() && goal > 0.0 {
        Ok(())
    } else {
        Err(QatraError::InvalidConfig(format!(
            "daily goal must be a positive number of liters, got {}",
            goal
        )))
    }
}
