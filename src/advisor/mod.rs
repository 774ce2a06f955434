//! Advisory text for the household
//!
//! Local advice is derived from the simulation state with fixed rules. The
//! remote [`client::AdvisorClient`] is optional enrichment: every call has a
//! fallback, and the engine never waits on it.

pub mod client;
pub mod tips;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::core::types::LitersPerMinute;
use crate::settings::UserSettings;
use crate::simulation::SimulationState;

pub use client::AdvisorClient;

/// Number of tips shown with each piece of advice
pub const TIPS_SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub headline: String,
    pub urgent: bool,
    pub tips: Vec<String>,
}

/// Main message for the current state
///
/// Uses the same major-leak boundary as the leak detector.
pub fn headline(
    state: &SimulationState,
    settings: Option<&UserSettings>,
    major_threshold: LitersPerMinute,
) -> String {
    if state.is_leaking {
        if state.current_flow_rate > major_threshold {
            "A very large leak is under way! Check the main tank and the floats now; it may be overflowing.".to_string()
        } else {
            "A small, steady leak is under way. Make sure sinks and taps are tightly closed and check the cisterns.".to_string()
        }
    } else {
        match settings {
            Some(s) => format!(
                "Hello {}, your water status is excellent! No leaks right now, keep saving.",
                s.name
            ),
            None => "Your water status is excellent! No leaks right now, keep saving.".to_string(),
        }
    }
}

/// `count` distinct tips in random order
pub fn pick_tips<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    tips::STATIC_TIPS
        .choose_multiple(rng, count)
        .map(|t| t.to_string())
        .collect()
}

pub fn local_advice<R: Rng + ?Sized>(
    state: &SimulationState,
    settings: Option<&UserSettings>,
    major_threshold: LitersPerMinute,
    rng: &mut R,
) -> Advice {
    Advice {
        headline: headline(state, settings, major_threshold),
        urgent: state.is_leaking,
        tips: pick_tips(rng, TIPS_SHOWN),
    }
}
