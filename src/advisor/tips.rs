//! Fixed advice used offline and as the fallback for the remote advisor

/// Water-saving tips shown three at a time
pub const STATIC_TIPS: [&str; 7] = [
    "Turn the tap off while brushing your teeth; it saves a lot of water.",
    "Wash the car with a bucket instead of a hose.",
    "Check the floats of the ground and roof tanks regularly.",
    "Fit aerators on your taps to cut the flow.",
    "Inspect toilet cisterns; they are a common source of hidden leaks.",
    "Water plants early in the morning or in the evening to reduce evaporation.",
    "Run the washing machine only with a full load.",
];

/// Usage summary returned when the remote advisor is unavailable
pub const FALLBACK_SUMMARY: &str = "Your consumption is currently within the normal range.";

/// Tips returned when the remote advisor is unavailable
pub const FALLBACK_TIPS: [&str; 3] = [
    "Make sure taps are closed properly.",
    "Watch your consumption during the night.",
    "Fix any leak as soon as you notice it.",
];

pub fn fallback_tips() -> Vec<String> {
    FALLBACK_TIPS.iter().map(|t| t.to_string()).collect()
}
