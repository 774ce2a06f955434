//! Core type definitions used throughout the codebase

/// Simulated time in milliseconds since the engine started
pub type SimMillis = u64;

/// Volume in liters
pub type Liters = f64;

/// Flow rate in liters per minute
pub type LitersPerMinute = f64;

/// Convert a per-minute flow rate into the volume delivered over `seconds`
pub fn volume_over(rate: LitersPerMinute, seconds: f64) -> Liters {
    rate / 60.0 * seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_over_half_second() {
        // 6 L/min for half a second is 0.05 L
        assert!((volume_over(6.0, 0.5) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_volume_over_zero_rate() {
        assert_eq!(volume_over(0.0, 0.5), 0.0);
    }
}
