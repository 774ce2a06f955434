//! Household views over the simulation: tank levels and usage history

pub mod history;
pub mod tank;

pub use history::{sample_history, HistorySummary, MonthlyStats};
pub use tank::{TankLevel, TankReport};
