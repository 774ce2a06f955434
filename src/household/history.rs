//! Monthly usage history and its summary

use serde::{Deserialize, Serialize};

use crate::core::types::Liters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: String,
    pub usage: Liters,
    pub projected: Liters,
    pub limit: Liters,
}

impl MonthlyStats {
    pub fn new(month: &str, usage: Liters, projected: Liters, limit: Liters) -> Self {
        Self {
            month: month.to_string(),
            usage,
            projected,
            limit,
        }
    }

    pub fn over_limit(&self) -> bool {
        self.usage > self.limit
    }
}

/// Six months of sample history
pub fn sample_history() -> Vec<MonthlyStats> {
    vec![
        MonthlyStats::new("January", 12000.0, 11500.0, 13000.0),
        MonthlyStats::new("February", 11500.0, 11000.0, 13000.0),
        MonthlyStats::new("March", 13200.0, 12500.0, 13000.0),
        MonthlyStats::new("April", 12800.0, 12000.0, 13000.0),
        MonthlyStats::new("May", 14500.0, 14000.0, 13000.0),
        MonthlyStats::new("June", 15100.0, 14800.0, 13000.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub average_usage: Liters,
    pub peak_month: String,
    pub peak_usage: Liters,
    pub months_over_limit: usize,
}

impl HistorySummary {
    /// `None` for an empty history
    pub fn from_months(months: &[MonthlyStats]) -> Option<Self> {
        let peak = months
            .iter()
            .max_by(|a, b| a.usage.total_cmp(&b.usage))?;
        let total: Liters = months.iter().map(|m| m.usage).sum();

        Some(Self {
            average_usage: total / months.len() as f64,
            peak_month: peak.month.clone(),
            peak_usage: peak.usage,
            months_over_limit: months.iter().filter(|m| m.over_limit()).count(),
        })
    }
}
