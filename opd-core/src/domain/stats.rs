//! Aggregate adjudication statistics.

use serde::{Deserialize, Serialize};

use super::lenient;

/// Counts and totals from `GET /api/dashboard-stats`. Missing fields decode as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_claims: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub approved: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub rejected: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub partial: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub manual_review: u64,
    /// Percentage in [0, 100].
    #[serde(default, deserialize_with = "lenient::amount")]
    pub auto_adjudication_rate: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_disbursed: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_claimed: f64,
}

impl DashboardStats {
    /// Sum of the four categorized counts.
    pub fn categorized(&self) -> u64 {
        self.approved + self.rejected + self.partial + self.manual_review
    }
}
