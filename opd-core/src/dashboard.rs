//! Overview dashboard: stats fetch plus the bar and card mapping.

use crate::api::ApiError;
use crate::cancel::CancelToken;
use crate::domain::DashboardStats;
use crate::format;
use crate::load::{Fetch, LoadState};
use crate::render::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Approved,
    Rejected,
    Partial,
    ManualReview,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Approved,
        Category::Rejected,
        Category::Partial,
        Category::ManualReview,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Approved => "Approved",
            Category::Rejected => "Rejected",
            Category::Partial => "Partial",
            Category::ManualReview => "Manual Review",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Category::Approved => Tone::Positive,
            Category::Rejected => Tone::Negative,
            Category::Partial => Tone::Warning,
            Category::ManualReview => Tone::Neutral,
        }
    }

    fn count(self, stats: &DashboardStats) -> u64 {
        match self {
            Category::Approved => stats.approved,
            Category::Rejected => stats.rejected,
            Category::Partial => stats.partial,
            Category::ManualReview => stats.manual_review,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub category: Category,
    pub count: u64,
    /// Share of all claims, always finite and within [0, 1].
    pub fraction: f64,
}

/// `count / total`, or 0 when there are no claims.
pub fn bar_fraction(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let fraction = count as f64 / total as f64;
    if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn distribution(stats: &DashboardStats) -> [CategoryBar; 4] {
    Category::ALL.map(|category| {
        let count = category.count(stats);
        CategoryBar {
            category,
            count,
            fraction: bar_fraction(count, stats.total_claims),
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
    pub subtext: Option<String>,
}

pub fn summary_cards(stats: &DashboardStats) -> [SummaryCard; 4] {
    [
        SummaryCard {
            title: "Total Claims",
            value: stats.total_claims.to_string(),
            subtext: None,
        },
        SummaryCard {
            title: "Auto-Approval Rate",
            value: format!("{}%", stats.auto_adjudication_rate),
            subtext: None,
        },
        SummaryCard {
            title: "Total Disbursed",
            value: format::inr_compact(stats.total_disbursed),
            subtext: Some(format!("of {} claimed", format::inr_compact(stats.total_claimed))),
        },
        SummaryCard {
            title: "Pending Review",
            value: stats.manual_review.to_string(),
            subtext: None,
        },
    ]
}

pub struct DashboardAggregator {
    stats: Fetch<DashboardStats>,
}

impl Default for DashboardAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardAggregator {
    pub fn new() -> Self {
        Self {
            stats: Fetch::new("dashboard stats"),
        }
    }

    pub fn state(&self) -> &LoadState<DashboardStats> {
        self.stats.state()
    }

    pub fn activate(&mut self) -> CancelToken {
        self.stats.begin()
    }

    pub fn deactivate(&mut self) {
        self.stats.abandon();
    }

    pub fn on_loaded(&mut self, token: &CancelToken, result: Result<DashboardStats, ApiError>) -> bool {
        self.stats.finish(token, result)
    }

    pub fn bars(&self) -> Option<[CategoryBar; 4]> {
        self.state().loaded().map(distribution)
    }

    pub fn cards(&self) -> Option<[SummaryCard; 4]> {
        self.state().loaded().map(summary_cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> DashboardStats {
        DashboardStats {
            total_claims: 10,
            approved: 5,
            rejected: 3,
            partial: 1,
            manual_review: 1,
            auto_adjudication_rate: 90.0,
            total_disbursed: 18320.0,
            total_claimed: 45000.0,
        }
    }

    #[test]
    fn zero_total_renders_empty_bars() {
        let bars = distribution(&DashboardStats::default());
        assert!(bars.iter().all(|b| b.fraction == 0.0));
    }

    #[test]
    fn fractions_are_proportional() {
        let bars = distribution(&stats());
        assert_eq!(bars[0].fraction, 0.5);
        assert_eq!(bars[1].fraction, 0.3);
        assert_eq!(bars[3].category.label(), "Manual Review");
    }

    #[test]
    fn inconsistent_counts_are_clamped() {
        assert_eq!(bar_fraction(12, 10), 1.0);
        assert_eq!(bar_fraction(3, 0), 0.0);
    }

    #[test]
    fn cards() {
        let cards = summary_cards(&stats());
        assert_eq!(cards[0].value, "10");
        assert_eq!(cards[1].value, "90%");
        assert_eq!(cards[2].value, "₹18.3k");
        assert_eq!(cards[2].subtext.as_deref(), Some("of ₹45.0k claimed"));
        assert_eq!(cards[3].title, "Pending Review");
        assert_eq!(cards[3].value, "1");
    }

    #[test]
    fn fractional_rate_keeps_backend_precision() {
        let mut s = stats();
        s.auto_adjudication_rate = 66.7;
        assert_eq!(summary_cards(&s)[1].value, "66.7%");
    }

    #[test]
    fn lifecycle() {
        let mut d = DashboardAggregator::new();
        assert!(d.bars().is_none());
        let token = d.activate();
        assert!(d.on_loaded(&token, Ok(stats())));
        assert_eq!(d.cards().unwrap()[0].value, "10");
        let stale = d.activate();
        d.deactivate();
        assert!(!d.on_loaded(&stale, Ok(DashboardStats::default())));
        assert_eq!(*d.state(), LoadState::Idle);
    }
}
