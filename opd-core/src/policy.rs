//! The active OPD policy ruleset, shown read-only in the Policy view.
//!
//! The backend owns adjudication; these terms are only displayed.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubLimit {
    pub category: &'static str,
    pub limit: f64,
    /// Co-pay percentage, if the category carries one.
    pub copay_pct: Option<u8>,
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitingPeriod {
    pub condition: &'static str,
    pub days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyTerms {
    pub policy_id: &'static str,
    pub effective_date: &'static str,
    pub annual_limit: f64,
    pub per_claim_limit: f64,
    pub minimum_claim_amount: f64,
    pub submission_window_days: u32,
    pub sub_limits: &'static [SubLimit],
    pub waiting_periods: &'static [WaitingPeriod],
    pub exclusions: &'static [&'static str],
    pub pre_auth_tests: &'static [&'static str],
    pub network_hospitals: &'static [&'static str],
}

pub const PLUM_OPD_2024: PolicyTerms = PolicyTerms {
    policy_id: "PLUM_OPD_2024",
    effective_date: "2024-01-01",
    annual_limit: 50_000.0,
    per_claim_limit: 5_000.0,
    minimum_claim_amount: 500.0,
    submission_window_days: 30,
    sub_limits: &[
        SubLimit { category: "Consultation", limit: 2_000.0, copay_pct: Some(10), note: "standard deduction" },
        SubLimit { category: "Diagnostics", limit: 10_000.0, copay_pct: None, note: "MRI / CT need pre-auth" },
        SubLimit { category: "Pharmacy", limit: 15_000.0, copay_pct: Some(30), note: "branded drugs only" },
        SubLimit { category: "Dental", limit: 10_000.0, copay_pct: None, note: "no cosmetic procedures" },
    ],
    waiting_periods: &[
        WaitingPeriod { condition: "Initial waiting", days: 30 },
        WaitingPeriod { condition: "Diabetes", days: 90 },
        WaitingPeriod { condition: "Hypertension", days: 90 },
        WaitingPeriod { condition: "Joint replacement", days: 730 },
    ],
    exclusions: &[
        "Cosmetic procedures",
        "Weight loss / bariatric",
        "Infertility / IVF",
        "Experimental therapy",
        "Self-inflicted injury",
        "Adventure sports",
        "Alcoholism",
        "Drug abuse",
        "Teeth whitening",
        "Hair transplant",
    ],
    pre_auth_tests: &["MRI", "CT Scan"],
    network_hospitals: &[
        "Apollo Hospitals",
        "Fortis Healthcare",
        "Max Healthcare",
        "Manipal Hospitals",
        "Narayana Health",
    ],
};

/// `30 -> "30 days"`, `730 -> "2 years"`.
pub fn waiting_label(days: u32) -> String {
    if days >= 365 && days % 365 == 0 {
        let years = days / 365;
        format!("{years} year{}", if years == 1 { "" } else { "s" })
    } else {
        format!("{days} days")
    }
}
