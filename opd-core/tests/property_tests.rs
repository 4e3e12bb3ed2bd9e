//! Property tests for display and state-machine invariants.
//!
//! Uses proptest to verify:
//! 1. Confidence rounding: displayed percent is round(score * 100, 1)
//! 2. Dashboard fractions are finite and within [0, 1]
//! 3. Preview handles are released exactly once, whatever the action sequence
//! 4. Selecting A then B leaves one overlay showing B

use proptest::prelude::*;

use opd_core::api::ApiError;
use opd_core::dashboard::distribution;
use opd_core::document::{LocalDocument, PreviewPool};
use opd_core::domain::{Claim, ClaimStatus, DashboardStats};
use opd_core::format;
use opd_core::history::HistoryBrowser;
use opd_core::render::{render, DocumentView};
use opd_core::upload::{UploadController, UploadPhase};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_stats() -> impl Strategy<Value = DashboardStats> {
    (
        0u64..10_000,
        0u64..10_000,
        0u64..10_000,
        0u64..10_000,
        0u64..10_000,
    )
        .prop_map(|(total, approved, rejected, partial, manual)| DashboardStats {
            total_claims: total,
            approved,
            rejected,
            partial,
            manual_review: manual,
            ..Default::default()
        })
}

#[derive(Debug, Clone)]
enum Action {
    Select(u8),
    SelectNothing,
    Submit,
    Succeed,
    Fail,
    Acknowledge,
    Reset,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        any::<u8>().prop_map(Action::Select),
        Just(Action::SelectNothing),
        Just(Action::Submit),
        Just(Action::Succeed),
        Just(Action::Fail),
        Just(Action::Acknowledge),
        Just(Action::Reset),
    ]
}

fn claim(id: String) -> Claim {
    Claim {
        claim_id: id,
        status: ClaimStatus::Approved,
        ..Default::default()
    }
}

// ── 1. Confidence rounding ───────────────────────────────────────────

proptest! {
    #[test]
    fn confidence_percent_rounds_to_one_decimal(score in 0.0..=1.0_f64) {
        let c = Claim { confidence_score: Some(score), ..Default::default() };
        let s = render(&c, DocumentView::NotAvailable);
        prop_assert!((s.confidence.percent - score * 100.0).abs() <= 0.05 + 1e-9);
        prop_assert_eq!(s.confidence.label, format!("{:.1}%", s.confidence.percent));
        prop_assert_eq!(s.confidence.high, score > 0.8);
    }
}

// ── 2. Dashboard fractions ───────────────────────────────────────────

proptest! {
    #[test]
    fn dashboard_fractions_stay_in_unit_interval(stats in arb_stats()) {
        for bar in distribution(&stats) {
            prop_assert!(bar.fraction.is_finite());
            prop_assert!((0.0..=1.0).contains(&bar.fraction));
            if stats.total_claims == 0 {
                prop_assert_eq!(bar.fraction, 0.0);
            }
        }
    }
}

// ── 3. Preview release accounting ────────────────────────────────────

proptest! {
    #[test]
    fn previews_released_exactly_once(actions in prop::collection::vec(arb_action(), 0..40)) {
        let pool = PreviewPool::new();
        let mut upload = UploadController::new(pool.clone());
        let mut pending = None;

        for action in actions {
            match action {
                Action::Select(n) => {
                    let doc = LocalDocument::from_bytes(format!("bill-{n}.png"), vec![n]);
                    let refused = upload.select_file(Some(doc)).is_err();
                    prop_assert_eq!(refused, upload.phase() == UploadPhase::Submitting);
                }
                Action::SelectNothing => {
                    let before = upload.phase();
                    upload.select_file(None).unwrap();
                    prop_assert_eq!(before, upload.phase());
                }
                Action::Submit => {
                    if let Ok(request) = upload.submit() {
                        pending = Some(request.token);
                    }
                }
                Action::Succeed | Action::Fail => {
                    if let Some(token) = &pending {
                        let outcome = match action {
                            Action::Succeed => Ok(claim("CLM-P".into())),
                            _ => Err(ApiError::NetworkUnreachable("down".into())),
                        };
                        upload.complete(token, outcome);
                    }
                }
                Action::Acknowledge => {
                    let _ = upload.acknowledge_failure();
                }
                Action::Reset => {
                    upload.reset();
                    prop_assert_eq!(upload.phase(), UploadPhase::Idle);
                    prop_assert_eq!(pool.live(), 0);
                }
            }
            let expected_live = usize::from(upload.preview().is_some());
            prop_assert_eq!(pool.live(), expected_live);
        }

        drop(upload);
        prop_assert_eq!(pool.live(), 0);
        prop_assert_eq!(pool.acquired(), pool.released());
    }
}

// ── 4. Single overlay ────────────────────────────────────────────────

proptest! {
    #[test]
    fn last_selection_wins(a in "[A-Z]{3}", b in "[A-Z]{3}") {
        let mut history = HistoryBrowser::new("http://h");
        let token = history.activate();
        history.on_loaded(&token, Ok(vec![claim(format!("CLM-{a}")), claim(format!("CLM-{b}-2"))]));
        prop_assert!(history.select(0));
        prop_assert!(history.select(1));
        let overlay = history.overlay().unwrap();
        prop_assert_eq!(overlay.header.claim_id, format!("CLM-{b}-2"));
    }
}
