//! Policy Rules panel: the active ruleset, read-only.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use opd_core::format::inr;
use opd_core::policy::{waiting_label, PolicyTerms, PLUM_OPD_2024};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, _app: &AppState) {
    f.render_widget(Paragraph::new(lines(&PLUM_OPD_2024)), area);
}

fn lines(p: &PolicyTerms) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Active ruleset: ", theme::muted()),
            Span::styled(p.policy_id, theme::accent_bold()),
            Span::styled(format!("  (effective {})", p.effective_date), theme::muted()),
        ]),
        Line::from(""),
    ];

    section(&mut lines, "Financial Limits");
    row(&mut lines, "Annual limit", inr(p.annual_limit));
    row(&mut lines, "Per-claim cap", inr(p.per_claim_limit));
    row(&mut lines, "Minimum claim", inr(p.minimum_claim_amount));
    row(&mut lines, "Submission window", format!("{} days", p.submission_window_days));
    lines.push(Line::from(""));

    section(&mut lines, "Sub-limits");
    for sub in p.sub_limits {
        let copay = sub.copay_pct.map(|c| format!(", {c}% co-pay")).unwrap_or_default();
        row(&mut lines, sub.category, format!("{}{copay} ({})", inr(sub.limit), sub.note));
    }
    row(&mut lines, "Pre-auth tests", p.pre_auth_tests.join(", "));
    lines.push(Line::from(""));

    section(&mut lines, "Waiting Periods");
    for wp in p.waiting_periods {
        row(&mut lines, wp.condition, waiting_label(wp.days));
    }
    lines.push(Line::from(""));

    section(&mut lines, "Excluded Treatments");
    for item in p.exclusions {
        lines.push(Line::from(Span::styled(format!("  • {item}"), theme::negative())));
    }
    lines.push(Line::from(""));

    section(&mut lines, "Preferred Network");
    for hospital in p.network_hospitals {
        lines.push(Line::from(Span::styled(format!("  • {hospital}"), theme::text())));
    }
    lines
}

fn section(lines: &mut Vec<Line<'static>>, title: &'static str) {
    lines.push(Line::from(Span::styled(title, theme::accent_bold())));
}

fn row(lines: &mut Vec<Line<'static>>, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:>20}: "), theme::muted()),
        Span::styled(value, theme::text()),
    ]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_exclusion_and_waiting_period() {
        let out = lines(&PLUM_OPD_2024);
        let text: Vec<String> = out
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        for exclusion in PLUM_OPD_2024.exclusions {
            assert!(text.iter().any(|t| t.contains(exclusion)), "{exclusion}");
        }
        assert!(text.iter().any(|t| t.contains("₹50,000")));
        assert!(text.iter().any(|t| t.contains("2 years")));
    }
}
