//! Overview panel: summary cards and the status distribution.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use opd_core::format;
use opd_core::load::LoadState;

use crate::app::AppState;
use crate::theme;

const BAR_WIDTH: usize = 40;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("Claims Overview", theme::accent_bold()),
        Span::styled("  [r]efresh", theme::muted()),
    ]));
    lines.push(Line::from(""));

    match app.dashboard.state() {
        LoadState::Idle | LoadState::Loading => {
            lines.push(Line::from(Span::styled("Loading statistics...", theme::muted())));
        }
        LoadState::Failed(message) => {
            lines.push(Line::from(Span::styled(message.clone(), theme::negative())));
            lines.push(Line::from(Span::styled("Press r to retry.", theme::muted())));
        }
        LoadState::Loaded(_) => {
            for card in app.dashboard.cards().into_iter().flatten() {
                let mut spans = vec![
                    Span::styled(format!("  {:>20}  ", card.title), theme::muted()),
                    Span::styled(card.value, theme::accent_bold()),
                ];
                if let Some(sub) = card.subtext {
                    spans.push(Span::styled(format!("  {sub}"), theme::muted()));
                }
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Claim Status Distribution", theme::accent_bold())));
            for bar in app.dashboard.bars().into_iter().flatten() {
                let filled = ((bar.fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:>14} ", bar.category.label()), theme::muted()),
                    Span::styled("█".repeat(filled), theme::tone(bar.category.tone())),
                    Span::styled("░".repeat(BAR_WIDTH - filled), theme::muted()),
                    Span::styled(
                        format!(" {:>5} ({})", bar.count, format::percent_label(bar.fraction)),
                        theme::text(),
                    ),
                ]));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
