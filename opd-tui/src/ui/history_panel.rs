//! Claim History panel: filterable table of past decisions.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use opd_core::history::COLUMNS;
use opd_core::load::LoadState;

use crate::app::AppState;
use crate::theme;
use crate::ui::claim_view::truncate;

const WIDTHS: [usize; 5] = [14, 22, 10, 22, 13];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let h = &app.history;
    let mut lines: Vec<Line> = Vec::new();

    let query = if h.query().is_empty() { "-" } else { h.query() };
    lines.push(Line::from(vec![
        Span::styled(format!("Search: {query} | Status: {} | ", h.filter().label()), theme::muted()),
        Span::styled(format!("{} claims", h.visible_len()), theme::accent()),
        Span::styled(
            "  [j/k]move [Enter]open [/]search [f]ilter [c]lear [r]efresh",
            theme::muted(),
        ),
    ]));
    lines.push(Line::from(""));

    match h.state() {
        LoadState::Idle | LoadState::Loading => {
            lines.push(Line::from(Span::styled("Loading claims...", theme::muted())));
        }
        LoadState::Failed(message) => {
            lines.push(Line::from(Span::styled(message.clone(), theme::negative())));
            lines.push(Line::from(Span::styled("Press r to retry.", theme::muted())));
        }
        LoadState::Loaded(_) => {
            let header: String = COLUMNS
                .iter()
                .zip(WIDTHS)
                .map(|(c, w)| format!("{c:<w$} "))
                .collect();
            lines.push(Line::from(Span::styled(header, theme::accent_bold())));

            let visible_height = area.height.saturating_sub(3) as usize;
            let start = h.cursor().saturating_sub(visible_height.saturating_sub(1));
            for (i, row) in h.rows().into_iter().enumerate().skip(start).take(visible_height) {
                let is_cursor = i == h.cursor();
                let style = if is_cursor { theme::cursor_row() } else { theme::text() };
                let status_style = if is_cursor { style } else { theme::badge(row.tone) };
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<w$} ", truncate(&row.claim_id, WIDTHS[0]), w = WIDTHS[0]), style),
                    Span::styled(format!("{:<w$} ", truncate(&row.patient, WIDTHS[1]), w = WIDTHS[1]), style),
                    Span::styled(format!("{:<w$} ", row.date, w = WIDTHS[2]), style),
                    Span::styled(format!("{:<w$} ", row.amount, w = WIDTHS[3]), style),
                    Span::styled(format!("{:<w$}", row.status, w = WIDTHS[4]), status_style),
                ]));
            }
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}
