//! Draws `DisplaySections` as text lines. Shared by the New Claim panel and
//! the history detail overlay so both show a claim identically.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use opd_core::render::{DisplaySections, DocumentView, LineItemTable};

use crate::app::DetailScroll;
use crate::theme;

const GAUGE_WIDTH: usize = 20;

pub fn lines(s: &DisplaySections<'_>) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    // Decision header
    let h = &s.header;
    lines.push(Line::from(vec![
        Span::styled(format!("{}  ", h.claim_id), theme::muted()),
        Span::styled(format!(" {} ", h.status_label), theme::badge(h.tone)),
    ]));
    let approved_style = if h.approved_struck {
        theme::muted().add_modifier(Modifier::CROSSED_OUT)
    } else {
        theme::tone(h.tone).add_modifier(Modifier::BOLD)
    };
    let mut amount = vec![
        Span::styled("Approved Amount  ", theme::muted()),
        Span::styled(h.approved.clone(), approved_style),
    ];
    if let Some(original) = &h.original {
        amount.push(Span::styled(format!("   Original: {original}"), theme::muted()));
    }
    lines.push(Line::from(amount));
    lines.push(Line::from(""));

    if let Some(reasons) = &s.reasons {
        section(&mut lines, reasons.title);
        for reason in reasons.reasons {
            lines.push(Line::from(vec![
                Span::styled("  • ", theme::tone(h.tone)),
                Span::styled(reason.clone(), theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(necessity) = &s.necessity {
        lines.push(Line::from(vec![
            Span::styled("Medical Necessity: ", theme::accent_bold()),
            Span::styled(necessity.check.label(), theme::badge(necessity.tone)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", necessity.reason),
            theme::tone(necessity.tone),
        )));
        lines.push(Line::from(""));
    }

    if let Some(details) = &s.details {
        section(&mut lines, "Extracted Details");
        for field in details {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:>16}: ", field.label), theme::muted()),
                Span::styled(field.value.to_string(), theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }

    let c = &s.confidence;
    let filled = (c.fill * GAUGE_WIDTH as f64).round() as usize;
    let gauge_style = if c.high { theme::positive() } else { theme::warning() };
    lines.push(Line::from(vec![
        Span::styled("AI Confidence  ", theme::muted()),
        Span::styled("█".repeat(filled.min(GAUGE_WIDTH)), gauge_style),
        Span::styled("░".repeat(GAUGE_WIDTH - filled.min(GAUGE_WIDTH)), theme::muted()),
        Span::styled(format!(" {}", c.label), gauge_style),
    ]));
    lines.push(Line::from(""));

    line_items(&mut lines, &s.line_items);
    lines.push(Line::from(""));

    section(&mut lines, "Document");
    lines.push(document_line(&s.document));

    lines
}

/// Rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines.iter().map(|l| l.width().max(1).div_ceil(width)).sum()
}

/// Wrapped paragraph scrolled by `scroll`, whose bounds are updated for `area`.
pub fn scrolled<'a>(lines: Vec<Line<'a>>, area: Rect, scroll: &DetailScroll) -> Paragraph<'a> {
    scroll.set_bounds(wrapped_height(&lines, area.width), area.height);
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll.offset(), 0))
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn line_items(lines: &mut Vec<Line<'static>>, table: &LineItemTable<'_>) {
    let [item_header, cost_header] = LineItemTable::HEADERS;
    lines.push(Line::from(Span::styled(
        format!("  {item_header:<40} {cost_header:>12}"),
        theme::accent_bold(),
    )));
    for row in table.rows() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<40} ", truncate(row.description, 40)), theme::text()),
            Span::styled(format!("{:>12}", row.cost), theme::text()),
        ]));
    }
}

fn document_line(doc: &DocumentView) -> Line<'static> {
    match doc {
        DocumentView::Local {
            name,
            mime,
            size_bytes,
            fingerprint,
        } => Line::from(Span::styled(
            format!("  {name} ({mime}, {size_bytes} bytes, {fingerprint})"),
            theme::text(),
        )),
        DocumentView::Remote { url, .. } => Line::from(vec![
            Span::styled(format!("  {url}"), theme::accent()),
            Span::styled("  [d]ownload", theme::muted()),
        ]),
        DocumentView::NotAvailable => Line::from(Span::styled(
            format!("  {}", doc.placeholder().unwrap_or_default()),
            theme::muted(),
        )),
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
