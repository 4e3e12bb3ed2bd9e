//! Overlay widgets: file prompt, failure notice, claim detail, search, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use opd_core::upload::FAILURE_NOTICE;

use crate::app::AppState;
use crate::theme;
use crate::ui::{centered_rect, claim_view};

/// Path entry for the document to upload.
pub fn render_file_prompt(f: &mut Frame, area: Rect, input: &str) {
    prompt(
        f,
        area,
        " Choose Document [Enter]select [Esc]cancel ",
        "Path to a PNG, JPG or PDF bill:",
        input,
    );
}

/// Submission failure. Blocks input until acknowledged.
pub fn render_failure_notice(f: &mut Frame, area: Rect) {
    let popup = centered_rect(50, 25, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(" Claim Not Processed ")
        .title_style(theme::negative().add_modifier(Modifier::BOLD));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(FAILURE_NOTICE, theme::negative())),
        Line::from(""),
        Line::from(Span::styled(
            "Details are in the error history (e).",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press Enter to dismiss", theme::accent())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Detail of the selected history claim.
pub fn render_claim_detail(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 85, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Claim Detail [Esc]close [j/k]next/prev [PgUp/PgDn J/K]scroll [d]ownload ")
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let Some(sections) = app.history.overlay() else {
        let text = Paragraph::new(Span::styled("No claim selected.", theme::muted()));
        f.render_widget(text, inner);
        return;
    };

    let para = claim_view::scrolled(claim_view::lines(&sections), inner, &app.detail_scroll);
    f.render_widget(para, inner);
}

/// Free-text history search.
pub fn render_search(f: &mut Frame, area: Rect, input: &str) {
    prompt(
        f,
        area,
        " Search Claims [Enter]apply [Esc]cancel ",
        "Claim ID, patient, diagnosis or treatment date:",
        input,
    );
}

fn prompt(f: &mut Frame, area: Rect, title: &str, label: &str, input: &str) {
    let popup = centered_rect(60, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(title.to_string())
        .title_style(theme::accent_bold());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(label.to_string(), theme::muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input.to_string(), theme::accent_bold()),
            Span::styled("_", theme::accent()),
        ]),
    ];

    f.render_widget(Paragraph::new(text), inner);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app
        .error_history
        .iter()
        .enumerate()
        .skip(app.error_scroll)
        .take(inner.height as usize)
    {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", err.timestamp.format("%H:%M:%S")), theme::muted()),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
