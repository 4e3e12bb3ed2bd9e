//! Help panel: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-5", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Overview");
    key(&mut lines, "r", "Reload dashboard statistics");
    lines.push(Line::from(""));

    section(&mut lines, "New Claim");
    key(&mut lines, "o / f", "Choose a bill or prescription (path prompt)");
    key(&mut lines, "Enter / s", "Submit the selected document");
    key(&mut lines, "x / Esc", "Clear the selection and result");
    key(&mut lines, "PgUp / PgDn, K / J", "Scroll the result by page / line");
    lines.push(Line::from(""));

    section(&mut lines, "Claim History");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "g / G", "Jump to first / last row");
    key(&mut lines, "Enter", "Open claim detail");
    key(&mut lines, "/", "Search by claim ID, patient, diagnosis or date");
    key(&mut lines, "f", "Cycle status filter");
    key(&mut lines, "c", "Clear search");
    key(&mut lines, "r", "Reload claims");
    lines.push(Line::from(""));

    section(&mut lines, "Claim Detail");
    key(&mut lines, "j / k", "Show next / previous claim");
    key(&mut lines, "PgUp / PgDn, K / J", "Scroll the claim by page / line");
    key(&mut lines, "d", "Download the stored document");
    key(&mut lines, "Esc", "Close");
    lines.push(Line::from(""));

    section(&mut lines, "Backend");
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", "URL"), theme::accent()),
        Span::styled(app.config.base_url.clone(), theme::muted()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", "Downloads"), theme::accent()),
        Span::styled(app.config.download_dir.display().to_string(), theme::muted()),
    ]));

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>20}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
