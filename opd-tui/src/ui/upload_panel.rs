//! New Claim panel: document selection, submission, and the adjudication result.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use opd_core::document::PreviewHandle;
use opd_core::render::render as render_claim;
use opd_core::upload::UploadState;

use crate::app::AppState;
use crate::theme;
use crate::ui::claim_view;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    match app.upload.state() {
        UploadState::Idle => {
            lines.push(Line::from(Span::styled("Upload Medical Bill", theme::accent_bold())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press o to choose a bill or prescription (PNG, JPG or PDF).",
                theme::muted(),
            )));
            lines.push(Line::from(Span::styled(
                "The backend extracts the document and adjudicates it against the active policy.",
                theme::muted(),
            )));
        }
        UploadState::FileSelected { preview } => {
            preview_lines(&mut lines, preview);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[Enter] Process claim  [o] choose another  [x] clear",
                theme::accent(),
            )));
        }
        UploadState::Submitting { preview } => {
            preview_lines(&mut lines, preview);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Processing... extracting and adjudicating, this can take a while.",
                theme::warning(),
            )));
        }
        UploadState::Completed { preview, claim } => {
            lines.extend(claim_view::lines(&render_claim(claim, preview.view())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "[o] new document  [x] clear  [PgUp/PgDn J/K] scroll",
                theme::muted(),
            )));
        }
        UploadState::Failed { preview, notice } => {
            preview_lines(&mut lines, preview);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(*notice, theme::negative())));
        }
    }

    f.render_widget(claim_view::scrolled(lines, area, &app.detail_scroll), area);
}

fn preview_lines(lines: &mut Vec<Line<'_>>, preview: &PreviewHandle) {
    let doc = preview.document();
    lines.push(Line::from(Span::styled("Selected Document", theme::accent_bold())));
    lines.push(Line::from(vec![
        Span::styled("  File: ", theme::muted()),
        Span::styled(doc.name.clone(), theme::text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Type: ", theme::muted()),
        Span::styled(doc.mime.clone(), theme::text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  Size: ", theme::muted()),
        Span::styled(format!("{:.1} KB", doc.bytes.len() as f64 / 1024.0), theme::text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  blake3: ", theme::muted()),
        Span::styled(preview.fingerprint().to_string(), theme::text()),
    ]));
}
