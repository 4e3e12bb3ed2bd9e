//! Top-level UI layout: one bordered panel plus the status bar.

pub mod claim_view;
pub mod dashboard_panel;
pub mod help_panel;
pub mod history_panel;
pub mod overlays;
pub mod policy_panel;
pub mod status_bar;
pub mod upload_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::FilePrompt => overlays::render_file_prompt(f, main_area, &app.input),
        Overlay::FailureNotice => overlays::render_failure_notice(f, main_area),
        Overlay::ClaimDetail => overlays::render_claim_detail(f, main_area, app),
        Overlay::Search => overlays::render_search(f, main_area, &app.input),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Overview => dashboard_panel::render(f, inner, app),
        Panel::NewClaim => upload_panel::render(f, inner, app),
        Panel::History => history_panel::render(f, inner, app),
        Panel::Policy => policy_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use opd_core::document::LocalDocument;
    use opd_core::domain::{Claim, ClaimStatus, DashboardStats, ExtractedData, LineItem};

    use crate::app::tests::test_app;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn every_panel_draws() {
        let (mut app, _rx, _tx) = test_app();
        for i in 0..Panel::COUNT {
            let panel = Panel::from_index(i).unwrap();
            app.navigate(panel);
            let text = screen(&app);
            assert!(text.contains(panel.label()), "{}", panel.label());
            assert!(text.contains("1:Overview"));
        }
    }

    #[test]
    fn dashboard_shows_cards_once_loaded() {
        let (mut app, _rx, _tx) = test_app();
        app.start();
        assert!(screen(&app).contains("Loading statistics"));

        let token = app.dashboard.activate();
        let stats = DashboardStats {
            total_claims: 10,
            approved: 6,
            rejected: 2,
            partial: 1,
            manual_review: 1,
            auto_adjudication_rate: 80.0,
            total_disbursed: 12_500.0,
            ..Default::default()
        };
        app.dashboard.on_loaded(&token, Ok(stats));
        let text = screen(&app);
        assert!(text.contains("Total Claims"));
        assert!(text.contains("Claim Status Distribution"));
    }

    #[test]
    fn detail_overlay_draws_selected_claim() {
        let (mut app, _rx, _tx) = test_app();
        app.navigate(Panel::History);
        let token = app.history.activate();
        let claim = Claim {
            claim_id: "CLM-DETAIL".into(),
            status: ClaimStatus::Rejected,
            rejection_reasons: vec!["Waiting period not met".into()],
            ..Default::default()
        };
        app.history.on_loaded(&token, Ok(vec![claim]));
        assert!(app.history.select_cursor());
        app.open_overlay(Overlay::ClaimDetail);
        let text = screen(&app);
        assert!(text.contains("Claim Detail"));
        assert!(text.contains("Waiting period not met"));
    }

    fn itemized(id: &str, items: usize) -> Claim {
        Claim {
            claim_id: id.into(),
            status: ClaimStatus::Approved,
            extracted_data: Some(ExtractedData {
                line_items: (0..items)
                    .map(|i| LineItem {
                        item: format!("ITEM-{i}"),
                        cost: Some(100.0),
                    })
                    .collect(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn page_down(app: &mut AppState, times: usize) {
        for _ in 0..times {
            crate::input::handle_key(app, KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        }
    }

    #[test]
    fn detail_overlay_scrolls_to_last_line_item() {
        let (mut app, _rx, _tx) = test_app();
        app.navigate(Panel::History);
        let token = app.history.activate();
        app.history
            .on_loaded(&token, Ok(vec![itemized("CLM-LONG", 25), itemized("CLM-NEXT", 1)]));
        assert!(app.history.select_cursor());
        app.open_overlay(Overlay::ClaimDetail);

        let text = screen(&app);
        assert!(text.contains("ITEM-0"));
        assert!(!text.contains("ITEM-24"));

        page_down(&mut app, 3);
        let text = screen(&app);
        assert!(text.contains("ITEM-24"));
        assert!(app.detail_scroll.offset() > 0);

        crate::input::handle_key(&mut app, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert_eq!(app.history.selected().unwrap().claim_id, "CLM-NEXT");
        assert_eq!(app.detail_scroll.offset(), 0);
    }

    #[test]
    fn completed_upload_scrolls_to_last_line_item() {
        let (mut app, _rx, _tx) = test_app();
        app.navigate(Panel::NewClaim);
        app.upload
            .select_file(Some(LocalDocument::from_bytes("bill.png", b"png".to_vec())))
            .unwrap();
        let request = app.upload.submit().unwrap();
        assert!(app.upload.complete(&request.token, Ok(itemized("CLM-NEW", 25))));

        assert!(!screen(&app).contains("ITEM-24"));
        page_down(&mut app, 3);
        assert!(screen(&app).contains("ITEM-24"));
    }

    #[test]
    fn failure_notice_draws_fixed_text() {
        let (mut app, _rx, _tx) = test_app();
        app.open_overlay(Overlay::FailureNotice);
        assert!(screen(&app).contains("Is the backend running?"));
    }
}
