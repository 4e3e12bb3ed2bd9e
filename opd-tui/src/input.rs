//! Keyboard input dispatch: overlays, then global keys, then panel-specific handlers.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use opd_core::document::LocalDocument;

use crate::app::{AppState, ErrorCategory, Overlay, Panel};
use crate::worker::WorkerCommand;

const SCROLL_PAGE: i32 = 10;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::FilePrompt => return handle_file_prompt(app, key),
        Overlay::FailureNotice => return handle_failure_notice(app, key),
        Overlay::ClaimDetail => return handle_detail_overlay(app, key),
        Overlay::Search => return handle_search_overlay(app, key),
        Overlay::ErrorHistory => return handle_error_overlay(app, key),
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            if let Some(panel) = Panel::from_index(idx) {
                app.navigate(panel);
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.navigate(app.active_panel.prev());
            } else {
                app.navigate(app.active_panel.next());
            }
            return;
        }
        KeyCode::BackTab => {
            app.navigate(app.active_panel.prev());
            return;
        }
        KeyCode::Char('e') => {
            app.open_overlay(Overlay::ErrorHistory);
            app.error_scroll = 0;
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Overview => {
            if key.code == KeyCode::Char('r') {
                app.refresh();
            }
        }
        Panel::NewClaim => handle_upload_key(app, key),
        Panel::History => handle_history_key(app, key),
        Panel::Policy | Panel::Help => {} // display only
    }
}

/// Accepts plain, quoted, and `~/`-prefixed paths as typed or pasted.
fn expand_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(trimmed))
}

fn handle_file_prompt(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => {
            let path = expand_path(&app.input);
            app.close_overlay();
            // Nothing entered: treated like a cancelled file dialog.
            let Some(path) = path else { return };
            match LocalDocument::read(&path) {
                Ok(doc) => {
                    let name = doc.name.clone();
                    match app.upload.select_file(Some(doc)) {
                        Ok(()) => app.set_status(format!("Selected {name}. Press Enter to submit.")),
                        Err(e) => app.set_warning(e.to_string()),
                    }
                }
                Err(e) => app.push_error(ErrorCategory::File, e.to_string(), path.display().to_string()),
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_failure_notice(app: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        if let Err(e) = app.upload.acknowledge_failure() {
            app.set_warning(e.to_string());
        }
        app.close_overlay();
    }
}

fn handle_detail_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_overlay(),
        // Step through rows without leaving the overlay; each step replaces its content.
        KeyCode::Char('j') | KeyCode::Down => {
            app.history.move_cursor(1);
            app.history.select_cursor();
            app.detail_scroll.reset();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.history.move_cursor(-1);
            app.history.select_cursor();
            app.detail_scroll.reset();
        }
        KeyCode::Char('d') => start_download(app),
        _ => scroll_claim(app, key.code),
    }
}

/// Scroll keys shared by both views that show a whole claim.
fn scroll_claim(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::PageDown => app.detail_scroll.scroll(SCROLL_PAGE),
        KeyCode::PageUp => app.detail_scroll.scroll(-SCROLL_PAGE),
        KeyCode::Char('J') => app.detail_scroll.scroll(1),
        KeyCode::Char('K') => app.detail_scroll.scroll(-1),
        _ => {}
    }
}

fn start_download(app: &mut AppState) {
    let Some(document) = app.history.selected_document() else {
        app.set_warning("No document stored for this claim");
        return;
    };
    app.download = opd_core::cancel::CancelScope::new();
    let token = app.download.token();
    app.set_status(format!("Downloading {}...", document.file_name()));
    let dir = app.config.download_dir.clone();
    app.send(WorkerCommand::DownloadDocument {
        document,
        dir,
        token,
    });
}

fn handle_search_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Enter => {
            let query = std::mem::take(&mut app.input);
            app.history.set_query(&query);
            app.close_overlay();
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => app.close_overlay(),
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_upload_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('o') | KeyCode::Char('f') => {
            if app.upload.is_busy() {
                app.set_warning("A claim is being processed");
            } else {
                app.input.clear();
                app.open_overlay(Overlay::FilePrompt);
            }
        }
        KeyCode::Enter | KeyCode::Char('s') => match app.upload.submit() {
            Ok(request) => {
                app.set_status("Processing claim...");
                app.send(WorkerCommand::SubmitClaim { request });
            }
            Err(e) => app.set_warning(e.to_string()),
        },
        KeyCode::Char('x') | KeyCode::Esc => {
            app.upload.reset();
            app.detail_scroll.reset();
            app.set_status("Cleared");
        }
        code => scroll_claim(app, code),
    }
}

fn handle_history_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.history.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.history.move_cursor(-1),
        KeyCode::PageDown => app.history.move_cursor(10),
        KeyCode::PageUp => app.history.move_cursor(-10),
        KeyCode::Char('g') | KeyCode::Home => app.history.cursor_to_start(),
        KeyCode::Char('G') | KeyCode::End => app.history.cursor_to_end(),
        KeyCode::Enter => {
            if app.history.select_cursor() {
                app.open_overlay(Overlay::ClaimDetail);
            }
        }
        KeyCode::Char('/') => {
            app.input = app.history.query().to_string();
            app.open_overlay(Overlay::Search);
        }
        KeyCode::Char('f') => {
            app.history.cycle_filter();
            app.set_status(format!("Status filter: {}", app.history.filter().label()));
        }
        KeyCode::Char('c') => app.history.set_query(""),
        KeyCode::Char('r') => app.refresh(),
        _ => {}
    }
}
