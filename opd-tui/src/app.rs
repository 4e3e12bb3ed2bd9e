//! Application state: single-owner, UI-thread only.
//!
//! All console state lives here. The worker thread communicates via channels.
//! Navigation is the only place views are activated and torn down, so fetch
//! scopes always follow the panel that is on screen.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use opd_core::api::ApiError;
use opd_core::cancel::CancelScope;
use opd_core::config::ConsoleConfig;
use opd_core::dashboard::DashboardAggregator;
use opd_core::document::PreviewPool;
use opd_core::history::HistoryBrowser;
use opd_core::upload::{UploadController, UploadPhase};

use crate::worker::{WorkerCommand, WorkerResponse};

const MAX_ERRORS: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Overview,
    NewClaim,
    History,
    Policy,
    Help,
}

impl Panel {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::NewClaim => 1,
            Panel::History => 2,
            Panel::Policy => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::NewClaim),
            2 => Some(Panel::History),
            3 => Some(Panel::Policy),
            4 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Overview",
            Panel::NewClaim => "New Claim",
            Panel::History => "Claim History",
            Panel::Policy => "Policy Rules",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Decode,
    File,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Backend => "HTTP",
            ErrorCategory::Decode => "DATA",
            ErrorCategory::File => "FILE",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn for_api(err: &ApiError) -> Self {
        match err {
            ApiError::NetworkUnreachable(_) | ApiError::Timeout(_) => ErrorCategory::Network,
            ApiError::HttpStatus { .. } => ErrorCategory::Backend,
            ApiError::Decode(_) => ErrorCategory::Decode,
            ApiError::InvalidRequest(_) => ErrorCategory::Other,
        }
    }
}

/// Which overlay (if any) is shown on top. There is never more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    /// Path entry for the document to upload.
    FilePrompt,
    /// Blocking submission failure notice.
    FailureNotice,
    /// History detail for `HistoryBrowser::selected`.
    ClaimDetail,
    /// History free-text search.
    Search,
    ErrorHistory,
}

/// Vertical scroll through a rendered claim.
///
/// The renderer records how far the content can scroll for the current
/// viewport; key handling clamps against that bound.
#[derive(Debug, Default)]
pub struct DetailScroll {
    offset: u16,
    max: Cell<u16>,
}

impl DetailScroll {
    pub fn offset(&self) -> u16 {
        self.offset.min(self.max.get())
    }

    /// Called while drawing: `content` rows shown through `viewport` rows.
    pub fn set_bounds(&self, content: usize, viewport: u16) {
        let max = content.saturating_sub(usize::from(viewport));
        self.max.set(u16::try_from(max).unwrap_or(u16::MAX));
    }

    pub fn scroll(&mut self, delta: i32) {
        let next = i32::from(self.offset()) + delta;
        self.offset = u16::try_from(next.clamp(0, i32::from(self.max.get()))).unwrap_or(0);
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Views
    pub upload: UploadController,
    pub history: HistoryBrowser,
    pub dashboard: DashboardAggregator,
    /// Scope of the document download started from the detail overlay.
    pub download: CancelScope,
    /// Shared by the claim detail overlay and the New Claim result.
    pub detail_scroll: DetailScroll,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub config: ConsoleConfig,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    /// Text buffer shared by the file and search prompts.
    pub input: String,
}

impl AppState {
    pub fn new(
        config: ConsoleConfig,
        previews: PreviewPool,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            active_panel: Panel::Overview,
            running: true,
            upload: UploadController::new(previews),
            history: HistoryBrowser::new(&config.base_url),
            dashboard: DashboardAggregator::new(),
            download: CancelScope::new(),
            detail_scroll: DetailScroll::default(),
            worker_tx,
            worker_rx,
            config,
            status_message: None,
            error_history: VecDeque::with_capacity(MAX_ERRORS),
            error_scroll: 0,
            overlay: Overlay::None,
            input: String::new(),
        }
    }

    /// Activate the panel shown at startup.
    pub fn start(&mut self) {
        self.activate(self.active_panel);
    }

    /// Switch panels, tearing down the old view and activating the new one.
    pub fn navigate(&mut self, panel: Panel) {
        if panel == self.active_panel {
            return;
        }
        self.deactivate(self.active_panel);
        self.active_panel = panel;
        self.detail_scroll.reset();
        self.activate(panel);
        self.surface_failure_notice();
    }

    /// Re-activate the current panel, issuing a fresh fetch where it has one.
    pub fn refresh(&mut self) {
        self.deactivate(self.active_panel);
        self.activate(self.active_panel);
    }

    /// Tear down every view before exit so the worker skips anything still queued.
    pub fn shutdown(&mut self) {
        self.deactivate(self.active_panel);
        self.dashboard.deactivate();
        self.history.deactivate();
        self.download = CancelScope::new();
        self.upload.reset();
        info!("views torn down for shutdown");
    }

    /// Show the blocking failure notice once nothing else is on screen over
    /// the New Claim panel. A failure that lands elsewhere waits here.
    pub fn surface_failure_notice(&mut self) {
        if self.overlay == Overlay::None
            && self.active_panel == Panel::NewClaim
            && self.upload.phase() == UploadPhase::Failed
        {
            self.overlay = Overlay::FailureNotice;
        }
    }

    fn deactivate(&mut self, panel: Panel) {
        self.close_overlay();
        match panel {
            Panel::Overview => self.dashboard.deactivate(),
            Panel::History => {
                self.history.deactivate();
                self.download = CancelScope::new();
            }
            // The upload scope lives as long as the controller.
            Panel::NewClaim | Panel::Policy | Panel::Help => {}
        }
    }

    fn activate(&mut self, panel: Panel) {
        match panel {
            Panel::Overview => {
                let token = self.dashboard.activate();
                self.send(WorkerCommand::DashboardStats { token });
            }
            Panel::History => {
                let token = self.history.activate();
                self.send(WorkerCommand::ListClaims { token });
            }
            Panel::NewClaim | Panel::Policy | Panel::Help => {}
        }
    }

    pub fn send(&mut self, cmd: WorkerCommand) {
        if self.worker_tx.send(cmd).is_err() {
            warn!("worker channel closed");
            self.push_error(
                ErrorCategory::Other,
                "Background worker is not running".into(),
                String::new(),
            );
        }
    }

    /// Replace the current overlay. Leaving the detail overlay closes the selection.
    pub fn open_overlay(&mut self, overlay: Overlay) {
        if self.overlay == Overlay::ClaimDetail && overlay != Overlay::ClaimDetail {
            self.history.close();
        }
        if self.overlay != overlay {
            self.detail_scroll.reset();
        }
        self.overlay = overlay;
    }

    pub fn close_overlay(&mut self) {
        self.open_overlay(Overlay::None);
        self.input.clear();
        self.surface_failure_notice();
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > MAX_ERRORS {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn push_api_error(&mut self, err: &ApiError, context: &str) {
        self.push_error(ErrorCategory::for_api(err), err.to_string(), context.to_string());
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        info!(status = %msg);
        self.status_message = Some((msg, StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
