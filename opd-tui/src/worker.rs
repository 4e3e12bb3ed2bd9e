//! Background worker thread. Every backend call runs here, one at a time.
//!
//! Communication with the UI thread is via `mpsc` channels. Each command
//! carries the cancel token of the view that issued it; a command whose token
//! is already cancelled is skipped, and every response echoes its token back
//! so the owning view can discard stale results.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use opd_core::api::{ApiError, ClaimsApi};
use opd_core::cancel::CancelToken;
use opd_core::document::{save_document, DocumentRef};
use opd_core::domain::{Claim, DashboardStats};
use opd_core::upload::UploadRequest;

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    SubmitClaim {
        request: UploadRequest,
    },
    ListClaims {
        token: CancelToken,
    },
    DashboardStats {
        token: CancelToken,
    },
    DownloadDocument {
        document: DocumentRef,
        dir: PathBuf,
        token: CancelToken,
    },
    Shutdown,
}

impl WorkerCommand {
    fn token(&self) -> Option<&CancelToken> {
        match self {
            WorkerCommand::SubmitClaim { request } => Some(&request.token),
            WorkerCommand::ListClaims { token }
            | WorkerCommand::DashboardStats { token }
            | WorkerCommand::DownloadDocument { token, .. } => Some(token),
            WorkerCommand::Shutdown => None,
        }
    }
}

/// Responses sent from the worker back to the UI.
#[derive(Debug)]
pub enum WorkerResponse {
    Submitted {
        token: CancelToken,
        result: Result<Claim, ApiError>,
    },
    Claims {
        token: CancelToken,
        result: Result<Vec<Claim>, ApiError>,
    },
    Stats {
        token: CancelToken,
        result: Result<DashboardStats, ApiError>,
    },
    DocumentSaved {
        token: CancelToken,
        result: Result<PathBuf, String>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    api: Arc<dyn ClaimsApi>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("opd-worker".into())
        .spawn(move || worker_loop(api.as_ref(), rx, tx))
}

fn worker_loop(api: &dyn ClaimsApi, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    info!(backend = api.name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                if cmd.token().is_some_and(CancelToken::is_cancelled) {
                    debug!(?cmd, "skipping cancelled command");
                    continue;
                }
                if let Some(resp) = handle_command(api, cmd) {
                    // The UI may already be gone; nothing to do about a closed channel.
                    let _ = tx.send(resp);
                }
            }
        }
    }
    info!("worker stopped");
}

fn handle_command(api: &dyn ClaimsApi, cmd: WorkerCommand) -> Option<WorkerResponse> {
    let resp = match cmd {
        WorkerCommand::SubmitClaim { request } => WorkerResponse::Submitted {
            result: api.submit_claim(&request.document),
            token: request.token,
        },
        WorkerCommand::ListClaims { token } => WorkerResponse::Claims {
            result: api.list_claims(),
            token,
        },
        WorkerCommand::DashboardStats { token } => WorkerResponse::Stats {
            result: api.dashboard_stats(),
            token,
        },
        WorkerCommand::DownloadDocument { document, dir, token } => {
            let result = api
                .fetch_document(&document)
                .map_err(|e| e.to_string())
                .and_then(|bytes| save_document(&dir, &document, &bytes).map_err(|e| e.to_string()));
            WorkerResponse::DocumentSaved { token, result }
        }
        WorkerCommand::Shutdown => return None,
    };
    Some(resp)
}
