//! Claim submission lifecycle.
//!
//! ```text
//! Idle -> FileSelected -> Submitting -> Completed(Claim)
//!                                    -> Failed(notice) -> FileSelected (acknowledge)
//! reset: any state -> Idle
//! ```
//!
//! The legal moves live in [`transition`], a pure function over phases. The
//! controller validates every action against it before touching its data, so
//! at most one submission can ever be in flight.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::cancel::{CancelScope, CancelToken};
use crate::document::{LocalDocument, PreviewHandle, PreviewPool};
use crate::domain::Claim;

/// The single, deliberately unspecific message shown for any submission failure.
pub const FAILURE_NOTICE: &str = "Processing failed. Is the backend running?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Submitting,
    Completed,
    Failed,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UploadPhase::Idle => "idle",
            UploadPhase::FileSelected => "file selected",
            UploadPhase::Submitting => "submitting",
            UploadPhase::Completed => "completed",
            UploadPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAction {
    SelectFile,
    Submit,
    Succeed,
    Fail,
    AcknowledgeFailure,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("cannot {action:?} while {from}")]
    InvalidTransition {
        from: UploadPhase,
        action: UploadAction,
    },
}

/// Pure transition table.
pub fn transition(from: UploadPhase, action: UploadAction) -> Result<UploadPhase, UploadError> {
    use UploadAction as A;
    use UploadPhase as P;
    let to = match (from, action) {
        (_, A::Reset) => P::Idle,
        (P::Submitting, A::SelectFile) => return Err(UploadError::InvalidTransition { from, action }),
        (_, A::SelectFile) => P::FileSelected,
        (P::FileSelected, A::Submit) => P::Submitting,
        (P::Submitting, A::Succeed) => P::Completed,
        (P::Submitting, A::Fail) => P::Failed,
        (P::Failed, A::AcknowledgeFailure) => P::FileSelected,
        _ => return Err(UploadError::InvalidTransition { from, action }),
    };
    Ok(to)
}

/// Controller state. The preview handle lives inside the states that need it,
/// so leaving those states releases it.
#[derive(Debug)]
pub enum UploadState {
    Idle,
    FileSelected { preview: PreviewHandle },
    Submitting { preview: PreviewHandle },
    Completed { preview: PreviewHandle, claim: Box<Claim> },
    Failed { preview: PreviewHandle, notice: &'static str },
}

impl UploadState {
    pub fn phase(&self) -> UploadPhase {
        match self {
            UploadState::Idle => UploadPhase::Idle,
            UploadState::FileSelected { .. } => UploadPhase::FileSelected,
            UploadState::Submitting { .. } => UploadPhase::Submitting,
            UploadState::Completed { .. } => UploadPhase::Completed,
            UploadState::Failed { .. } => UploadPhase::Failed,
        }
    }

    fn into_preview(self) -> Option<PreviewHandle> {
        match self {
            UploadState::Idle => None,
            UploadState::FileSelected { preview }
            | UploadState::Submitting { preview }
            | UploadState::Completed { preview, .. }
            | UploadState::Failed { preview, .. } => Some(preview),
        }
    }
}

/// One upload, handed to the worker.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub document: Arc<LocalDocument>,
    pub token: CancelToken,
}

pub struct UploadController {
    pool: PreviewPool,
    state: UploadState,
    scope: CancelScope,
}

impl UploadController {
    pub fn new(pool: PreviewPool) -> Self {
        Self {
            pool,
            state: UploadState::Idle,
            scope: CancelScope::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn phase(&self) -> UploadPhase {
        self.state.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == UploadPhase::Submitting
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        match &self.state {
            UploadState::Idle => None,
            UploadState::FileSelected { preview }
            | UploadState::Submitting { preview }
            | UploadState::Completed { preview, .. }
            | UploadState::Failed { preview, .. } => Some(preview),
        }
    }

    pub fn result(&self) -> Option<&Claim> {
        match &self.state {
            UploadState::Completed { claim, .. } => Some(claim.as_ref()),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        match &self.state {
            UploadState::Failed { notice, .. } => Some(*notice),
            _ => None,
        }
    }

    /// Select a document. `None` (nothing chosen) leaves the state untouched.
    /// Any held result is discarded and the previous preview released.
    pub fn select_file(&mut self, file: Option<LocalDocument>) -> Result<(), UploadError> {
        let Some(document) = file else {
            return Ok(());
        };
        transition(self.phase(), UploadAction::SelectFile)?;
        info!(
            document = %document.name,
            bytes = document.bytes.len(),
            mime = %document.mime,
            "document selected"
        );
        // Release the old preview before acquiring the new one.
        self.state = UploadState::Idle;
        let preview = self.pool.acquire(document);
        self.state = UploadState::FileSelected { preview };
        Ok(())
    }

    /// Start the single in-flight submission.
    pub fn submit(&mut self) -> Result<UploadRequest, UploadError> {
        transition(self.phase(), UploadAction::Submit)?;
        let Some(preview) = std::mem::replace(&mut self.state, UploadState::Idle).into_preview()
        else {
            return Err(UploadError::InvalidTransition {
                from: UploadPhase::Idle,
                action: UploadAction::Submit,
            });
        };
        let request = UploadRequest {
            document: preview.share(),
            token: self.scope.token(),
        };
        info!(
            document = %preview.document().name,
            fingerprint = %preview.fingerprint(),
            "submitting claim"
        );
        self.state = UploadState::Submitting { preview };
        Ok(request)
    }

    /// Apply the outcome of a submission. Returns false if it was stale and ignored.
    pub fn complete(&mut self, token: &CancelToken, outcome: Result<Claim, ApiError>) -> bool {
        if !self.scope.owns(token) || !self.is_busy() {
            debug!(scope = token.scope_id(), "discarding stale submission result");
            return false;
        }
        let Some(preview) = std::mem::replace(&mut self.state, UploadState::Idle).into_preview()
        else {
            return false;
        };
        self.state = match outcome {
            Ok(claim) => {
                info!(claim_id = %claim.claim_id, status = %claim.status, "claim adjudicated");
                UploadState::Completed {
                    preview,
                    claim: Box::new(claim),
                }
            }
            Err(err) => {
                warn!(error = %err, "claim submission failed");
                UploadState::Failed {
                    preview,
                    notice: FAILURE_NOTICE,
                }
            }
        };
        true
    }

    /// Dismiss the failure notice, keeping the selected file for a manual resubmit.
    pub fn acknowledge_failure(&mut self) -> Result<(), UploadError> {
        transition(self.phase(), UploadAction::AcknowledgeFailure)?;
        if let Some(preview) = std::mem::replace(&mut self.state, UploadState::Idle).into_preview() {
            self.state = UploadState::FileSelected { preview };
        }
        Ok(())
    }

    /// Back to `Idle` from anywhere. Releases the preview and abandons any in-flight upload.
    pub fn reset(&mut self) {
        if self.is_busy() {
            debug!("reset while submitting; in-flight result will be discarded");
        }
        self.state = UploadState::Idle;
        self.scope = CancelScope::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> LocalDocument {
        LocalDocument::from_bytes(name, name.as_bytes().to_vec())
    }

    fn approved() -> Claim {
        Claim {
            claim_id: "CLM-1".into(),
            status: crate::domain::ClaimStatus::Approved,
            ..Default::default()
        }
    }

    #[test]
    fn transition_table() {
        use UploadAction as A;
        use UploadPhase as P;
        assert_eq!(transition(P::Idle, A::SelectFile), Ok(P::FileSelected));
        assert_eq!(transition(P::Completed, A::SelectFile), Ok(P::FileSelected));
        assert!(transition(P::Submitting, A::SelectFile).is_err());
        assert!(transition(P::Idle, A::Submit).is_err());
        assert!(transition(P::Submitting, A::Submit).is_err());
        assert!(transition(P::Completed, A::Submit).is_err());
        assert_eq!(transition(P::Failed, A::AcknowledgeFailure), Ok(P::FileSelected));
        for p in [P::Idle, P::FileSelected, P::Submitting, P::Completed, P::Failed] {
            assert_eq!(transition(p, A::Reset), Ok(P::Idle));
        }
    }

    #[test]
    fn happy_path() {
        let mut c = UploadController::new(PreviewPool::new());
        c.select_file(Some(doc("bill.png"))).unwrap();
        assert_eq!(c.phase(), UploadPhase::FileSelected);
        let req = c.submit().unwrap();
        assert_eq!(req.document.name, "bill.png");
        assert!(c.is_busy());
        assert!(c.complete(&req.token, Ok(approved())));
        assert_eq!(c.phase(), UploadPhase::Completed);
        assert_eq!(c.result().unwrap().claim_id, "CLM-1");
        assert!(c.preview().is_some());
    }

    #[test]
    fn absent_file_is_ignored() {
        let mut c = UploadController::new(PreviewPool::new());
        c.select_file(None).unwrap();
        assert_eq!(c.phase(), UploadPhase::Idle);
    }

    #[test]
    fn second_submit_is_refused() {
        let mut c = UploadController::new(PreviewPool::new());
        c.select_file(Some(doc("a.png"))).unwrap();
        c.submit().unwrap();
        let err = c.submit().unwrap_err();
        assert_eq!(
            err,
            UploadError::InvalidTransition {
                from: UploadPhase::Submitting,
                action: UploadAction::Submit
            }
        );
    }

    #[test]
    fn select_discards_prior_result() {
        let pool = PreviewPool::new();
        let mut c = UploadController::new(pool.clone());
        c.select_file(Some(doc("a.png"))).unwrap();
        let req = c.submit().unwrap();
        c.complete(&req.token, Ok(approved()));
        c.select_file(Some(doc("b.png"))).unwrap();
        assert!(c.result().is_none());
        assert_eq!(c.preview().unwrap().document().name, "b.png");
        assert_eq!(pool.released(), 1);
        assert_eq!(pool.live(), 1);
    }

    #[test]
    fn failure_then_acknowledge_keeps_file() {
        let mut c = UploadController::new(PreviewPool::new());
        c.select_file(Some(doc("a.png"))).unwrap();
        let req = c.submit().unwrap();
        c.complete(&req.token, Err(ApiError::Timeout("slow".into())));
        assert_eq!(c.phase(), UploadPhase::Failed);
        assert_eq!(c.notice(), Some(FAILURE_NOTICE));
        c.acknowledge_failure().unwrap();
        assert_eq!(c.phase(), UploadPhase::FileSelected);
        assert!(c.submit().is_ok());
    }

    #[test]
    fn reset_discards_in_flight_result() {
        let mut c = UploadController::new(PreviewPool::new());
        c.select_file(Some(doc("a.png"))).unwrap();
        let old = c.submit().unwrap();
        c.reset();
        assert!(old.token.is_cancelled());
        c.select_file(Some(doc("b.png"))).unwrap();
        let fresh = c.submit().unwrap();
        assert!(!c.complete(&old.token, Ok(approved())));
        assert!(c.is_busy());
        assert!(c.complete(&fresh.token, Ok(approved())));
    }

    #[test]
    fn reset_releases_preview_exactly_once() {
        let pool = PreviewPool::new();
        let mut c = UploadController::new(pool.clone());
        c.select_file(Some(doc("a.png"))).unwrap();
        c.reset();
        c.reset();
        assert_eq!(c.phase(), UploadPhase::Idle);
        assert_eq!(pool.acquired(), 1);
        assert_eq!(pool.released(), 1);
    }

    #[test]
    fn dropping_controller_releases_preview() {
        let pool = PreviewPool::new();
        {
            let mut c = UploadController::new(pool.clone());
            c.select_file(Some(doc("a.png"))).unwrap();
            c.submit().unwrap();
        }
        assert_eq!(pool.live(), 0);
    }
}
