//! Fetch-on-activate load state shared by the history and dashboard views.

use tracing::{debug, warn};

use crate::api::ApiError;
use crate::cancel::{CancelScope, CancelToken};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Never activated, or deactivated before the fetch finished.
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// A load state plus the scope of its outstanding request.
#[derive(Debug)]
pub struct Fetch<T> {
    what: &'static str,
    state: LoadState<T>,
    scope: CancelScope,
}

impl<T> Fetch<T> {
    pub fn new(what: &'static str) -> Self {
        Self {
            what,
            state: LoadState::Idle,
            scope: CancelScope::new(),
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Start a fresh fetch. Any earlier request is cancelled.
    pub fn begin(&mut self) -> CancelToken {
        self.scope = CancelScope::new();
        self.state = LoadState::Loading;
        debug!(what = self.what, scope = self.scope.id(), "fetch started");
        self.scope.token()
    }

    /// Cancel the outstanding request. A fetch still loading goes back to `Idle`.
    pub fn abandon(&mut self) {
        self.scope.cancel();
        if self.state.is_loading() {
            self.state = LoadState::Idle;
        }
    }

    /// Apply a response. Returns false when the token is stale or cancelled.
    pub fn finish(&mut self, token: &CancelToken, result: Result<T, ApiError>) -> bool {
        if !self.scope.owns(token) || !self.state.is_loading() {
            debug!(what = self.what, scope = token.scope_id(), "discarding stale response");
            return false;
        }
        self.state = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => {
                warn!(what = self.what, error = %err, "fetch failed");
                LoadState::Failed(format!("Could not load {}: {err}", self.what))
            }
        };
        true
    }
}
