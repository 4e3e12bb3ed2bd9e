//! Adjudication backend client.
//!
//! `ClaimsApi` abstracts the four endpoints the console consumes so the worker
//! can run against the real service or an in-memory fixture. The HTTP
//! implementation is a blocking reqwest client; it is only ever called from
//! the worker thread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::document::{DocumentRef, LocalDocument};
use crate::domain::{Claim, DashboardStats};

pub const SUBMIT_PATH: &str = "/api/submit-claim";
pub const CLAIMS_PATH: &str = "/api/claims";
pub const STATS_PATH: &str = "/api/dashboard-stats";

/// Longest error body kept for logs and the error history.
const MAX_ERROR_BODY: usize = 200;

/// Structured backend errors. The UI collapses all of these into one generic
/// notice for submissions; the detail goes to the log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// The endpoints consumed by the console.
pub trait ClaimsApi: Send + Sync {
    /// Human-readable name of this backend.
    fn name(&self) -> &str;

    /// `POST /api/submit-claim` with the document as the `file` multipart field.
    fn submit_claim(&self, document: &LocalDocument) -> Result<Claim, ApiError>;

    /// `GET /api/claims`.
    fn list_claims(&self) -> Result<Vec<Claim>, ApiError>;

    /// `GET /api/dashboard-stats`.
    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;

    /// `GET /{file_path}`.
    fn fetch_document(&self, document: &DocumentRef) -> Result<Vec<u8>, ApiError>;
}

/// Decode a single claim. Any JSON object decodes; leaf fields are lenient.
pub fn decode_claim(body: &[u8]) -> Result<Claim, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Decode("expected a claim object".into()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode the claim list. Non-object entries are skipped.
pub fn decode_claims(body: &[u8]) -> Result<Vec<Claim>, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ApiError::Decode("expected a list of claims".into()));
    };
    let total = items.len();
    let claims: Vec<Claim> = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if claims.len() < total {
        warn!(skipped = total - claims.len(), "dropped malformed claim entries");
    }
    Ok(claims)
}

pub fn decode_stats(body: &[u8]) -> Result<DashboardStats, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !value.is_object() {
        return Err(ApiError::Decode("expected a stats object".into()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// HTTP client for the adjudication service.
pub struct HttpClaimsApi {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpClaimsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("opd-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            ApiError::NetworkUnreachable(e.to_string())
        } else {
            ApiError::Decode(e.to_string())
        }
    }

    /// Send, check status, and return the raw body.
    fn execute(&self, request: reqwest::blocking::RequestBuilder, what: &str) -> Result<Vec<u8>, ApiError> {
        let started = Instant::now();
        let resp = request.send().map_err(Self::transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(%status, what, "backend returned an error status");
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        let bytes = resp.bytes().map_err(Self::transport_error)?;
        info!(
            what,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "backend request complete"
        );
        Ok(bytes.to_vec())
    }
}

impl ClaimsApi for HttpClaimsApi {
    fn name(&self) -> &str {
        "http"
    }

    fn submit_claim(&self, document: &LocalDocument) -> Result<Claim, ApiError> {
        let part = reqwest::blocking::multipart::Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(&document.mime)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        let form = reqwest::blocking::multipart::Form::new().part("file", part);
        let body = self.execute(self.client.post(self.url(SUBMIT_PATH)).multipart(form), "submit-claim")?;
        decode_claim(&body)
    }

    fn list_claims(&self) -> Result<Vec<Claim>, ApiError> {
        let body = self.execute(self.client.get(self.url(CLAIMS_PATH)), "claims")?;
        decode_claims(&body)
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.execute(self.client.get(self.url(STATS_PATH)), "dashboard-stats")?;
        decode_stats(&body)
    }

    fn fetch_document(&self, document: &DocumentRef) -> Result<Vec<u8>, ApiError> {
        self.execute(self.client.get(&document.url), "document")
    }
}

/// In-memory backend with canned responses, for tests and offline demos.
pub struct FixtureApi {
    submit: Result<Claim, ApiError>,
    claims: Result<Vec<Claim>, ApiError>,
    stats: Result<DashboardStats, ApiError>,
    documents: HashMap<String, Vec<u8>>,
    submissions: AtomicUsize,
}

impl Default for FixtureApi {
    fn default() -> Self {
        Self {
            submit: Err(ApiError::NetworkUnreachable("fixture has no submit response".into())),
            claims: Ok(Vec::new()),
            stats: Ok(DashboardStats::default()),
            documents: HashMap::new(),
            submissions: AtomicUsize::new(0),
        }
    }
}

impl FixtureApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submit(mut self, result: Result<Claim, ApiError>) -> Self {
        self.submit = result;
        self
    }

    pub fn with_claims(mut self, result: Result<Vec<Claim>, ApiError>) -> Self {
        self.claims = result;
        self
    }

    pub fn with_stats(mut self, result: Result<DashboardStats, ApiError>) -> Self {
        self.stats = result;
        self
    }

    pub fn with_document(mut self, file_path: &str, bytes: Vec<u8>) -> Self {
        self.documents.insert(file_path.trim_start_matches('/').to_string(), bytes);
        self
    }

    /// Number of submit calls received.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

impl ClaimsApi for FixtureApi {
    fn name(&self) -> &str {
        "fixture"
    }

    fn submit_claim(&self, _document: &LocalDocument) -> Result<Claim, ApiError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.submit.clone()
    }

    fn list_claims(&self) -> Result<Vec<Claim>, ApiError> {
        self.claims.clone()
    }

    fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.stats.clone()
    }

    fn fetch_document(&self, document: &DocumentRef) -> Result<Vec<u8>, ApiError> {
        self.documents
            .get(&document.file_path)
            .cloned()
            .ok_or_else(|| ApiError::HttpStatus {
                status: 404,
                body: "Not Found".into(),
            })
    }
}
