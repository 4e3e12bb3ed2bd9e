//! Source documents: locally selected files and backend-stored copies.
//!
//! A locally selected file is held in memory behind a [`PreviewHandle`].
//! Handles come from a [`PreviewPool`], which counts acquisitions and
//! releases so callers (and tests) can check that every preview is released
//! exactly once. Release happens in `Drop`, so reset, replacement and
//! teardown all take the same path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::domain::Claim;
use crate::render::DocumentView;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is empty")]
    Empty(String),
}

/// A bill or prescription read from the operator's disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDocument {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

fn mime_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

impl LocalDocument {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for(&name).to_string();
        Self { name, mime, bytes }
    }

    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        if bytes.is_empty() {
            return Err(DocumentError::Empty(name));
        }
        Ok(Self::from_bytes(name, bytes))
    }

    /// Short blake3 digest; identifies the content in logs and the preview.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(&self.bytes);
        hash.to_hex().as_str()[..16].to_string()
    }
}

#[derive(Debug, Default)]
struct PreviewCounters {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Issues preview handles and tracks their lifetimes.
#[derive(Debug, Clone, Default)]
pub struct PreviewPool {
    counters: Arc<PreviewCounters>,
}

impl PreviewPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, document: LocalDocument) -> PreviewHandle {
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        let fingerprint = document.fingerprint();
        PreviewHandle {
            document: Arc::new(document),
            fingerprint,
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Handles currently alive.
    pub fn live(&self) -> usize {
        self.acquired() - self.released()
    }
}

/// Exclusively owned in-memory preview of a selected document.
///
/// Not `Clone`: there is exactly one owner, and dropping it is the release.
#[derive(Debug)]
pub struct PreviewHandle {
    document: Arc<LocalDocument>,
    fingerprint: String,
    counters: Arc<PreviewCounters>,
}

impl PreviewHandle {
    pub fn document(&self) -> &LocalDocument {
        &self.document
    }

    /// Shared read-only bytes for the upload request.
    pub fn share(&self) -> Arc<LocalDocument> {
        Arc::clone(&self.document)
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn view(&self) -> DocumentView {
        DocumentView::Local {
            name: self.document.name.clone(),
            mime: self.document.mime.clone(),
            size_bytes: self.document.bytes.len(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(document = %self.document.name, "preview released");
    }
}

/// A document stored by the backend under `file_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub file_path: String,
    pub url: String,
}

impl DocumentRef {
    pub fn resolve(base_url: &str, file_path: &str) -> Option<Self> {
        let path = file_path.trim().trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        Some(Self {
            file_path: path.to_string(),
            url: format!("{}/{}", base_url.trim_end_matches('/'), path),
        })
    }

    pub fn for_claim(base_url: &str, claim: &Claim) -> Option<Self> {
        claim
            .file_path
            .as_deref()
            .and_then(|p| Self::resolve(base_url, p))
    }

    /// Last path segment, safe to use as a local file name.
    pub fn file_name(&self) -> String {
        let last = self.file_path.rsplit('/').next().unwrap_or_default();
        let cleaned: String = last
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            .collect();
        if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
            "document".to_string()
        } else {
            cleaned
        }
    }

    pub fn view(&self) -> DocumentView {
        DocumentView::Remote {
            file_path: self.file_path.clone(),
            url: self.url.clone(),
        }
    }
}

/// Document panel content for a historical claim.
pub fn view_for_claim(base_url: &str, claim: &Claim) -> DocumentView {
    DocumentRef::for_claim(base_url, claim)
        .map(|r| r.view())
        .unwrap_or(DocumentView::NotAvailable)
}

/// Write retrieved document bytes into `dir`, returning the written path.
pub fn save_document(dir: &Path, doc: &DocumentRef, bytes: &[u8]) -> Result<PathBuf, DocumentError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| DocumentError::Io { path, source }
    };
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let target = dir.join(doc.file_name());
    std::fs::write(&target, bytes).map_err(io_err(&target))?;
    Ok(target)
}
