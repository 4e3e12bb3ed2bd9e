//! Console configuration, read from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://opd-backend-1.onrender.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("base_url must start with http:// or https:// (got '{0}')")]
    InvalidBaseUrl(String),
}

/// All keys are optional; see `Default` for the fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub base_url: String,
    /// Bounds the `Submitting` state; the backend extracts and adjudicates in one call.
    pub request_timeout_secs: u64,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 120,
            download_dir: PathBuf::from("downloads"),
            log_file: PathBuf::from("opd-console.log"),
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// `<config_dir>/opd-console/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opd-console")
            .join("config.toml")
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validated()
    }

    /// Load from `path`. A missing file yields defaults; anything else wrong is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Apply a command-line base URL override.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = base_url.to_string();
        self.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = Self::default().request_timeout_secs;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_returns_defaults() {
        let config = ConsoleConfig::load(Path::new("/nonexistent/opd/config.toml")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ConsoleConfig::from_toml(
            "base_url = \"http://localhost:8000/\"\nrequest_timeout_secs = 30\n",
            Path::new("config.toml"),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [[[").unwrap();
        assert!(matches!(ConsoleConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = ConsoleConfig::default().with_base_url("ftp://files").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        let config =
            ConsoleConfig::from_toml("request_timeout_secs = 0", Path::new("c.toml")).unwrap();
        assert_eq!(config.request_timeout_secs, 120);
    }
}
