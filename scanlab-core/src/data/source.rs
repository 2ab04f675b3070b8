//! Source identifiers and structured data errors.
//!
//! A source is either a local CSV path or an HTTP(S) URL. The symbol of a
//! source is the file stem of its last path segment (`data/2330.csv` → `2330`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use thiserror::Error;

/// Structured error types for loading and normalizing one source.
///
/// These propagate to the caller unchanged; isolating them per symbol is the
/// batch scanner's job.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("source not found: {id}")]
    SourceNotFound { id: String },

    #[error("fetch failed for {id}: {reason}")]
    Fetch { id: String, reason: String },

    #[error("I/O error reading {id}: {reason}")]
    Io { id: String, reason: String },

    #[error("parse error in {id}: {reason}")]
    Parse { id: String, reason: String },
}

impl DataError {
    pub fn parse(id: impl Into<String>, reason: impl Into<String>) -> Self {
        DataError::Parse {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Where one symbol's CSV lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Path(PathBuf),
    Url(String),
}

impl SourceId {
    /// Classify a raw identifier: `http://` / `https://` prefixes are URLs,
    /// everything else is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceId::Url(trimmed.to_string())
        } else {
            SourceId::Path(PathBuf::from(trimmed))
        }
    }

    /// Symbol identifier derived from the file name.
    pub fn symbol(&self) -> String {
        match self {
            SourceId::Path(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            SourceId::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                let segment = without_query
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or(without_query);
                Path::new(segment)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| segment.to_string())
            }
        }
    }

    /// Read the whole source as text. URLs go through `http`.
    pub fn read_to_string(&self, http: &HttpClient) -> Result<String, DataError> {
        match self {
            SourceId::Path(path) => read_file(path, &self.to_string()),
            SourceId::Url(url) => http.fetch(url),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Path(path) => write!(f, "{}", path.display()),
            SourceId::Url(url) => f.write_str(url),
        }
    }
}

impl From<PathBuf> for SourceId {
    fn from(path: PathBuf) -> Self {
        SourceId::Path(path)
    }
}

impl From<&Path> for SourceId {
    fn from(path: &Path) -> Self {
        SourceId::Path(path.to_path_buf())
    }
}

fn read_file(path: &Path, id: &str) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::SourceNotFound { id: id.to_string() },
        _ => DataError::Io {
            id: id.to_string(),
            reason: e.to_string(),
        },
    })
}

/// Blocking HTTP client for URL sources.
///
/// The underlying `reqwest` client is built on first use and shared by every
/// clone, so one scan keeps one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
    client: Arc<OnceLock<reqwest::blocking::Client>>,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: Arc::new(OnceLock::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, reqwest::Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(self.client.get_or_init(|| built))
    }

    /// GET `url` and return the body. 404 maps to `SourceNotFound`.
    pub fn fetch(&self, url: &str) -> Result<String, DataError> {
        let fetch_err = |reason: String| DataError::Fetch {
            id: url.to_string(),
            reason,
        };

        let client = self
            .client()
            .map_err(|e| fetch_err(format!("failed to build HTTP client: {e}")))?;

        let response = client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                fetch_err(format!("timed out after {}s", self.timeout.as_secs_f64()))
            } else {
                fetch_err(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SourceNotFound {
                id: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}")));
        }

        response.text().map_err(|e| fetch_err(e.to_string()))
    }
}
