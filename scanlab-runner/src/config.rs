//! Scan configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. CLI flags override individual values after loading.
//!
//! ```toml
//! [strategy]
//! rsi_period = 14
//!
//! [sampling]
//! interval_minutes = 5
//! session_minutes = 270
//!
//! [data]
//! utc_offset = "+08:00"
//!
//! [scan]
//! limit = 10
//! tie_break = "symbol"
//!
//! [report]
//! format = "html"
//! output = "stock_report.html"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scanlab_core::data::{parse_utc_offset, Normalizer};
use scanlab_core::signals::{RecencyWindow, SamplingConfig};
use scanlab_core::strategy::StrategyParams;

use crate::rank::TieBreak;
use crate::report::ReportFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub strategy: StrategyParams,
    pub sampling: SamplingSection,
    pub data: DataSection,
    pub scan: ScanSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSection {
    pub interval_minutes: u32,
    pub session_minutes: u32,
    /// Overrides the half-session recency window when set.
    pub recency_bars: Option<usize>,
}

impl Default for SamplingSection {
    fn default() -> Self {
        let sampling = SamplingConfig::default();
        Self {
            interval_minutes: sampling.interval_minutes,
            session_minutes: sampling.session_minutes,
            recency_bars: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Offset every timestamp is converted to (`±HH:MM`).
    pub utc_offset: String,
    pub dedup: bool,
    pub http_timeout_secs: u64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            utc_offset: "+08:00".to_string(),
            dedup: true,
            http_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Maximum rows in the ranked report.
    pub limit: usize,
    pub parallel: bool,
    /// Per-symbol evaluation deadline; none by default.
    pub symbol_timeout_secs: Option<u64>,
    pub tie_break: TieBreak,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            limit: 10,
            parallel: false,
            symbol_timeout_secs: None,
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub format: ReportFormat,
    pub output: PathBuf,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            format: ReportFormat::Html,
            output: PathBuf::from("stock_report.html"),
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.sampling.interval_minutes == 0 {
            return Err(ConfigError::Invalid("sampling.interval_minutes must be >= 1".into()));
        }
        if self.sampling.session_minutes < self.sampling.interval_minutes {
            return Err(ConfigError::Invalid(
                "sampling.session_minutes must cover at least one interval".into(),
            ));
        }
        if self.sampling.recency_bars == Some(0) {
            return Err(ConfigError::Invalid("sampling.recency_bars must be >= 1".into()));
        }
        self.offset()?;
        if self.data.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid("data.http_timeout_secs must be >= 1".into()));
        }
        if self.scan.limit == 0 {
            return Err(ConfigError::Invalid("scan.limit must be >= 1".into()));
        }
        if self.scan.symbol_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("scan.symbol_timeout_secs must be >= 1".into()));
        }
        Ok(())
    }

    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig {
            interval_minutes: self.sampling.interval_minutes,
            session_minutes: self.sampling.session_minutes,
        }
    }

    /// Explicit `recency_bars`, else half a session.
    pub fn recency_window(&self) -> RecencyWindow {
        match self.sampling.recency_bars {
            Some(bars) => RecencyWindow::new(bars),
            None => RecencyWindow::from_sampling(&self.sampling()),
        }
    }

    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.data.utc_offset).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "data.utc_offset must look like +08:00, got {:?}",
                self.data.utc_offset
            ))
        })
    }

    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        Ok(Normalizer::new(self.offset()?)
            .with_dedup(self.data.dedup)
            .with_http_timeout(Duration::from_secs(self.data.http_timeout_secs)))
    }

    pub fn symbol_timeout(&self) -> Option<Duration> {
        self.scan.symbol_timeout_secs.map(Duration::from_secs)
    }

    /// Deterministic hash of the configuration (BLAKE3 over its JSON form).
    pub fn config_hash(&self) -> String {
        // Serializing plain data structs to JSON cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
