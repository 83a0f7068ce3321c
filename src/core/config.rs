//! `casebook.toml` loading.
//!
//! ```toml
//! [output]
//! format = "text"      # or "json"
//! max_issues = 20
//! issue_chars = 160
//!
//! [export]
//! pretty = true
//!
//! [log]
//! filter = "warn"
//! ```

use crate::core::error::CasebookError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "casebook.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CasebookConfig {
    pub output: OutputConfig,
    pub export: ExportConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Issues printed per import before the rest are summarized.
    pub max_issues: usize,
    /// Issue messages are cut to this many characters.
    pub issue_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            max_issues: 20,
            issue_chars: 160,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExportConfig {
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

pub fn parse_config(content: &str) -> Result<CasebookConfig, CasebookError> {
    toml::from_str(content).map_err(|e| CasebookError::ConfigError(e.to_string()))
}

/// Loads configuration.
///
/// An explicit path must exist. Without one, `casebook.toml` in `dir` is used
/// when present; otherwise defaults apply.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<CasebookConfig, CasebookError> {
    let path = match explicit {
        Some(p) if !p.exists() => {
            return Err(CasebookError::ConfigError(format!(
                "config file not found: {}",
                p.display()
            )));
        }
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                return Ok(CasebookConfig::default());
            }
            candidate
        }
    };

    let content = fs::read_to_string(&path).map_err(CasebookError::IoError)?;
    parse_config(&content)
}
