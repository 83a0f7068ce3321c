//! Ingestion façade.
//!
//! Raw bytes plus a declared [`SourceFormat`] go in; an [`ImportReport`]
//! comes out. Table-shaped inputs are decoded into a [`tabular::Table`] and
//! normalized by [`tabular::ingest_table`]; structured documents go through
//! [`document::ingest_document`]. Every successfully built case is written
//! into the caller's [`CaseStore`].
//!
//! Expected failure modes never escape as `Err`: unreadable bytes, missing
//! columns and bad records all end up as [`ImportIssue`] entries next to the
//! count of imported cases. The only `Err` paths are contract violations
//! (an unknown declared format) and host I/O in [`ingest_file`].

pub mod delimited;
pub mod document;
pub mod spreadsheet;
pub mod tabular;

use crate::core::error::CasebookError;
use crate::core::model::ValidationError;
use crate::core::store::CaseStore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use tabular::REQUIRED_COLUMNS;

/// Input formats the façade can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Json,
}

impl SourceFormat {
    /// Name used in user-facing messages (`Invalid CSV: ...`).
    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Xlsx => "XLSX",
            SourceFormat::Json => "JSON",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Json => "json",
        }
    }

    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, CasebookError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        ext.parse()
    }
}

impl FromStr for SourceFormat {
    type Err = CasebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "json" => Ok(SourceFormat::Json),
            _ => Err(CasebookError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Coarse classification of an [`ImportIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Whole input rejected before any record was read.
    Structural,
    /// Input bytes could not be decoded at all.
    Decode,
    /// One record rejected; the rest of the input was still processed.
    Record,
}

/// One problem found during an ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportIssue {
    MissingColumns(Vec<String>),
    MissingCaseList {
        format: SourceFormat,
    },
    Decode {
        format: SourceFormat,
        detail: String,
    },
    Record {
        key_label: &'static str,
        key: Option<String>,
        error: ValidationError,
    },
}

impl ImportIssue {
    pub fn kind(&self) -> IssueKind {
        match self {
            ImportIssue::MissingColumns(_) | ImportIssue::MissingCaseList { .. } => {
                IssueKind::Structural
            }
            ImportIssue::Decode { .. } => IssueKind::Decode,
            ImportIssue::Record { .. } => IssueKind::Record,
        }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportIssue::MissingColumns(columns) => {
                write!(f, "Missing required column(s): {}", columns.join(", "))
            }
            ImportIssue::MissingCaseList { format } => {
                write!(f, "{} root must contain 'test_cases' list", format.label())
            }
            ImportIssue::Decode { format, detail } => {
                write!(f, "Invalid {}: {}", format.label(), detail)
            }
            ImportIssue::Record {
                key_label,
                key,
                error,
            } => write!(
                f,
                "{}={}: {}",
                key_label,
                key.as_deref().unwrap_or("<missing>"),
                error
            ),
        }
    }
}

/// Outcome of one ingestion call. `imported` and `issues` are independent:
/// partial success is normal.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub format: SourceFormat,
    pub source: Option<String>,
    /// SHA-256 of the raw input, hex encoded.
    pub digest: String,
    pub imported: usize,
    #[serde(serialize_with = "serialize_issues")]
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    /// Human-readable issue messages, in discovery order.
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

fn serialize_issues<S>(issues: &[ImportIssue], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;
    let mut seq = serializer.serialize_seq(Some(issues.len()))?;
    for issue in issues {
        seq.serialize_element(&serde_json::json!({
            "kind": issue.kind(),
            "message": issue.to_string(),
        }))?;
    }
    seq.end()
}

/// Parses `raw` as `format` and writes every valid case into `store`.
pub fn ingest(store: &mut CaseStore, raw: &[u8], format: SourceFormat) -> ImportReport {
    let digest = content_digest(raw);
    let (imported, issues) = match format {
        SourceFormat::Csv => match delimited::read_table(raw) {
            Ok(table) => tabular::ingest_table(store, &table),
            Err(detail) => (0, vec![ImportIssue::Decode { format, detail }]),
        },
        SourceFormat::Xlsx => match spreadsheet::read_table(raw) {
            Ok(table) => tabular::ingest_table(store, &table),
            Err(detail) => (0, vec![ImportIssue::Decode { format, detail }]),
        },
        SourceFormat::Json => document::ingest_document(store, raw, format),
    };

    for issue in &issues {
        match issue.kind() {
            IssueKind::Record => tracing::debug!(%format, issue = %issue, "record rejected"),
            _ => tracing::warn!(%format, issue = %issue, "input rejected"),
        }
    }
    tracing::info!(
        %format,
        imported,
        issues = issues.len(),
        digest = %digest,
        "ingestion finished"
    );

    ImportReport {
        format,
        source: None,
        digest,
        imported,
        issues,
    }
}

/// Like [`ingest`], for callers that only hold a format name.
pub fn ingest_declared(
    store: &mut CaseStore,
    raw: &[u8],
    declared: &str,
) -> Result<ImportReport, CasebookError> {
    let format: SourceFormat = declared.parse()?;
    Ok(ingest(store, raw, format))
}

/// Reads `path` fully, detects its format from the extension and ingests it.
pub fn ingest_file(store: &mut CaseStore, path: &Path) -> Result<ImportReport, CasebookError> {
    let format = SourceFormat::from_path(path)?;
    let raw = fs::read(path)?;
    let mut report = ingest(store, &raw, format);
    report.source = Some(path.display().to_string());
    Ok(report)
}

fn content_digest(raw: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    format!("{:x}", hasher.finalize())
}
