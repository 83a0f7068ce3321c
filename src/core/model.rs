//! Normalized record model shared by every input format.
//!
//! Parsers never build a [`TestCase`] directly. They fill a [`CaseDraft`]
//! field by field, recording a [`FieldError`] for every value that cannot be
//! coerced, and [`CaseDraft::build`] turns the draft into either a case or a
//! [`ValidationError`] carrying every problem found in that record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type assigned when the source leaves it absent or blank.
pub const DEFAULT_CASE_TYPE: &str = "functional";

/// Types the presentation layer knows about. Not enforced: unknown types pass
/// through lower-cased.
pub const KNOWN_CASE_TYPES: [&str; 4] = ["ui", "regression", "uat", "functional"];

/// One action within a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub action: String,
    pub target: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub expected_result: String,
}

impl TestStep {
    pub fn new(
        action: impl Into<String>,
        target: impl Into<String>,
        value: impl Into<String>,
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            value: value.into(),
            expected_result: expected_result.into(),
        }
    }
}

/// One test scenario. `id` is the store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<TestStep>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default = "default_case_type")]
    pub case_type: String,
}

fn default_case_type() -> String {
    DEFAULT_CASE_TYPE.to_string()
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} [{}]", self.id, self.name, self.case_type)
    }
}

/// Lower-cases a raw type value, falling back to [`DEFAULT_CASE_TYPE`] when
/// it is absent or blank.
pub fn normalize_case_type(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => default_case_type(),
    }
}

/// Splits a comma-delimited tag string, trimming each piece and dropping
/// empty ones. Order is preserved and duplicates are kept.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A single field that could not be read from the source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "field required")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field problem found while building one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates the fields of one case before validation.
#[derive(Debug, Default)]
pub struct CaseDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub steps: Vec<TestStep>,
    pub tags: Vec<String>,
    pub case_type: Option<String>,
    problems: Vec<FieldError>,
}

impl CaseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a field that failed coercion.
    pub fn reject(&mut self, error: FieldError) {
        self.problems.push(error);
    }

    /// Stores the value of a fallible conversion, or records its error.
    pub fn accept<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.reject(e);
                None
            }
        }
    }

    /// Validates required fields and normalizes the type.
    pub fn build(self) -> Result<TestCase, ValidationError> {
        let mut errors = self.problems;
        if self.id.is_none() && !errors.iter().any(|e| e.field == "id") {
            errors.push(FieldError::missing("id"));
        }
        if self.name.is_none() && !errors.iter().any(|e| e.field == "name") {
            errors.push(FieldError::missing("name"));
        }

        match (self.id, self.name) {
            (Some(id), Some(name)) if errors.is_empty() => Ok(TestCase {
                id,
                name,
                description: self.description.unwrap_or_default(),
                steps: self.steps,
                tags: self.tags,
                case_type: normalize_case_type(self.case_type.as_deref()),
            }),
            _ => Err(ValidationError { errors }),
        }
    }
}
