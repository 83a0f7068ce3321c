//! Structured-document (JSON) parser.
//!
//! Expects `{"test_cases": [{id, name, description?, steps, tags?, type?}, ...]}`.
//! Field names already match the normalized model; tags arrive as a list.

use crate::core::model::{CaseDraft, FieldError, TestStep, ValidationError};
use crate::core::store::CaseStore;
use crate::importer::{ImportIssue, SourceFormat};
use serde_json::{Map, Value};

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Text field; numbers are stringified. `Ok(None)` when absent or null.
fn optional_text(
    obj: &Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<String>, FieldError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(FieldError::new(
            field,
            format!("expected text, got {}", kind_of(other)),
        )),
    }
}

/// Step fields must be text; no coercion.
fn step_text(
    obj: &Map<String, Value>,
    key: &str,
    field: &str,
    required: bool,
) -> Result<String, FieldError> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) if required => Err(FieldError::missing(field)),
        None | Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(FieldError::new(
            field,
            format!("expected text, got {}", kind_of(other)),
        )),
    }
}

fn read_steps(obj: &Map<String, Value>, draft: &mut CaseDraft) -> Vec<TestStep> {
    let items = match obj.get("steps") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            draft.reject(FieldError::new(
                "steps",
                format!("expected list, got {}", kind_of(other)),
            ));
            return Vec::new();
        }
    };

    let mut steps = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let Some(step) = item.as_object() else {
            draft.reject(FieldError::new(
                format!("steps[{}]", i),
                format!("expected object, got {}", kind_of(item)),
            ));
            continue;
        };
        let mut read = |key: &str, required: bool| {
            let field = format!("steps[{}].{}", i, key);
            draft.accept(step_text(step, key, &field, required))
        };
        let action = read("action", true);
        let target = read("target", true);
        let value = read("value", false);
        let expected_result = read("expected_result", false);
        if let (Some(action), Some(target), Some(value), Some(expected_result)) =
            (action, target, value, expected_result)
        {
            steps.push(TestStep {
                action,
                target,
                value,
                expected_result,
            });
        }
    }
    steps
}

fn read_tags(obj: &Map<String, Value>, draft: &mut CaseDraft) -> Vec<String> {
    match obj.get("tags") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, t)| match t {
                Value::String(s) => Some(s.clone()),
                other => {
                    draft.reject(FieldError::new(
                        format!("tags[{}]", i),
                        format!("expected text, got {}", kind_of(other)),
                    ));
                    None
                }
            })
            .collect(),
        Some(other) => {
            draft.reject(FieldError::new(
                "tags",
                format!("expected list, got {}", kind_of(other)),
            ));
            Vec::new()
        }
    }
}

fn read_case(obj: &Map<String, Value>) -> CaseDraft {
    let mut draft = CaseDraft::new();

    draft.id = draft.accept(optional_text(obj, "id", "id")).flatten();
    draft.name = draft.accept(optional_text(obj, "name", "name")).flatten();
    draft.description = draft
        .accept(optional_text(obj, "description", "description"))
        .flatten();
    draft.case_type = draft.accept(optional_text(obj, "type", "type")).flatten();
    draft.tags = read_tags(obj, &mut draft);
    draft.steps = read_steps(obj, &mut draft);
    draft
}

fn record_key(item: &Value) -> Option<String> {
    match item.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses `raw` as a JSON document and stores every valid case.
pub fn ingest_document(
    store: &mut CaseStore,
    raw: &[u8],
    format: SourceFormat,
) -> (usize, Vec<ImportIssue>) {
    let root: Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(e) => {
            return (
                0,
                vec![ImportIssue::Decode {
                    format,
                    detail: e.to_string(),
                }],
            );
        }
    };
    let Some(items) = root.get("test_cases").and_then(Value::as_array) else {
        return (0, vec![ImportIssue::MissingCaseList { format }]);
    };

    let mut imported = 0;
    let mut issues = Vec::new();
    for item in items {
        let built = match item.as_object() {
            Some(obj) => read_case(obj).build(),
            None => Err(ValidationError {
                errors: vec![FieldError::new(
                    "case",
                    format!("expected object, got {}", kind_of(item)),
                )],
            }),
        };
        match built {
            Ok(case) => {
                store.insert(case);
                imported += 1;
            }
            Err(error) => issues.push(ImportIssue::Record {
                key_label: "id",
                key: record_key(item),
                error,
            }),
        }
    }
    (imported, issues)
}
