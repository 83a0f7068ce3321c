//! Shared normalizer for table-shaped inputs (CSV and XLSX).
//!
//! Each row is one step. Rows sharing a `TestCaseID` form one case, in
//! first-encounter order. Case-level fields (`TestCaseName`, `Description`,
//! `Tags`, `Type`) come from the first row of a group only; later rows of the
//! same group contribute nothing but their step.

use crate::core::model::{CaseDraft, FieldError, TestStep, split_tags};
use crate::core::store::CaseStore;
use crate::importer::ImportIssue;
use std::collections::HashMap;

/// Header names every table must carry. Order within the header row is
/// irrelevant and extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "TestCaseID",
    "TestCaseName",
    "Description",
    "Action",
    "Target",
    "Value",
    "ExpectedResult",
    "Tags",
    "Type",
];

/// A decoded table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    /// Text cell, with the empty string treated as a missing value.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Stringifies the cell. `Ok(None)` for empty cells.
    ///
    /// Integral floats lose their fractional part so that an identifier typed
    /// as `1` in a spreadsheet is stored under `"1"`, not `"1.0"`.
    pub fn to_text(&self) -> Result<Option<String>, String> {
        match self {
            Cell::Empty => Ok(None),
            Cell::Text(s) => Ok(Some(s.clone())),
            Cell::Int(i) => Ok(Some(i.to_string())),
            Cell::Float(f) => Ok(Some(format_float(*f))),
            Cell::Bool(b) => Ok(Some(b.to_string())),
            Cell::Error(code) => Err(format!("cell holds error value {}", code)),
        }
    }

    fn group_key(&self) -> Option<String> {
        match self {
            Cell::Error(code) => Some(code.clone()),
            other => other.to_text().ok().flatten(),
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Header plus rows of cells. Every row is padded to the header width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating to the header width. Rows with no
    /// value at all are skipped.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        if cells.iter().all(Cell::is_empty) {
            return;
        }
        cells.resize(self.headers.len(), Cell::Empty);
        self.rows.push(cells);
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

struct Columns {
    id: usize,
    name: usize,
    description: usize,
    action: usize,
    target: usize,
    value: usize,
    expected_result: usize,
    tags: usize,
    case_type: usize,
}

impl Columns {
    fn resolve(table: &Table) -> Result<Self, Vec<String>> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| table.column(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }
        let at = |name: &str| table.column(name).unwrap_or_default();
        Ok(Self {
            id: at("TestCaseID"),
            name: at("TestCaseName"),
            description: at("Description"),
            action: at("Action"),
            target: at("Target"),
            value: at("Value"),
            expected_result: at("ExpectedResult"),
            tags: at("Tags"),
            case_type: at("Type"),
        })
    }
}

struct Group {
    key: Option<String>,
    rows: Vec<usize>,
}

/// Groups rows by `TestCaseID`, keeping first-encounter order. Rows without
/// an id share one group keyed by `None`.
fn group_rows(table: &Table, id_column: usize) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    for (row_idx, row) in table.rows.iter().enumerate() {
        let key = row[id_column].group_key();
        match index.get(&key) {
            Some(&g) => groups[g].rows.push(row_idx),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    rows: vec![row_idx],
                });
            }
        }
    }
    groups
}

fn text_or_empty(cell: &Cell, field: &str) -> Result<String, FieldError> {
    cell.to_text()
        .map(Option::unwrap_or_default)
        .map_err(|reason| FieldError::new(field, reason))
}

fn build_step(row: &[Cell], cols: &Columns, ordinal: usize, draft: &mut CaseDraft) -> TestStep {
    let mut read = |column: usize, name: &str| {
        let field = format!("steps[{}].{}", ordinal, name);
        draft
            .accept(text_or_empty(&row[column], &field))
            .unwrap_or_default()
    };
    TestStep {
        action: read(cols.action, "action"),
        target: read(cols.target, "target"),
        value: read(cols.value, "value"),
        expected_result: read(cols.expected_result, "expected_result"),
    }
}

fn build_case(table: &Table, cols: &Columns, group: &Group) -> CaseDraft {
    let mut draft = CaseDraft::new();
    let Some(&first_idx) = group.rows.first() else {
        return draft;
    };
    let first = &table.rows[first_idx];

    match first[cols.id].to_text() {
        Ok(id) => draft.id = id,
        Err(reason) => draft.reject(FieldError::new("id", reason)),
    }
    draft.name = draft.accept(text_or_empty(&first[cols.name], "name"));
    draft.description = draft.accept(text_or_empty(&first[cols.description], "description"));
    if let Some(tags) = draft.accept(text_or_empty(&first[cols.tags], "tags")) {
        draft.tags = split_tags(&tags);
    }
    draft.case_type = draft.accept(text_or_empty(&first[cols.case_type], "type"));

    let steps: Vec<TestStep> = group
        .rows
        .iter()
        .enumerate()
        .map(|(ordinal, &row_idx)| build_step(&table.rows[row_idx], cols, ordinal, &mut draft))
        .collect();
    draft.steps = steps;
    draft
}

/// Normalizes `table` into cases and stores each valid one.
///
/// Returns the number of stored cases and one issue per rejected group, or a
/// single [`ImportIssue::MissingColumns`] when the header is incomplete (in
/// which case nothing is stored).
pub fn ingest_table(store: &mut CaseStore, table: &Table) -> (usize, Vec<ImportIssue>) {
    let cols = match Columns::resolve(table) {
        Ok(cols) => cols,
        Err(missing) => return (0, vec![ImportIssue::MissingColumns(missing)]),
    };

    let mut imported = 0;
    let mut issues = Vec::new();
    for group in group_rows(table, cols.id) {
        match build_case(table, &cols, &group).build() {
            Ok(case) => {
                store.insert(case);
                imported += 1;
            }
            Err(error) => issues.push(ImportIssue::Record {
                key_label: "TestCaseID",
                key: group.key,
                error,
            }),
        }
    }
    (imported, issues)
}
