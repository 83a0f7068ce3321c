//! In-memory case store.
//!
//! One [`CaseStore`] lives for one session. It is created empty by the host,
//! handed by `&mut` to ingestion and by `&` to queries, and wiped only by
//! [`CaseStore::clear`]. Nothing here touches disk.

use crate::core::error::CasebookError;
use crate::core::model::TestCase;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Session-scoped collection of cases keyed by `id`.
///
/// Inserting a case whose `id` is already present replaces the previous one
/// (last write wins, no merge).
#[derive(Debug, Default, Clone)]
pub struct CaseStore {
    cases: HashMap<String, TestCase>,
}

/// Aggregate counts over the store. `by_type` only holds types with at least
/// one case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
}

impl StoreStats {
    /// Count for one type, zero when absent.
    pub fn count_of(&self, case_type: &str) -> usize {
        self.by_type.get(case_type).copied().unwrap_or(0)
    }
}

/// Listing filter used by the presentation layer.
///
/// An empty `types` set keeps every type. `tag` matches when any tag of the
/// case contains it, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    pub types: BTreeSet<String>,
    pub tag: Option<String>,
}

impl CaseFilter {
    pub fn matches(&self, case: &TestCase) -> bool {
        if !self.types.is_empty() && !self.types.contains(&case.case_type) {
            return false;
        }
        match self.tag.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => case
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&needle)),
            _ => true,
        }
    }
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts by `id`.
    pub fn insert(&mut self, case: TestCase) {
        tracing::debug!(id = %case.id, steps = case.steps.len(), "storing case");
        self.cases.insert(case.id.clone(), case);
    }

    pub fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.get(id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// All cases, optionally restricted to one type, sorted by `(id, name)`.
    pub fn list(&self, type_filter: Option<&str>) -> Vec<&TestCase> {
        let mut cases: Vec<&TestCase> = self
            .cases
            .values()
            .filter(|c| type_filter.is_none_or(|t| c.case_type == t))
            .collect();
        sort_for_display(&mut cases);
        cases
    }

    /// Like [`CaseStore::list`] with the richer filter of the listing page.
    pub fn filter(&self, filter: &CaseFilter) -> Vec<&TestCase> {
        let mut cases: Vec<&TestCase> =
            self.cases.values().filter(|c| filter.matches(c)).collect();
        sort_for_display(&mut cases);
        cases
    }

    /// Distinct types present, sorted.
    pub fn types(&self) -> Vec<String> {
        self.cases
            .values()
            .map(|c| c.case_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn clear(&mut self) {
        tracing::debug!(removed = self.cases.len(), "clearing case store");
        self.cases.clear();
    }

    /// Every case as a plain record, in listing order.
    pub fn export_all(&self) -> Vec<TestCase> {
        self.list(None).into_iter().cloned().collect()
    }

    /// [`CaseStore::export_all`] rendered as a JSON array. `pretty` indents
    /// with two spaces.
    pub fn export_json(&self, pretty: bool) -> Result<String, CasebookError> {
        let records = self.export_all();
        let text = if pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        Ok(text)
    }

    pub fn stats(&self) -> StoreStats {
        let mut by_type = BTreeMap::new();
        for case in self.cases.values() {
            *by_type.entry(case.case_type.clone()).or_insert(0) += 1;
        }
        StoreStats {
            total: self.cases.len(),
            by_type,
        }
    }
}

fn sort_for_display(cases: &mut [&TestCase]) {
    cases.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));
}
