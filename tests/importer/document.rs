use casebook::core::store::CaseStore;
use casebook::importer::{self, IssueKind, SourceFormat};
use serde_json::json;

fn ingest(doc: &serde_json::Value) -> (CaseStore, importer::ImportReport) {
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, doc.to_string().as_bytes(), SourceFormat::Json);
    (store, report)
}

#[test]
fn three_valid_and_one_without_id() {
    let doc = json!({
        "test_cases": [
            { "id": "TC1", "name": "a", "steps": [{ "action": "open", "target": "/" }] },
            { "name": "no id", "steps": [] },
            { "id": "TC2", "name": "b", "steps": [] },
            { "id": "TC3", "name": "c" }
        ]
    });
    let (store, report) = ingest(&doc);
    assert_eq!(report.imported, 3);
    assert_eq!(report.errors(), vec!["id=<missing>: id: field required"]);
    assert_eq!(report.issues[0].kind(), IssueKind::Record);
    assert_eq!(store.len(), 3);
}

#[test]
fn fields_pass_through_without_renaming() {
    let doc = json!({
        "test_cases": [{
            "id": "TC9",
            "name": "Reset password",
            "description": "email flow",
            "steps": [
                { "action": "type", "target": "#email", "value": "a@b.c", "expected_result": "filled" },
                { "action": "click", "target": "#send" }
            ],
            "tags": ["auth", " email "],
            "type": "UI"
        }]
    });
    let (store, report) = ingest(&doc);
    assert!(report.is_clean());
    let case = store.get("TC9").unwrap();
    assert_eq!(case.description, "email flow");
    assert_eq!(case.steps[0].value, "a@b.c");
    assert_eq!(case.steps[0].expected_result, "filled");
    assert_eq!(case.steps[1].value, "");
    // Native tag lists are taken as-is, not re-split or trimmed.
    assert_eq!(case.tags, vec!["auth", " email "]);
    assert_eq!(case.case_type, "ui");
}

#[test]
fn tabular_field_names_are_not_recognized_in_steps() {
    let doc = json!({
        "test_cases": [{
            "id": "TC1",
            "name": "a",
            "steps": [{ "Action": "open", "Target": "/" }]
        }]
    });
    let (_, report) = ingest(&doc);
    assert_eq!(report.imported, 0);
    assert_eq!(
        report.errors(),
        vec!["id=TC1: steps[0].action: field required; steps[0].target: field required"]
    );
}

#[test]
fn malformed_root_is_structural() {
    for doc in [json!([]), json!({ "cases": [] }), json!({ "test_cases": "TC1" })] {
        let (store, report) = ingest(&doc);
        assert_eq!(report.imported, 0);
        assert_eq!(report.errors(), vec!["JSON root must contain 'test_cases' list"]);
        assert_eq!(report.issues[0].kind(), IssueKind::Structural);
        assert!(store.is_empty());
    }
}

#[test]
fn invalid_syntax_is_decode_error() {
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, b"{ test_cases: ", SourceFormat::Json);
    assert_eq!(report.imported, 0);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind(), IssueKind::Decode);
    assert!(report.errors()[0].starts_with("Invalid JSON: "));
}

#[test]
fn non_object_entries_are_isolated() {
    let doc = json!({ "test_cases": ["TC1", { "id": "TC2", "name": "ok" }, 7] });
    let (store, report) = ingest(&doc);
    assert_eq!(report.imported, 1);
    assert_eq!(
        report.errors(),
        vec![
            "id=<missing>: case: expected object, got text",
            "id=<missing>: case: expected object, got number",
        ]
    );
    assert!(store.get("TC2").is_some());
}

#[test]
fn later_duplicate_wins() {
    let doc = json!({
        "test_cases": [
            { "id": "TC1", "name": "first", "type": "ui" },
            { "id": "TC1", "name": "second", "type": "uat" }
        ]
    });
    let (store, report) = ingest(&doc);
    assert_eq!(report.imported, 2);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("TC1").unwrap().name, "second");
}
