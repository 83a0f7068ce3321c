use casebook::core::store::CaseStore;
use casebook::importer::{self, IssueKind, SourceFormat};

const HEADER: &str = "TestCaseID,TestCaseName,Description,Action,Target,Value,ExpectedResult,Tags,Type";

fn csv(rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

#[test]
fn rows_sharing_an_id_group_into_ordered_steps() {
    let raw = csv(&[
        "TC1,Checkout,,open,/cart,,,,",
        "TC2,Search,,type,#q,shoes,,,",
        "TC1,Checkout,,click,#pay,,,,",
        "TC1,Checkout,,verify,#receipt,,Receipt shown,,",
        "TC2,Search,,press,Enter,,,,",
    ]);
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 2);
    assert!(report.is_clean());

    let tc1 = store.get("TC1").unwrap();
    let actions: Vec<_> = tc1.steps.iter().map(|s| s.action.as_str()).collect();
    assert_eq!(actions, vec!["open", "click", "verify"]);
    assert_eq!(tc1.steps[2].expected_result, "Receipt shown");
    assert_eq!(store.get("TC2").unwrap().steps.len(), 2);
    assert_eq!(store.get("TC2").unwrap().steps[0].value, "shoes");
}

#[test]
fn missing_column_short_circuits_whole_table() {
    let raw = b"TestCaseID,TestCaseName,Description,Action,Value,ExpectedResult,Tags,Type\n\
TC1,a,,open,,,,ui\n";
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, raw, SourceFormat::Csv);
    assert_eq!(report.imported, 0);
    assert_eq!(report.errors(), vec!["Missing required column(s): Target"]);
    assert_eq!(report.issues[0].kind(), IssueKind::Structural);
    assert!(store.is_empty());
}

#[test]
fn all_missing_columns_are_named_in_declared_order() {
    let raw = b"TestCaseID,Action\nTC1,open\n";
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, raw, SourceFormat::Csv);
    assert_eq!(
        report.errors(),
        vec![
            "Missing required column(s): TestCaseName, Description, Target, Value, ExpectedResult, Tags, Type"
        ]
    );
}

#[test]
fn header_only_table_imports_nothing_without_errors() {
    let raw = csv(&[]);
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 0);
    assert!(report.errors().is_empty());
}

#[test]
fn column_order_is_free_and_extra_columns_are_ignored() {
    let raw = b"Type,Owner,Tags,ExpectedResult,Value,Target,Action,Description,TestCaseName,TestCaseID\n\
UAT,alice,finance,Approved,,#approve,click,Sign-off,Report,TC7\n";
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, raw, SourceFormat::Csv);
    assert_eq!(report.imported, 1);
    let case = store.get("TC7").unwrap();
    assert_eq!(case.name, "Report");
    assert_eq!(case.case_type, "uat");
    assert_eq!(case.steps[0].target, "#approve");
}

#[test]
fn empty_action_and_target_still_make_a_valid_step() {
    let raw = csv(&["TC1,Blank step,,,,,,,"]);
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 1);
    let case = store.get("TC1").unwrap();
    assert_eq!(case.steps.len(), 1);
    assert_eq!(case.steps[0].action, "");
    assert_eq!(case.steps[0].target, "");
    assert_eq!(case.case_type, "functional");
}

#[test]
fn numeric_ids_are_looked_up_as_strings() {
    let raw = csv(&["1001,Numeric,,open,/,,,,", "1001,Numeric,,close,/,,,,"]);
    let mut store = CaseStore::new();
    importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(store.get("1001").unwrap().steps.len(), 2);
}

#[test]
fn tag_string_is_split_and_trimmed() {
    let raw = csv(&["TC1,Tags,,open,/,,,\"smoke, regression ,ui\",ui"]);
    let mut store = CaseStore::new();
    importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(store.get("TC1").unwrap().tags, vec!["smoke", "regression", "ui"]);
}

#[test]
fn exported_tags_survive_reingest_through_document_path() {
    let raw = csv(&["TC1,Tags,,open,/,,,\"smoke, regression ,ui\",ui"]);
    let mut first = CaseStore::new();
    importer::ingest(&mut first, &raw, SourceFormat::Csv);

    let exported = serde_json::to_value(first.export_all()).unwrap();
    let document = serde_json::json!({ "test_cases": exported }).to_string();

    let mut second = CaseStore::new();
    let report = importer::ingest(&mut second, document.as_bytes(), SourceFormat::Json);
    assert!(report.is_clean(), "{:?}", report.errors());
    assert_eq!(second.get("TC1"), first.get("TC1"));
    assert_eq!(second.get("TC1").unwrap().tags, vec!["smoke", "regression", "ui"]);
}

#[test]
fn rows_without_id_are_reported_not_dropped() {
    // Null ids group together; the group cannot build a case because the id
    // is required, so it surfaces as one record error.
    let raw = csv(&[",Orphan,,open,/,,,,", "TC1,Ok,,open,/,,,,", ",Orphan,,close,/,,,,"]);
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 1);
    assert_eq!(
        report.errors(),
        vec!["TestCaseID=<missing>: id: field required"]
    );
    assert_eq!(report.issues[0].kind(), IssueKind::Record);
}

#[test]
fn undecodable_table_is_one_decode_error() {
    let mut raw = csv(&["TC1,a,,open,/,,,,"]);
    raw.extend_from_slice(b"TC2,b,,open,/,,,,,extra\n");
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 0);
    assert_eq!(report.issues.len(), 1);
    assert!(report.errors()[0].starts_with("Invalid CSV: "));
    assert!(store.is_empty());
}

#[test]
fn regression_and_uat_scenario() {
    let raw = csv(&[
        "TC2,Approve,,click,#ok,,,,uat",
        "TC1,Totals,,open,/inv,,,,Regression",
        "TC1,Totals,,verify,#total,90,,,Regression",
    ]);
    let mut store = CaseStore::new();
    let report = importer::ingest(&mut store, &raw, SourceFormat::Csv);
    assert_eq!(report.imported, 2);

    let ids: Vec<_> = store.list(None).iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec!["TC1", "TC2"]);

    let stats = store.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_type.len(), 2);
    assert_eq!(stats.by_type["regression"], 1);
    assert_eq!(stats.by_type["uat"], 1);

    store.clear();
    assert!(store.list(None).is_empty());
    assert_eq!(store.stats().total, 0);
}

#[test]
fn reimport_overwrites_previous_case() {
    let mut store = CaseStore::new();
    importer::ingest(&mut store, &csv(&["TC1,Old,,open,/,,,,ui"]), SourceFormat::Csv);
    importer::ingest(
        &mut store,
        &csv(&["TC1,New,,open,/,,,,uat", "TC1,New,,close,/,,,,uat"]),
        SourceFormat::Csv,
    );
    assert_eq!(store.len(), 1);
    let case = store.get("TC1").unwrap();
    assert_eq!(case.name, "New");
    assert_eq!(case.steps.len(), 2);
}
