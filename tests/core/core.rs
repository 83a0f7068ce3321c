use casebook::core::assets;
use casebook::core::config::{self, OutputFormat};
use casebook::core::error::CasebookError;
use casebook::core::model::{TestCase, TestStep};
use casebook::core::store::{CaseFilter, CaseStore};
use casebook::importer::{self, SourceFormat};
use std::fs;
use tempfile::tempdir;

#[test]
fn config_defaults_when_no_file_present() {
    let tmp = tempdir().unwrap();
    let config = config::load_config(None, tmp.path()).unwrap();
    assert_eq!(config.output.format, OutputFormat::Text);
    assert!(config.export.pretty);
}

#[test]
fn config_read_from_working_directory() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join(config::DEFAULT_CONFIG_FILE),
        "[output]\nformat = \"json\"\nmax_issues = 3\n\n[export]\npretty = false\n",
    )
    .unwrap();
    let config = config::load_config(None, tmp.path()).unwrap();
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.output.max_issues, 3);
    assert!(!config.export.pretty);
}

#[test]
fn explicit_config_must_exist() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope.toml");
    let err = config::load_config(Some(&missing), tmp.path()).unwrap_err();
    assert!(matches!(err, CasebookError::ConfigError(_)));
}

#[test]
fn malformed_config_is_reported() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("bad.toml");
    fs::write(&path, "[output\nformat = ").unwrap();
    assert!(matches!(
        config::load_config(Some(&path), tmp.path()),
        Err(CasebookError::ConfigError(_))
    ));
}

#[test]
fn ingest_file_detects_format_and_records_source() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("Suite.CSV");
    fs::write(&path, assets::SAMPLE_CSV).unwrap();

    let mut store = CaseStore::new();
    let report = importer::ingest_file(&mut store, &path).unwrap();
    assert_eq!(report.format, SourceFormat::Csv);
    assert_eq!(report.imported, 3);
    assert_eq!(report.source.as_deref(), Some(path.display().to_string().as_str()));
}

#[test]
fn ingest_file_rejects_unknown_extension_and_missing_file() {
    let tmp = tempdir().unwrap();
    let mut store = CaseStore::new();

    let txt = tmp.path().join("cases.txt");
    fs::write(&txt, "TestCaseID\n").unwrap();
    assert!(matches!(
        importer::ingest_file(&mut store, &txt),
        Err(CasebookError::UnsupportedFormat(_))
    ));

    let gone = tmp.path().join("gone.json");
    assert!(matches!(
        importer::ingest_file(&mut store, &gone),
        Err(CasebookError::IoError(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn mixed_formats_share_one_store() {
    let mut store = CaseStore::new();
    importer::ingest(&mut store, assets::SAMPLE_CSV.as_bytes(), SourceFormat::Csv);
    importer::ingest(&mut store, assets::SAMPLE_JSON.as_bytes(), SourceFormat::Json);

    let stats = store.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.count_of("regression"), 2);
    assert_eq!(stats.count_of("ui"), 1);
    assert_eq!(stats.count_of("uat"), 1);
    assert_eq!(stats.count_of("functional"), 1);
    assert_eq!(
        store.types(),
        vec!["functional", "regression", "uat", "ui"]
    );

    let filter = CaseFilter {
        types: ["regression".to_string()].into(),
        tag: Some("bill".to_string()),
    };
    let hits = store.filter(&filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "TC002");
}

#[test]
fn export_is_plain_records_with_model_field_names() {
    let mut store = CaseStore::new();
    store.insert(TestCase {
        id: "TC1".into(),
        name: "Login".into(),
        description: "d".into(),
        steps: vec![TestStep::new("open", "/login", "", "Form shown")],
        tags: vec!["smoke".into()],
        case_type: "ui".into(),
    });
    let exported: serde_json::Value = serde_json::from_str(&store.export_json(true).unwrap()).unwrap();
    let record = &exported[0];
    let mut keys: Vec<_> = record.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["description", "id", "name", "steps", "tags", "type"]);
    let mut step_keys: Vec<_> = record["steps"][0].as_object().unwrap().keys().cloned().collect();
    step_keys.sort();
    assert_eq!(step_keys, vec!["action", "expected_result", "target", "value"]);
}
