//! Casebook: test-case ingestion and an in-memory case store.
//!
//! Test cases arrive in three shapes: delimited tables (CSV), spreadsheet
//! tables (XLSX) and structured documents (JSON). All of them are normalized
//! into one record model ([`core::model::TestCase`]) and written into a
//! session-scoped [`core::store::CaseStore`] that the caller then queries.
//!
//! # Architecture
//!
//! - [`importer`]: the ingestion façade plus one parser per format. Table
//!   formats share the grouping normalizer in [`importer::tabular`].
//! - [`core`]: record model, store, errors, configuration, logging and
//!   rendering helpers.
//! - [`session`]: an interactive host that keeps one store alive across
//!   commands.
//!
//! Ingestion never fails on bad data. Every call returns an
//! [`importer::ImportReport`] with the number of stored cases and the list of
//! problems found; one bad record never blocks the rest.
//!
//! # Examples
//!
//! ```bash
//! casebook import cases.csv tool_export.json
//! casebook list cases.csv --type regression --tag smoke
//! casebook stats cases.xlsx
//! casebook export cases.csv --out cases.json
//! casebook session
//! ```

pub mod core;
pub mod importer;
pub mod session;

mod cli;

use crate::cli::{Cli, Command, InputsCli};
use crate::core::config::{self, CasebookConfig, OutputFormat};
use crate::core::error::CasebookError;
use crate::core::store::{CaseFilter, CaseStore};
use crate::core::{assets, logging, output};
use crate::importer::{ImportReport, REQUIRED_COLUMNS, SourceFormat};
use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::PathBuf;

struct Host {
    config: CasebookConfig,
    format: OutputFormat,
}

/// Files that could not be read or have an unknown extension.
type Failures = Vec<(PathBuf, CasebookError)>;

impl Host {
    fn print_json(&self, value: &serde_json::Value) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn echo_issues(&self, reports: &[ImportReport]) {
        for report in reports.iter().filter(|r| !r.is_clean()) {
            eprintln!(
                "{}",
                output::render_report(
                    report,
                    self.config.output.max_issues,
                    self.config.output.issue_chars
                )
            );
        }
    }

    /// Ingests every file into `store`. In text mode issues go to stderr so
    /// stdout only carries the command's own result; JSON callers fold the
    /// returned reports into their envelope with [`Host::envelope`].
    fn load(
        &self,
        store: &mut CaseStore,
        inputs: &InputsCli,
    ) -> anyhow::Result<Vec<ImportReport>> {
        let (reports, failures) = ingest_all(store, &inputs.files);
        if self.format == OutputFormat::Text {
            self.echo_issues(&reports);
        }
        if let Some((path, err)) = failures.first() {
            bail!("failed to import {}: {}", path.display(), err);
        }
        Ok(reports)
    }

    /// Query envelope. Status is `partial` when any input had issues.
    fn envelope(
        &self,
        cmd: &str,
        reports: &[ImportReport],
        extra: serde_json::Value,
    ) -> anyhow::Result<()> {
        let status = if reports.iter().all(ImportReport::is_clean) {
            "ok"
        } else {
            "partial"
        };
        let mut body = output::envelope(cmd, status, extra);
        body["reports"] = serde_json::to_value(reports)?;
        self.print_json(&body)
    }

    fn import(&self, inputs: &InputsCli) -> anyhow::Result<()> {
        let mut store = CaseStore::new();
        let (reports, failures) = ingest_all(&mut store, &inputs.files);

        match self.format {
            OutputFormat::Json => {
                let status = if failures.is_empty() && reports.iter().all(ImportReport::is_clean) {
                    "ok"
                } else {
                    "partial"
                };
                let failed: Vec<_> = failures
                    .iter()
                    .map(|(p, e)| serde_json::json!({"file": p.display().to_string(), "error": e.to_string()}))
                    .collect();
                self.print_json(&output::envelope(
                    "import",
                    status,
                    serde_json::json!({
                        "reports": reports,
                        "failures": failed,
                        "total": store.len(),
                    }),
                ))?;
            }
            OutputFormat::Text => {
                for report in &reports {
                    println!(
                        "{}",
                        output::render_report(
                            report,
                            self.config.output.max_issues,
                            self.config.output.issue_chars
                        )
                    );
                }
                for (path, err) in &failures {
                    eprintln!(
                        "{} Failed to import file {}: {}",
                        "✗".bright_red(),
                        path.display(),
                        err
                    );
                }
            }
        }

        if !failures.is_empty() {
            bail!("{} file(s) could not be imported", failures.len());
        }
        Ok(())
    }

    fn list(&self, inputs: &InputsCli, types: &[String], tag: Option<String>) -> anyhow::Result<()> {
        let mut store = CaseStore::new();
        let reports = self.load(&mut store, inputs)?;
        let filter = CaseFilter {
            types: types.iter().map(|t| t.trim().to_lowercase()).collect(),
            tag,
        };
        let cases = store.filter(&filter);
        match self.format {
            OutputFormat::Json => self.envelope(
                "list",
                &reports,
                serde_json::json!({ "count": cases.len(), "items": cases }),
            )?,
            OutputFormat::Text => {
                if store.is_empty() {
                    println!("No test cases imported.");
                }
                for case in cases {
                    println!("{}\n", output::render_case(case));
                }
            }
        }
        Ok(())
    }

    fn show(&self, inputs: &InputsCli, id: &str) -> anyhow::Result<()> {
        let mut store = CaseStore::new();
        let reports = self.load(&mut store, inputs)?;
        let case = store
            .get(id)
            .ok_or_else(|| CasebookError::NotFound(format!("test case '{}'", id)))?;
        match self.format {
            OutputFormat::Json => {
                self.envelope("show", &reports, serde_json::json!({ "item": case }))?
            }
            OutputFormat::Text => println!("{}", output::render_case(case)),
        }
        Ok(())
    }

    fn stats(&self, inputs: &InputsCli) -> anyhow::Result<()> {
        let mut store = CaseStore::new();
        let reports = self.load(&mut store, inputs)?;
        let stats = store.stats();
        match self.format {
            OutputFormat::Json => self.envelope("stats", &reports, serde_json::to_value(&stats)?)?,
            OutputFormat::Text => println!("{}", output::render_stats(&stats)),
        }
        Ok(())
    }

    fn export(&self, inputs: &InputsCli, out: Option<&PathBuf>) -> anyhow::Result<()> {
        let mut store = CaseStore::new();
        let reports = self.load(&mut store, inputs)?;
        let text = store.export_json(self.config.export.pretty)?;
        match out {
            None => {
                // stdout is the bare export; issues still surface on stderr
                if self.format == OutputFormat::Json {
                    self.echo_issues(&reports);
                }
                println!("{}", text)
            }
            Some(path) => {
                fs::write(path, text)
                    .with_context(|| format!("writing export to {}", path.display()))?;
                match self.format {
                    OutputFormat::Json => self.envelope(
                        "export",
                        &reports,
                        serde_json::json!({ "count": store.len(), "path": path.display().to_string() }),
                    )?,
                    OutputFormat::Text => println!(
                        "{} Exported {} test case(s) to {}",
                        "✓".bright_green(),
                        store.len(),
                        path.display()
                    ),
                }
            }
        }
        Ok(())
    }

    fn columns(&self) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => self.print_json(&output::envelope(
                "columns",
                "ok",
                serde_json::json!({ "columns": REQUIRED_COLUMNS }),
            )),
            OutputFormat::Text => {
                println!("{}", REQUIRED_COLUMNS.join(", "));
                Ok(())
            }
        }
    }

    fn sample(&self, kind: &str) -> anyhow::Result<()> {
        let format: SourceFormat = kind.parse()?;
        let text = assets::sample_for(format).ok_or_else(|| {
            CasebookError::NotFound(format!("no bundled {} sample", format.label()))
        })?;
        print!("{}", text);
        Ok(())
    }
}

/// Ingests each file in order. Host-side failures are collected per file and
/// do not stop the remaining files.
fn ingest_all(store: &mut CaseStore, files: &[PathBuf]) -> (Vec<ImportReport>, Failures) {
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for path in files {
        match importer::ingest_file(store, path) {
            Ok(report) => reports.push(report),
            Err(err) => failures.push((path.clone(), err)),
        }
    }
    (reports, failures)
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &current_dir)?;
    logging::init(&config.log.filter);

    let host = Host {
        format: cli.format.unwrap_or(config.output.format),
        config,
    };

    match &cli.command {
        Command::Import(inputs) => host.import(inputs),
        Command::List { inputs, types, tag } => host.list(inputs, types, tag.clone()),
        Command::Show { inputs, id } => host.show(inputs, id),
        Command::Stats(inputs) => host.stats(inputs),
        Command::Export { inputs, out } => host.export(inputs, out.as_ref()),
        Command::Columns => host.columns(),
        Command::Sample { kind } => host.sample(kind),
        Command::Session => {
            let mut store = CaseStore::new();
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            session::run_session(stdin.lock(), &mut stdout, &mut store, &host.config)
        }
    }
}
