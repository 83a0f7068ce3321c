//! Line-oriented interactive session over a single store.
//!
//! The store lives exactly as long as the session: it starts empty, grows
//! with each `import`, and is wiped only by `clear`.

use crate::core::config::CasebookConfig;
use crate::core::output;
use crate::core::store::CaseStore;
use crate::importer;
use anyhow::Context;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

const HELP: &str = "\
commands:
  import <path>    ingest a .csv, .xlsx or .json file
  list [type]      list cases, optionally of one type
  show <id>        show one case
  types            list the types present
  stats            totals by type
  export [path]    print or write the JSON export
  clear            remove every case from this session
  help             this text
  quit             leave the session";

/// What the caller should do after one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs one command line against `store`, writing its output to `out`.
///
/// Problems with the command itself (unknown verb, unreadable file) are
/// printed and do not end the session; only write failures on `out` are
/// returned as errors.
pub fn execute<W: Write>(
    line: &str,
    store: &mut CaseStore,
    config: &CasebookConfig,
    out: &mut W,
) -> anyhow::Result<Flow> {
    let line = line.trim();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((v, a)) => (v, Some(a.trim()).filter(|a| !a.is_empty())),
        None => (line, None),
    };

    match (verb, arg) {
        ("", _) => {}
        ("quit" | "exit", _) => return Ok(Flow::Quit),
        ("help", _) => writeln!(out, "{}", HELP)?,
        ("import", Some(path)) => match importer::ingest_file(store, Path::new(path)) {
            Ok(report) => writeln!(
                out,
                "{}",
                output::render_report(
                    &report,
                    config.output.max_issues,
                    config.output.issue_chars
                )
            )?,
            Err(e) => writeln!(out, "Failed to import file {}: {}", path, e)?,
        },
        ("list", filter) => {
            let filter = filter.map(str::to_lowercase);
            let cases = store.list(filter.as_deref());
            if cases.is_empty() {
                writeln!(out, "No test cases imported yet.")?;
            }
            for case in cases {
                writeln!(out, "{}", case)?;
            }
        }
        ("show", Some(id)) => match store.get(id) {
            Some(case) => writeln!(out, "{}", output::render_case(case))?,
            None => writeln!(out, "Not found: {}", id)?,
        },
        ("types", _) => writeln!(out, "{}", store.types().join(", "))?,
        ("stats", _) => writeln!(out, "{}", output::render_stats(&store.stats()))?,
        ("export", target) => {
            let text = store.export_json(config.export.pretty)?;
            match target {
                Some(path) => {
                    fs::write(path, text).with_context(|| format!("writing export to {}", path))?;
                    writeln!(out, "Exported {} test case(s) to {}", store.len(), path)?;
                }
                None => writeln!(out, "{}", text)?,
            }
        }
        ("clear", _) => {
            let removed = store.len();
            store.clear();
            writeln!(out, "All test cases cleared from memory ({} removed).", removed)?;
        }
        (verb @ ("import" | "show"), None) => writeln!(out, "usage: {} <arg>", verb)?,
        (other, _) => writeln!(out, "unknown command '{}'; try 'help'", other)?,
    }
    Ok(Flow::Continue)
}

/// Reads commands from `input` until EOF or `quit`.
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    store: &mut CaseStore,
    config: &CasebookConfig,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("reading session input")?;
        if execute(&line, store, config, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
