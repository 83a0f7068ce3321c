//! CLI struct definitions for the casebook command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use crate::core::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "casebook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import test cases from CSV, XLSX or JSON, then list, filter, summarize and export them."
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./casebook.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Output format; overrides the config file.
    #[clap(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,
    #[clap(subcommand)]
    pub command: Command,
}

/// Files ingested into a fresh store before the command runs.
#[derive(clap::Args, Debug)]
pub(crate) struct InputsCli {
    /// Input files (.csv, .xlsx or .json).
    #[clap(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Import files and report imported counts and rejected rows.
    Import(InputsCli),
    /// List imported cases sorted by id.
    List {
        #[clap(flatten)]
        inputs: InputsCli,
        /// Keep only these types (repeatable).
        #[clap(long = "type", value_name = "TYPE")]
        types: Vec<String>,
        /// Keep cases with a tag containing this text (case-insensitive).
        #[clap(long)]
        tag: Option<String>,
    },
    /// Show one case.
    Show {
        #[clap(flatten)]
        inputs: InputsCli,
        #[clap(long)]
        id: String,
    },
    /// Case totals by type.
    Stats(InputsCli),
    /// Export every case as a JSON array.
    Export {
        #[clap(flatten)]
        inputs: InputsCli,
        /// Write to this file instead of stdout.
        #[clap(long)]
        out: Option<PathBuf>,
    },
    /// Print the columns CSV/XLSX files must carry.
    Columns,
    /// Print a bundled sample input file.
    Sample {
        /// Sample format: 'csv' or 'json'.
        #[clap(value_name = "FORMAT")]
        kind: String,
    },
    /// Interactive session over one store, reading commands from stdin.
    Session,
}
