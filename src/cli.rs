use crate::tagger::config::{DEFAULT_FLOW_LOG_PATH, DEFAULT_LOOKUP_PATH, DEFAULT_OUTPUT_PATH};
use clap::Parser;
use std::path::PathBuf;

/// flowtag: tag flow-log records by destination port and protocol.
///
/// Reads a `dstport,protocol,tag` lookup table and a whitespace-delimited
/// flow log, then writes tag counts and port/protocol counts to a report.
#[derive(Parser, Debug, Clone)]
#[command(
    name    = "flowtag",
    version,
    about   = "Tag network flow logs by port/protocol and report aggregate counts",
    long_about = None,
)]
pub struct Cli {
    // ── Inputs ───────────────────────────────────────────────────────────────

    /// Lookup table CSV with a `dstport,protocol,tag` header.
    ///
    /// A missing file is tolerated (every flow is tagged `Untagged`). An empty
    /// file gets the default header written into it.
    #[arg(short = 'l', long = "lookup", value_name = "PATH", default_value = DEFAULT_LOOKUP_PATH)]
    pub lookup: PathBuf,

    /// Flow log with one whitespace-delimited record per line.
    #[arg(short = 'f', long = "flow-log", value_name = "PATH", default_value = DEFAULT_FLOW_LOG_PATH)]
    pub flow_log: PathBuf,

    // ── Output ───────────────────────────────────────────────────────────────

    /// Report file. Overwritten on every run.
    #[arg(short = 'o', long = "output", value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    // ── Logging ──────────────────────────────────────────────────────────────

    /// Write log output to this file in addition to stdout.
    ///
    /// The file is created if it does not exist and appended to if it does.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Emit log entries as newline-delimited JSON (NDJSON).
    #[arg(short = 'j', long = "json")]
    pub json: bool,
}
