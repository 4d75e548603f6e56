//! Flow-log tagging pipeline.
//!
//! [`run_pipeline`] runs the four stages in order, each fully consuming its
//! input file before the next begins:
//!
//! 1. [`lookup::LookupTable::load`] reads the port/protocol → tags mapping;
//! 2. [`parser::parse_flow_log`] reduces the flow log to `(port, protocol)` records;
//! 3. [`aggregate::aggregate`] counts tags and pairs;
//! 4. [`report::write_report`] overwrites the report file.
//!
//! Errors from any stage abort the run. The only tolerated conditions are the
//! missing and empty lookup table cases handled inside the loader.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod lookup;
pub mod parser;
pub mod report;
pub mod types;

use crate::logger::{Event, Logger};
use crate::tagger::aggregate::aggregate;
use crate::tagger::config::UNTAGGED;
use crate::tagger::error::Result;
use crate::tagger::lookup::{LoadStatus, LookupTable};
use crate::tagger::parser::parse_flow_log;
use crate::tagger::report::write_report;
use std::path::PathBuf;

/// Configuration bundle passed from `main` into the pipeline.
pub struct TaggerConfig<'a> {
    /// Lookup table CSV.
    pub lookup_path:   PathBuf,
    /// Whitespace-delimited flow log.
    pub flow_log_path: PathBuf,
    /// Report destination, overwritten on success.
    pub output_path:   PathBuf,
    /// Structured logger.
    pub logger:        &'a Logger,
}

/// Totals for one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub lookup_status: LoadStatus,
    /// Flow records produced by the parser.
    pub records:       usize,
    /// Flow-log lines dropped for having too few fields.
    pub discarded:     usize,
    /// Distinct tags in the report.
    pub tags:          usize,
    /// Distinct port/protocol pairs in the report.
    pub pairs:         usize,
    /// Sum of all tag counts. Never less than `records`.
    pub tag_total:     u64,
    /// Count attributed to the `Untagged` sentinel.
    pub untagged:      u64,
}

/// Loads, parses, aggregates, and writes the report.
///
/// Logs one event per stage plus the completion notice. Returns the totals
/// so the caller can emit a summary.
pub fn run_pipeline(cfg: &TaggerConfig) -> Result<RunSummary> {
    let logger = cfg.logger;

    let lookup = LookupTable::load(&cfg.lookup_path, logger)?;
    if lookup.is_empty() && matches!(lookup.status(), LoadStatus::Loaded { .. }) {
        logger.log(&Event::Info {
            message: "Lookup table has no usable rows; all flows will be tagged Untagged",
        });
    }

    let parsed = parse_flow_log(&cfg.flow_log_path)?;
    logger.log(&Event::FlowLogParsed {
        path:      &cfg.flow_log_path.display().to_string(),
        records:   parsed.records.len(),
        discarded: parsed.discarded,
    });

    let agg = aggregate(&parsed.records, &lookup);

    write_report(&cfg.output_path, &agg)?;
    logger.log(&Event::ReportWritten {
        path:  &cfg.output_path.display().to_string(),
        tags:  agg.tag_counts.len(),
        pairs: agg.port_protocol_counts.len(),
    });

    logger.log(&Event::Info {
        message: &format!(
            "Processing complete. Results written to {}.",
            cfg.output_path.display()
        ),
    });

    Ok(RunSummary {
        lookup_status: lookup.status(),
        records:       parsed.records.len(),
        discarded:     parsed.discarded,
        tags:          agg.tag_counts.len(),
        pairs:         agg.port_protocol_counts.len(),
        tag_total:     agg.tag_counts.total(),
        untagged:      agg.tag_counts.get(&UNTAGGED.to_string()).unwrap_or(0),
    })
}
