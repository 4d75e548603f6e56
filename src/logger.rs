//! Structured logging for flowtag.
//!
//! Provides a [`Logger`] that writes events to stdout and optionally to a log
//! file. Output can be formatted as human-readable plain text or as
//! newline-delimited JSON (NDJSON), so a run can be audited by a person or
//! shipped to a log pipeline unchanged.

use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

// ── Event types ──────────────────────────────────────────────────────────────

/// All distinct event kinds that flowtag can emit.
///
/// The `#[serde(tag = "event")]` attribute puts an `"event"` key in the JSON
/// output so consumers can filter by type without inspecting structure.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event<'a> {
    /// Informational status message.
    Info { message: &'a str },

    /// The lookup table was read.
    LookupLoaded {
        path:    &'a str,
        keys:    usize,
        rows:    usize,
        skipped: usize,
    },

    /// The lookup table file does not exist; every flow will be untagged.
    LookupMissing { path: &'a str },

    /// The lookup table file was empty and received the default header.
    LookupRepaired { path: &'a str },

    /// The flow log was parsed.
    FlowLogParsed {
        path:      &'a str,
        records:   usize,
        discarded: usize,
    },

    /// The report file was written.
    ReportWritten {
        path:  &'a str,
        tags:  usize,
        pairs: usize,
    },

    /// Totals for a completed run.
    RunSummary {
        lookup:      &'a str,
        records:     usize,
        discarded:   usize,
        tags:        usize,
        pairs:       usize,
        tag_total:   u64,
        untagged:    u64,
        duration_ms: u128,
    },

    /// The run was aborted.
    Fatal { message: &'a str },
}

// ── Logger ───────────────────────────────────────────────────────────────────

/// Structured logger.
///
/// Constructed once in `main` and passed by reference into the pipeline.
pub struct Logger {
    /// Whether to format events as NDJSON instead of plain text.
    json: bool,
    /// Optional buffered file writer. `None` when `--log-file` was not given.
    file: Option<Mutex<BufWriter<std::fs::File>>>,
}

impl Logger {
    /// Creates a new logger.
    ///
    /// # Arguments
    /// * `json`     - Emit NDJSON instead of plain text when `true`.
    /// * `log_path` - If `Some`, open (or create) this file for appended writes.
    ///
    /// # Errors
    /// Returns an `io::Error` if the log file cannot be opened or created.
    pub fn new(json: bool, log_path: Option<&Path>) -> io::Result<Self> {
        let file = match log_path {
            Some(path) => {
                let f = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                Some(Mutex::new(BufWriter::new(f)))
            }
            None => None,
        };

        Ok(Self { json, file })
    }

    /// Logs a single [`Event`], writing to stdout and optionally to the log file.
    pub fn log(&self, event: &Event) {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string();
        let line = self.format_line(event, &timestamp);

        println!("{}", line);

        if let Some(mutex) = &self.file {
            if let Ok(mut writer) = mutex.lock() {
                let _ = writeln!(writer, "{}", line);
                let _ = writer.flush();
            }
        }
    }

    /// Formats one log line. Plain text is `[TIMESTAMP] [TAG] description`;
    /// NDJSON is the serialized event with a `"timestamp"` field injected.
    fn format_line(&self, event: &Event, timestamp: &str) -> String {
        if self.json {
            let mut val = serde_json::to_value(event).unwrap_or_default();
            if let Some(obj) = val.as_object_mut() {
                obj.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp.to_string()),
                );
            }
            serde_json::to_string(&val).unwrap_or_default()
        } else {
            format!("[{}] {}", timestamp, Self::plain_text(event))
        }
    }

    /// Formats an [`Event`] as a human-readable plain-text string (no timestamp).
    fn plain_text(event: &Event) -> String {
        match event {
            Event::Info { message } =>
                format!("[INFO] {}", message),

            Event::LookupLoaded { path, keys, rows, skipped } =>
                format!("[LOOKUP] {} loaded: {} keys from {} rows ({} skipped)", path, keys, rows, skipped),

            Event::LookupMissing { path } =>
                format!("[WARN] lookup table {} not found; all flows will be tagged Untagged", path),

            Event::LookupRepaired { path } =>
                format!("[LOOKUP] {} was empty; wrote default header", path),

            Event::FlowLogParsed { path, records, discarded } =>
                format!("[FLOW LOG] {} parsed: {} records ({} lines discarded)", path, records, discarded),

            Event::ReportWritten { path, tags, pairs } =>
                format!("[REPORT] {} written: {} tags, {} port/protocol pairs", path, tags, pairs),

            Event::RunSummary {
                lookup, records, discarded, tags, pairs, tag_total, untagged, duration_ms
            } => format!(
                "[SUMMARY] lookup={} records={} discarded={} tags={} pairs={} tag_total={} untagged={} duration={}ms",
                lookup, records, discarded, tags, pairs, tag_total, untagged, duration_ms
            ),

            Event::Fatal { message } =>
                format!("[FATAL] {}", message),
        }
    }
}
