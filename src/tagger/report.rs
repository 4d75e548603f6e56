//! Report writer.
//!
//! Output layout:
//!
//! ```text
//! Tag Counts:
//! Tag,Count
//! <tag>,<count>
//!
//! Port/Protocol Combination Counts:
//! Port,Protocol,Count
//! <port>,<protocol>,<count>
//! ```
//!
//! Rows follow the counters' first-encounter order. There is no totals line.

use crate::tagger::aggregate::Aggregation;
use crate::tagger::error::{Result, TaggerError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Renders the report for `agg` into `out`.
pub fn render_report<W: Write>(mut out: W, agg: &Aggregation) -> io::Result<()> {
    writeln!(out, "Tag Counts:")?;
    writeln!(out, "Tag,Count")?;
    for (tag, count) in agg.tag_counts.iter() {
        writeln!(out, "{},{}", tag, count)?;
    }

    writeln!(out)?;
    writeln!(out, "Port/Protocol Combination Counts:")?;
    writeln!(out, "Port,Protocol,Count")?;
    for (key, count) in agg.port_protocol_counts.iter() {
        writeln!(out, "{},{},{}", key.port, key.protocol, count)?;
    }

    Ok(())
}

/// Writes the report to `path`, replacing any existing file.
///
/// The file is written in place; a failure part-way through can leave a
/// truncated report behind.
pub fn write_report(path: &Path, agg: &Aggregation) -> Result<()> {
    let file = File::create(path).map_err(|e| TaggerError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    render_report(&mut writer, agg).map_err(|e| TaggerError::io(path, e))?;
    writer.flush().map_err(|e| TaggerError::io(path, e))
}
