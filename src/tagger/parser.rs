//! Flow-log line parser.
//!
//! Each line is split on whitespace. Lines with fewer than
//! [`MIN_FLOW_FIELDS`] fields are discarded; for everything else only the
//! destination port and protocol number columns are read.

use crate::tagger::config::*;
use crate::tagger::error::{Result, TaggerError};
use crate::tagger::types::{FlowRecord, Protocol};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// All records parsed from one flow log, in line order.
#[derive(Debug, Default)]
pub struct ParsedLog {
    pub records:   Vec<FlowRecord>,
    /// Lines dropped for having too few fields (blank lines included).
    pub discarded: usize,
}

/// Maps an IANA protocol number to the protocol used for tagging.
///
/// Only `6` and `17` are recognised; every other value, including
/// non-numeric ones, is treated as ICMP.
pub fn protocol_from_number(number: &str) -> Protocol {
    match number {
        IANA_TCP => Protocol::Tcp,
        IANA_UDP => Protocol::Udp,
        _        => Protocol::Icmp,
    }
}

/// Parses a single flow-log line.
///
/// Returns `Ok(None)` when the line is too short to be a flow record.
/// `path` and `line_no` (1-based) are only used to describe a bad port.
pub fn parse_line(path: &Path, line_no: u64, line: &str) -> Result<Option<FlowRecord>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FLOW_FIELDS {
        return Ok(None);
    }

    let raw_port = fields[DST_PORT_FIELD];
    let dst_port = raw_port.parse::<u16>().map_err(|_| TaggerError::InvalidPort {
        path:  path.to_path_buf(),
        line:  line_no,
        value: raw_port.to_string(),
    })?;

    Ok(Some(FlowRecord {
        dst_port,
        protocol: protocol_from_number(fields[PROTOCOL_FIELD]),
    }))
}

/// Reads and parses the whole flow log at `path`.
///
/// # Errors
/// A missing or unreadable file is [`TaggerError::Io`]; a non-numeric
/// destination port on an otherwise eligible line is
/// [`TaggerError::InvalidPort`]. Both abort the run.
pub fn parse_flow_log(path: &Path) -> Result<ParsedLog> {
    let file   = File::open(path).map_err(|e| TaggerError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut log = ParsedLog::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TaggerError::io(path, e))?;

        match parse_line(path, idx as u64 + 1, &line)? {
            Some(record) => log.records.push(record),
            None         => log.discarded += 1,
        }
    }

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ACCEPTED: &str = "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000 1620140761 1620140821 ACCEPT OK";
    const SHORT:    &str = "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 443 49153 6 25 20000";

    fn parse(line: &str) -> Option<FlowRecord> {
        parse_line(Path::new("flow.log"), 1, line).unwrap()
    }

    #[test]
    fn reads_port_and_protocol_fields() {
        let line = "2 123456789012 eni-4d3c2b1a 192.168.1.100 203.0.113.101 23 443 6 18 14000 1620140661 1620140721 REJECT";
        let record = parse(line).unwrap();

        assert_eq!(record, FlowRecord { dst_port: 443, protocol: Protocol::Tcp });
    }

    #[test]
    fn short_lines_are_discarded() {
        assert_eq!(parse(SHORT), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let record = parse(ACCEPTED).unwrap();
        assert_eq!(record, FlowRecord { dst_port: 49153, protocol: Protocol::Tcp });
    }

    #[test]
    fn protocol_numbers_map_exactly() {
        assert_eq!(protocol_from_number("6"), Protocol::Tcp);
        assert_eq!(protocol_from_number("17"), Protocol::Udp);
        assert_eq!(protocol_from_number("1"), Protocol::Icmp);
        assert_eq!(protocol_from_number("06"), Protocol::Icmp);
        assert_eq!(protocol_from_number("tcp"), Protocol::Icmp);
    }

    #[test]
    fn non_numeric_port_is_reported_with_line() {
        let line = "2 a b c d e http 6 x x x x x";
        let err  = parse_line(Path::new("flow.log"), 7, line).unwrap_err();
        assert_eq!(err.to_string(), "invalid port \"http\" in flow.log line 7");
    }

    #[test]
    fn parses_file_in_line_order() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("flow.log");
        let udp  = "2 1 eni x y 53 68 17 1 1 1 1 ACCEPT OK";
        fs::write(&path, format!("{ACCEPTED}\n{SHORT}\n\n{udp}\n")).unwrap();

        let log = parse_flow_log(&path).unwrap();

        assert_eq!(log.discarded, 2);
        assert_eq!(
            log.records,
            vec![
                FlowRecord { dst_port: 49153, protocol: Protocol::Tcp },
                FlowRecord { dst_port: 68, protocol: Protocol::Udp },
            ]
        );
    }

    #[test]
    fn missing_flow_log_is_fatal() {
        let dir = tempdir().unwrap();
        let err = parse_flow_log(&dir.path().join("absent.log")).unwrap_err();
        assert!(matches!(err, TaggerError::Io { .. }));
    }

    #[test]
    fn bad_port_in_file_names_path_and_line() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("flow.log");
        fs::write(&path, format!("{ACCEPTED}\n2 a b c d e -1 6 x x x x x\n")).unwrap();

        match parse_flow_log(&path).unwrap_err() {
            TaggerError::InvalidPort { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "-1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
