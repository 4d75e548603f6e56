/// Header row written into a lookup table that exists but is empty.
///
/// Also the header every non-empty lookup table is expected to start with;
/// the loader skips the first record without comparing it to this value.
pub const DEFAULT_LOOKUP_HEADER: [&str; 3] = ["dstport", "protocol", "tag"];

/// Number of columns in a well-formed lookup data row.
pub const LOOKUP_FIELDS: usize = 3;

/// Sentinel tag counted for a record whose (port, protocol) pair has no
/// lookup entry.
pub const UNTAGGED: &str = "Untagged";

/// Minimum number of whitespace-separated fields a flow-log line needs before
/// it is parsed at all. Shorter lines are discarded.
///
/// Matches the field count of a version 2 VPC flow-log record; any trailing
/// fields beyond this are ignored.
pub const MIN_FLOW_FIELDS: usize = 13;

/// Zero-based index of the destination port in a flow-log line.
pub const DST_PORT_FIELD: usize = 6;

/// Zero-based index of the IANA protocol number in a flow-log line.
pub const PROTOCOL_FIELD: usize = 7;

/// IANA protocol numbers recognised by name. Everything else is ICMP.
pub const IANA_TCP: &str = "6";
pub const IANA_UDP: &str = "17";

pub const DEFAULT_LOOKUP_PATH:   &str = "lookup_table.csv";
pub const DEFAULT_FLOW_LOG_PATH: &str = "flow_logs.txt";
pub const DEFAULT_OUTPUT_PATH:   &str = "output.txt";
