use std::fmt;

/// Transport protocol of a flow, as it appears in lookup tables and reports.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
}

impl Protocol {
    /// Lowercase name used as the lookup key and in the report.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp  => "tcp",
            Protocol::Udp  => "udp",
            Protocol::Icmp => "icmp",
        }
    }

    /// Parses a protocol name from a lookup row.
    ///
    /// Surrounding whitespace is ignored and the match is case-insensitive, so
    /// `TCP`, `tcp` and ` Tcp` all resolve to [`Protocol::Tcp`]. Returns `None`
    /// for anything that is not one of the three supported names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tcp"  => Some(Protocol::Tcp),
            "udp"  => Some(Protocol::Udp),
            "icmp" => Some(Protocol::Icmp),
            _      => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key shared by the lookup table and the port/protocol counter.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct PortProtocol {
    pub port:     u16,
    pub protocol: Protocol,
}

impl PortProtocol {
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }
}

/// One parsed flow-log line, reduced to the two fields that drive tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRecord {
    pub dst_port: u16,
    pub protocol: Protocol,
}

impl FlowRecord {
    pub fn key(&self) -> PortProtocol {
        PortProtocol::new(self.dst_port, self.protocol)
    }
}
