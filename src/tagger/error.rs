//! Error types for the tagging pipeline.
//!
//! Only fatal conditions are represented here. A missing or empty lookup table
//! is reported through [`LoadStatus`](crate::tagger::lookup::LoadStatus), and
//! short or malformed-shape rows are skipped without producing an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggerError {
    /// A file could not be opened, read, created, or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lookup table is not readable as CSV.
    #[error("malformed lookup table {}: {source}", .path.display())]
    Csv {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A port field that is not an integer in `0..=65535`.
    #[error("invalid port {value:?} in {} line {line}", .path.display())]
    InvalidPort {
        path:  PathBuf,
        line:  u64,
        value: String,
    },

    /// A protocol name in a lookup row other than tcp, udp, or icmp.
    #[error("invalid protocol {value:?} in {} line {line}", .path.display())]
    InvalidProtocol {
        path:  PathBuf,
        line:  u64,
        value: String,
    },
}

impl TaggerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TaggerError::Io { path: path.into(), source }
    }
}

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, TaggerError>;
