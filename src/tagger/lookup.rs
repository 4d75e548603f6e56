//! Port/protocol lookup table.
//!
//! The table file is CSV with a `dstport,protocol,tag` header followed by one
//! mapping per row. Rows with duplicate keys accumulate their tags in file
//! order, so a single flow can carry more than one tag.
//!
//! Loading has exactly two tolerated failure modes, both reported through
//! [`LoadStatus`] rather than as errors:
//!
//! * the file does not exist: an empty table is returned and a
//!   [`Event::LookupMissing`] notice is logged;
//! * the file exists but is zero bytes long: [`repair_empty_table`] writes the
//!   default header into it and an empty table is returned. This write is a
//!   documented post-condition of [`LookupTable::load`]; it is the only time
//!   loading touches the file.
//!
//! Any other I/O failure, and any unparsable port or protocol in a three-field
//! row, aborts the load.

use crate::logger::{Event, Logger};
use crate::tagger::config::{DEFAULT_LOOKUP_HEADER, LOOKUP_FIELDS};
use crate::tagger::error::{Result, TaggerError};
use crate::tagger::types::{PortProtocol, Protocol};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How a [`LookupTable`] came to have its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file was read. `rows` data rows were applied and `skipped` rows
    /// were dropped for having a field count other than three.
    Loaded { rows: usize, skipped: usize },
    /// The file did not exist.
    Missing,
    /// The file was empty and received the default header.
    Repaired,
}

impl LoadStatus {
    /// Short name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Loaded { .. } => "loaded",
            LoadStatus::Missing       => "missing",
            LoadStatus::Repaired      => "repaired",
        }
    }
}

/// Immutable mapping from `(port, protocol)` to the tags assigned to it.
#[derive(Debug)]
pub struct LookupTable {
    entries: HashMap<PortProtocol, Vec<String>>,
    status:  LoadStatus,
}

impl LookupTable {
    /// Loads the lookup table at `path`.
    ///
    /// # Post-conditions
    /// If the file exists but is empty, it contains the default
    /// `dstport,protocol,tag` header when this returns, and the returned table
    /// has status [`LoadStatus::Repaired`].
    ///
    /// # Errors
    /// Returns [`TaggerError::Io`] for any I/O failure other than the file not
    /// existing, and [`TaggerError::InvalidPort`] / [`TaggerError::InvalidProtocol`]
    /// for a well-shaped row whose fields do not parse.
    pub fn load(path: &Path, logger: &Logger) -> Result<Self> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger.log(&Event::LookupMissing { path: &path.display().to_string() });
                return Ok(Self::empty(LoadStatus::Missing));
            }
            Err(e) => return Err(TaggerError::io(path, e)),
        };

        let size = file
            .metadata()
            .map_err(|e| TaggerError::io(path, e))?
            .len();

        if size == 0 {
            drop(file);
            repair_empty_table(path)?;
            logger.log(&Event::LookupRepaired { path: &path.display().to_string() });
            return Ok(Self::empty(LoadStatus::Repaired));
        }

        let table = Self::from_reader(path, BufReader::new(file))?;

        if let LoadStatus::Loaded { rows, skipped } = table.status {
            logger.log(&Event::LookupLoaded {
                path: &path.display().to_string(),
                keys: table.len(),
                rows,
                skipped,
            });
        }
        Ok(table)
    }

    /// Builds a table from CSV text. The first record is always treated as
    /// the header and discarded. `path` is only used in error messages.
    pub fn from_reader<R: Read>(path: &Path, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut entries: HashMap<PortProtocol, Vec<String>> = HashMap::new();
        let mut rows    = 0;
        let mut skipped = 0;

        for result in rdr.records() {
            let record = result.map_err(|source| TaggerError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

            if record.len() != LOOKUP_FIELDS {
                skipped += 1;
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let port: u16 = record[0].trim().parse().map_err(|_| TaggerError::InvalidPort {
                path:  path.to_path_buf(),
                line,
                value: record[0].to_string(),
            })?;
            let protocol = Protocol::from_name(&record[1]).ok_or_else(|| {
                TaggerError::InvalidProtocol {
                    path:  path.to_path_buf(),
                    line,
                    value: record[1].to_string(),
                }
            })?;

            entries
                .entry(PortProtocol::new(port, protocol))
                .or_default()
                .push(record[2].to_string());
            rows += 1;
        }

        Ok(Self { entries, status: LoadStatus::Loaded { rows, skipped } })
    }

    fn empty(status: LoadStatus) -> Self {
        Self { entries: HashMap::new(), status }
    }

    /// Tags assigned to `key`, in lookup-file order.
    pub fn tags(&self, key: &PortProtocol) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of distinct `(port, protocol)` keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }
}

/// Writes the default `dstport,protocol,tag` header into an existing, empty
/// lookup table file.
pub fn repair_empty_table(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| TaggerError::io(path, e))?;

    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(DEFAULT_LOOKUP_HEADER)
        .map_err(|source| TaggerError::Csv { path: path.to_path_buf(), source })?;
    wtr.flush().map_err(|e| TaggerError::io(path, e))
}
