//! Tagging and aggregation.
//!
//! Joins parsed flow records against the lookup table and builds two
//! independent counters: occurrences per tag and occurrences per
//! `(port, protocol)` pair. Both counters iterate in first-encounter order so
//! the report is deterministic for a given input.

use crate::tagger::config::UNTAGGED;
use crate::tagger::lookup::LookupTable;
use crate::tagger::types::{FlowRecord, PortProtocol};
use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered frequency counter.
///
/// Keys live in `order` in the order they were first counted; `index` maps a
/// key to its slot so increments stay O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable<K: Eq + Hash> {
    index: HashMap<K, usize>,
    order: Vec<(K, u64)>,
}

impl<K: Eq + Hash + Clone> CountTable<K> {
    pub fn new() -> Self {
        Self { index: HashMap::new(), order: Vec::new() }
    }

    /// Adds one to `key`, appending it if this is its first occurrence.
    pub fn increment(&mut self, key: &K) {
        match self.index.get(key) {
            Some(&slot) => self.order[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.order.len());
                self.order.push((key.clone(), 1));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|&slot| self.order[slot].1)
    }

    /// `(key, count)` pairs in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.order.iter().map(|(k, n)| (k, *n))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.order.iter().map(|(_, n)| n).sum()
    }
}

impl<K: Eq + Hash + Clone> Default for CountTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

pub type TagCounts          = CountTable<String>;
pub type PortProtocolCounts = CountTable<PortProtocol>;

/// Result of one aggregation pass, handed read-only to the report writer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub tag_counts:           TagCounts,
    pub port_protocol_counts: PortProtocolCounts,
}

/// Tags every record and counts tags and `(port, protocol)` pairs.
///
/// A record matching a key with N tags adds one to each of those N tags. A
/// record with no match adds one to [`UNTAGGED`]. Every record adds exactly
/// one to its pair count.
pub fn aggregate(records: &[FlowRecord], lookup: &LookupTable) -> Aggregation {
    let mut agg  = Aggregation::default();
    let untagged = UNTAGGED.to_string();

    for record in records {
        let key = record.key();

        match lookup.tags(&key) {
            Some(tags) => {
                for tag in tags {
                    agg.tag_counts.increment(tag);
                }
            }
            None => agg.tag_counts.increment(&untagged),
        }

        agg.port_protocol_counts.increment(&key);
    }

    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::types::Protocol;
    use std::path::Path;

    fn lookup(csv: &str) -> LookupTable {
        LookupTable::from_reader(Path::new("lookup.csv"), csv.as_bytes()).unwrap()
    }

    fn tcp(port: u16) -> FlowRecord {
        FlowRecord { dst_port: port, protocol: Protocol::Tcp }
    }

    fn udp(port: u16) -> FlowRecord {
        FlowRecord { dst_port: port, protocol: Protocol::Udp }
    }

    #[test]
    fn count_table_keeps_first_encounter_order() {
        let mut counts = CountTable::new();
        for word in ["b", "a", "b", "c", "a", "b"] {
            counts.increment(&word.to_string());
        }

        let seen: Vec<(&String, u64)> = counts.iter().collect();
        let keys: Vec<&str> = seen.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(counts.get(&"b".to_string()), Some(3));
        assert_eq!(counts.get(&"z".to_string()), None);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn matched_record_counts_tag_and_pair() {
        let table = lookup("dstport,protocol,tag\n443,tcp,https\n");
        let agg   = aggregate(&[tcp(443)], &table);

        assert_eq!(agg.tag_counts.get(&"https".to_string()), Some(1));
        assert_eq!(agg.port_protocol_counts.get(&PortProtocol::new(443, Protocol::Tcp)), Some(1));
        assert_eq!(agg.tag_counts.len(), 1);
    }

    #[test]
    fn unmatched_record_is_untagged() {
        let table = lookup("dstport,protocol,tag\n443,tcp,https\n");
        let agg   = aggregate(&[udp(443), tcp(8080)], &table);

        assert_eq!(agg.tag_counts.get(&UNTAGGED.to_string()), Some(2));
        assert_eq!(agg.tag_counts.len(), 1);
        assert_eq!(agg.port_protocol_counts.len(), 2);
    }

    #[test]
    fn multi_tag_key_increments_each_tag() {
        let table = lookup("dstport,protocol,tag\n80,tcp,web\n80,tcp,http-alt\n");
        let agg   = aggregate(&[tcp(80)], &table);

        let tags: Vec<(&String, u64)> = agg.tag_counts.iter().collect();
        assert_eq!(tags, vec![(&"web".to_string(), 1), (&"http-alt".to_string(), 1)]);
        assert_eq!(agg.port_protocol_counts.get(&PortProtocol::new(80, Protocol::Tcp)), Some(1));
    }

    #[test]
    fn totals_match_record_count() {
        let table   = lookup("dstport,protocol,tag\n80,tcp,web\n80,tcp,http-alt\n53,udp,dns\n");
        let records = [tcp(80), udp(53), tcp(22), udp(53), tcp(80), tcp(443)];
        let agg     = aggregate(&records, &table);

        assert_eq!(agg.port_protocol_counts.total(), records.len() as u64);
        assert!(agg.tag_counts.total() >= records.len() as u64);
        // two 80/tcp records carry two tags each
        assert_eq!(agg.tag_counts.total(), records.len() as u64 + 2);
    }

    #[test]
    fn empty_lookup_tags_everything_untagged() {
        let table = lookup("dstport,protocol,tag\n");
        let agg   = aggregate(&[tcp(443), udp(53), tcp(443)], &table);

        let tags: Vec<(&String, u64)> = agg.tag_counts.iter().collect();
        assert_eq!(tags, vec![(&UNTAGGED.to_string(), 3)]);

        let pairs: Vec<(PortProtocol, u64)> =
            agg.port_protocol_counts.iter().map(|(k, n)| (*k, n)).collect();
        assert_eq!(
            pairs,
            vec![
                (PortProtocol::new(443, Protocol::Tcp), 2),
                (PortProtocol::new(53, Protocol::Udp), 1),
            ]
        );
    }
}
