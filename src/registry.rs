//! Parser for RIR delegated-statistics files (e.g. `delegated-apnic-latest`).
//!
//! Records look like `apnic|CN|ipv4|1.0.1.0|256|20110414|allocated`. Only
//! IPv4 records of the target country whose address count is a power of two
//! map onto a single CIDR block; everything else is skipped without error.

use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

const FIELD_REGISTRY: usize = 0;
const FIELD_COUNTRY: usize = 1;
const FIELD_TYPE: usize = 2;
const FIELD_START: usize = 3;
const FIELD_COUNT: usize = 4;

/// Classification of a single registry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Range(Ipv4Net),
    /// IPv4 record for the target country with a non power-of-two count
    Unaligned,
    Ignored,
}

/// Result of parsing a whole registry file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Accepted ranges, in file order
    pub ranges: Vec<Ipv4Net>,
    /// Target-country IPv4 records dropped because their count is not a power of two
    pub skipped_unaligned: usize,
}

impl ParseOutcome {
    /// Target-country IPv4 records seen, accepted or not.
    pub fn considered(&self) -> usize {
        self.ranges.len() + self.skipped_unaligned
    }
}

fn classify(line: &str, country: &str) -> Record {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Record::Ignored;
    }

    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() <= FIELD_COUNT || fields[FIELD_REGISTRY].is_empty() {
        return Record::Ignored;
    }

    // Summary lines carry '*' in the country column, version lines a serial number
    if fields[FIELD_TYPE] != "ipv4" || !fields[FIELD_COUNTRY].eq_ignore_ascii_case(country) {
        return Record::Ignored;
    }

    let Ok(start) = fields[FIELD_START].parse::<Ipv4Addr>() else {
        return Record::Ignored;
    };
    let Ok(count) = fields[FIELD_COUNT].parse::<u64>() else {
        return Record::Ignored;
    };

    match prefix_for_count(count) {
        Some(prefix) => Ipv4Net::new(start, prefix)
            .map(Record::Range)
            .unwrap_or(Record::Ignored),
        None if count == 0 || count > 1u64 << 32 => Record::Ignored,
        None => Record::Unaligned,
    }
}

/// Prefix length covering exactly `count` addresses: `32 - log2(count)`.
fn prefix_for_count(count: u64) -> Option<u8> {
    if count == 0 || !count.is_power_of_two() || count > 1u64 << 32 {
        return None;
    }
    Some(32 - count.trailing_zeros() as u8)
}

/// Parse one registry record into an address range.
///
/// Returns `None` for comments, headers, summaries, other countries, other
/// resource types, malformed fields and counts that are not a power of two.
pub fn parse_record(line: &str, country: &str) -> Option<Ipv4Net> {
    match classify(line, country) {
        Record::Range(net) => Some(net),
        _ => None,
    }
}

/// Parse a full registry file, keeping file order.
pub fn parse_registry(content: &str, country: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for line in content.lines() {
        match classify(line, country) {
            Record::Range(net) => outcome.ranges.push(net),
            Record::Unaligned => outcome.skipped_unaligned += 1,
            Record::Ignored => {}
        }
    }
    outcome
}
