//! CIDR aggregation and address-space accounting for route sets.

use ipnet::Ipv4Net;

/// Merge contiguous and overlapping ranges into the smallest CIDR set.
///
/// The result is in address order, not input order.
/// For example: [1.0.2.0/24, 1.0.3.0/24] -> [1.0.2.0/23]
pub fn aggregate(ranges: &[Ipv4Net]) -> Vec<Ipv4Net> {
    Ipv4Net::aggregate(&ranges.to_vec())
}

/// Total number of addresses covered by a list of ranges.
///
/// Overlapping ranges are counted twice; aggregate first for an exact figure.
pub fn count_addresses(ranges: &[Ipv4Net]) -> u64 {
    ranges
        .iter()
        .map(|net| 1u64 << (32 - u32::from(net.prefix_len())))
        .fold(0u64, |acc, count| acc.saturating_add(count))
}

/// Percentage of the public IPv4 space (approx. 3.7 billion addresses) covered.
pub fn coverage_percent(address_count: u64) -> f64 {
    const PUBLIC_IPV4_APPROX: f64 = 3_700_000_000.0;
    (address_count as f64 / PUBLIC_IPV4_APPROX) * 100.0
}
