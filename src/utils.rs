//! Formatting helpers for log lines and command output.
//!
//! - [`format_count`] - compact counts with K/M suffix (1.5K, 2.3M)
//! - [`format_count_with_separator`] - thousands separators (1,234,567)
//! - [`format_bytes`] - byte sizes (KB, MB, GB)

/// Format a count with K/M suffix for compact display.
///
/// # Examples
/// ```
/// use chnroutes::utils::format_count;
/// assert_eq!(format_count(500), "500");
/// assert_eq!(format_count(8_500), "8.5K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Format a number with thousands separators.
///
/// Takes `u64` so whole-space address counts (2^32) fit.
///
/// # Examples
/// ```
/// use chnroutes::utils::format_count_with_separator;
/// assert_eq!(format_count_with_separator(1000), "1,000");
/// assert_eq!(format_count_with_separator(4_294_967_296), "4,294,967,296");
/// ```
pub fn format_count_with_separator(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format bytes in human-readable form.
///
/// # Examples
/// ```
/// use chnroutes::utils::format_bytes;
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1_500_000), "1.4 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
