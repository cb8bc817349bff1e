//! Stats command implementation.

use anyhow::Result;
use std::path::Path;

use super::{load_config, open_snapshots};
use crate::aggregator::{aggregate, count_addresses, coverage_percent};
use crate::utils::{format_count, format_count_with_separator};

/// Run the stats command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let manager = open_snapshots(&config)?;
    let snapshot = manager.current();

    // Count over merged ranges so overlapping records are not counted twice
    let merged = aggregate(snapshot.ranges());
    let addresses = count_addresses(&merged);

    println!();
    println!("══════════════════════════════════════════════════════════════════");
    println!(" CHNROUTES REGISTRY STATISTICS");
    println!("══════════════════════════════════════════════════════════════════");
    println!();
    println!(" Registry:        {}", manager.path().display());
    println!(" Country:         {}", manager.country().to_ascii_uppercase());
    println!(
        " Loaded at:       {}",
        snapshot.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    println!(
        " Ranges:          {} ({})",
        format_count_with_separator(snapshot.len() as u64),
        format_count(snapshot.len())
    );
    println!(
        " Merged ranges:   {}",
        format_count_with_separator(merged.len() as u64)
    );
    println!(" Addresses:       {}", format_count_with_separator(addresses));
    println!(" Coverage:        {:.2}% of public IPv4", coverage_percent(addresses));
    println!(
        " Skipped:         {} (address count not a power of two)",
        format_count_with_separator(snapshot.skipped_unaligned() as u64)
    );
    println!();

    Ok(())
}
