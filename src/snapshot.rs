//! Live-reloadable registry snapshot.
//!
//! The current set of ranges is an immutable [`RegistrySnapshot`] published
//! through an `ArcSwap`. Readers take a reference with [`SnapshotManager::current`]
//! (lock-free, never blocks) and keep a consistent view for as long as they
//! hold it; a reload builds a whole new snapshot and swaps it in.
//!
//! ```text
//! Request -> SnapshotManager::current() -> ArcSwap::load_full() -> Arc<RegistrySnapshot>
//!
//! File change -> SnapshotManager::reload_on_change() -> load() -> ArcSwap::store()
//!                                                          |
//!                                             (serialized by reload_lock)
//! ```

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use ipnet::Ipv4Net;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::aggregator::aggregate;
use crate::registry::parse_registry;
use crate::utils::format_count;

/// All accepted ranges at the time of one successful parse.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    ranges: Vec<Ipv4Net>,
    skipped_unaligned: usize,
    loaded_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    pub fn new(ranges: Vec<Ipv4Net>, skipped_unaligned: usize) -> Self {
        Self {
            ranges,
            skipped_unaligned,
            loaded_at: Utc::now(),
        }
    }

    /// Ranges in registry file order (address order when aggregated).
    pub fn ranges(&self) -> &[Ipv4Net] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Target-country records dropped for a non power-of-two address count.
    pub fn skipped_unaligned(&self) -> usize {
        self.skipped_unaligned
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Owner of the process-wide current snapshot.
pub struct SnapshotManager {
    path: PathBuf,
    country: String,
    aggregate: bool,
    current: ArcSwap<RegistrySnapshot>,
    /// Serializes reloads so publishes never interleave
    reload_lock: Mutex<()>,
}

impl SnapshotManager {
    /// Parse the registry file and publish the initial snapshot.
    ///
    /// Fails if the file cannot be read; there is no meaningful default dataset.
    pub fn open(path: impl Into<PathBuf>, country: &str, aggregate: bool) -> Result<Self> {
        let path = path.into();
        let country = country.to_string();
        let initial = read_snapshot(&path, &country, aggregate)?;
        log_loaded(&path, &initial);

        Ok(Self {
            path,
            country,
            aggregate,
            current: ArcSwap::from_pointee(initial),
            reload_lock: Mutex::new(()),
        })
    }

    /// Re-read the registry file and atomically publish a new snapshot.
    ///
    /// On error the previous snapshot stays current.
    pub fn load(&self) -> Result<Arc<RegistrySnapshot>> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let snapshot = Arc::new(read_snapshot(&self.path, &self.country, self.aggregate)?);
        self.current.store(Arc::clone(&snapshot));
        log_loaded(&self.path, &snapshot);
        Ok(snapshot)
    }

    /// The currently published snapshot.
    pub fn current(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    /// Reload in response to a change notification for the registry file.
    ///
    /// Returns whether a new snapshot was published. Failures are logged and
    /// leave the previous snapshot in place.
    pub fn reload_on_change(&self, event: &notify::Event) -> bool {
        debug!("Registry change detected: {:?}", event.kind);
        match self.load() {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "Failed to reload {}, keeping previous snapshot: {:#}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

fn read_snapshot(path: &Path, country: &str, merge: bool) -> Result<RegistrySnapshot> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read registry file: {:?}", path))?;
    // Invalid UTF-8 only spoils the lines it appears on
    let content = String::from_utf8_lossy(&bytes);
    let outcome = parse_registry(&content, country);

    let ranges = if merge {
        aggregate(&outcome.ranges)
    } else {
        outcome.ranges
    };
    Ok(RegistrySnapshot::new(ranges, outcome.skipped_unaligned))
}

fn log_loaded(path: &Path, snapshot: &RegistrySnapshot) {
    info!(
        "Loaded {} ranges from {}",
        format_count(snapshot.len()),
        path.display()
    );
    if snapshot.skipped_unaligned() > 0 {
        warn!(
            "Skipped {} records whose address count is not a power of two",
            snapshot.skipped_unaligned()
        );
    }
}
