//! Registry file watcher.
//!
//! Watches the registry file's directory rather than the file itself, so an
//! editor or downloader that replaces the file by rename is still observed.
//!
//! Events are debounced. A close-after-write or a rename into place means the
//! writer is done, and the reload follows after [`QUIET_PERIOD`]. Plain
//! creates and data modifications only mean a write is under way: the reload
//! waits until no event has arrived for [`SETTLE_PERIOD`], which covers
//! backends that never report the close.

use anyhow::{Context, Result};
use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::snapshot::SnapshotManager;

/// Delay between a finished write and the reload.
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Silence required before reloading a file that may still be written.
pub const SETTLE_PERIOD: Duration = Duration::from_secs(2);

/// How far along a write to the registry file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The writer closed the file or renamed it into place
    Complete,
    /// The file was created or modified and may still be open for writing
    InProgress,
}

impl Change {
    /// How long the watcher waits without further events before reloading.
    pub fn settle_delay(self) -> Duration {
        match self {
            Change::Complete => QUIET_PERIOD,
            Change::InProgress => SETTLE_PERIOD,
        }
    }
}

/// Reloads the snapshot whenever the registry file changes.
///
/// Stops watching when dropped.
pub struct RegistryWatcher {
    // Keep watcher alive
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl RegistryWatcher {
    /// Start watching `manager`'s registry file.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(manager: Arc<SnapshotManager>) -> Result<Self> {
        let file_name = manager
            .path()
            .file_name()
            .map(|name| name.to_os_string())
            .with_context(|| format!("Registry path has no file name: {:?}", manager.path()))?;
        let dir = watch_dir(manager.path());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory: {:?}", dir))?;
        info!("Watching {} for changes", manager.path().display());

        let task = tokio::spawn(async move {
            // Reload deadline and the latest event that moved it
            let mut pending: Option<(Instant, Event)> = None;

            loop {
                let deadline = pending.as_ref().map(|(deadline, _)| *deadline);
                let received = match deadline {
                    Some(deadline) => match time::timeout_at(deadline, rx.recv()).await {
                        Ok(received) => received,
                        Err(_) => {
                            if let Some((_, event)) = pending.take() {
                                reload(&manager, event).await;
                            }
                            continue;
                        }
                    },
                    None => rx.recv().await,
                };

                let Some(res) = received else {
                    break;
                };
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("File watcher error: {}", e);
                        continue;
                    }
                };
                let Some(change) = classify(&event, &file_name) else {
                    continue;
                };

                debug!("Registry {:?} event, reload deferred", change);
                pending = Some((Instant::now() + change.settle_delay(), event));
            }
            debug!("File watcher channel closed");
        });

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for RegistryWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn reload(manager: &Arc<SnapshotManager>, event: Event) {
    let manager = Arc::clone(manager);
    let reload = tokio::task::spawn_blocking(move || manager.reload_on_change(&event));
    if let Err(e) = reload.await {
        warn!("Reload task failed: {}", e);
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Classify `event` for the file called `file_name`.
///
/// Returns `None` for other files and for events that leave the content
/// unchanged (reads, removal, renaming the file away).
pub fn classify(event: &Event, file_name: &OsStr) -> Option<Change> {
    let change = match event.kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => Change::Complete,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => return None,
        EventKind::Modify(ModifyKind::Name(_)) => Change::Complete,
        EventKind::Create(_) | EventKind::Modify(_) => Change::InProgress,
        _ => return None,
    };

    event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name))
        .then_some(change)
}
