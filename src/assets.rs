//! Asset access layer for templates and static bundle members.
//!
//! Generation and packaging read through the [`AssetStore`] trait so tests
//! can inject failures (missing files, I/O errors mid-pack) without touching
//! the real filesystem. Uses mockall for automatic mock generation in test
//! builds.

use std::io;
use std::path::{Component, Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};

/// Read-only source of template and static assets, addressed by
/// `<platform>/<file>` relative paths.
#[cfg_attr(test, automock)]
pub trait AssetStore: Send + Sync {
    /// Read an asset's raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Assets stored under a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStore for DirAssets {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        // Only plain relative paths below the root are addressable
        if !path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset path escapes assets root: {}", path.display()),
            ));
        }
        std::fs::read(self.root.join(path))
    }
}

/// Read an asset, mapping a missing file to [`Error::AssetNotFound`].
pub fn read_asset(store: &dyn AssetStore, path: &Path) -> Result<Vec<u8>> {
    store.read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => Error::AssetNotFound(path.to_path_buf()),
        _ => Error::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Read a template asset as UTF-8 text.
pub fn read_template(store: &dyn AssetStore, path: &Path) -> Result<String> {
    let bytes = read_asset(store, path)?;
    String::from_utf8(bytes).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}
