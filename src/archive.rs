//! Zip bundle assembly for a platform's manifest.

use std::io::{Cursor, Write};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::assets::{read_asset, AssetStore};
use crate::error::Result;
use crate::generator::{generate, Gateway};
use crate::platform::{Platform, Source};
use crate::snapshot::RegistrySnapshot;

/// Build the zip bundle for `platform`.
///
/// Entries are written in manifest order with a fixed timestamp, so equal
/// inputs produce byte-identical archives. Any failure aborts the whole
/// archive; no partial bytes are ever returned.
pub fn pack(
    platform: Platform,
    assets: &dyn AssetStore,
    snapshot: &RegistrySnapshot,
    gateway: &Gateway,
) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o755);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in platform.manifest() {
        let path = platform.asset_path(entry.name);
        let content = match entry.source {
            Source::Template => generate(assets, &path, snapshot, gateway)?,
            Source::Static => read_asset(assets, &path)?,
        };

        zip.start_file(entry.name, options)?;
        zip.write_all(&content).map_err(ZipError::Io)?;
        debug!("Packed {} ({} bytes)", path.display(), content.len());
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
