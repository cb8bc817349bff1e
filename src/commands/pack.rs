//! Pack command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::{load_config, open_service, parse_platform};
use crate::generator::Gateway;
use crate::utils::format_bytes;

/// Run the pack command
pub async fn run(platform: &str, gateway: &str, output: &Path, config_path: &Path) -> Result<()> {
    let platform = parse_platform(platform)?;
    let config = load_config(config_path)?;
    let service = open_service(&config)?;

    let artifact = service
        .bundle(platform, &Gateway::parse(gateway))
        .with_context(|| format!("Failed to pack {}", platform))?;

    std::fs::write(output, &artifact.bytes)
        .with_context(|| format!("Failed to write {:?}", output))?;

    info!(
        "Packed {} bundle ({} entries) into {} ({})",
        platform.display_name(),
        platform.manifest().len(),
        output.display(),
        format_bytes(artifact.bytes.len() as u64)
    );
    Ok(())
}
