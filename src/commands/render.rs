//! Render command implementation.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::{load_config, open_service, parse_platform};
use crate::generator::Gateway;
use crate::utils::format_bytes;

/// Run the render command
pub async fn run(
    platform: &str,
    file: &str,
    gateway: &str,
    output: Option<&Path>,
    config_path: &Path,
) -> Result<()> {
    let platform = parse_platform(platform)?;
    let config = load_config(config_path)?;
    let service = open_service(&config)?;

    let artifact = service
        .file(platform, file, &Gateway::parse(gateway))
        .with_context(|| format!("Failed to render {}/{}", platform, file))?;

    match output {
        Some(path) => {
            std::fs::write(path, &artifact.bytes)
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!(
                "Wrote {} ({})",
                path.display(),
                format_bytes(artifact.bytes.len() as u64)
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&artifact.bytes)
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
