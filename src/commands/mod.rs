//! CLI command implementations.

pub mod pack;
pub mod render;
pub mod serve;
pub mod stats;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::assets::DirAssets;
use crate::config::Config;
use crate::platform::Platform;
use crate::service::RouteService;
use crate::snapshot::SnapshotManager;

fn load_config(config_path: &Path) -> Result<Config> {
    Config::load(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))
}

fn open_snapshots(config: &Config) -> Result<SnapshotManager> {
    SnapshotManager::open(&config.registry, &config.country, config.aggregate)
        .with_context(|| format!("Failed to load registry {:?}", config.registry))
}

/// Service over the configured registry and assets directory.
fn open_service(config: &Config) -> Result<RouteService> {
    let snapshots = Arc::new(open_snapshots(config)?);
    Ok(RouteService::new(
        snapshots,
        Arc::new(DirAssets::new(&config.assets_dir)),
    ))
}

fn parse_platform(platform: &str) -> Result<Platform> {
    platform.parse::<Platform>().with_context(|| {
        let known: Vec<&str> = Platform::ALL.iter().map(|p| p.id()).collect();
        format!("Valid platforms: {}", known.join(", "))
    })
}
