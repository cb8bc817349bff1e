//! Serve command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::{load_config, open_snapshots};
use crate::assets::DirAssets;
use crate::server::serve;
use crate::service::RouteService;
use crate::signal::shutdown_signal;
use crate::watcher::RegistryWatcher;

/// Run the serve command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    // No snapshot, no service
    let snapshots = Arc::new(open_snapshots(&config)?);

    if !config.assets_dir.is_dir() {
        warn!(
            "Assets directory {:?} does not exist; every download will fail",
            config.assets_dir
        );
    }

    let _watcher = if config.watch {
        match RegistryWatcher::spawn(Arc::clone(&snapshots)) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("Automatic reload disabled: {:#}", e);
                None
            }
        }
    } else {
        info!("Automatic reload disabled by configuration");
        None
    };

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let service = Arc::new(RouteService::new(
        snapshots,
        Arc::new(DirAssets::new(&config.assets_dir)),
    ));
    serve(listener, service, shutdown_signal()).await
}
