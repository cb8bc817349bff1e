//! HTTP front end.
//!
//! ```text
//! GET /                                -> listing, gateway auto
//! GET /l/{gateway}                     -> listing for all platforms
//! GET /l/{gateway}/{platform}          -> listing for one platform
//! GET /f/{gateway}/{platform}/{file}   -> single file or package.zip
//! GET /healthz                         -> snapshot status
//! ```
//!
//! Generation is CPU and file bound, so each download runs on the blocking
//! pool. A failed request never affects the server or other requests.

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::generator::Gateway;
use crate::platform::Platform;
use crate::service::{Artifact, Listing, RouteService};

/// Build the router over a shared service.
pub fn router(service: Arc<RouteService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/l/{gateway}", get(list_gateway))
        .route("/l/{gateway}/{platform}", get(list_platform))
        .route("/f/{gateway}/{platform}/{file}", get(download))
        .route("/healthz", get(healthz))
        .with_state(service)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, service: Arc<RouteService>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn index(State(service): State<Arc<RouteService>>) -> Json<Listing> {
    Json(service.listing(&Gateway::Deferred, None))
}

async fn list_gateway(
    State(service): State<Arc<RouteService>>,
    Path(gateway): Path<String>,
) -> Json<Listing> {
    Json(service.listing(&Gateway::parse(&gateway), None))
}

async fn list_platform(
    State(service): State<Arc<RouteService>>,
    Path((gateway, platform)): Path<(String, String)>,
) -> Json<Listing> {
    // Unknown platforms fall back to listing everything
    let platform = platform.parse::<Platform>().ok();
    Json(service.listing(&Gateway::parse(&gateway), platform))
}

async fn download(
    State(service): State<Arc<RouteService>>,
    Path((gateway, platform, file)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    let platform = platform.parse::<Platform>()?;
    let gateway = Gateway::parse(&gateway);

    let artifact = tokio::task::spawn_blocking(move || service.file(platform, &file, &gateway))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(artifact_response(artifact))
}

async fn healthz(State(service): State<Arc<RouteService>>) -> Json<serde_json::Value> {
    let snapshot = service.snapshots().current();
    Json(json!({
        "status": "ok",
        "country": service.snapshots().country(),
        "ranges": snapshot.len(),
        "skipped_unaligned": snapshot.skipped_unaligned(),
        "loaded_at": snapshot.loaded_at().to_rfc3339(),
    }))
}

fn artifact_response(artifact: Artifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// Request failure as seen by the HTTP layer.
#[derive(Debug)]
enum AppError {
    Request(Error),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        AppError::Request(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Request(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Request(e) if status == StatusCode::NOT_FOUND => {
                debug!("{}", e);
                e.to_string()
            }
            AppError::Request(e) => {
                warn!("Request failed: {}", e);
                "failed to generate artifact".to_string()
            }
            AppError::Internal(e) => {
                error!("Generation task failed: {}", e);
                "internal error".to_string()
            }
        };
        (status, message).into_response()
    }
}
