//! # chnroutes - Route Table Generator for Country IP Ranges
//!
//! Turns an RIR delegated-statistics file (e.g. APNIC's `delegated-apnic-latest`)
//! into ready-to-run routing artifacts for several client platforms, and
//! serves them over HTTP as single files or zip bundles.
//!
//! ## Features
//!
//! - **Live Reload** - The registry file is watched; edits are picked up without restart
//! - **Consistent Snapshots** - Readers never observe a half-loaded registry
//! - **Table-Driven Platforms** - Linux, Android, macOS, ChinaDNS, RouterOS, Windows
//! - **Deferred Gateway** - `auto` emits a placeholder resolved on the client
//! - **Deterministic Output** - Same inputs, byte-identical files and archives
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       chnroutes                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: serve, render, pack, stats, version        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Server (axum)                                              │
//! │    └── Listing, file and bundle routes -> RouteService      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Snapshot (arc-swap) <── Watcher (notify)                   │
//! │    └── Registry parser (ipnet) + optional aggregation       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Generator + Template directives                            │
//! │    └── Assets (templates/<platform>/<file>)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Archive (zip)                                              │
//! │    └── Per-platform bundle from the platform manifest       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use chnroutes::archive::pack;
//! use chnroutes::assets::DirAssets;
//! use chnroutes::generator::Gateway;
//! use chnroutes::platform::Platform;
//! use chnroutes::snapshot::SnapshotManager;
//!
//! fn main() -> anyhow::Result<()> {
//!     let snapshots = SnapshotManager::open("apnic.txt", "CN", false)?;
//!     let assets = DirAssets::new("templates");
//!
//!     let zip = pack(
//!         Platform::RouterOs,
//!         &assets,
//!         &snapshots.current(),
//!         &Gateway::parse("10.0.0.1"),
//!     )?;
//!     std::fs::write("routeros.zip", zip)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`registry`] - Delegation file parsing
//! - [`aggregator`] - CIDR merging and address counting
//! - [`snapshot`] - Atomically swapped registry snapshots
//! - [`watcher`] - File-change driven reloads
//! - [`template`] - Directive language for route templates
//! - [`generator`] - Template rendering against a snapshot
//! - [`platform`] - Platform table and bundle manifests
//! - [`archive`] - Zip bundle assembly
//! - [`service`] - Request-facing facade
//! - [`server`] - HTTP routes
//! - [`config`] - Configuration management

pub mod aggregator;
pub mod archive;
pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod platform;
pub mod registry;
pub mod server;
pub mod service;
pub mod signal;
pub mod snapshot;
pub mod template;
pub mod utils;
pub mod watcher;
