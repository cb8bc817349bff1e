//! Request-facing facade over snapshots, generation and packaging.

use serde::Serialize;
use std::sync::Arc;

use crate::archive::pack;
use crate::assets::{read_asset, AssetStore};
use crate::error::Result;
use crate::generator::{generate, Gateway};
use crate::platform::{Platform, Source, BUNDLE_FILE};
use crate::snapshot::SnapshotManager;

/// Content type of a platform bundle.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Bytes ready to be returned to a client.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// One downloadable file in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingItem {
    pub platform: &'static str,
    pub url: String,
    pub file_name: &'static str,
}

/// Download links for one gateway, optionally narrowed to one platform.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// Empty when the gateway is deferred
    pub gateway: String,
    /// Platform id, or "all"
    pub platform: String,
    pub items: Vec<ListingItem>,
}

/// Shared handle used by every request.
#[derive(Clone)]
pub struct RouteService {
    snapshots: Arc<SnapshotManager>,
    assets: Arc<dyn AssetStore>,
}

impl RouteService {
    pub fn new(snapshots: Arc<SnapshotManager>, assets: Arc<dyn AssetStore>) -> Self {
        Self { snapshots, assets }
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    /// Produce a single file, or the bundle when `file` is `package.zip`.
    ///
    /// The snapshot is taken once, so the whole response reflects a single
    /// registry state even if a reload lands mid-request.
    pub fn file(&self, platform: Platform, file: &str, gateway: &Gateway) -> Result<Artifact> {
        if file == BUNDLE_FILE {
            return self.bundle(platform, gateway);
        }

        let entry = platform.entry(file)?;
        let path = platform.asset_path(entry.name);
        let bytes = match entry.source {
            Source::Template => {
                let snapshot = self.snapshots.current();
                generate(self.assets.as_ref(), &path, &snapshot, gateway)?
            }
            Source::Static => read_asset(self.assets.as_ref(), &path)?,
        };

        Ok(Artifact {
            file_name: entry.name.to_string(),
            content_type: entry.content_type(),
            bytes,
        })
    }

    /// Produce the zip bundle for a platform.
    pub fn bundle(&self, platform: Platform, gateway: &Gateway) -> Result<Artifact> {
        let snapshot = self.snapshots.current();
        let bytes = pack(platform, self.assets.as_ref(), &snapshot, gateway)?;
        Ok(Artifact {
            file_name: BUNDLE_FILE.to_string(),
            content_type: ZIP_CONTENT_TYPE,
            bytes,
        })
    }

    /// Download links for `gateway`; `None` lists every platform.
    pub fn listing(&self, gateway: &Gateway, platform: Option<Platform>) -> Listing {
        listing(gateway, platform)
    }
}

/// Build the download listing without touching any snapshot.
pub fn listing(gateway: &Gateway, platform: Option<Platform>) -> Listing {
    let platforms: Vec<Platform> = match platform {
        Some(p) => vec![p],
        None => Platform::ALL.to_vec(),
    };

    let items = platforms
        .into_iter()
        .flat_map(|p| {
            p.manifest()
                .iter()
                .map(|entry| entry.name)
                .chain(std::iter::once(BUNDLE_FILE))
                .map(move |name| ListingItem {
                    platform: p.display_name(),
                    url: format!("/f/{}/{}/{}", gateway.url_segment(), p.id(), name),
                    file_name: name,
                })
        })
        .collect();

    Listing {
        gateway: match gateway {
            Gateway::Literal(value) => value.clone(),
            Gateway::Deferred => String::new(),
        },
        platform: platform.map_or_else(|| "all".to_string(), |p| p.id().to_string()),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_single_platform() {
        let listing = listing(&Gateway::parse("10.0.0.1"), Some(Platform::RouterOs));
        assert_eq!(listing.platform, "routeros");
        assert_eq!(listing.gateway, "10.0.0.1");
        let urls: Vec<&str> = listing.items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/f/10.0.0.1/routeros/routeros-address-list.rsc",
                "/f/10.0.0.1/routeros/routeros.rsc",
                "/f/10.0.0.1/routeros/package.zip",
            ]
        );
        assert!(listing.items.iter().all(|i| i.platform == "RouterOS"));
    }

    #[test]
    fn test_listing_all_platforms_deferred() {
        let listing = listing(&Gateway::Deferred, None);
        assert_eq!(listing.platform, "all");
        assert_eq!(listing.gateway, "");
        // Every manifest entry plus one bundle per platform
        let expected: usize = Platform::ALL.iter().map(|p| p.manifest().len() + 1).sum();
        assert_eq!(listing.items.len(), expected);
        assert!(listing.items.iter().all(|i| i.url.starts_with("/f/auto/")));
        assert_eq!(
            listing.items.iter().filter(|i| i.file_name == BUNDLE_FILE).count(),
            Platform::ALL.len()
        );
    }

    #[test]
    fn test_listing_serializes() {
        let listing = listing(&Gateway::Deferred, Some(Platform::ChinaDns));
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["platform"], "chinadns");
        assert_eq!(json["items"][0]["file_name"], "chnroute.txt");
        assert_eq!(json["items"][0]["platform"], "ChinaDNS");
    }
}
