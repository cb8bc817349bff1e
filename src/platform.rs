//! Supported platforms and their bundle manifests.
//!
//! Dispatch is table-driven: each [`Platform`] owns a fixed list of
//! [`ManifestEntry`] values describing the files it serves and packs.
//! Adding a platform means adding a variant and its table, not new branches
//! in the generation or packaging code.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// File name under which a platform's bundle is served.
pub const BUNDLE_FILE: &str = "package.zip";

/// Where a manifest entry's bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Rendered from a template against the current snapshot
    Template,
    /// Copied verbatim (e.g. a binary helper DLL)
    Static,
}

/// One output file of a platform bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: &'static str,
    pub source: Source,
}

impl ManifestEntry {
    const fn template(name: &'static str) -> Self {
        Self {
            name,
            source: Source::Template,
        }
    }

    const fn copy(name: &'static str) -> Self {
        Self {
            name,
            source: Source::Static,
        }
    }

    /// Content type when the entry is downloaded on its own.
    pub fn content_type(&self) -> &'static str {
        match self.source {
            Source::Template => "text/plain; charset=utf-8",
            Source::Static => "application/octet-stream",
        }
    }
}

const WINDOWS: &[ManifestEntry] = &[
    ManifestEntry::copy("cmroute.dll"),
    ManifestEntry::template("routes-up.bat"),
    ManifestEntry::copy("routes-down.bat"),
    ManifestEntry::template("routes-up.txt"),
    ManifestEntry::template("routes-down.txt"),
];

const SHELL: &[ManifestEntry] = &[
    ManifestEntry::template("routes-up.sh"),
    ManifestEntry::template("routes-down.sh"),
];

const CHINADNS: &[ManifestEntry] = &[ManifestEntry::template("chnroute.txt")];

const ROUTEROS: &[ManifestEntry] = &[
    ManifestEntry::template("routeros-address-list.rsc"),
    ManifestEntry::template("routeros.rsc"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Android,
    Mac,
    ChinaDns,
    RouterOs,
    Windows,
}

impl Platform {
    /// All platforms, in listing order.
    pub const ALL: [Platform; 6] = [
        Platform::Linux,
        Platform::Android,
        Platform::Mac,
        Platform::ChinaDns,
        Platform::RouterOs,
        Platform::Windows,
    ];

    /// Identifier used in URLs and as the asset subdirectory.
    pub fn id(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Android => "android",
            Platform::Mac => "mac",
            Platform::ChinaDns => "chinadns",
            Platform::RouterOs => "routeros",
            Platform::Windows => "windows",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Linux => "Linux",
            Platform::Android => "Android",
            Platform::Mac => "macOS",
            Platform::ChinaDns => "ChinaDNS",
            Platform::RouterOs => "RouterOS",
            Platform::Windows => "Windows",
        }
    }

    /// Files that make up this platform's bundle, in archive order.
    pub fn manifest(self) -> &'static [ManifestEntry] {
        match self {
            Platform::Linux | Platform::Android | Platform::Mac => SHELL,
            Platform::ChinaDns => CHINADNS,
            Platform::RouterOs => ROUTEROS,
            Platform::Windows => WINDOWS,
        }
    }

    /// Look up a single downloadable file.
    pub fn entry(self, file: &str) -> Result<&'static ManifestEntry, Error> {
        self.manifest()
            .iter()
            .find(|entry| entry.name == file)
            .ok_or_else(|| Error::UnknownFile {
                platform: self.id().to_string(),
                file: file.to_string(),
            })
    }

    /// Asset path of a file, relative to the assets root.
    pub fn asset_path(self, file: &str) -> PathBuf {
        PathBuf::from(self.id()).join(file)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| Error::UnknownPlatform(s.to_string()))
    }
}
