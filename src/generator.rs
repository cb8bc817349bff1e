//! Artifact generation: template + snapshot + gateway -> bytes.

use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::assets::{read_template, AssetStore};
use crate::error::{Error, Result};
use crate::snapshot::RegistrySnapshot;
use crate::template::Template;

/// Gateway value callers pass to request client-side resolution.
pub const AUTO_GATEWAY: &str = "auto";

/// Placeholder emitted instead of a literal gateway for [`Gateway::Deferred`].
///
/// Generated scripts are expected to define `gateway` before the route lines
/// run, e.g. by reading the current default route.
pub const DEFERRED_PLACEHOLDER: &str = "$gateway";

/// Gateway substituted into generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gateway {
    /// Address or hostname embedded verbatim
    Literal(String),
    /// Resolved by the script on the client at run time
    Deferred,
}

impl Gateway {
    /// `"auto"` selects deferred resolution; anything else is a literal.
    pub fn parse(value: &str) -> Self {
        if value == AUTO_GATEWAY {
            Gateway::Deferred
        } else {
            Gateway::Literal(value.to_string())
        }
    }

    /// Text substituted for `{{gateway}}`.
    pub fn as_str(&self) -> &str {
        match self {
            Gateway::Literal(value) => value,
            Gateway::Deferred => DEFERRED_PLACEHOLDER,
        }
    }

    /// Value used in URLs, the inverse of [`Gateway::parse`].
    pub fn url_segment(&self) -> &str {
        match self {
            Gateway::Literal(value) => value,
            Gateway::Deferred => AUTO_GATEWAY,
        }
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_segment())
    }
}

/// Render the template at `template_path` against `snapshot`.
///
/// The template is read from `assets` on every call. Ranges are emitted in
/// snapshot order so unchanged input yields byte-identical output.
pub fn generate(
    assets: &dyn AssetStore,
    template_path: &Path,
    snapshot: &RegistrySnapshot,
    gateway: &Gateway,
) -> Result<Vec<u8>> {
    let source = read_template(assets, template_path)?;
    let template = Template::parse(&source).map_err(|source| Error::Template {
        path: template_path.to_path_buf(),
        source,
    })?;

    if template.uses_ranges() {
        debug!(
            "Rendering {} over {} ranges (gateway {})",
            template_path.display(),
            snapshot.len(),
            gateway
        );
    } else {
        debug!("Rendering {} (no range block)", template_path.display());
    }
    Ok(template.render(snapshot.ranges(), gateway))
}
