//! Error types for chnroutes.

use std::path::PathBuf;
use thiserror::Error;

use crate::template::TemplateError;

/// Request-level failures while generating or packaging artifacts.
///
/// None of these are fatal to the process: the HTTP layer maps each one to
/// a failed response for the request that caused it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unknown file '{file}' for platform {platform}")]
    UnknownFile { platform: String, file: String },

    #[error("Template error in {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the failure means "the requested thing does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::AssetNotFound(_) | Error::UnknownPlatform(_) | Error::UnknownFile { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
