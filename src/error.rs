//! Errors for the parts of the renderer that touch the outside world
//!
//! Rendering itself never fails; only loading configuration and exporting
//! frames do.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be written.
    #[error("failed to write config {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),

    /// Parsed fine but the values make no sense.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("screenshot export failed: {0}")]
    Screenshot(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
