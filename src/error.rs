//! Error types for the fallible edges of the crate.
//!
//! The per-frame path (`handle_events`, `update`, `draw`) never fails; these
//! only come out of resource conversion and configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errori che possono verificarsi durante la conversione di immagini
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid target dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
