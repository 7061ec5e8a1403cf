//! Error types for the library.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur when loading settings or running the asset server.
///
/// The simulation core itself is total; only configuration and I/O fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings file or environment could not be read.
    #[error("Failed to load settings: {0}")]
    Config(#[from] config::ConfigError),

    /// A setting has a value outside its allowed range.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// A threshold rule is malformed.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// The asset server could not listen on its address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem or socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
