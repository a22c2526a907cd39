//! Error types for quadcluster.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuadclusterError>;

#[derive(Error, Debug)]
pub enum QuadclusterError {
    /// Latitude/longitude outside the accepted range, or a tile outside its grid
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Zoom level outside `[0, MAX_ZOOM]`, or finer than the storage resolution
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(String),

    /// Malformed quadkey
    #[error("Invalid quadkey: {0}")]
    InvalidQuadKey(String),

    /// Failure reported by a tile count source, passed through untouched
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuadclusterError {
    /// Wrap an error raised by a storage collaborator.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage(err.into())
    }
}
