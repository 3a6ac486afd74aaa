//! Error types for atlas operations.
//!
//! Errors only exist on the configuration and loading seams. The view
//! pipeline itself is total and never fails.

use thiserror::Error;

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors that can occur while configuring or feeding the map.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The zoom extent is empty or not finite.
    #[error("Invalid zoom extent: min {min}, max {max}")]
    InvalidZoomExtent {
        /// Requested minimum scale.
        min: f64,
        /// Requested maximum scale.
        max: f64,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The compliance data source failed.
    #[error("Failed to load compliance data: {0}")]
    DataSource(String),

    /// No feature with the given id is loaded.
    #[error("Feature not found: {0}")]
    FeatureNotFound(String),
}
