//! Error types for DEM access.

use thiserror::Error;
use wallpaper_common::WallpaperError;

/// Result type for DEM operations.
pub type DemResult<T> = Result<T, DemError>;

/// Failures of an elevation source.
#[derive(Error, Debug)]
pub enum DemError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed header or sample
    #[error("Invalid DEM format: {0}")]
    Parse(String),

    /// Requested area does not overlap the dataset
    #[error("Requested area is outside the DEM extent: {0}")]
    OutOfBounds(String),

    /// Window contains no valid elevation samples
    #[error("No valid elevation samples in window: {0}")]
    Empty(String),
}

impl From<DemError> for WallpaperError {
    fn from(err: DemError) -> Self {
        WallpaperError::Dem(err.to_string())
    }
}
