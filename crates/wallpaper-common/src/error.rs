//! Error types for the wallpaper pipeline.

use thiserror::Error;

/// Result type alias using WallpaperError.
pub type WallpaperResult<T> = Result<T, WallpaperError>;

/// Primary error type for rendering and its collaborators.
#[derive(Debug, Error)]
pub enum WallpaperError {
    // === Caller errors (fail fast, nothing computed) ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid color specification: {0}")]
    InvalidColor(String),

    #[error("Unknown theme '{name}'. Available themes: {available}")]
    ThemeNotFound { name: String, available: String },

    #[error("Invalid theme configuration: {0}")]
    ThemeConfig(String),

    // === External failures (propagated as-is) ===
    #[error("DEM provider failed: {0}")]
    Dem(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}

impl WallpaperError {
    /// Whether the error was caused by bad caller input rather than a
    /// failing collaborator.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            WallpaperError::InvalidArgument(_)
                | WallpaperError::InvalidColor(_)
                | WallpaperError::ThemeNotFound { .. }
                | WallpaperError::ThemeConfig(_)
        )
    }
}

impl From<std::io::Error> for WallpaperError {
    fn from(err: std::io::Error) -> Self {
        WallpaperError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WallpaperError {
    fn from(err: serde_json::Error) -> Self {
        WallpaperError::ThemeConfig(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for WallpaperError {
    fn from(err: serde_yaml::Error) -> Self {
        WallpaperError::ThemeConfig(format!("YAML error: {}", err))
    }
}
