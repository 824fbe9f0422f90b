//! Common types shared by every isohypses-wallpaper crate.

pub mod bbox;
pub mod color;
pub mod error;
pub mod grid;
pub mod theme;

pub use bbox::{GeoBoundingBox, GeoPoint};
pub use color::{ColorSpec, Rgb};
pub use error::{WallpaperError, WallpaperResult};
pub use grid::{ElevationGrid, GeoTransform};
pub use theme::{Theme, ThemeRegistry};
