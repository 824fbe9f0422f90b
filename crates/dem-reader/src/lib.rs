//! Elevation sources.
//!
//! A [`DemProvider`] hands back an [`ElevationGrid`] covering a requested
//! bounding box. Rendering never fetches data itself; callers obtain the
//! grid first and pass it on.
//!
//! The bundled provider reads ESRI ASCII grids (`.asc`), the plain-text
//! raster format most DEM portals export alongside GeoTIFF.

pub mod ascii;
pub mod error;

pub use ascii::{AsciiGrid, AsciiGridProvider};
pub use error::{DemError, DemResult};

use wallpaper_common::{ElevationGrid, GeoBoundingBox};

/// Area and target ground resolution to fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemRequest {
    pub bbox: GeoBoundingBox,
    /// Desired sample spacing in meters. Providers may ignore it.
    pub resolution_m: f64,
}

impl DemRequest {
    pub fn new(bbox: GeoBoundingBox, resolution_m: f64) -> Self {
        Self { bbox, resolution_m }
    }
}

/// Source of elevation data.
pub trait DemProvider: Send + Sync {
    /// Short label recorded in output metadata, e.g. `SRTM1`.
    fn source_name(&self) -> &str;

    /// Nominal sample spacing in meters.
    fn resolution_m(&self) -> f64;

    /// Elevation samples covering `request.bbox`.
    fn fetch(&self, request: &DemRequest) -> DemResult<ElevationGrid>;
}
