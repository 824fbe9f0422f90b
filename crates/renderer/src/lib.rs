//! Terrain rendering for isohypses wallpapers.
//!
//! Implements the raster pipeline:
//! - Elevation resampling and color ramps
//! - Hillshade (directional relief shading)
//! - Contour lines (marching squares)
//! - Compositing into an RGB buffer
//! - Generation metadata and PNG output

pub mod compositor;
pub mod contour;
pub mod gradient;
pub mod hillshade;
pub mod metadata;
pub mod png;

pub use compositor::{render_terrain, shade_terrain, RasterResult, RenderOptions, ShadedTerrain};
pub use metadata::{
    build_metadata, serialize_metadata, Clock, FixedClock, MetadataContext, MetadataMap,
    SystemClock,
};
