//! Ground resolution and geodesic geometry.
//!
//! Web Mercator scale convention plus a WGS84 forward geodesic solver used
//! to turn a center point and a ground extent into a bounding box.

pub mod geodesic;
pub mod scale;

pub use geodesic::{bounding_box, destination, offset_point, Ellipsoid, WGS84};
pub use scale::{extent_meters, meters_per_pixel, WEB_MERCATOR_INITIAL_RESOLUTION};
