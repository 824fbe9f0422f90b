//! Geographic point and bounding box types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A latitude/longitude rectangle in degrees.
///
/// Built from two opposite corners so the minimum is never greater than
/// the maximum on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBoundingBox {
    /// Create a bounding box from two opposite corners, in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            lat_min: a.lat.min(b.lat),
            lat_max: a.lat.max(b.lat),
            lon_min: a.lon.min(b.lon),
            lon_max: a.lon.max(b.lon),
        }
    }

    /// North-east corner.
    pub fn north_east(&self) -> GeoPoint {
        GeoPoint::new(self.lat_max, self.lon_max)
    }

    /// South-west corner.
    pub fn south_west(&self) -> GeoPoint {
        GeoPoint::new(self.lat_min, self.lon_min)
    }

    /// Midpoint of both axes.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// True when either span is zero.
    pub fn is_degenerate(&self) -> bool {
        self.lat_span() <= 0.0 || self.lon_span() <= 0.0
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lon >= self.lon_min
            && point.lon <= self.lon_max
    }
}

/// `lat_min,lat_max,lon_min,lon_max`, six decimals each.
impl fmt::Display for GeoBoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_orders_axes() {
        let bbox = GeoBoundingBox::from_corners(
            GeoPoint::new(42.1, 12.3),
            GeoPoint::new(41.9, 11.7),
        );
        assert_eq!(bbox.lat_min, 41.9);
        assert_eq!(bbox.lat_max, 42.1);
        assert_eq!(bbox.lon_min, 11.7);
        assert_eq!(bbox.lon_max, 12.3);
    }

    #[test]
    fn test_display_format() {
        let bbox = GeoBoundingBox {
            lat_min: 41.861448,
            lat_max: 42.137605,
            lon_min: 11.671616,
            lon_max: 12.329808,
        };
        assert_eq!(bbox.to_string(), "41.861448,42.137605,11.671616,12.329808");
    }

    #[test]
    fn test_degenerate() {
        let p = GeoPoint::new(10.0, 20.0);
        let bbox = GeoBoundingBox::from_corners(p, p);
        assert!(bbox.is_degenerate());
        assert_eq!(bbox.center(), p);
    }
}
