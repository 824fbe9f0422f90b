//! Elevation grid and its geographic transform.

use serde::{Deserialize, Serialize};

use crate::bbox::{GeoBoundingBox, GeoPoint};
use crate::error::{WallpaperError, WallpaperResult};

/// Affine placement of a north-up grid: the top-left corner of the top-left
/// cell plus the per-cell size in degrees.
///
/// `pixel_height` is negative for rows running north to south.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_lon: f64, origin_lat: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_lon,
            origin_lat,
            pixel_width,
            pixel_height,
        }
    }

    /// Placeholder transform for grids with no geographic placement
    /// (synthetic data, tests).
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }

    /// Geographic position of the top-left corner of cell (col, row).
    pub fn cell_corner(&self, col: usize, row: usize) -> GeoPoint {
        GeoPoint::new(
            self.origin_lat + row as f64 * self.pixel_height,
            self.origin_lon + col as f64 * self.pixel_width,
        )
    }

    /// Extent covered by a grid of `width` x `height` cells.
    pub fn extent(&self, width: usize, height: usize) -> GeoBoundingBox {
        GeoBoundingBox::from_corners(self.cell_corner(0, 0), self.cell_corner(width, height))
    }
}

/// Row-major elevation samples, rows north to south and columns west to east.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    data: Vec<f32>,
    width: usize,
    height: usize,
    transform: GeoTransform,
}

impl ElevationGrid {
    /// Wrap row-major samples. Fails when the dimensions are zero or do not
    /// match the sample count.
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        transform: GeoTransform,
    ) -> WallpaperResult<Self> {
        if width == 0 || height == 0 {
            return Err(WallpaperError::InvalidArgument(format!(
                "elevation grid must not be empty ({}x{})",
                width, height
            )));
        }
        if data.len() != width * height {
            return Err(WallpaperError::InvalidArgument(format!(
                "elevation grid has {} samples, expected {}x{}={}",
                data.len(),
                width,
                height,
                width * height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            transform,
        })
    }

    /// Build a grid from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f32>], transform: GeoTransform) -> WallpaperResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return Err(WallpaperError::InvalidArgument(
                "elevation rows have differing lengths".to_string(),
            ));
        }
        let data = rows.iter().flatten().copied().collect();
        Self::new(data, width, height, transform)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// Minimum and maximum of the non-NaN samples, `None` if there are none.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        min_max(&self.data)
    }

    /// Geographic extent covered by the grid.
    pub fn extent(&self) -> GeoBoundingBox {
        self.transform.extent(self.width, self.height)
    }
}

/// Minimum and maximum of the non-NaN values of a slice.
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
