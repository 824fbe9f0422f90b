//! Web Mercator ground resolution.

use wallpaper_common::{WallpaperError, WallpaperResult};

/// Meters per pixel at zoom level 0 on the equator.
pub const WEB_MERCATOR_INITIAL_RESOLUTION: f64 = 156543.03392804097;

/// Ground resolution (meters per pixel) at a latitude and zoom level.
///
/// Halves with every zoom level and shrinks with the cosine of the latitude.
pub fn meters_per_pixel(latitude_deg: f64, zoom: i32) -> WallpaperResult<f64> {
    if zoom < 0 {
        return Err(WallpaperError::InvalidArgument(format!(
            "zoom level must be non-negative, got {}",
            zoom
        )));
    }

    let latitude_rad = latitude_deg.to_radians();
    Ok(WEB_MERCATOR_INITIAL_RESOLUTION * latitude_rad.cos() / 2f64.powi(zoom))
}

/// Real-world `(width, height)` in meters of an image of the given pixel size.
pub fn extent_meters(
    latitude_deg: f64,
    zoom: i32,
    width_px: u32,
    height_px: u32,
) -> WallpaperResult<(f64, f64)> {
    if width_px == 0 || height_px == 0 {
        return Err(WallpaperError::InvalidArgument(format!(
            "image dimensions must be positive, got {}x{}",
            width_px, height_px
        )));
    }

    let mpp = meters_per_pixel(latitude_deg, zoom)?;
    Ok((width_px as f64 * mpp, height_px as f64 * mpp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_constant() {
        assert_eq!(meters_per_pixel(0.0, 0).unwrap(), WEB_MERCATOR_INITIAL_RESOLUTION);
    }

    #[test]
    fn test_negative_zoom() {
        assert!(matches!(
            meters_per_pixel(45.0, -1),
            Err(WallpaperError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_extent_zero_dimension() {
        assert!(extent_meters(0.0, 10, 0, 100).is_err());
        assert!(extent_meters(0.0, 10, 100, 0).is_err());
    }
}
