//! Terrain raster compositor.
//!
//! Turns an elevation grid into a wallpaper: resample to the target size,
//! normalize, hillshade, tint with the background color, then stroke contour
//! lines on top.

use tiny_skia::Pixmap;
use tracing::debug;

use projection::{bounding_box, extent_meters, meters_per_pixel};
use wallpaper_common::{
    grid, ColorSpec, ElevationGrid, GeoBoundingBox, GeoPoint, Rgb, WallpaperError,
    WallpaperResult,
};

use crate::contour::{
    contour_level_count, draw_contours, generate_all_contours, generate_contour_levels,
    MAX_CONTOUR_LEVELS,
};
use crate::gradient::{normalize, quantize, resample_grid, resolve_color, sample_color, NORMALIZE_EPSILON};
use crate::hillshade::{hillshade, HillshadeParams};

/// Default background, a dark neutral grey.
pub const DEFAULT_BACKGROUND: Rgb = Rgb::from_u32(0x2a2a2a);

/// Default contour color.
pub const DEFAULT_CONTOUR: Rgb = Rgb::from_u32(0xffffff);

/// Styling and size of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Elevation spacing between contour lines in meters. `None` draws no
    /// contours.
    pub contour_interval: Option<f64>,
    pub background: ColorSpec,
    pub contour_color: ColorSpec,
    pub light: HillshadeParams,
    /// Contour stroke width in pixels
    pub line_width: f32,
    /// Chaikin smoothing passes applied to every contour line
    pub smoothing_passes: u32,
}

impl RenderOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            contour_interval: None,
            background: ColorSpec::Solid(DEFAULT_BACKGROUND),
            contour_color: ColorSpec::Solid(DEFAULT_CONTOUR),
            light: HillshadeParams::default(),
            line_width: 0.7,
            smoothing_passes: 1,
        }
    }

    pub fn with_contour_interval(mut self, interval: Option<f64>) -> Self {
        self.contour_interval = interval;
        self
    }

    pub fn with_background(mut self, background: ColorSpec) -> Self {
        self.background = background;
        self
    }

    pub fn with_contour_color(mut self, contour_color: ColorSpec) -> Self {
        self.contour_color = contour_color;
        self
    }

    pub fn with_light(mut self, light: HillshadeParams) -> Self {
        self.light = light;
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_smoothing_passes(mut self, passes: u32) -> Self {
        self.smoothing_passes = passes;
        self
    }

    /// Check sizes, interval and stroke before any work is done.
    pub fn validate(&self) -> WallpaperResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WallpaperError::InvalidArgument(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(interval) = self.contour_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(WallpaperError::InvalidArgument(format!(
                    "contour interval must be a positive number of meters, got {}",
                    interval
                )));
            }
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(WallpaperError::InvalidArgument(format!(
                "line width must be positive, got {}",
                self.line_width
            )));
        }
        if self.background.colors().is_empty() || self.contour_color.colors().is_empty() {
            return Err(WallpaperError::InvalidColor("empty gradient".to_string()));
        }
        Ok(())
    }
}

/// Resampled elevation and its shaded base image, before contours.
#[derive(Debug, Clone)]
pub struct ShadedTerrain {
    pub width: usize,
    pub height: usize,
    /// Resampled elevations, row-major
    pub elevation: Vec<f32>,
    /// Elevations scaled to `[0, 1]`
    pub normalized: Vec<f32>,
    /// Hillshade intensity in `[0, 1]`
    pub intensity: Vec<f32>,
    /// Background tinted by the hillshade, channels in `[0, 1]`
    pub composite: Vec<[f32; 3]>,
    pub elevation_range: (f32, f32),
}

impl ShadedTerrain {
    /// Quantized RGB8 buffer of the composite.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.composite
            .iter()
            .flat_map(|c| [quantize(c[0]), quantize(c[1]), quantize(c[2])])
            .collect()
    }
}

/// Finished wallpaper raster and the facts needed to describe it.
#[derive(Debug, Clone)]
pub struct RasterResult {
    /// RGB8 pixels, row-major, `height * width * 3` bytes
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub center: GeoPoint,
    pub zoom: i32,
    pub meters_per_pixel: f64,
    pub bbox: GeoBoundingBox,
    /// Contour levels that were traced, ascending
    pub contour_levels: Vec<f32>,
    /// Min and max of the resampled elevation
    pub elevation_range: (f32, f32),
}

impl RasterResult {
    /// RGB of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }
}

/// Resample, normalize, hillshade and tint `grid` (everything except the
/// contour overlay).
pub fn shade_terrain(grid: &ElevationGrid, options: &RenderOptions) -> WallpaperResult<ShadedTerrain> {
    options.validate()?;

    let width = options.width as usize;
    let height = options.height as usize;

    let elevation = resample_grid(grid.data(), grid.width(), grid.height(), width, height);
    debug!(
        src_width = grid.width(),
        src_height = grid.height(),
        width,
        height,
        "Resampled elevation grid"
    );

    let (min_val, max_val) = grid::min_max(&elevation).ok_or_else(|| {
        WallpaperError::InvalidArgument("elevation grid has no valid samples".to_string())
    })?;
    debug!(min = min_val, max = max_val, "Elevation range");

    let normalized = normalize(&elevation, min_val, max_val);
    let intensity = hillshade(&elevation, width, height, &options.light);
    let background = resolve_color(&options.background, &normalized);

    let composite = background
        .iter()
        .zip(&intensity)
        .map(|(c, &i)| [c[0] * i, c[1] * i, c[2] * i])
        .collect();

    Ok(ShadedTerrain {
        width,
        height,
        elevation,
        normalized,
        intensity,
        composite,
        elevation_range: (min_val, max_val),
    })
}

/// Render `grid` into a finished wallpaper centered on `center` at `zoom`.
///
/// Scale and bounding box are resolved first so that invalid arguments fail
/// before any raster work.
pub fn render_terrain(
    grid: &ElevationGrid,
    options: &RenderOptions,
    center: GeoPoint,
    zoom: i32,
) -> WallpaperResult<RasterResult> {
    options.validate()?;

    let mpp = meters_per_pixel(center.lat, zoom)?;
    let (width_m, height_m) = extent_meters(center.lat, zoom, options.width, options.height)?;
    let bbox = bounding_box(center.lat, center.lon, width_m, height_m);
    debug!(mpp, width_m, height_m, bbox = %bbox, "Resolved wallpaper extent");

    let shaded = shade_terrain(grid, options)?;
    let (min_val, max_val) = shaded.elevation_range;

    let levels = match options.contour_interval {
        Some(interval) => {
            let count = contour_level_count(min_val, max_val, interval);
            if count > MAX_CONTOUR_LEVELS {
                return Err(WallpaperError::InvalidArgument(format!(
                    "contour interval {} m yields {} levels over {}..{} m, at most {} allowed",
                    interval, count, min_val, max_val, MAX_CONTOUR_LEVELS
                )));
            }
            generate_contour_levels(min_val, max_val, interval)
        }
        None => Vec::new(),
    };

    let pixels = if levels.is_empty() {
        shaded.to_rgb8()
    } else {
        let mut pixmap = Pixmap::new(options.width, options.height).ok_or_else(|| {
            WallpaperError::InvalidArgument(format!(
                "cannot allocate a {}x{} canvas",
                options.width, options.height
            ))
        })?;
        for (dst, c) in pixmap.data_mut().chunks_exact_mut(4).zip(&shaded.composite) {
            dst[0] = quantize(c[0]);
            dst[1] = quantize(c[1]);
            dst[2] = quantize(c[2]);
            dst[3] = 255;
        }

        let contours = generate_all_contours(
            &shaded.elevation,
            shaded.width,
            shaded.height,
            &levels,
            options.smoothing_passes,
        );
        debug!(levels = levels.len(), lines = contours.len(), "Generated contours");

        let range = max_val - min_val + NORMALIZE_EPSILON;
        let contour_spec = &options.contour_color;
        draw_contours(&mut pixmap, &contours, options.line_width, |level| {
            let [r, g, b] = sample_color(contour_spec, (level - min_val) / range);
            Rgb::new(quantize(r), quantize(g), quantize(b))
        });

        // Every pixel is opaque, so the premultiplied channels are the
        // straight ones.
        pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    };

    Ok(RasterResult {
        pixels,
        width: options.width,
        height: options.height,
        center,
        zoom,
        meters_per_pixel: mpp,
        bbox,
        contour_levels: levels,
        elevation_range: (min_val, max_val),
    })
}
