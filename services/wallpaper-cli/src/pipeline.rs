//! One wallpaper from center point to tagged PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use dem_reader::{DemProvider, DemRequest};
use projection::{bounding_box, extent_meters, meters_per_pixel};
use renderer::metadata::VERSION;
use renderer::png::{embed_metadata, write_png};
use renderer::{build_metadata, render_terrain, Clock, MetadataContext, RenderOptions};
use wallpaper_common::{GeoBoundingBox, GeoPoint, WallpaperError};

/// Everything needed to produce one wallpaper file.
#[derive(Debug, Clone)]
pub struct WallpaperJob {
    pub center: GeoPoint,
    pub zoom: i32,
    pub options: RenderOptions,
    pub output: PathBuf,
}

/// What was written.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub output: PathBuf,
    pub meters_per_pixel: f64,
    pub bbox: GeoBoundingBox,
    pub contour_levels: usize,
}

/// Fetch elevation for `job`, render it, write the PNG and embed metadata.
pub fn run_job(job: &WallpaperJob, provider: &dyn DemProvider, clock: &dyn Clock) -> Result<JobReport> {
    let options = &job.options;
    options.validate()?;

    let mpp = meters_per_pixel(job.center.lat, job.zoom)?;
    let (width_m, height_m) = extent_meters(job.center.lat, job.zoom, options.width, options.height)?;
    let bbox = bounding_box(job.center.lat, job.center.lon, width_m, height_m);
    debug!(mpp, width_m, height_m, bbox = %bbox, "Computed wallpaper extent");

    let request = DemRequest::new(bbox, provider.resolution_m());
    let grid = provider
        .fetch(&request)
        .map_err(WallpaperError::from)
        .with_context(|| format!("Failed to load elevation from {}", provider.source_name()))?;
    debug!(width = grid.width(), height = grid.height(), "Fetched elevation grid");

    let raster = render_terrain(&grid, options, job.center, job.zoom)?;

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write_png(&job.output, &raster)
        .with_context(|| format!("Failed to write {}", job.output.display()))?;

    let ctx = MetadataContext::from_render(&raster, options, provider.source_name(), provider.resolution_m());
    let metadata = build_metadata(&ctx, clock);
    embed_metadata(&job.output, &metadata, VERSION)
        .with_context(|| format!("Failed to embed metadata into {}", job.output.display()))?;

    info!(
        output = %job.output.display(),
        width = options.width,
        height = options.height,
        levels = raster.contour_levels.len(),
        "Wallpaper written"
    );

    Ok(JobReport {
        output: job.output.clone(),
        meters_per_pixel: raster.meters_per_pixel,
        bbox: raster.bbox,
        contour_levels: raster.contour_levels.len(),
    })
}

/// Run independent jobs in parallel, one result per job in input order.
pub fn run_jobs(jobs: &[WallpaperJob], provider: &dyn DemProvider, clock: &dyn Clock) -> Vec<Result<JobReport>> {
    jobs.par_iter()
        .map(|job| run_job(job, provider, clock))
        .collect()
}
