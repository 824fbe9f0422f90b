//! Isohypses wallpaper generator.
//!
//! Renders hillshaded terrain with contour lines around a center point and
//! writes it as a PNG carrying the generation parameters.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dem_reader::AsciiGridProvider;
use renderer::{RenderOptions, SystemClock};
use wallpaper_cli::config::{load_themes, resolve_colors, resolve_targets, SCREEN_PRESETS};
use wallpaper_cli::pipeline::{run_jobs, WallpaperJob};
use wallpaper_common::GeoPoint;

#[derive(Parser, Debug)]
#[command(name = "isohypses-wallpaper")]
#[command(about = "Generate a desktop wallpaper from topographic contours")]
#[command(version)]
struct Args {
    /// Latitude of the center
    #[arg(long, allow_negative_numbers = true, required_unless_present_any = ["list_themes", "list_presets"])]
    lat: Option<f64>,

    /// Longitude of the center
    #[arg(long, allow_negative_numbers = true, required_unless_present_any = ["list_themes", "list_presets"])]
    lon: Option<f64>,

    /// Web Mercator zoom level
    #[arg(long, required_unless_present_any = ["list_themes", "list_presets"])]
    zoom: Option<i32>,

    /// Screen width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Screen height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Screen preset (repeat to render several sizes)
    #[arg(long = "preset")]
    presets: Vec<String>,

    /// Contour interval in meters (no contours when omitted)
    #[arg(long)]
    contour: Option<f64>,

    /// Background color: #rrggbb, #rgb, a name, or a comma-separated gradient
    #[arg(long)]
    bgcolor: Option<String>,

    /// Contour line color: #rrggbb, #rgb, a name, or a comma-separated gradient
    #[arg(long)]
    contour_color: Option<String>,

    /// Named color theme
    #[arg(long, env = "WALLPAPER_THEME")]
    theme: Option<String>,

    /// YAML or JSON file with additional themes
    #[arg(long, env = "WALLPAPER_THEME_FILE")]
    theme_file: Option<PathBuf>,

    /// Print the available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Print the screen presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Elevation grid in ESRI ASCII format
    #[arg(long, env = "DEM_PATH", required_unless_present_any = ["list_themes", "list_presets"])]
    dem: Option<PathBuf>,

    /// DEM name recorded in the metadata
    #[arg(long, default_value = "SRTM1")]
    dem_source: String,

    /// DEM resolution in meters recorded in the metadata (default: from the grid)
    #[arg(long)]
    dem_resolution: Option<f64>,

    /// Contour line width in pixels
    #[arg(long, default_value = "0.7")]
    line_width: f32,

    /// Contour smoothing passes
    #[arg(long, default_value = "1")]
    smoothing: u32,

    /// Output PNG file path
    #[arg(short, long, default_value = "wallpaper.png")]
    output: PathBuf,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    if args.list_presets {
        for (name, width, height) in SCREEN_PRESETS {
            println!("{:<10} {}x{}", name, width, height);
        }
    }

    let themes = load_themes(args.theme_file.as_deref())?;
    if args.list_themes {
        for name in themes.names() {
            println!("{}", name);
        }
    }
    if args.list_presets || args.list_themes {
        return Ok(());
    }

    let (lat, lon, zoom) = match (args.lat, args.lon, args.zoom) {
        (Some(lat), Some(lon), Some(zoom)) => (lat, lon, zoom),
        _ => bail!("--lat, --lon and --zoom are required"),
    };
    let dem_path = args.dem.as_ref().context("--dem is required")?;

    let targets = resolve_targets(&args.presets, args.width, args.height, &args.output)?;
    let (background, contour_color) = resolve_colors(
        &themes,
        args.theme.as_deref(),
        args.bgcolor.as_deref(),
        args.contour_color.as_deref(),
    )?;

    info!(
        lat,
        lon,
        zoom,
        targets = targets.len(),
        theme = args.theme.as_deref().unwrap_or("none"),
        "Starting isohypses wallpaper generator"
    );

    let mut provider = AsciiGridProvider::open(dem_path, args.dem_source.clone())
        .with_context(|| format!("Failed to read DEM {}", dem_path.display()))?;
    if let Some(resolution) = args.dem_resolution {
        provider = provider.with_resolution(resolution);
    }

    let center = GeoPoint::new(lat, lon);
    let jobs: Vec<WallpaperJob> = targets
        .into_iter()
        .map(|target| WallpaperJob {
            center,
            zoom,
            options: RenderOptions::new(target.width, target.height)
                .with_contour_interval(args.contour)
                .with_background(background.clone())
                .with_contour_color(contour_color.clone())
                .with_line_width(args.line_width)
                .with_smoothing_passes(args.smoothing),
            output: target.output,
        })
        .collect();

    let mut failures = 0;
    for result in run_jobs(&jobs, &provider, &SystemClock) {
        match result {
            Ok(report) => println!("Wallpaper saved to {}", report.output.display()),
            Err(e) => {
                warn!("Wallpaper failed: {:#}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} wallpapers failed", failures, jobs.len());
    }

    Ok(())
}
