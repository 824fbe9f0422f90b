//! Isohypses wallpaper generator.
//!
//! Wires the pipeline together: screen size and colors are resolved from
//! presets and themes, elevation comes from a [`dem_reader::DemProvider`],
//! and each wallpaper is rendered, written as PNG and tagged with its
//! generation metadata.

pub mod config;
pub mod pipeline;

pub use config::{
    load_themes, resolve_colors, resolve_targets, screen_preset, RenderTarget, SCREEN_PRESETS,
};
pub use pipeline::{run_job, run_jobs, JobReport, WallpaperJob};
