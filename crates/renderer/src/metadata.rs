//! Generation metadata attached to every wallpaper.
//!
//! Keys live under the `IsohypsesWallpaper:` namespace and are serialized as
//! `key=value` lines. Values are not escaped: a value containing a newline
//! or `=` cannot be told apart from the line structure when parsed back.
//!
//! `ContourColor` and `BackgroundColor` record the resolved colors, not the
//! text the user typed: every stop is written as lowercase `#rrggbb` and
//! gradient stops are joined by commas, so `white` is stored as `#ffffff`
//! and a theme name is stored as its colors.

use chrono::{DateTime, Utc};

use wallpaper_common::{ColorSpec, GeoBoundingBox, GeoPoint};

use crate::compositor::{RasterResult, RenderOptions};

/// Prefix of every metadata key.
pub const KEY_NAMESPACE: &str = "IsohypsesWallpaper";

/// Value of the `Generator` key.
pub const GENERATOR: &str = "isohypseswallpaper";

/// Version written when the caller does not supply one.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of the generation timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Everything the metadata describes about one render.
#[derive(Debug, Clone)]
pub struct MetadataContext {
    pub version: String,
    pub center: GeoPoint,
    pub zoom: i32,
    pub meters_per_pixel: f64,
    pub width_px: u32,
    pub height_px: u32,
    pub bbox: GeoBoundingBox,
    pub contour_interval_m: Option<f64>,
    pub contour_color: ColorSpec,
    pub background_color: ColorSpec,
    pub dem_source: String,
    pub dem_resolution_m: f64,
}

impl MetadataContext {
    /// Describe `result`, rendered with `options` from the named DEM.
    pub fn from_render(
        result: &RasterResult,
        options: &RenderOptions,
        dem_source: impl Into<String>,
        dem_resolution_m: f64,
    ) -> Self {
        Self {
            version: VERSION.to_string(),
            center: result.center,
            zoom: result.zoom,
            meters_per_pixel: result.meters_per_pixel,
            width_px: result.width,
            height_px: result.height,
            bbox: result.bbox,
            contour_interval_m: options.contour_interval,
            contour_color: options.contour_color.clone(),
            background_color: options.background.clone(),
            dem_source: dem_source.into(),
            dem_resolution_m,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Ordered key/value pairs with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: Vec<(String, String)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a value by full key (`IsohypsesWallpaper:Zoom`) or by the
    /// short name (`Zoom`).
    pub fn get(&self, key: &str) -> Option<&str> {
        let full = namespaced(key);
        self.entries
            .iter()
            .find(|(k, _)| k == key || *k == full)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn namespaced(name: &str) -> String {
    format!("{}:{}", KEY_NAMESPACE, name)
}

/// Assemble the metadata of one render, stamped with `clock`.
pub fn build_metadata(ctx: &MetadataContext, clock: &dyn Clock) -> MetadataMap {
    let bbox = &ctx.bbox;
    let contour_interval = match ctx.contour_interval_m {
        Some(interval) => interval.to_string(),
        None => "0".to_string(),
    };

    let mut map = MetadataMap::new();
    let mut put = |name: &str, value: String| map.insert(namespaced(name), value);

    put("Version", ctx.version.clone());
    put("Generator", GENERATOR.to_string());
    put("GeneratedAt", clock.now().format(TIMESTAMP_FORMAT).to_string());
    put("Latitude", format!("{:.6}", ctx.center.lat));
    put("Longitude", format!("{:.6}", ctx.center.lon));
    put("Zoom", ctx.zoom.to_string());
    put("MetersPerPixel", format!("{:.3}", ctx.meters_per_pixel));
    put("WidthPx", ctx.width_px.to_string());
    put("HeightPx", ctx.height_px.to_string());
    put(
        "BoundingBox",
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            bbox.lat_min, bbox.lat_max, bbox.lon_min, bbox.lon_max
        ),
    );
    put("ContourIntervalM", contour_interval);
    put("ContourColor", ctx.contour_color.to_string());
    put("BackgroundColor", ctx.background_color.to_string());
    put("DEMSource", ctx.dem_source.clone());
    put("DEMResolutionM", ctx.dem_resolution_m.to_string());

    map
}

/// Join the map as `key=value` lines in insertion order.
pub fn serialize_metadata(map: &MetadataMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split serialized metadata back into a map. Lines without `=` are
/// skipped; the first `=` separates key from value.
pub fn parse_metadata(text: &str) -> MetadataMap {
    let mut map = MetadataMap::new();
    for line in text.lines() {
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key, value);
        }
    }
    map
}
