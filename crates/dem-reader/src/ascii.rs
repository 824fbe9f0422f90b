//! ESRI ASCII grid reader.
//!
//! Header keywords (case-insensitive) precede the samples:
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     11.0
//! yllcorner     42.0
//! cellsize      0.25
//! NODATA_value  -9999
//! ```
//!
//! `xllcenter`/`yllcenter` are accepted in place of the corner keywords.
//! Samples follow row by row, north to south.

use std::path::Path;

use tracing::{debug, warn};
use wallpaper_common::{ElevationGrid, GeoBoundingBox, GeoTransform};

use crate::error::{DemError, DemResult};
use crate::{DemProvider, DemRequest};

/// Approximate meters per degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// A whole ASCII grid held in memory.
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    ncols: usize,
    nrows: usize,
    cellsize: f64,
    transform: GeoTransform,
    nodata: Option<f32>,
    data: Vec<f32>,
}

#[derive(Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<(f64, bool)>,
    yll: Option<(f64, bool)>,
    cellsize: Option<f64>,
    nodata: Option<f32>,
}

fn parse_value<T: std::str::FromStr>(key: &str, value: Option<&str>) -> DemResult<T> {
    let value = value.ok_or_else(|| DemError::Parse(format!("missing value for '{}'", key)))?;
    value
        .parse()
        .map_err(|_| DemError::Parse(format!("invalid value '{}' for '{}'", value, key)))
}

impl AsciiGrid {
    /// Parse grid text.
    pub fn parse(text: &str) -> DemResult<Self> {
        let mut tokens = text.split_whitespace().peekable();
        let mut header = Header::default();

        while let Some(&token) = tokens.peek() {
            if !token.starts_with(|c: char| c.is_ascii_alphabetic()) {
                break;
            }
            tokens.next();
            let key = token.to_ascii_lowercase();
            let value = tokens.next();
            match key.as_str() {
                "ncols" => header.ncols = Some(parse_value(&key, value)?),
                "nrows" => header.nrows = Some(parse_value(&key, value)?),
                "xllcorner" => header.xll = Some((parse_value(&key, value)?, false)),
                "xllcenter" => header.xll = Some((parse_value(&key, value)?, true)),
                "yllcorner" => header.yll = Some((parse_value(&key, value)?, false)),
                "yllcenter" => header.yll = Some((parse_value(&key, value)?, true)),
                "cellsize" => header.cellsize = Some(parse_value(&key, value)?),
                "nodata_value" => header.nodata = Some(parse_value(&key, value)?),
                other => {
                    return Err(DemError::Parse(format!("unknown header keyword '{}'", other)));
                }
            }
        }

        let missing = |name: &str| DemError::Parse(format!("missing header keyword '{}'", name));
        let ncols = header.ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = header.nrows.ok_or_else(|| missing("nrows"))?;
        let (xll, x_is_center) = header.xll.ok_or_else(|| missing("xllcorner"))?;
        let (yll, y_is_center) = header.yll.ok_or_else(|| missing("yllcorner"))?;
        let cellsize = header.cellsize.ok_or_else(|| missing("cellsize"))?;

        if ncols == 0 || nrows == 0 {
            return Err(DemError::Parse(format!("empty grid {}x{}", ncols, nrows)));
        }
        if cellsize.is_nan() || cellsize <= 0.0 {
            return Err(DemError::Parse(format!("cellsize must be positive, got {}", cellsize)));
        }

        let x_corner = if x_is_center { xll - cellsize / 2.0 } else { xll };
        let y_corner = if y_is_center { yll - cellsize / 2.0 } else { yll };

        let data = tokens
            .map(|t| {
                t.parse::<f32>()
                    .map_err(|_| DemError::Parse(format!("invalid sample '{}'", t)))
            })
            .collect::<DemResult<Vec<f32>>>()?;

        if data.len() != ncols * nrows {
            return Err(DemError::Parse(format!(
                "expected {} samples ({}x{}), found {}",
                ncols * nrows,
                ncols,
                nrows,
                data.len()
            )));
        }

        let transform = GeoTransform::new(
            x_corner,
            y_corner + nrows as f64 * cellsize,
            cellsize,
            -cellsize,
        );

        debug!(ncols, nrows, cellsize, "Parsed ASCII grid");

        Ok(Self {
            ncols,
            nrows,
            cellsize,
            transform,
            nodata: header.nodata,
            data,
        })
    }

    /// Read and parse a grid file.
    pub fn from_file(path: impl AsRef<Path>) -> DemResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn cellsize(&self) -> f64 {
        self.cellsize
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    /// Geographic extent of the whole grid.
    pub fn extent(&self) -> GeoBoundingBox {
        self.transform.extent(self.ncols, self.nrows)
    }

    /// Cells intersecting `bbox`, as an elevation grid with its own transform.
    ///
    /// The window is widened outward to whole cells. NODATA samples are
    /// replaced by the lowest valid elevation of the window.
    pub fn window(&self, bbox: &GeoBoundingBox) -> DemResult<ElevationGrid> {
        let extent = self.extent();
        if bbox.lon_max < extent.lon_min
            || bbox.lon_min > extent.lon_max
            || bbox.lat_max < extent.lat_min
            || bbox.lat_min > extent.lat_max
        {
            return Err(DemError::OutOfBounds(format!(
                "requested {} but grid covers {}",
                bbox, extent
            )));
        }

        let to_col = |lon: f64| (lon - self.transform.origin_lon) / self.cellsize;
        let to_row = |lat: f64| (self.transform.origin_lat - lat) / self.cellsize;

        let col0 = (to_col(bbox.lon_min).floor().max(0.0) as usize).min(self.ncols - 1);
        let col1 = (to_col(bbox.lon_max).ceil().max(0.0) as usize)
            .min(self.ncols)
            .max(col0 + 1);
        let row0 = (to_row(bbox.lat_max).floor().max(0.0) as usize).min(self.nrows - 1);
        let row1 = (to_row(bbox.lat_min).ceil().max(0.0) as usize)
            .min(self.nrows)
            .max(row0 + 1);

        let width = col1 - col0;
        let height = row1 - row0;
        let mut samples = Vec::with_capacity(width * height);
        for row in row0..row1 {
            let start = row * self.ncols;
            samples.extend_from_slice(&self.data[start + col0..start + col1]);
        }

        let is_nodata = |v: f32| v.is_nan() || self.nodata.map_or(false, |nd| v == nd);
        let nodata_count = samples.iter().filter(|&&v| is_nodata(v)).count();
        if nodata_count == samples.len() {
            return Err(DemError::Empty(format!("{}", bbox)));
        }
        if nodata_count > 0 {
            let fill = samples
                .iter()
                .copied()
                .filter(|&v| !is_nodata(v))
                .fold(f32::INFINITY, f32::min);
            warn!(nodata_count, fill, "Filling NODATA samples in DEM window");
            for v in samples.iter_mut() {
                if is_nodata(*v) {
                    *v = fill;
                }
            }
        }

        let corner = self.transform.cell_corner(col0, row0);
        let transform = GeoTransform::new(
            corner.lon,
            corner.lat,
            self.transform.pixel_width,
            self.transform.pixel_height,
        );

        debug!(col0, row0, width, height, "Extracted DEM window");

        ElevationGrid::new(samples, width, height, transform)
            .map_err(|e| DemError::Parse(e.to_string()))
    }
}

/// Provider serving windows of a single ASCII grid file.
#[derive(Debug, Clone)]
pub struct AsciiGridProvider {
    grid: AsciiGrid,
    source_name: String,
    resolution_m: f64,
}

impl AsciiGridProvider {
    /// Wrap an already parsed grid. The nominal resolution is estimated from
    /// the cell size.
    pub fn new(grid: AsciiGrid, source_name: impl Into<String>) -> Self {
        let resolution_m = grid.cellsize() * METERS_PER_DEGREE;
        Self {
            grid,
            source_name: source_name.into(),
            resolution_m,
        }
    }

    /// Parse `path` and serve it under `source_name`.
    pub fn open(path: impl AsRef<Path>, source_name: impl Into<String>) -> DemResult<Self> {
        Ok(Self::new(AsciiGrid::from_file(path)?, source_name))
    }

    /// Override the nominal resolution reported to callers.
    pub fn with_resolution(mut self, resolution_m: f64) -> Self {
        self.resolution_m = resolution_m;
        self
    }

    pub fn grid(&self) -> &AsciiGrid {
        &self.grid
    }
}

impl DemProvider for AsciiGridProvider {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    fn resolution_m(&self) -> f64 {
        self.resolution_m
    }

    fn fetch(&self, request: &DemRequest) -> DemResult<ElevationGrid> {
        debug!(
            bbox = %request.bbox,
            requested_resolution = request.resolution_m,
            native_resolution = self.resolution_m,
            "Fetching DEM window"
        );
        self.grid.window(&request.bbox)
    }
}
