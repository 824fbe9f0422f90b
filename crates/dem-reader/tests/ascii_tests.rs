//! Tests for the ASCII grid DEM provider.

use std::io::Write;

use dem_reader::{AsciiGrid, AsciiGridProvider, DemError, DemProvider, DemRequest};
use wallpaper_common::{GeoBoundingBox, GeoPoint, WallpaperError};

// ============================================================================
// Helper functions
// ============================================================================

/// 4x4 grid over lon 10..12, lat 40..42 (cellsize 0.5). Values encode
/// their position: row * 10 + col.
fn sample_grid_text() -> String {
    let mut text = String::from(
        "ncols 4\nnrows 4\nxllcorner 10.0\nyllcorner 40.0\ncellsize 0.5\nNODATA_value -9999\n",
    );
    for row in 0..4 {
        let line: Vec<String> = (0..4).map(|col| (row * 10 + col).to_string()).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

fn bbox(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> GeoBoundingBox {
    GeoBoundingBox::from_corners(GeoPoint::new(lat_min, lon_min), GeoPoint::new(lat_max, lon_max))
}

// ============================================================================
// Window extraction
// ============================================================================

#[test]
fn test_window_full_extent() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    let window = grid.window(&grid.extent()).unwrap();
    assert_eq!(window.width(), 4);
    assert_eq!(window.height(), 4);
    assert_eq!(window.get(3, 3), Some(33.0));
}

#[test]
fn test_window_north_west_quarter() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    let window = grid.window(&bbox(41.0, 42.0, 10.0, 11.0)).unwrap();
    assert_eq!(window.width(), 2);
    assert_eq!(window.height(), 2);
    assert_eq!(window.data(), &[0.0, 1.0, 10.0, 11.0]);
    assert_eq!(window.transform().origin_lat, 42.0);
    assert_eq!(window.transform().origin_lon, 10.0);
}

#[test]
fn test_window_widens_to_whole_cells() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    // Straddles cells 1..3 in both directions
    let window = grid.window(&bbox(40.75, 41.25, 10.75, 11.25)).unwrap();
    assert_eq!(window.width(), 2);
    assert_eq!(window.height(), 2);
    assert_eq!(window.data(), &[11.0, 12.0, 21.0, 22.0]);
}

#[test]
fn test_window_degenerate_bbox_yields_one_cell() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    let p = GeoPoint::new(41.2, 10.2);
    let window = grid.window(&GeoBoundingBox::from_corners(p, p)).unwrap();
    assert_eq!(window.width(), 1);
    assert_eq!(window.height(), 1);
    assert_eq!(window.data(), &[10.0]);
}

#[test]
fn test_window_outside_extent() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    let err = grid.window(&bbox(50.0, 51.0, 10.0, 11.0)).unwrap_err();
    assert!(matches!(err, DemError::OutOfBounds(_)));
}

#[test]
fn test_window_fills_nodata_with_minimum() {
    let text = "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nnodata_value -9999\n\
                -9999 120\n80 100\n";
    let grid = AsciiGrid::parse(text).unwrap();
    let window = grid.window(&grid.extent()).unwrap();
    assert_eq!(window.data(), &[80.0, 120.0, 80.0, 100.0]);
}

#[test]
fn test_window_all_nodata_is_error() {
    let text = "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\nnodata_value -9999\n-9999\n";
    let grid = AsciiGrid::parse(text).unwrap();
    assert!(matches!(grid.window(&grid.extent()), Err(DemError::Empty(_))));
}

// ============================================================================
// Parsing failures
// ============================================================================

#[test]
fn test_parse_missing_header() {
    let err = AsciiGrid::parse("ncols 1\nnrows 1\n5\n").unwrap_err();
    assert!(err.to_string().contains("xllcorner"));
}

#[test]
fn test_parse_bad_sample() {
    let text = "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\n1.2.3\n";
    assert!(matches!(AsciiGrid::parse(text), Err(DemError::Parse(_))));
}

#[test]
fn test_parse_negative_cellsize() {
    let text = "ncols 1\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize -1\n1\n";
    assert!(AsciiGrid::parse(text).is_err());
}

// ============================================================================
// Provider
// ============================================================================

#[test]
fn test_provider_from_file() {
    let mut file = tempfile::Builder::new().suffix(".asc").tempfile().unwrap();
    file.write_all(sample_grid_text().as_bytes()).unwrap();

    let provider = AsciiGridProvider::open(file.path(), "LOCAL").unwrap().with_resolution(30.0);
    assert_eq!(provider.source_name(), "LOCAL");
    assert_eq!(provider.resolution_m(), 30.0);

    let request = DemRequest::new(bbox(40.0, 41.0, 11.0, 12.0), 30.0);
    let grid = provider.fetch(&request).unwrap();
    assert_eq!(grid.data(), &[22.0, 23.0, 32.0, 33.0]);
}

#[test]
fn test_provider_missing_file() {
    let err = AsciiGridProvider::open("/nonexistent/dem.asc", "LOCAL").unwrap_err();
    assert!(matches!(err, DemError::Io(_)));

    let converted: WallpaperError = err.into();
    assert!(matches!(converted, WallpaperError::Dem(_)));
}

#[test]
fn test_provider_estimates_resolution_from_cellsize() {
    let grid = AsciiGrid::parse(&sample_grid_text()).unwrap();
    let provider = AsciiGridProvider::new(grid, "LOCAL");
    assert!((provider.resolution_m() - 0.5 * 111_320.0).abs() < 1e-6);
}
