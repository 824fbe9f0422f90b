//! Tests for contour line (isohypse) extraction and drawing.

use renderer::contour::{
    connect_segments, contour_level_count, draw_contours, generate_all_contours,
    generate_contour_levels, march_squares, smooth_contour, Contour, Point,
};
use tiny_skia::{Color, Pixmap};
use wallpaper_common::Rgb;

// ============================================================================
// Helper functions
// ============================================================================

/// Field that rises by `step` per column and is constant down each column.
fn column_ramp(width: usize, height: usize, step: f32) -> Vec<f32> {
    (0..height)
        .flat_map(|_| (0..width).map(move |x| x as f32 * step))
        .collect()
}

/// Radially symmetric hill peaking at the grid center.
fn hill(size: usize) -> Vec<f32> {
    let c = (size - 1) as f32 / 2.0;
    let mut data = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
            data.push(100.0 - d * 10.0);
        }
    }
    data
}

// ============================================================================
// generate_contour_levels tests
// ============================================================================

#[test]
fn test_contour_level_count_matches_levels() {
    assert_eq!(contour_level_count(0.0, 100.0, 10.0), 10);
    assert_eq!(generate_contour_levels(0.0, 100.0, 10.0).len(), 10);
    assert_eq!(contour_level_count(0.0, 1000.0, 0.25), 4000);
    assert_eq!(contour_level_count(0.0, 1000.0, 1e-320), usize::MAX);
    assert_eq!(contour_level_count(5.0, 5.0, 1.0), 0);
    assert_eq!(contour_level_count(0.0, 10.0, -1.0), 0);
}

#[test]
fn test_generate_contour_levels_excludes_max() {
    let levels = generate_contour_levels(0.0, 100.0, 10.0);
    assert_eq!(
        levels,
        vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]
    );
}

#[test]
fn test_generate_contour_levels_start_at_min() {
    // Levels are anchored at the minimum, not at multiples of the interval
    let levels = generate_contour_levels(3.0, 27.0, 5.0);
    assert_eq!(levels, vec![3.0, 8.0, 13.0, 18.0, 23.0]);
}

#[test]
fn test_generate_contour_levels_negative_range() {
    let levels = generate_contour_levels(-20.0, 20.0, 10.0);
    assert_eq!(levels, vec![-20.0, -10.0, 0.0, 10.0]);
}

#[test]
fn test_generate_contour_levels_fractional_interval() {
    let levels = generate_contour_levels(0.0, 1.0, 0.25);
    assert_eq!(levels, vec![0.0, 0.25, 0.5, 0.75]);
}

#[test]
fn test_generate_contour_levels_invalid_interval() {
    assert!(generate_contour_levels(0.0, 100.0, 0.0).is_empty());
    assert!(generate_contour_levels(0.0, 100.0, -10.0).is_empty());
    assert!(generate_contour_levels(0.0, 100.0, f64::NAN).is_empty());
}

#[test]
fn test_generate_contour_levels_flat_range() {
    assert!(generate_contour_levels(42.0, 42.0, 10.0).is_empty());
}

#[test]
fn test_generate_contour_levels_interval_larger_than_range() {
    assert_eq!(generate_contour_levels(10.0, 15.0, 100.0), vec![10.0]);
}

// ============================================================================
// march_squares tests
// ============================================================================

#[test]
fn test_march_squares_vertical_line() {
    let data = column_ramp(3, 2, 10.0);
    let segments = march_squares(&data, 3, 2, 5.0);

    assert_eq!(segments.len(), 1);
    let seg = &segments[0];
    assert!((seg.start.x - 0.5).abs() < 1e-6);
    assert!((seg.end.x - 0.5).abs() < 1e-6);
    let mut ys = [seg.start.y, seg.end.y];
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(ys, [0.0, 1.0]);
}

#[test]
fn test_march_squares_interpolates_crossing() {
    // Level 15 lies 3/4 of the way from 0 to 20
    let data = vec![0.0, 20.0, 0.0, 20.0];
    let segments = march_squares(&data, 2, 2, 15.0);
    assert_eq!(segments.len(), 1);
    assert!((segments[0].start.x - 0.75).abs() < 1e-6);
}

#[test]
fn test_march_squares_level_outside_range() {
    let data = column_ramp(4, 4, 10.0);
    assert!(march_squares(&data, 4, 4, 100.0).is_empty());
    assert!(march_squares(&data, 4, 4, -1.0).is_empty());
}

#[test]
fn test_march_squares_skips_nan_cells() {
    let data = vec![0.0, 10.0, f32::NAN, 0.0, 10.0, 20.0];
    let segments = march_squares(&data, 3, 2, 5.0);
    // Only the left cell is complete
    assert_eq!(segments.len(), 1);
}

#[test]
fn test_march_squares_size_mismatch() {
    assert!(march_squares(&[1.0, 2.0, 3.0], 2, 2, 1.5).is_empty());
    assert!(march_squares(&[1.0, 2.0], 2, 1, 1.5).is_empty());
}

#[test]
fn test_march_squares_saddle_gives_two_segments() {
    let data = vec![10.0, 0.0, 0.0, 10.0];
    let segments = march_squares(&data, 2, 2, 5.0);
    assert_eq!(segments.len(), 2);
}

// ============================================================================
// connect_segments tests
// ============================================================================

#[test]
fn test_connect_segments_open_line() {
    let data = column_ramp(4, 3, 10.0);
    let segments = march_squares(&data, 4, 3, 15.0);
    assert_eq!(segments.len(), 2);

    let contours = connect_segments(&segments, 15.0);
    assert_eq!(contours.len(), 1);
    assert!(!contours[0].closed);
    assert_eq!(contours[0].points.len(), 3);
    assert!(contours[0].points.iter().all(|p| (p.x - 1.5).abs() < 1e-6));
}

#[test]
fn test_connect_segments_closed_ring_around_hill() {
    let data = hill(9);
    let segments = march_squares(&data, 9, 9, 75.0);
    let contours = connect_segments(&segments, 75.0);

    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
    assert_eq!(contours[0].points.len(), segments.len());
    assert_eq!(contours[0].level, 75.0);
}

#[test]
fn test_connect_segments_empty() {
    assert!(connect_segments(&[], 1.0).is_empty());
}

// ============================================================================
// smooth_contour tests
// ============================================================================

#[test]
fn test_smooth_open_contour_keeps_endpoints() {
    let contour = Contour {
        level: 1.0,
        points: vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(4.0, 4.0)],
        closed: false,
    };
    let smoothed = smooth_contour(&contour, 1);

    assert_eq!(smoothed.points.len(), 6);
    assert_eq!(smoothed.points[0], Point::new(0.0, 0.0));
    assert_eq!(smoothed.points[5], Point::new(4.0, 4.0));
    assert_eq!(smoothed.points[1], Point::new(1.0, 0.0));
    assert_eq!(smoothed.points[2], Point::new(3.0, 0.0));
}

#[test]
fn test_smooth_closed_contour_doubles_points() {
    let contour = Contour {
        level: 1.0,
        points: vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ],
        closed: true,
    };
    let smoothed = smooth_contour(&contour, 2);
    assert_eq!(smoothed.points.len(), 16);
    assert!(smoothed.closed);
}

#[test]
fn test_smooth_zero_iterations_is_identity() {
    let contour = Contour {
        level: 1.0,
        points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
        closed: false,
    };
    assert_eq!(smooth_contour(&contour, 0).points, contour.points);
}

// ============================================================================
// generate_all_contours / draw_contours tests
// ============================================================================

#[test]
fn test_generate_all_contours_one_ring_per_level() {
    let data = hill(21);
    let levels = vec![25.0, 45.0, 65.0, 85.0];
    let contours = generate_all_contours(&data, 21, 21, &levels, 1);

    assert_eq!(contours.len(), 4);
    assert!(contours.iter().all(|c| c.closed));
    for level in levels {
        assert_eq!(contours.iter().filter(|c| c.level == level).count(), 1);
    }
}

#[test]
fn test_draw_contours_paints_line_color() {
    let mut pixmap = Pixmap::new(20, 20).unwrap();
    pixmap.fill(Color::BLACK);

    let contour = Contour {
        level: 5.0,
        points: vec![Point::new(2.0, 10.0), Point::new(17.0, 10.0)],
        closed: false,
    };
    draw_contours(&mut pixmap, &[contour], 1.0, |_| Rgb::new(255, 0, 0));

    let on_line = pixmap.pixel(10, 10).unwrap();
    assert!(on_line.red() > 200);
    assert_eq!(on_line.green(), 0);

    let off_line = pixmap.pixel(10, 3).unwrap();
    assert_eq!(off_line.red(), 0);
}

#[test]
fn test_draw_contours_color_per_level() {
    let mut pixmap = Pixmap::new(20, 20).unwrap();
    pixmap.fill(Color::BLACK);

    let line = |level: f32, y: f32| Contour {
        level,
        points: vec![Point::new(2.0, y), Point::new(17.0, y)],
        closed: false,
    };
    draw_contours(&mut pixmap, &[line(1.0, 5.0), line(2.0, 15.0)], 1.0, |level| {
        if level < 1.5 {
            Rgb::new(255, 0, 0)
        } else {
            Rgb::new(0, 0, 255)
        }
    });

    assert!(pixmap.pixel(10, 5).unwrap().red() > 200);
    assert!(pixmap.pixel(10, 15).unwrap().blue() > 200);
    assert_eq!(pixmap.pixel(10, 15).unwrap().red(), 0);
}
