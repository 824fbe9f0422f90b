//! Contour line (isohypse) extraction using the marching squares algorithm.
//!
//! Segments are traced per cell with linear interpolation along the cell
//! edges, joined into polylines, optionally smoothed, and stroked with
//! anti-aliasing onto a `tiny-skia` canvas.

use std::collections::{HashMap, VecDeque};

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};
use wallpaper_common::Rgb;

/// A point in grid coordinates (column, row of the sample grid)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline). Closed rings do not repeat their
/// first point.
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Most contour levels a single render will trace.
pub const MAX_CONTOUR_LEVELS: usize = 4096;

/// Number of levels `generate_contour_levels` would produce, saturating at
/// `usize::MAX` for vanishing intervals.
pub fn contour_level_count(min_value: f32, max_value: f32, interval: f64) -> usize {
    if interval.is_nan() || interval <= 0.0 || max_value.is_nan() || max_value <= min_value {
        return 0;
    }
    let steps = ((max_value as f64 - min_value as f64) / interval).ceil();
    if steps.is_finite() {
        steps as usize
    } else {
        usize::MAX
    }
}

/// Contour levels `min, min + interval, min + 2 * interval, ...` strictly
/// below `max`.
///
/// Returns no levels for a non-positive interval or an empty range. The
/// count is not bounded here; callers check `contour_level_count` first.
pub fn generate_contour_levels(min_value: f32, max_value: f32, interval: f64) -> Vec<f32> {
    let count = contour_level_count(min_value, max_value, interval);
    if count == 0 {
        return vec![];
    }

    let min = min_value as f64;
    let max = max_value as f64;

    (0..count)
        .map(|i| min + i as f64 * interval)
        .filter(|&level| level < max)
        .map(|level| level as f32)
        .collect()
}

/// Marching squares algorithm to generate contour lines
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// # Returns
/// Vector of line segments representing the contour
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0u8;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            push_cell_segments(
                &mut segments,
                cell_index,
                x as f32,
                y as f32,
                [tl, tr, br, bl],
                level,
            );
        }
    }

    segments
}

/// Append the segments of one marching squares cell.
///
/// Saddles are resolved with the cell-center average so that the two
/// segments never cross.
fn push_cell_segments(
    segments: &mut Vec<Segment>,
    cell_index: u8,
    x: f32,
    y: f32,
    corners: [f32; 4],
    level: f32,
) {
    let [tl, tr, br, bl] = corners;
    let top = || interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = || interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = || interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = || interpolate_edge(x, y, x, y + 1.0, tl, bl, level);
    let mut push = |start: Point, end: Point| segments.push(Segment { start, end });

    match cell_index {
        0 | 15 => {}
        1 | 14 => push(left(), top()),
        2 | 13 => push(top(), right()),
        3 | 12 => push(left(), right()),
        4 | 11 => push(right(), bottom()),
        6 | 9 => push(top(), bottom()),
        7 | 8 => push(left(), bottom()),
        5 | 10 => {
            let center_high = (tl + tr + br + bl) / 4.0 >= level;
            // 5: tl and br high. 10: tr and bl high.
            if (cell_index == 5) == center_high {
                push(left(), bottom());
                push(top(), right());
            } else {
                push(left(), top());
                push(right(), bottom());
            }
        }
        _ => {}
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    val1: f32,
    val2: f32,
    level: f32,
) -> Point {
    if (val2 - val1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

type PointKey = (i64, i64);

#[inline]
fn point_key(p: Point) -> PointKey {
    ((p.x * 4096.0).round() as i64, (p.y * 4096.0).round() as i64)
}

/// Connect line segments into continuous polylines
///
/// Neighboring cells compute shared edge crossings identically, so segment
/// endpoints are matched through a hash of their quantized position.
pub fn connect_segments(segments: &[Segment], level: f32) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut by_endpoint: HashMap<PointKey, Vec<usize>> = HashMap::with_capacity(segments.len() * 2);
    for (i, seg) in segments.iter().enumerate() {
        by_endpoint.entry(point_key(seg.start)).or_default().push(i);
        by_endpoint.entry(point_key(seg.end)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];

    // Take an unused segment touching `at` and return its far endpoint
    let take_next = |at: Point, used: &mut Vec<bool>| -> Option<Point> {
        let key = point_key(at);
        let candidates = by_endpoint.get(&key)?;
        let &idx = candidates.iter().find(|&&i| !used[i])?;
        used[idx] = true;
        let seg = &segments[idx];
        if point_key(seg.start) == key {
            Some(seg.end)
        } else {
            Some(seg.start)
        }
    };

    let mut contours = Vec::new();

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let mut points = VecDeque::new();
        points.push_back(segments[start_idx].start);
        points.push_back(segments[start_idx].end);

        while let Some(&back) = points.back() {
            match take_next(back, &mut used) {
                Some(next) => points.push_back(next),
                None => break,
            }
        }
        while let Some(&front) = points.front() {
            match take_next(front, &mut used) {
                Some(prev) => points.push_front(prev),
                None => break,
            }
        }

        let mut points: Vec<Point> = points.into_iter().collect();
        let closed = points.len() > 3
            && point_key(points[0]) == point_key(points[points.len() - 1]);
        if closed {
            points.pop();
        }

        contours.push(Contour {
            level,
            points,
            closed,
        });
    }

    contours
}

/// Apply Chaikin's corner cutting algorithm for smoothing
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut new_points = Vec::with_capacity(points.len() * 2 + 2);

        if !contour.closed {
            new_points.push(points[0]);
        }

        let pairs = if contour.closed {
            points.len()
        } else {
            points.len() - 1
        };
        for i in 0..pairs {
            let p1 = points[i];
            let p2 = points[(i + 1) % points.len()];

            // Two new points: 25% and 75% along the segment
            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }

        if !contour.closed {
            if let Some(&last) = points.last() {
                new_points.push(last);
            }
        }

        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Trace, join and smooth the contours of every level.
pub fn generate_all_contours(
    data: &[f32],
    width: usize,
    height: usize,
    levels: &[f32],
    smoothing_passes: u32,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in levels {
        let segments = march_squares(data, width, height, level);
        let contours = connect_segments(&segments, level);

        tracing::trace!(contour_level = level, segments = segments.len(), lines = contours.len(), "Traced level");

        all_contours.extend(
            contours
                .iter()
                .map(|contour| smooth_contour(contour, smoothing_passes)),
        );
    }

    all_contours
}

/// Stroke contours onto `pixmap`, coloring each line by its level.
///
/// Grid sample `(col, row)` is drawn at the center of pixel `(col, row)`.
pub fn draw_contours<F>(pixmap: &mut Pixmap, contours: &[Contour], line_width: f32, color_for_level: F)
where
    F: Fn(f32) -> Rgb,
{
    let mut stroke = Stroke::default();
    stroke.width = line_width;
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    for contour in contours {
        if contour.points.len() < 2 {
            continue;
        }

        let color = color_for_level(contour.level);
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = true;

        let mut pb = PathBuilder::new();
        pb.move_to(contour.points[0].x + 0.5, contour.points[0].y + 0.5);
        for point in &contour.points[1..] {
            pb.line_to(point.x + 0.5, point.y + 0.5);
        }
        if contour.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
