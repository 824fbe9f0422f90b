//! Elevation resampling and color ramps.

use wallpaper_common::ColorSpec;

/// Added to the value range when normalizing so a flat grid maps to zero
/// instead of dividing by zero.
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Resample grid data to a different resolution using bilinear interpolation.
///
/// Corner samples map onto corner pixels, so output pixel `x` reads the
/// source at `x * (src_width - 1) / (dst_width - 1)`, and likewise for rows.
///
/// # Arguments
/// - `data`: Input grid data (row-major order)
/// - `src_width`: Source grid width
/// - `src_height`: Source grid height
/// - `dst_width`: Destination grid width
/// - `dst_height`: Destination grid height
///
/// # Returns
/// Resampled grid data at the requested resolution
pub fn resample_grid(
    data: &[f32],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<f32> {
    if src_width == dst_width && src_height == dst_height {
        return data.to_vec();
    }
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return vec![0.0; dst_width * dst_height];
    }

    let mut output = vec![0.0f32; dst_width * dst_height];

    let ratio = |src: usize, dst: usize| {
        if dst > 1 {
            (src - 1) as f32 / (dst - 1) as f32
        } else {
            0.0
        }
    };
    let x_ratio = ratio(src_width, dst_width);
    let y_ratio = ratio(src_height, dst_height);

    for y in 0..dst_height {
        let src_y = y as f32 * y_ratio;
        let y1 = (src_y.floor() as usize).min(src_height - 1);
        let y2 = (y1 + 1).min(src_height - 1);
        let dy = src_y - y1 as f32;

        for x in 0..dst_width {
            let src_x = x as f32 * x_ratio;
            let x1 = (src_x.floor() as usize).min(src_width - 1);
            let x2 = (x1 + 1).min(src_width - 1);
            let dx = src_x - x1 as f32;

            // Get the four surrounding values
            let v11 = data.get(y1 * src_width + x1).copied().unwrap_or(0.0);
            let v21 = data.get(y1 * src_width + x2).copied().unwrap_or(0.0);
            let v12 = data.get(y2 * src_width + x1).copied().unwrap_or(0.0);
            let v22 = data.get(y2 * src_width + x2).copied().unwrap_or(0.0);

            let v1 = v11 + (v21 - v11) * dx;
            let v2 = v12 + (v22 - v12) * dx;
            output[y * dst_width + x] = v1 + (v2 - v1) * dy;
        }
    }

    output
}

/// Scale values to `[0, 1]` with `(v - min) / (max - min + eps)`.
///
/// A constant field becomes uniformly zero.
pub fn normalize(data: &[f32], min_val: f32, max_val: f32) -> Vec<f32> {
    let range = max_val - min_val + NORMALIZE_EPSILON;
    data.iter().map(|&v| (v - min_val) / range).collect()
}

/// Color of `spec` at normalized position `value`, channels in `[0, 1]`.
///
/// For an `n`-color gradient the position is scaled to `value * (n - 1)` and
/// blended linearly between the two neighboring stops.
pub fn sample_color(spec: &ColorSpec, value: f32) -> [f32; 3] {
    match spec {
        ColorSpec::Solid(color) => color.to_unit(),
        ColorSpec::Gradient(colors) => {
            let n = colors.len();
            if n == 0 {
                return [0.0; 3];
            }
            let last = (n - 1) as f32;
            let idx = (value * last).clamp(0.0, last);
            let lo = idx.floor() as usize;
            let hi = (lo + 1).min(n - 1);
            let t = idx - lo as f32;

            let c0 = colors[lo].to_unit();
            let c1 = colors[hi].to_unit();
            [
                (1.0 - t) * c0[0] + t * c1[0],
                (1.0 - t) * c0[1] + t * c1[1],
                (1.0 - t) * c0[2] + t * c1[2],
            ]
        }
    }
}

/// Resolve a color spec over a normalized field of any length (a single
/// value, a list of contour levels, or a flattened pixel grid).
pub fn resolve_color(spec: &ColorSpec, field: &[f32]) -> Vec<[f32; 3]> {
    match spec {
        ColorSpec::Solid(color) => vec![color.to_unit(); field.len()],
        ColorSpec::Gradient(_) => field.iter().map(|&v| sample_color(spec, v)).collect(),
    }
}

/// Convert a unit channel value to 8 bits.
#[inline]
pub fn quantize(channel: f32) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallpaper_common::Rgb;

    #[test]
    fn test_resample_identity() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(resample_grid(&data, 2, 2, 2, 2), data);
    }

    #[test]
    fn test_resample_single_pixel() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(resample_grid(&data, 2, 2, 1, 1), vec![1.0]);
    }

    #[test]
    fn test_normalize_flat() {
        let out = normalize(&[5.0; 4], 5.0, 5.0);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sample_gradient_clamps_index() {
        let spec = ColorSpec::Gradient(vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
        assert_eq!(sample_color(&spec, 1.5), [1.0, 1.0, 1.0]);
        assert_eq!(sample_color(&spec, -0.5), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(1.2), 255);
        assert_eq!(quantize(0.5), 128);
    }
}
