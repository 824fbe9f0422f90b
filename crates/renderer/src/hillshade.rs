//! Hillshade (shaded relief) from an elevation surface.
//!
//! Intensity is the cosine of the angle between the surface normal and the
//! direction towards the light. The field is then stretched to its own
//! min..max range, so that gentle relief still spans black to full light,
//! and clamped to `[0, 1]`. A field flatter than `CONTRAST_EPSILON` is left
//! unstretched (flat ground stays at `sin(altitude)`). Gradients use central
//! differences in the interior and one-sided differences on the edges, with
//! one pixel as the horizontal unit.

/// Smallest intensity range that is stretched to `[0, 1]`.
pub const CONTRAST_EPSILON: f32 = 1e-6;

/// Light source and vertical exaggeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillshadeParams {
    /// Light azimuth in degrees (0 = North, clockwise)
    pub azimuth: f32,
    /// Light altitude in degrees above the horizon
    pub altitude: f32,
    /// Multiplier applied to elevations before differentiating
    pub z_factor: f32,
}

impl Default for HillshadeParams {
    fn default() -> Self {
        Self {
            azimuth: 315.0,
            altitude: 45.0,
            z_factor: 1.0,
        }
    }
}

impl HillshadeParams {
    /// Unit vector pointing at the light, as (east, north, up).
    pub fn light_vector(&self) -> [f32; 3] {
        let az = self.azimuth.to_radians();
        let alt = self.altitude.to_radians();
        [az.sin() * alt.cos(), az.cos() * alt.cos(), alt.sin()]
    }
}

/// Derivative of `at(i)` over `0..len` at index `i`.
#[inline]
fn derivative(len: usize, i: usize, at: impl Fn(usize) -> f32) -> f32 {
    if len < 2 {
        0.0
    } else if i == 0 {
        at(1) - at(0)
    } else if i == len - 1 {
        at(i) - at(i - 1)
    } else {
        (at(i + 1) - at(i - 1)) / 2.0
    }
}

/// Compute a hillshade intensity field for row-major `data` (rows north to
/// south).
pub fn hillshade(data: &[f32], width: usize, height: usize, params: &HillshadeParams) -> Vec<f32> {
    if data.len() != width * height {
        return vec![0.0; width * height];
    }

    let [lx, ly, lz] = params.light_vector();
    let z = params.z_factor;
    let mut output = vec![0.0f32; width * height];

    for row in 0..height {
        for col in 0..width {
            let dz_dx = z * derivative(width, col, |c| data[row * width + c]);
            // Rows run south, so the northward slope is the negated row slope
            let dz_dy = -z * derivative(height, row, |r| data[r * width + col]);

            let norm = (dz_dx * dz_dx + dz_dy * dz_dy + 1.0).sqrt();
            let intensity = (-dz_dx * lx - dz_dy * ly + lz) / norm;

            output[row * width + col] = intensity;
        }
    }

    stretch_contrast(&mut output);
    output
}

/// Rescale `intensity` to its min..max range and clamp to `[0, 1]`.
fn stretch_contrast(intensity: &mut [f32]) {
    let (min, max) = intensity
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    let stretch = range.is_finite() && range > CONTRAST_EPSILON;
    for v in intensity.iter_mut() {
        if stretch {
            *v = (*v - min) / range;
        }
        *v = v.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_surface_is_uniform() {
        let params = HillshadeParams::default();
        let shade = hillshade(&[12.0; 16], 4, 4, &params);
        let expected = 45f32.to_radians().sin();
        assert!(shade.iter().all(|&v| (v - expected).abs() < 1e-6));
    }

    #[test]
    fn test_slope_facing_light_is_brighter() {
        // Rising to the south-east faces north-west, towards the default light
        let width = 5;
        let facing: Vec<f32> = (0..25).map(|i| ((i / width) + (i % width)) as f32).collect();
        let away: Vec<f32> = facing.iter().map(|v| -v).collect();

        let params = HillshadeParams::default();
        let lit = hillshade(&facing, 5, 5, &params);
        let dark = hillshade(&away, 5, 5, &params);
        assert!(lit[12] > dark[12]);
    }

    #[test]
    fn test_light_vector_points_north_west() {
        let [east, north, up] = HillshadeParams::default().light_vector();
        assert!(east < 0.0);
        assert!(north > 0.0);
        assert!(up > 0.0);
    }

    #[test]
    fn test_varied_surface_spans_full_range() {
        let data: Vec<f32> = (0..36).map(|i| ((i % 6) as f32 * 0.7).sin() * 0.3).collect();
        let shade = hillshade(&data, 6, 6, &HillshadeParams::default());
        let min = shade.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = shade.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_single_pixel() {
        let shade = hillshade(&[3.0], 1, 1, &HillshadeParams::default());
        assert_eq!(shade.len(), 1);
    }
}
