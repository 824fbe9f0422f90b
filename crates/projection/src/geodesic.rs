//! Forward geodesic on the WGS84 ellipsoid and the bounding box built on it.
//!
//! The forward (direct) problem is solved with Vincenty's iteration, which
//! converges to sub-millimeter accuracy for the distances used here.
//!
//! Reference: Vincenty, T. (1975). Direct and inverse solutions of geodesics
//! on the ellipsoid with application of nested equations.

use wallpaper_common::{GeoBoundingBox, GeoPoint};

/// Reference ellipsoid parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub semi_major: f64,
    /// Flattening
    pub flattening: f64,
}

impl Ellipsoid {
    /// Semi-minor axis in meters.
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening)
    }
}

/// WGS84 ellipsoid.
pub const WGS84: Ellipsoid = Ellipsoid {
    semi_major: 6_378_137.0,
    flattening: 1.0 / 298.257_223_563,
};

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Point reached by travelling `distance_m` meters from `start` along the
/// geodesic with initial azimuth `azimuth_deg` (clockwise from true north).
///
/// A negative distance travels the reverse azimuth. A zero distance returns
/// `start` unchanged.
pub fn destination(start: GeoPoint, azimuth_deg: f64, distance_m: f64) -> GeoPoint {
    destination_on(&WGS84, start, azimuth_deg, distance_m)
}

/// [`destination`] on an arbitrary ellipsoid.
pub fn destination_on(
    ellipsoid: &Ellipsoid,
    start: GeoPoint,
    azimuth_deg: f64,
    distance_m: f64,
) -> GeoPoint {
    if distance_m == 0.0 {
        return start;
    }
    let (azimuth_deg, distance_m) = if distance_m < 0.0 {
        (azimuth_deg + 180.0, -distance_m)
    } else {
        (azimuth_deg, distance_m)
    };

    let a = ellipsoid.semi_major;
    let f = ellipsoid.flattening;
    let b = ellipsoid.semi_minor();

    let phi1 = start.lat.to_radians();
    let alpha1 = azimuth_deg.to_radians();
    let sin_alpha1 = alpha1.sin();
    let cos_alpha1 = alpha1.cos();

    // Reduced latitude
    let tan_u1 = (1.0 - f) * phi1.tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    // Angular distance on the sphere from the equator to the start point
    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

    let u_sq = cos2_alpha * (a * a - b * b) / (b * b);
    let big_a =
        1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let sigma0 = distance_m / (b * big_a);
    let mut sigma = sigma0;
    let mut cos_2sigma_m;
    let mut sin_sigma;
    let mut cos_sigma;
    let mut iterations = 0;

    loop {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        sin_sigma = sigma.sin();
        cos_sigma = sigma.cos();

        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

        let sigma_prev = sigma;
        sigma = sigma0 + delta_sigma;
        iterations += 1;

        if (sigma - sigma_prev).abs() < CONVERGENCE {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            tracing::warn!(
                azimuth = azimuth_deg,
                distance = distance_m,
                "Vincenty direct solution did not converge"
            );
            break;
        }
    }

    cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    sin_sigma = sigma.sin();
    cos_sigma = sigma.cos();

    let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + x * x).sqrt());

    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    GeoPoint::new(phi2.to_degrees(), normalize_lon(start.lon + l.to_degrees()))
}

/// Wrap a longitude into [-180, 180], leaving in-range values untouched.
fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Offset a point by `north_m` meters along true north, then by `east_m`
/// meters along true east from the intermediate point.
pub fn offset_point(lat: f64, lon: f64, north_m: f64, east_m: f64) -> GeoPoint {
    let north = destination(GeoPoint::new(lat, lon), 0.0, north_m);
    destination(north, 90.0, east_m)
}

/// Bounding box of a `width_m` x `height_m` rectangle centered on a point.
///
/// The signs of the extents are ignored.
pub fn bounding_box(lat_center: f64, lon_center: f64, width_m: f64, height_m: f64) -> GeoBoundingBox {
    let half_width = width_m.abs() / 2.0;
    let half_height = height_m.abs() / 2.0;

    let north_east = offset_point(lat_center, lon_center, half_height, half_width);
    let south_west = offset_point(lat_center, lon_center, -half_height, -half_width);

    GeoBoundingBox::from_corners(north_east, south_west)
}
