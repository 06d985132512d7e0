//! Unit-vector primitives for points on the sphere.

use nalgebra::{Rotation3, Unit};

use crate::error::{GeometryError, Result};

use super::{Tolerance, Vector3};

/// Converts longitude and latitude in degrees to a unit vector.
#[must_use]
pub fn lonlat_to_vector(lon: f64, lat: f64) -> Vector3 {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Converts a unit vector to `(longitude, latitude)` in degrees.
///
/// Longitude is returned in `[0, 360)`.
#[must_use]
pub fn vector_to_lonlat(v: &Vector3) -> (f64, f64) {
    let mut lon = v.y.atan2(v.x).to_degrees().rem_euclid(360.0);
    if lon >= 360.0 {
        lon -= 360.0;
    }
    let lat = v.z.atan2(v.x.hypot(v.y)).to_degrees();
    (lon, lat)
}

/// Scales a vector to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the vector has zero length or is
/// not finite.
pub fn normalize(v: &Vector3) -> Result<Vector3> {
    v.try_normalize(0.0)
        .filter(|n| n.iter().all(|c| c.is_finite()))
        .ok_or_else(|| GeometryError::ZeroVector.into())
}

/// Returns a unit vector orthogonal to `v`.
///
/// Crosses `v` with the coordinate axis along its smallest component, which
/// keeps the result well conditioned for any unit input.
#[must_use]
pub fn perpendicular(v: &Vector3) -> Vector3 {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    let axis = if ax <= ay && ax <= az {
        Vector3::new(1.0, 0.0, 0.0)
    } else if ay <= az {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };
    v.cross(&axis).normalize()
}

/// Rotates `v` by `angle` radians about `axis` (right-handed).
#[must_use]
pub fn rotate_around(v: &Vector3, axis: &Vector3, angle: f64) -> Vector3 {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle) * v
}

/// Angle in radians between two unit vectors.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Returns `true` if two points are closer than the tolerance.
#[must_use]
pub fn points_equal(a: &Vector3, b: &Vector3, tol: Tolerance) -> bool {
    (a - b).norm() < tol.eps()
}

/// Normalized mean of a set of points.
///
/// # Errors
///
/// Returns an error if the points cancel out (or the slice is empty).
pub fn mean_direction(points: &[Vector3]) -> Result<Vector3> {
    normalize(&points.iter().sum())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    // ── Angle conversion ──

    #[test]
    fn lonlat_axes() {
        assert_abs_diff_eq!(lonlat_to_vector(0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
        assert_abs_diff_eq!(lonlat_to_vector(90.0, 0.0), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
        assert_abs_diff_eq!(lonlat_to_vector(0.0, 90.0), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn lonlat_round_trip_wraps_longitude() {
        let (lon, lat) = vector_to_lonlat(&lonlat_to_vector(-30.0, 45.0));
        assert_abs_diff_eq!(lon, 330.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lat, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn longitude_never_reaches_360() {
        let v = Vector3::new(1.0, -1e-18, 0.0);
        let (lon, _) = vector_to_lonlat(&v);
        assert!((0.0..360.0).contains(&lon));
    }

    // ── Vector helpers ──

    #[test]
    fn normalize_rejects_zero() {
        assert!(normalize(&Vector3::zeros()).is_err());
        assert_abs_diff_eq!(normalize(&Vector3::new(0.0, 3.0, 4.0)).unwrap().norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn perpendicular_is_orthogonal_unit() {
        for v in [
            Vector3::new(1.0, 0.0, 0.0),
            lonlat_to_vector(12.0, 89.999),
            lonlat_to_vector(200.0, -33.0),
        ] {
            let p = perpendicular(&v);
            assert_abs_diff_eq!(p.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p.dot(&v), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotation_is_right_handed() {
        let r = rotate_around(&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        assert_abs_diff_eq!(r, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn angle_between_is_accurate_for_tiny_separations() {
        let a = lonlat_to_vector(10.0, 10.0);
        let b = lonlat_to_vector(10.0, 10.0 + 1e-9);
        assert_abs_diff_eq!(angle_between(&a, &b), 1e-9_f64.to_radians(), epsilon = 1e-15);
    }

    #[test]
    fn mean_of_opposite_points_fails() {
        let a = Vector3::new(1.0, 0.0, 0.0);
        assert!(mean_direction(&[a, -a]).is_err());
        assert!(mean_direction(&[]).is_err());
    }
}
