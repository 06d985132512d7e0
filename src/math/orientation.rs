//! Winding, point-in-region and area of closed loops on the sphere.
//!
//! A loop is a slice of unit vectors with an implied closing edge from the
//! last point back to the first. Its region is fixed by an inside point, not
//! by any area convention.

use std::f64::consts::TAU;

use crate::error::{PolygonError, Result};

use super::arc::{arc_contains_point, crosses_half_open};
use super::vector::{angle_between, perpendicular, points_equal};
use super::{Tolerance, Vector3};

/// Below this `p · inside` the parity path detours through a waypoint.
const ANTIPODAL_MARGIN: f64 = 1e-6;

/// Probe offsets, as fractions of edge length, for orientation detection.
const ORIENTATION_PROBES: [f64; 2] = [1e-3, 1e-5];

/// Signed turn at `v` when travelling `u → v → w`.
///
/// Positive for a left (counter-clockwise) turn seen from outside the sphere.
#[must_use]
pub fn turn_angle(u: &Vector3, v: &Vector3, w: &Vector3) -> f64 {
    let d_in = u.cross(v).cross(v);
    let d_out = v.cross(w).cross(v);
    v.dot(&d_in.cross(&d_out)).atan2(d_in.dot(&d_out))
}

/// Area of a counter-clockwise loop in steradians.
///
/// Girard's theorem: the interior angles sum to `Σ (π − turn)`, and the area
/// is that sum minus `(n − 2)π`, which reduces to `2π − Σ turn`. A clockwise
/// loop yields the area of the complementary region.
#[must_use]
pub fn loop_area(points: &[Vector3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let total: f64 = (0..n)
        .map(|i| turn_angle(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n]))
        .sum();
    TAU - total
}

/// Returns `true` if `p` lies on any edge of the loop.
#[must_use]
pub fn on_boundary(points: &[Vector3], p: &Vector3, tol: Tolerance) -> bool {
    edges(points).any(|(a, b)| arc_contains_point(a, b, p, tol))
}

/// Number of loop edges crossed by the arc `p → q` (half-open rule).
fn crossing_count(points: &[Vector3], p: &Vector3, q: &Vector3) -> usize {
    edges(points)
        .filter(|(a, b)| crosses_half_open(p, q, a, b))
        .count()
}

/// Point-in-region test by crossing parity.
///
/// Counts boundary crossings along the arc from `p` to the loop's inside
/// point; an even count means `p` is in the same region. When `p` is nearly
/// antipodal to the inside point the arc is ill defined, so the path is split
/// at a waypoint perpendicular to the inside point.
#[must_use]
pub fn loop_contains(points: &[Vector3], inside: &Vector3, p: &Vector3, tol: Tolerance) -> bool {
    if points.len() < 3 {
        return false;
    }
    if points_equal(p, inside, tol) {
        return true;
    }
    let count = if p.dot(inside) < -1.0 + ANTIPODAL_MARGIN {
        let waypoint = perpendicular(inside);
        crossing_count(points, p, &waypoint) + crossing_count(points, &waypoint, inside)
    } else {
        crossing_count(points, p, inside)
    };
    count % 2 == 0
}

/// A point just to the left of the arc `a → b`, at its midpoint.
///
/// `fraction` scales the offset relative to the arc length.
#[must_use]
pub fn left_probe(a: &Vector3, b: &Vector3, fraction: f64) -> Vector3 {
    let mid = (a + b).normalize();
    let normal = a.cross(b).normalize();
    let offset = angle_between(a, b) * fraction;
    (mid + normal * offset).normalize()
}

/// Edge indices ordered by decreasing length, ties by index.
#[must_use]
pub fn edges_longest_first(points: &[Vector3]) -> Vec<usize> {
    let lengths: Vec<f64> = edges(points).map(|(a, b)| angle_between(a, b)).collect();
    let mut order: Vec<usize> = (0..lengths.len()).collect();
    order.sort_by(|&i, &j| lengths[j].total_cmp(&lengths[i]).then(i.cmp(&j)));
    order
}

/// Determines whether the loop winds counter-clockwise around its region.
///
/// Probes just left and just right of each edge, longest edges first. The
/// first edge whose probes land on different sides decides: the region is on
/// the left of a counter-clockwise loop.
///
/// # Errors
///
/// Returns [`PolygonError::AmbiguousOrientation`] if no edge gives a
/// conclusive answer.
pub fn is_counter_clockwise(points: &[Vector3], inside: &Vector3, tol: Tolerance) -> Result<bool> {
    let n = points.len();
    for i in edges_longest_first(points) {
        let (a, b) = (&points[i], &points[(i + 1) % n]);
        for fraction in ORIENTATION_PROBES {
            let left = left_probe(a, b, fraction);
            let right = left_probe(b, a, fraction);
            if on_boundary(points, &left, tol) || on_boundary(points, &right, tol) {
                continue;
            }
            let left_in = loop_contains(points, inside, &left, tol);
            let right_in = loop_contains(points, inside, &right, tol);
            if left_in != right_in {
                return Ok(left_in);
            }
        }
    }
    Err(PolygonError::AmbiguousOrientation.into())
}

/// Iterates over the closed loop's edges as `(start, end)` pairs.
pub fn edges(points: &[Vector3]) -> impl Iterator<Item = (&Vector3, &Vector3)> {
    let n = points.len();
    (0..n).map(move |i| (&points[i], &points[(i + 1) % n]))
}
