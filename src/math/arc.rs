//! Great-circle arc predicates.
//!
//! Everything here works on unit vectors with dot and cross products. No
//! predicate round-trips through longitude and latitude, so the poles and the
//! 0/360 seam need no special handling.
//!
//! [`GreatCircleArc::intersect`] is a public primitive for callers. The clip
//! engine splits edges with [`proper_crossing`] and [`arc_contains_point`]
//! directly, since it works on vertex IDs rather than arc values.

use crate::error::{GeometryError, Result};

use super::vector::{angle_between, normalize, points_equal, rotate_around};
use super::{Tolerance, Vector3};

/// Result of intersecting two great-circle arcs.
#[derive(Debug, Clone, PartialEq)]
pub enum ArcIntersection {
    /// The arcs do not meet.
    None,
    /// The arcs cross or touch at a single point.
    Point(Vector3),
    /// The arcs lie on the same great circle and share a sub-arc, given in
    /// the direction of the first arc.
    Overlap(Vector3, Vector3),
}

/// The shorter great-circle path between two points.
#[derive(Debug, Clone)]
pub struct GreatCircleArc {
    start: Vector3,
    end: Vector3,
}

impl GreatCircleArc {
    /// Creates a new arc between two points on the sphere.
    ///
    /// Inputs are normalized.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MalformedArc`] if the endpoints coincide or are
    /// antipodal within the tolerance, and [`GeometryError::ZeroVector`] if an
    /// endpoint has zero length.
    pub fn new(start: Vector3, end: Vector3, tol: Tolerance) -> Result<Self> {
        let start = normalize(&start)?;
        let end = normalize(&end)?;
        if points_equal(&start, &end, tol) {
            return Err(GeometryError::MalformedArc("endpoints coincide".into()).into());
        }
        if start.cross(&end).norm() < tol.eps() && start.dot(&end) < 0.0 {
            return Err(GeometryError::MalformedArc("endpoints are antipodal".into()).into());
        }
        Ok(Self { start, end })
    }

    /// Returns the start point.
    #[must_use]
    pub fn start(&self) -> &Vector3 {
        &self.start
    }

    /// Returns the end point.
    #[must_use]
    pub fn end(&self) -> &Vector3 {
        &self.end
    }

    /// Unit normal of the great circle, oriented so the arc runs
    /// counter-clockwise about it.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        self.start.cross(&self.end).normalize()
    }

    /// Arc length in radians.
    #[must_use]
    pub fn length(&self) -> f64 {
        angle_between(&self.start, &self.end)
    }

    /// The point halfway along the arc.
    #[must_use]
    pub fn midpoint(&self) -> Vector3 {
        rotate_around(&self.start, &self.normal(), self.length() * 0.5)
    }

    /// Returns `steps` evenly spaced points along the arc, endpoints included.
    ///
    /// Fewer than two steps yields just the endpoints.
    #[must_use]
    pub fn interpolate(&self, steps: usize) -> Vec<Vector3> {
        let steps = steps.max(2);
        let normal = self.normal();
        let length = self.length();
        #[allow(clippy::cast_precision_loss)]
        let last = (steps - 1) as f64;
        (0..steps)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 / last;
                rotate_around(&self.start, &normal, length * t)
            })
            .collect()
    }

    /// Returns `true` if `p` lies on the arc within the tolerance.
    #[must_use]
    pub fn contains_point(&self, p: &Vector3, tol: Tolerance) -> bool {
        arc_contains_point(&self.start, &self.end, p, tol)
    }

    /// Intersects this arc with another.
    ///
    /// Arcs on distinct great circles meet in at most one point. Arcs on the
    /// same great circle report their shared sub-arc as
    /// [`ArcIntersection::Overlap`], or a single point when they only touch.
    #[must_use]
    pub fn intersect(&self, other: &GreatCircleArc, tol: Tolerance) -> ArcIntersection {
        let m = self.normal();
        let n = other.normal();
        let line = m.cross(&n);

        if line.norm() < tol.eps() {
            let mut shared: Vec<Vector3> = Vec::with_capacity(4);
            for p in [self.start, self.end] {
                if other.contains_point(&p, tol) {
                    shared.push(p);
                }
            }
            for p in [other.start, other.end] {
                if self.contains_point(&p, tol)
                    && !shared.iter().any(|q| points_equal(&p, q, tol))
                {
                    shared.push(p);
                }
            }
            shared.sort_by(|p, q| {
                angle_between(&self.start, p).total_cmp(&angle_between(&self.start, q))
            });
            return match shared.as_slice() {
                [] => ArcIntersection::None,
                [p] => ArcIntersection::Point(*p),
                [p, .., q] => ArcIntersection::Overlap(*p, *q),
            };
        }

        let t = line.normalize();
        for candidate in [t, -t] {
            if self.contains_point(&candidate, tol) && other.contains_point(&candidate, tol) {
                return ArcIntersection::Point(candidate);
            }
        }
        ArcIntersection::None
    }
}

/// Returns `true` if `p` lies on the shorter arc from `a` to `b`.
///
/// `p` must be within the tolerance of the great circle through `a` and `b`
/// and lie between the endpoints. Degenerate arcs contain nothing.
#[must_use]
pub fn arc_contains_point(a: &Vector3, b: &Vector3, p: &Vector3, tol: Tolerance) -> bool {
    let n = a.cross(b);
    let len = n.norm();
    if len < tol.eps() {
        return false;
    }
    let n = n / len;
    if n.dot(p).abs() > tol.eps() {
        return false;
    }
    a.cross(p).dot(&n) >= -tol.eps() && p.cross(b).dot(&n) >= -tol.eps()
}

/// Transversal crossing strictly inside both arcs `a→b` and `c→d`.
///
/// Uses exact sign tests: an endpoint lying on the other great circle never
/// counts as a crossing. Touches are handled separately with
/// [`arc_contains_point`].
#[must_use]
pub fn proper_crossing(a: &Vector3, b: &Vector3, c: &Vector3, d: &Vector3) -> Option<Vector3> {
    let m = a.cross(b);
    let n = c.cross(d);
    if !opposite_signs(m.dot(c), m.dot(d)) || !opposite_signs(n.dot(a), n.dot(b)) {
        return None;
    }
    let t = m.cross(&n).try_normalize(0.0)?;
    let s_ab = a.cross(&t).dot(&m) + t.cross(b).dot(&m);
    let s_cd = c.cross(&t).dot(&n) + t.cross(d).dot(&n);
    if (s_ab > 0.0) != (s_cd > 0.0) {
        return None;
    }
    Some(if s_ab > 0.0 { t } else { -t })
}

/// Half-open crossing test between the arc `p→q` and the edge `a→b`.
///
/// An edge endpoint lying exactly on the great circle through `p` and `q`
/// counts on one side only, so a path passing through a vertex is counted
/// once. Used for parity counting.
#[must_use]
pub fn crosses_half_open(p: &Vector3, q: &Vector3, a: &Vector3, b: &Vector3) -> bool {
    let n = p.cross(q);
    if (n.dot(a) > 0.0) == (n.dot(b) > 0.0) {
        return false;
    }
    let m = a.cross(b);
    if (m.dot(p) > 0.0) == (m.dot(q) > 0.0) {
        return false;
    }
    let t = m.cross(&n);
    let s_ab = a.cross(&t).dot(&m) + t.cross(b).dot(&m);
    let s_pq = p.cross(&t).dot(&n) + t.cross(q).dot(&n);
    (s_ab > 0.0) == (s_pq > 0.0)
}

fn opposite_signs(x: f64, y: f64) -> bool {
    (x > 0.0 && y < 0.0) || (x < 0.0 && y > 0.0)
}
