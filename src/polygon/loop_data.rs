use crate::error::{PolygonError, Result};
use crate::math::arc::GreatCircleArc;
use crate::math::orientation::{edges, is_counter_clockwise, loop_area, loop_contains, on_boundary};
use crate::math::vector::{normalize, points_equal, vector_to_lonlat};
use crate::math::{Tolerance, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a loop within a polygon.
    pub struct LoopId;
}

/// A closed boundary loop together with a point inside its region.
///
/// Loops are always stored counter-clockwise as seen from outside the
/// sphere, so the region lies to the left of every edge.
#[derive(Debug, Clone)]
pub struct LoopData {
    points: Vec<Vector3>,
    inside: Vector3,
}

impl LoopData {
    /// Validates a vertex loop and brings it into canonical winding.
    ///
    /// Points are normalized, and a trailing repeat of the first point (an
    /// explicitly closed list) is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a point or the inside point has zero length
    /// - fewer than three vertices remain
    /// - two consecutive vertices coincide
    /// - an edge joins antipodal points
    /// - the inside point lies on an edge
    /// - the winding cannot be determined
    ///
    /// Simplicity is not checked: a self-intersecting vertex list is accepted
    /// and yields a meaningless area. Callers must pass simple loops.
    pub fn new(points: &[Vector3], inside: &Vector3, tol: Tolerance) -> Result<Self> {
        let mut points = points.iter().map(normalize).collect::<Result<Vec<_>>>()?;
        let inside = normalize(inside)?;

        if points.len() > 1 && points_equal(&points[0], &points[points.len() - 1], tol) {
            points.pop();
        }
        let n = points.len();
        if n < 3 {
            return Err(PolygonError::TooFewVertices { count: n }.into());
        }
        for i in 0..n {
            let next = (i + 1) % n;
            if points_equal(&points[i], &points[next], tol) {
                return Err(PolygonError::DuplicateVertex { index: next }.into());
            }
            GreatCircleArc::new(points[i], points[next], tol)?;
        }
        if on_boundary(&points, &inside, tol) {
            return Err(PolygonError::InsidePointOnBoundary.into());
        }
        if !is_counter_clockwise(&points, &inside, tol)? {
            points.reverse();
        }
        Ok(Self { points, inside })
    }

    /// Wraps a loop produced by the clip engine, which is canonical already.
    pub(crate) fn from_canonical(points: Vec<Vector3>, inside: Vector3) -> Self {
        Self { points, inside }
    }

    /// Returns the vertices in counter-clockwise order.
    #[must_use]
    pub fn points(&self) -> &[Vector3] {
        &self.points
    }

    /// Returns the inside point.
    #[must_use]
    pub fn inside(&self) -> &Vector3 {
        &self.inside
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Area of the enclosed region in steradians.
    #[must_use]
    pub fn area(&self) -> f64 {
        loop_area(&self.points)
    }

    /// Returns `true` if `p` lies in the loop's region.
    #[must_use]
    pub fn contains(&self, p: &Vector3, tol: Tolerance) -> bool {
        loop_contains(&self.points, &self.inside, p, tol)
    }

    /// Returns `true` if `p` lies on one of the loop's edges.
    #[must_use]
    pub fn is_on_boundary(&self, p: &Vector3, tol: Tolerance) -> bool {
        on_boundary(&self.points, p, tol)
    }

    /// Iterates over the edges as `(start, end)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&Vector3, &Vector3)> {
        edges(&self.points)
    }

    /// Vertices as `(longitude, latitude)` pairs in degrees.
    #[must_use]
    pub fn to_lonlat(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(vector_to_lonlat).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, SkyclipError};
    use crate::math::vector::lonlat_to_vector;
    use approx::assert_relative_eq;

    fn ll(lon: f64, lat: f64) -> Vector3 {
        lonlat_to_vector(lon, lat)
    }

    fn square() -> Vec<Vector3> {
        vec![ll(0.0, 0.0), ll(10.0, 0.0), ll(10.0, 10.0), ll(0.0, 10.0)]
    }

    #[test]
    fn keeps_ccw_input() {
        let lp = LoopData::new(&square(), &ll(5.0, 5.0), Tolerance::default()).unwrap();
        assert_relative_eq!(lp.points()[1], ll(10.0, 0.0), epsilon = 1e-15);
        assert!(lp.area() > 0.0 && lp.area() < 0.04);
    }

    #[test]
    fn reverses_clockwise_input() {
        let mut pts = square();
        pts.reverse();
        let lp = LoopData::new(&pts, &ll(5.0, 5.0), Tolerance::default()).unwrap();
        let ccw = LoopData::new(&square(), &ll(5.0, 5.0), Tolerance::default()).unwrap();
        assert_relative_eq!(lp.area(), ccw.area(), epsilon = 1e-14);
    }

    #[test]
    fn complement_has_complementary_area() {
        let tol = Tolerance::default();
        let lp = LoopData::new(&square(), &ll(5.0, 5.0), tol).unwrap();
        let outer = LoopData::new(&square(), &ll(185.0, -5.0), tol).unwrap();
        assert_relative_eq!(lp.area() + outer.area(), 4.0 * std::f64::consts::PI, epsilon = 1e-12);
        assert!(!outer.contains(&ll(5.0, 5.0), tol));
    }

    #[test]
    fn drops_closing_point() {
        let mut pts = square();
        pts.push(pts[0]);
        let lp = LoopData::new(&pts, &ll(5.0, 5.0), Tolerance::default()).unwrap();
        assert_eq!(lp.vertex_count(), 4);
    }

    #[test]
    fn rejects_too_few_vertices() {
        let pts = vec![ll(0.0, 0.0), ll(10.0, 0.0), ll(0.0, 0.0)];
        let err = LoopData::new(&pts, &ll(5.0, 5.0), Tolerance::default()).unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::TooFewVertices { count: 2 })));
    }

    #[test]
    fn rejects_repeated_vertex() {
        let pts = vec![ll(0.0, 0.0), ll(10.0, 0.0), ll(10.0, 0.0), ll(0.0, 10.0)];
        let err = LoopData::new(&pts, &ll(3.0, 3.0), Tolerance::default()).unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::DuplicateVertex { index: 2 })));
    }

    #[test]
    fn rejects_antipodal_edge() {
        let a = ll(0.0, 0.0);
        let pts = vec![a, -a, ll(90.0, 0.0)];
        let err = LoopData::new(&pts, &ll(45.0, 45.0), Tolerance::default()).unwrap_err();
        assert!(matches!(err, SkyclipError::Geometry(GeometryError::MalformedArc(_))));
    }

    #[test]
    fn rejects_inside_point_on_edge() {
        let err = LoopData::new(&square(), &ll(5.0, 0.0), Tolerance::default()).unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::InsidePointOnBoundary)));
    }

    #[test]
    fn lonlat_output_matches_input() {
        let lp = LoopData::new(&square(), &ll(5.0, 5.0), Tolerance::default()).unwrap();
        let coords = lp.to_lonlat();
        assert_relative_eq!(coords[2].0, 10.0, epsilon = 1e-9);
        assert_relative_eq!(coords[2].1, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn self_intersecting_input_is_not_rejected() {
        let bowtie = vec![ll(0.0, 0.0), ll(10.0, 10.0), ll(10.0, 0.0), ll(0.0, 10.0)];
        assert!(LoopData::new(&bowtie, &ll(2.0, 5.0), Tolerance::default()).is_ok());
    }
}
