use crate::math::orientation::on_boundary;
use crate::math::vector::points_equal;
use crate::math::{Tolerance, Vector3};
use crate::polygon::{LoopData, SphericalPolygon};

/// Validates the structural invariants of every loop in a polygon.
///
/// A loop is valid when it has at least three unit-length vertices, no two
/// consecutive vertices coincide, and its inside point is a unit vector off
/// the boundary.
pub struct IsValid<'a> {
    polygon: &'a SphericalPolygon,
    tolerance: Tolerance,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(polygon: &'a SphericalPolygon) -> Self {
        Self {
            polygon,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the validation, returning `true` if every loop is valid.
    #[must_use]
    pub fn execute(&self) -> bool {
        self.polygon.loops().all(|(_, l)| loop_is_valid(l, self.tolerance))
    }
}

fn loop_is_valid(data: &LoopData, tol: Tolerance) -> bool {
    let points = data.points();
    let n = points.len();
    let unit = |v: &Vector3| (v.norm() - 1.0).abs() < tol.eps();
    n >= 3
        && points.iter().all(unit)
        && (0..n).all(|i| !points_equal(&points[i], &points[(i + 1) % n], tol))
        && unit(data.inside())
        && !on_boundary(points, data.inside(), tol)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::vector::lonlat_to_vector;

    #[test]
    fn constructed_polygons_are_valid() {
        let cone = SphericalPolygon::from_cone(10.0, -20.0, 3.0, 9).unwrap();
        assert!(IsValid::new(&cone).execute());
        assert!(IsValid::new(&SphericalPolygon::empty()).execute());
    }

    #[test]
    fn clip_results_are_valid() {
        let a = SphericalPolygon::from_cone(0.0, 0.0, 5.0, 24).unwrap();
        let b = SphericalPolygon::from_cone(4.0, 0.0, 5.0, 24).unwrap();
        assert!(IsValid::new(&a.intersection(&b).unwrap()).execute());
        assert!(IsValid::new(&a.union(&b).unwrap()).execute());
    }

    #[test]
    fn inside_point_on_edge_is_invalid() {
        let pts = vec![lonlat_to_vector(0.0, 0.0), lonlat_to_vector(10.0, 0.0), lonlat_to_vector(5.0, 8.0)];
        let bad = LoopData::from_canonical(pts, lonlat_to_vector(5.0, 0.0));
        let polygon = SphericalPolygon::from_loops([bad]);
        assert!(!IsValid::new(&polygon).execute());
    }

    #[test]
    fn repeated_vertex_is_invalid() {
        let p = lonlat_to_vector(0.0, 0.0);
        let pts = vec![p, p, lonlat_to_vector(10.0, 0.0), lonlat_to_vector(5.0, 8.0)];
        let bad = LoopData::from_canonical(pts, lonlat_to_vector(5.0, 3.0));
        assert!(!IsValid::new(&SphericalPolygon::from_loops([bad])).execute());
    }
}
