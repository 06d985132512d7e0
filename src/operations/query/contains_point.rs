use crate::math::{Tolerance, Vector3};
use crate::polygon::SphericalPolygon;

/// Tests whether a point lies in any loop of a polygon.
///
/// Points on a boundary count as contained.
pub struct ContainsPoint<'a> {
    polygon: &'a SphericalPolygon,
    point: Vector3,
    tolerance: Tolerance,
}

impl<'a> ContainsPoint<'a> {
    /// Creates a new `ContainsPoint` query.
    #[must_use]
    pub fn new(polygon: &'a SphericalPolygon, point: Vector3) -> Self {
        Self {
            polygon,
            point,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the query. Nothing is contained in the empty polygon.
    #[must_use]
    pub fn execute(&self) -> bool {
        let Some(point) = self.point.try_normalize(0.0) else {
            return false;
        };
        self.polygon
            .loops()
            .any(|(_, l)| l.is_on_boundary(&point, self.tolerance) || l.contains(&point, self.tolerance))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::vector::lonlat_to_vector;

    #[test]
    fn cone_contains_nearby_points() {
        let cone = SphericalPolygon::from_cone(30.0, 40.0, 5.0, 12).unwrap();
        assert!(ContainsPoint::new(&cone, lonlat_to_vector(30.0, 40.0)).execute());
        assert!(ContainsPoint::new(&cone, lonlat_to_vector(31.0, 41.0)).execute());
        assert!(!ContainsPoint::new(&cone, lonlat_to_vector(30.0, 50.0)).execute());
        assert!(!ContainsPoint::new(&cone, lonlat_to_vector(210.0, -40.0)).execute());
    }

    #[test]
    fn unnormalized_point_is_scaled() {
        let cone = SphericalPolygon::from_cone(0.0, 0.0, 5.0, 12).unwrap();
        assert!(ContainsPoint::new(&cone, Vector3::new(3.0, 0.0, 0.0)).execute());
        assert!(!ContainsPoint::new(&cone, Vector3::zeros()).execute());
    }

    #[test]
    fn large_loop_contains_far_side() {
        let cone = SphericalPolygon::from_cone(0.0, 0.0, 120.0, 64).unwrap();
        assert!(ContainsPoint::new(&cone, lonlat_to_vector(100.0, 0.0)).execute());
        assert!(!ContainsPoint::new(&cone, lonlat_to_vector(180.0, 0.0)).execute());
    }

    #[test]
    fn vertex_is_contained_within_tolerance() {
        let cone = SphericalPolygon::from_cone(0.0, 0.0, 5.0, 12).unwrap();
        let vertex = cone.points()[3];
        let tol = Tolerance::new(1e-6).unwrap();
        assert!(ContainsPoint::new(&cone, vertex).with_tolerance(tol).execute());
    }
}
