use crate::error::Result;
use crate::math::Tolerance;
use crate::polygon::SphericalPolygon;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean intersection of two polygons.
pub struct Intersect<'a> {
    a: &'a SphericalPolygon,
    b: &'a SphericalPolygon,
    tolerance: Tolerance,
}

impl<'a> Intersect<'a> {
    /// Creates a new `Intersect` operation.
    #[must_use]
    pub fn new(a: &'a SphericalPolygon, b: &'a SphericalPolygon) -> Self {
        Self {
            a,
            b,
            tolerance: Tolerance::default(),
        }
    }

    /// Overrides the tolerance used for vertex unification and containment.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the intersection. An empty operand yields the empty polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails or the result would be an annulus.
    pub fn execute(&self) -> Result<SphericalPolygon> {
        boolean_execute(self.a, self.b, BooleanOp::Intersect, self.tolerance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn coarse_tolerance_still_clips() {
        let a = SphericalPolygon::from_cone(0.0, 0.0, 5.0, 24).unwrap();
        let b = SphericalPolygon::from_cone(4.0, 0.0, 5.0, 24).unwrap();
        let fine = Intersect::new(&a, &b).execute().unwrap();
        let coarse = Intersect::new(&a, &b)
            .with_tolerance(Tolerance::new(1e-8).unwrap())
            .execute()
            .unwrap();
        assert_eq!(fine.vertex_count(), coarse.vertex_count());
        assert!((fine.area() - coarse.area()).abs() < 1e-8);
    }
}
