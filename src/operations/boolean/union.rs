use crate::error::Result;
use crate::math::Tolerance;
use crate::polygon::SphericalPolygon;

use super::engine::boolean_execute;
use super::select::BooleanOp;

/// Computes the boolean union of two polygons.
///
/// Overlapping components merge into one loop; disjoint ones stay separate.
pub struct Union<'a> {
    a: &'a SphericalPolygon,
    b: &'a SphericalPolygon,
    tolerance: Tolerance,
}

impl<'a> Union<'a> {
    /// Creates a new `Union` operation.
    #[must_use]
    pub fn new(a: &'a SphericalPolygon, b: &'a SphericalPolygon) -> Self {
        Self {
            a,
            b,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the union.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails or the union covers the whole sphere.
    pub fn execute(&self) -> Result<SphericalPolygon> {
        boolean_execute(self.a, self.b, BooleanOp::Union, self.tolerance)
    }
}
