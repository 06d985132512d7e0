use crate::error::Result;
use crate::math::Tolerance;
use crate::polygon::SphericalPolygon;

use crate::operations::boolean::Intersect;

/// Fraction of one polygon's area that is covered by another.
pub struct Overlap<'a> {
    polygon: &'a SphericalPolygon,
    other: &'a SphericalPolygon,
    tolerance: Tolerance,
}

impl<'a> Overlap<'a> {
    /// Creates a new `Overlap` query measuring how much of `polygon` lies in
    /// `other`.
    #[must_use]
    pub fn new(polygon: &'a SphericalPolygon, other: &'a SphericalPolygon) -> Self {
        Self {
            polygon,
            other,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the query, returning a value in `[0, 1]`. A polygon with no
    /// area has no overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if the intersection fails.
    pub fn execute(&self) -> Result<f64> {
        let own = self.polygon.area();
        if own < self.tolerance.eps() {
            return Ok(0.0);
        }
        let common = Intersect::new(self.polygon, self.other)
            .with_tolerance(self.tolerance)
            .execute()?;
        Ok((common.area() / own).clamp(0.0, 1.0))
    }
}
