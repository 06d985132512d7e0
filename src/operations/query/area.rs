use crate::polygon::{LoopData, SphericalPolygon};

/// Computes the area of a polygon in steradians.
///
/// Each loop contributes the area of the region it encloses on its left;
/// the total is the sum over all loops.
pub struct Area<'a> {
    polygon: &'a SphericalPolygon,
}

impl<'a> Area<'a> {
    /// Creates a new `Area` query.
    #[must_use]
    pub fn new(polygon: &'a SphericalPolygon) -> Self {
        Self { polygon }
    }

    /// Executes the query. The empty polygon has area zero.
    #[must_use]
    pub fn execute(&self) -> f64 {
        self.polygon.loops().map(|(_, l)| LoopData::area(l)).sum()
    }
}
