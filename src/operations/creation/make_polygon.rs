use crate::error::Result;
use crate::math::vector::{lonlat_to_vector, mean_direction};
use crate::math::{Tolerance, Vector3};
use crate::polygon::{LoopData, SphericalPolygon};

/// Where the inside point of a new polygon comes from.
#[derive(Debug, Clone, Copy)]
enum InsideSource {
    Given(Vector3),
    VertexMean,
}

/// Creates a single-loop polygon from an ordered vertex list.
///
/// The list may be explicitly closed (last point repeating the first) and may
/// wind either way; the loop is normalized to counter-clockwise winding around
/// its inside point.
pub struct MakePolygon {
    points: Vec<Vector3>,
    inside: InsideSource,
    tolerance: Tolerance,
}

impl MakePolygon {
    /// Creates a new `MakePolygon` operation from unit vectors.
    #[must_use]
    pub fn new(points: Vec<Vector3>, inside: Vector3) -> Self {
        Self {
            points,
            inside: InsideSource::Given(inside),
            tolerance: Tolerance::default(),
        }
    }

    /// Creates a new `MakePolygon` operation from `(longitude, latitude)`
    /// pairs in degrees, as produced by a footprint adapter.
    ///
    /// Without an explicit inside point, the normalized vertex mean is used.
    #[must_use]
    pub fn from_lonlat(lonlat: &[(f64, f64)], inside: Option<(f64, f64)>) -> Self {
        let points = lonlat
            .iter()
            .map(|&(lon, lat)| lonlat_to_vector(lon, lat))
            .collect();
        let inside = match inside {
            Some((lon, lat)) => InsideSource::Given(lonlat_to_vector(lon, lat)),
            None => InsideSource::VertexMean,
        };
        Self {
            points,
            inside,
            tolerance: Tolerance::default(),
        }
    }

    /// Overrides the tolerance used for validation.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is malformed (see [`LoopData::new`]) or,
    /// when the inside point is inferred, the vertices have no usable mean.
    pub fn execute(&self) -> Result<SphericalPolygon> {
        if self.points.is_empty() {
            return Ok(SphericalPolygon::empty());
        }
        let inside = match self.inside {
            InsideSource::Given(p) => p,
            InsideSource::VertexMean => mean_direction(&self.points)?,
        };
        let data = LoopData::new(&self.points, &inside, self.tolerance)?;
        Ok(SphericalPolygon::from_loops([data]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{PolygonError, SkyclipError};

    #[test]
    fn closed_and_open_lists_agree() {
        let open = [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)];
        let closed = [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 0.0)];
        let a = MakePolygon::from_lonlat(&open, None).execute().unwrap();
        let b = MakePolygon::from_lonlat(&closed, None).execute().unwrap();
        assert_eq!(a.vertex_count(), 3);
        assert_eq!(b.vertex_count(), 3);
        assert!((a.area() - b.area()).abs() < 1e-15);
    }

    #[test]
    fn two_points_are_rejected() {
        let err = MakePolygon::from_lonlat(&[(0.0, 0.0), (5.0, 0.0)], None)
            .execute()
            .unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::TooFewVertices { .. })));
    }

    #[test]
    fn coarse_tolerance_merges_close_vertices() {
        let pts = [(0.0, 0.0), (5.0, 0.0), (5.0, 1e-7), (5.0, 5.0)];
        assert!(MakePolygon::from_lonlat(&pts, Some((3.0, 1.0))).execute().is_ok());
        let coarse = Tolerance::new(1e-6).unwrap();
        let err = MakePolygon::from_lonlat(&pts, Some((3.0, 1.0)))
            .with_tolerance(coarse)
            .execute()
            .unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::DuplicateVertex { index: 2 })));
    }

    #[test]
    fn spike_has_no_orientation() {
        let spike = [(0.0, 0.0), (10.0, 0.0), (5.0, 0.0)];
        let err = MakePolygon::from_lonlat(&spike, Some((5.0, 5.0))).execute().unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::AmbiguousOrientation)));

        let folded = [(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (5.0, 0.0)];
        let err = MakePolygon::from_lonlat(&folded, Some((5.0, 5.0))).execute().unwrap_err();
        assert!(matches!(err, SkyclipError::Polygon(PolygonError::AmbiguousOrientation)));
    }
}
