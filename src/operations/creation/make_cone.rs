use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::math::vector::{lonlat_to_vector, perpendicular, rotate_around};
use crate::math::Tolerance;
use crate::polygon::{LoopData, SphericalPolygon};

/// Creates a polygon approximating a small circle (a cone seen from the
/// sphere's center).
///
/// The first vertex is the center tilted by `radius` about an axis
/// perpendicular to it; the remaining vertices follow by rotating that point
/// about the center in `steps` equal increments. The center is the inside
/// point.
pub struct MakeCone {
    lon: f64,
    lat: f64,
    radius: f64,
    steps: usize,
    tolerance: Tolerance,
}

impl MakeCone {
    /// Creates a new `MakeCone` operation.
    ///
    /// `lon`, `lat` and `radius` are in degrees; `steps` is the number of
    /// distinct vertices.
    #[must_use]
    pub fn new(lon: f64, lat: f64, radius: f64, steps: usize) -> Self {
        Self {
            lon,
            lat,
            radius,
            steps,
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
    /// Returns an error if `steps < 3` or `radius` is not in `(0, 180)`.
    pub fn execute(&self) -> Result<SphericalPolygon> {
        if self.steps < 3 {
            return Err(
                OperationError::InvalidInput("cone needs at least 3 steps".into()).into(),
            );
        }
        if !(self.radius > 0.0 && self.radius < 180.0) {
            return Err(OperationError::InvalidInput(format!(
                "cone radius {} must be in (0, 180) degrees",
                self.radius
            ))
            .into());
        }

        let center = lonlat_to_vector(self.lon, self.lat);
        let pen = rotate_around(&center, &perpendicular(&center), self.radius.to_radians());
        #[allow(clippy::cast_precision_loss)]
        let step = TAU / self.steps as f64;
        let points: Vec<_> = (0..self.steps)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let angle = step * k as f64;
                rotate_around(&pen, &center, angle)
            })
            .collect();

        let data = LoopData::new(&points, &center, self.tolerance)?;
        Ok(SphericalPolygon::from_loops([data]))
    }
}
