use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::{OperationError, Result, SkyclipError};
use crate::math::Tolerance;
use crate::polygon::SphericalPolygon;

use super::intersect_op::Intersect;
use super::union::Union;

/// Strategy for reducing many polygons to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReductionMethod {
    /// Left fold in input order.
    Serial,
    /// Balanced pairwise tree; each level is intersected concurrently.
    #[default]
    Parallel,
}

impl fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionMethod::Serial => f.write_str("serial"),
            ReductionMethod::Parallel => f.write_str("parallel"),
        }
    }
}

impl FromStr for ReductionMethod {
    type Err = SkyclipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "serial" => Ok(ReductionMethod::Serial),
            "parallel" => Ok(ReductionMethod::Parallel),
            other => Err(OperationError::InvalidInput(format!("unknown reduction method '{other}'")).into()),
        }
    }
}

/// Intersects any number of polygons.
///
/// # Example
///
/// ```
/// use skyclip::operations::boolean::{MultiIntersect, ReductionMethod};
/// use skyclip::SphericalPolygon;
///
/// let cones = [
///     SphericalPolygon::from_cone(0.0, 60.0, 8.0, 16).unwrap(),
///     SphericalPolygon::from_cone(0.0, 68.0, 8.0, 16).unwrap(),
///     SphericalPolygon::from_cone(12.0, 66.0, 8.0, 16).unwrap(),
/// ];
/// let common = MultiIntersect::new(&cones)
///     .method(ReductionMethod::Serial)
///     .execute()
///     .unwrap();
/// assert_eq!(common.loop_count(), 1);
/// ```
pub struct MultiIntersect<'a> {
    polygons: &'a [SphericalPolygon],
    method: ReductionMethod,
    early_exit: bool,
    tolerance: Tolerance,
}

impl<'a> MultiIntersect<'a> {
    /// Creates a new `MultiIntersect` with the parallel method and early exit.
    #[must_use]
    pub fn new(polygons: &'a [SphericalPolygon]) -> Self {
        Self {
            polygons,
            method: ReductionMethod::default(),
            early_exit: true,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn method(mut self, method: ReductionMethod) -> Self {
        self.method = method;
        self
    }

    /// Whether to stop as soon as a partial result is empty.
    #[must_use]
    pub fn early_exit(mut self, early_exit: bool) -> Self {
        self.early_exit = early_exit;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the reduction.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] when no polygons are given,
    /// and propagates any error from a pairwise intersection.
    #[instrument(skip(self), fields(polygons = self.polygons.len(), method = %self.method))]
    pub fn execute(&self) -> Result<SphericalPolygon> {
        if self.polygons.is_empty() {
            return Err(OperationError::InvalidInput("no polygons to intersect".into()).into());
        }
        match self.method {
            ReductionMethod::Serial => self.serial(),
            ReductionMethod::Parallel => self.tree(),
        }
    }

    fn serial(&self) -> Result<SphericalPolygon> {
        let Some((first, rest)) = self.polygons.split_first() else {
            return Ok(SphericalPolygon::empty());
        };
        let mut acc = first.clone();
        for (step, next) in rest.iter().enumerate() {
            if self.early_exit && acc.is_empty() {
                debug!(step, "partial intersection is empty");
                return Ok(SphericalPolygon::empty());
            }
            acc = Intersect::new(&acc, next).with_tolerance(self.tolerance).execute()?;
        }
        Ok(acc)
    }

    fn tree(&self) -> Result<SphericalPolygon> {
        let mut level: Vec<SphericalPolygon> = self.polygons.to_vec();
        let mut depth = 0;
        while level.len() > 1 {
            debug!(depth, size = level.len(), "reducing level");
            level = reduce_level(&level, self.tolerance)?;
            depth += 1;
            if self.early_exit && level.iter().any(SphericalPolygon::is_empty) {
                debug!(depth, "partial intersection is empty");
                return Ok(SphericalPolygon::empty());
            }
        }
        Ok(level.pop().unwrap_or_default())
    }
}

/// Intersects neighbouring pairs; an odd last polygon passes through.
fn reduce_level(level: &[SphericalPolygon], tol: Tolerance) -> Result<Vec<SphericalPolygon>> {
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        level.par_chunks(2).map(|pair| reduce_pair(pair, tol)).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        level.chunks(2).map(|pair| reduce_pair(pair, tol)).collect()
    }
}

fn reduce_pair(pair: &[SphericalPolygon], tol: Tolerance) -> Result<SphericalPolygon> {
    match pair {
        [a, b, ..] => Intersect::new(a, b).with_tolerance(tol).execute(),
        [a] => Ok(a.clone()),
        [] => Ok(SphericalPolygon::empty()),
    }
}

/// Unions any number of polygons with a left fold.
pub struct MultiUnion<'a> {
    polygons: &'a [SphericalPolygon],
    tolerance: Tolerance,
}

impl<'a> MultiUnion<'a> {
    #[must_use]
    pub fn new(polygons: &'a [SphericalPolygon]) -> Self {
        Self {
            polygons,
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the reduction.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] when no polygons are given,
    /// and propagates any error from a pairwise union.
    #[instrument(skip(self), fields(polygons = self.polygons.len()))]
    pub fn execute(&self) -> Result<SphericalPolygon> {
        let Some((first, rest)) = self.polygons.split_first() else {
            return Err(OperationError::InvalidInput("no polygons to unite".into()).into());
        };
        rest.iter().try_fold(first.clone(), |acc, next| {
            Union::new(&acc, next).with_tolerance(self.tolerance).execute()
        })
    }
}
