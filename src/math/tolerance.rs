use crate::error::{GeometryError, Result};

use super::TOLERANCE;

/// Largest tolerance accepted by [`Tolerance::new`].
const MAX_TOLERANCE: f64 = 1e-3;

/// Distance threshold shared by every predicate in the crate.
///
/// Two unit vectors closer than `eps` are the same point, a point within
/// `eps` of a great circle lies on it, and so on. All components must agree
/// on one value, so it is passed explicitly rather than read from a global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Creates a validated tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `eps` is not finite or lies outside `(0, 1e-3]`.
    pub fn new(eps: f64) -> Result<Self> {
        if !eps.is_finite() || eps <= 0.0 || eps > MAX_TOLERANCE {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "tolerance",
                value: eps,
                min: 0.0,
                max: MAX_TOLERANCE,
            }
            .into());
        }
        Ok(Self(eps))
    }

    /// Returns the raw threshold.
    #[must_use]
    pub fn eps(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(TOLERANCE)
    }
}
