pub mod arc;
pub mod orientation;
pub mod tolerance;
pub mod vector;

pub use tolerance::Tolerance;

/// 3D vector type. Points on the sphere are unit vectors of this type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Default geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
