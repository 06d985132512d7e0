//! Boolean operations on polygons drawn on the unit sphere.
//!
//! Polygons are sets of loops of great-circle arcs, each loop carrying a
//! point known to lie inside it. The crate intersects and unites such
//! polygons, pairwise or across many inputs, to reason about overlapping sky
//! footprints.
//!
//! ```
//! use skyclip::SphericalPolygon;
//!
//! let a = SphericalPolygon::from_cone(0.0, 0.0, 5.0, 24).unwrap();
//! let b = SphericalPolygon::from_cone(4.0, 0.0, 5.0, 24).unwrap();
//! let both = a.intersection(&b).unwrap();
//! assert!(both.area() < a.area());
//! assert!(both.contains_lonlat(2.0, 0.0));
//! ```

pub mod error;
pub mod io;
pub mod math;
pub mod operations;
pub mod polygon;

pub use error::{Result, SkyclipError};
pub use math::{Tolerance, Vector3};
pub use operations::boolean::ReductionMethod;
pub use polygon::{LoopData, LoopId, SphericalPolygon};
