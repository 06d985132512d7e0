mod assemble;
mod classify;
mod engine;
mod intersect_op;
mod multi;
mod select;
mod split;
mod union;

pub use classify::EdgeClass;
pub use intersect_op::Intersect;
pub use multi::{MultiIntersect, MultiUnion, ReductionMethod};
pub use select::BooleanOp;
pub use union::Union;
