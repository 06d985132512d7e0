mod area;
mod contains_point;
mod is_valid;
mod overlap;

pub use area::Area;
pub use contains_point::ContainsPoint;
pub use is_valid::IsValid;
pub use overlap::Overlap;
