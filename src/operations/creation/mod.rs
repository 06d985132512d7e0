mod make_cone;
mod make_polygon;

pub use make_cone::MakeCone;
pub use make_polygon::MakePolygon;
