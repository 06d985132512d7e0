mod loop_data;

pub use loop_data::{LoopData, LoopId};

use slotmap::SlotMap;

use crate::error::Result;
use crate::math::vector::{lonlat_to_vector, vector_to_lonlat};
use crate::math::{Tolerance, Vector3};
use crate::operations::boolean::{Intersect, MultiIntersect, MultiUnion, ReductionMethod, Union};
use crate::operations::creation::{MakeCone, MakePolygon};
use crate::operations::query::{Area, ContainsPoint, Overlap};

/// A region of the sphere bounded by one or more loops.
///
/// Loops live in an arena and are referenced by [`LoopId`]. Each loop owns
/// its vertices and inside point, so no data is shared between loops or
/// between polygons. A polygon with no loops is the empty set.
///
/// Polygons are never mutated after construction: every boolean operation
/// returns a new polygon.
#[derive(Debug, Clone, Default)]
pub struct SphericalPolygon {
    loops: SlotMap<LoopId, LoopData>,
}

impl SphericalPolygon {
    /// Creates the empty polygon.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a polygon from already validated loops.
    pub(crate) fn from_loops(loops: impl IntoIterator<Item = LoopData>) -> Self {
        let mut arena = SlotMap::with_key();
        for data in loops {
            arena.insert(data);
        }
        Self { loops: arena }
    }

    /// Creates a single-loop polygon from unit vectors and an inside point.
    ///
    /// An empty point list yields the empty polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is malformed (see [`LoopData::new`]).
    pub fn from_points(points: &[Vector3], inside: &Vector3) -> Result<Self> {
        MakePolygon::new(points.to_vec(), *inside).execute()
    }

    /// Creates a single-loop polygon from `(longitude, latitude)` pairs in
    /// degrees.
    ///
    /// When `inside` is `None` the normalized mean of the vertices is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop is malformed or, with no inside point
    /// given, the vertex mean is degenerate or lands on the boundary.
    pub fn from_lonlat(lonlat: &[(f64, f64)], inside: Option<(f64, f64)>) -> Result<Self> {
        MakePolygon::from_lonlat(lonlat, inside).execute()
    }

    /// Creates a polygon approximating a small circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius or step count is out of range.
    pub fn from_cone(lon: f64, lat: f64, radius: f64, steps: usize) -> Result<Self> {
        MakeCone::new(lon, lat, radius, steps).execute()
    }

    /// Returns `true` if the polygon has no loops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Number of loops.
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Total number of vertices across all loops.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.loops.values().map(LoopData::vertex_count).sum()
    }

    /// Returns a loop by ID.
    #[must_use]
    pub fn get(&self, id: LoopId) -> Option<&LoopData> {
        self.loops.get(id)
    }

    /// Iterates over the loops in insertion order.
    pub fn loops(&self) -> impl Iterator<Item = (LoopId, &LoopData)> {
        self.loops.iter()
    }

    /// All vertices, loop after loop.
    #[must_use]
    pub fn points(&self) -> Vec<Vector3> {
        self.loops
            .values()
            .flat_map(|l| l.points().iter().copied())
            .collect()
    }

    /// The inside point of every loop.
    #[must_use]
    pub fn inside_points(&self) -> Vec<Vector3> {
        self.loops.values().map(|l| *l.inside()).collect()
    }

    /// Vertices of each loop as `(longitude, latitude)` pairs in degrees.
    #[must_use]
    pub fn to_lonlat(&self) -> Vec<Vec<(f64, f64)>> {
        self.loops.values().map(LoopData::to_lonlat).collect()
    }

    /// Inside points as `(longitude, latitude)` pairs in degrees.
    #[must_use]
    pub fn inside_lonlat(&self) -> Vec<(f64, f64)> {
        self.loops.values().map(|l| vector_to_lonlat(l.inside())).collect()
    }

    /// Area in steradians. The empty polygon has area zero.
    #[must_use]
    pub fn area(&self) -> f64 {
        Area::new(self).execute()
    }

    /// Returns `true` if `point` lies in the polygon.
    #[must_use]
    pub fn contains_point(&self, point: &Vector3) -> bool {
        ContainsPoint::new(self, *point).execute()
    }

    /// Like [`contains_point`](Self::contains_point) with an explicit tolerance.
    #[must_use]
    pub fn contains_point_with(&self, point: &Vector3, tol: Tolerance) -> bool {
        ContainsPoint::new(self, *point).with_tolerance(tol).execute()
    }

    /// Returns `true` if the given sky position lies in the polygon.
    #[must_use]
    pub fn contains_lonlat(&self, lon: f64, lat: f64) -> bool {
        self.contains_point(&lonlat_to_vector(lon, lat))
    }

    /// Intersection with another polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails structurally.
    pub fn intersection(&self, other: &SphericalPolygon) -> Result<SphericalPolygon> {
        Intersect::new(self, other).execute()
    }

    /// Union with another polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails structurally or the result cannot
    /// be represented (holes, whole sphere).
    pub fn union(&self, other: &SphericalPolygon) -> Result<SphericalPolygon> {
        Union::new(self, other).execute()
    }

    /// Returns `true` if the two polygons share any area.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails structurally.
    pub fn intersects(&self, other: &SphericalPolygon) -> Result<bool> {
        Ok(!self.intersection(other)?.is_empty())
    }

    /// Fraction of this polygon's area covered by `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if clipping fails structurally.
    pub fn overlap(&self, other: &SphericalPolygon) -> Result<f64> {
        Overlap::new(self, other).execute()
    }

    /// Intersection of all given polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or clipping fails.
    pub fn multi_intersection(
        polygons: &[SphericalPolygon],
        method: ReductionMethod,
    ) -> Result<SphericalPolygon> {
        MultiIntersect::new(polygons).method(method).execute()
    }

    /// Union of all given polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or clipping fails.
    pub fn multi_union(polygons: &[SphericalPolygon]) -> Result<SphericalPolygon> {
        MultiUnion::new(polygons).execute()
    }
}
