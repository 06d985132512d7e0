use tracing::debug;

use crate::error::{OperationError, Result};
use crate::math::orientation::loop_contains;
use crate::math::{Tolerance, Vector3};
use crate::polygon::{LoopData, SphericalPolygon};

use super::assemble::{build_loops, trace_loops};
use super::classify::{classify_ring, edge_set, node_directions, shared_nodes, EdgeClass};
use super::select::{should_keep_edge, BooleanOp, KeepDecision, RingSource};
use super::split::{split_rings, SplitRings};

/// Executes a boolean operation on two polygons.
///
/// Intersection clips every pair of loops and collects the pieces. Union
/// folds the loops of `b` into those of `a`, merging a loop with every
/// existing loop whose union with it is a single loop; anything that stays
/// separate becomes its own component.
pub fn boolean_execute(
    a: &SphericalPolygon,
    b: &SphericalPolygon,
    op: BooleanOp,
    tol: Tolerance,
) -> Result<SphericalPolygon> {
    match op {
        BooleanOp::Intersect => {
            if a.is_empty() || b.is_empty() {
                return Ok(SphericalPolygon::empty());
            }
            let mut pieces = Vec::new();
            for (_, la) in a.loops() {
                for (_, lb) in b.loops() {
                    pieces.extend(clip_loops(la, lb, op, tol)?);
                }
            }
            Ok(SphericalPolygon::from_loops(pieces))
        }
        BooleanOp::Union => {
            if a.is_empty() {
                return Ok(b.clone());
            }
            if b.is_empty() {
                return Ok(a.clone());
            }
            let mut result: Vec<LoopData> = a.loops().map(|(_, l)| l.clone()).collect();
            for (_, lb) in b.loops() {
                let merged = absorb(&mut result, lb.clone(), tol)?;
                result.push(merged);
            }
            Ok(SphericalPolygon::from_loops(result))
        }
    }
}

/// Repeatedly unions `incoming` with any loop of `result` that merges with
/// it into a single loop, removing the absorbed loops.
fn absorb(result: &mut Vec<LoopData>, mut incoming: LoopData, tol: Tolerance) -> Result<LoopData> {
    'merge: loop {
        for idx in 0..result.len() {
            let union = clip_loops(&result[idx], &incoming, BooleanOp::Union, tol)?;
            if let Ok([single]) = <[LoopData; 1]>::try_from(union) {
                incoming = single;
                result.remove(idx);
                continue 'merge;
            }
        }
        return Ok(incoming);
    }
}

/// Clips one loop against another.
///
/// # Errors
///
/// Returns an error if the loops cannot be split consistently, the boundary
/// walk fails, or the result is not representable as simple loops (an
/// annulus, a hole, or the whole sphere).
pub fn clip_loops(a: &LoopData, b: &LoopData, op: BooleanOp, tol: Tolerance) -> Result<Vec<LoopData>> {
    let split = split_rings(a.points(), b.points(), tol)?;
    let nodes = shared_nodes(&split.ring_a, &split.ring_b);
    debug!(
        ?op,
        crossings = split.crossings,
        nodes = nodes.len(),
        vertices = split.vertices.len(),
        "rings split"
    );

    if nodes.is_empty() {
        return handle_no_contact(a, b, &split, op, tol);
    }

    let directions = node_directions(&split.vertices, &split.ring_a, &split.ring_b, &nodes);
    let classes_a = classify_ring(&split.ring_a, RingSource::A, &directions, &edge_set(&split.ring_b))?;
    let classes_b = classify_ring(&split.ring_b, RingSource::B, &directions, &edge_set(&split.ring_a))?;

    let mut kept = Vec::new();
    collect_kept(&mut kept, &split.ring_a, &classes_a, RingSource::A, op);
    collect_kept(&mut kept, &split.ring_b, &classes_b, RingSource::B, op);
    debug!(kept = kept.len(), "sub-arcs selected");

    if kept.is_empty() {
        return match op {
            BooleanOp::Intersect => Ok(Vec::new()),
            BooleanOp::Union => Err(OperationError::CoversSphere.into()),
        };
    }

    let walks = trace_loops(&split.vertices, &kept)?;
    build_loops(&split.vertices, walks, a, b, op, tol)
}

fn collect_kept(
    kept: &mut Vec<(usize, usize)>,
    ring: &[usize],
    classes: &[EdgeClass],
    source: RingSource,
    op: BooleanOp,
) {
    let n = ring.len();
    for (i, &class) in classes.iter().enumerate() {
        if should_keep_edge(source, class, op) == KeepDecision::Keep {
            kept.push((ring[i], ring[(i + 1) % n]));
        }
    }
}

/// Handles loops whose boundaries never meet: one contains the other, they
/// are disjoint, or each contains the other (complementary regions).
fn handle_no_contact(
    a: &LoopData,
    b: &LoopData,
    split: &SplitRings,
    op: BooleanOp,
    tol: Tolerance,
) -> Result<Vec<LoopData>> {
    let ring_points = |ring: &[usize]| -> Vec<Vector3> { ring.iter().map(|&k| split.vertices[k]).collect() };
    let points_a = ring_points(&split.ring_a);
    let points_b = ring_points(&split.ring_b);

    let a_in_b = loop_contains(&points_b, b.inside(), &points_a[0], tol);
    let b_in_a = loop_contains(&points_a, a.inside(), &points_b[0], tol);
    debug!(a_in_b, b_in_a, "boundaries do not meet");

    match (op, a_in_b, b_in_a) {
        (BooleanOp::Intersect, true, true) => Err(OperationError::Annulus.into()),
        (BooleanOp::Intersect, true, false) => Ok(vec![a.clone()]),
        (BooleanOp::Intersect, false, true) => Ok(vec![b.clone()]),
        (BooleanOp::Intersect, false, false) => Ok(Vec::new()),
        (BooleanOp::Union, true, true) => Err(OperationError::CoversSphere.into()),
        (BooleanOp::Union, true, false) => Ok(vec![b.clone()]),
        (BooleanOp::Union, false, true) => Ok(vec![a.clone()]),
        (BooleanOp::Union, false, false) => Ok(vec![a.clone(), b.clone()]),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SkyclipError;
    use crate::math::vector::{lonlat_to_vector, perpendicular, rotate_around};
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn cone(lon: f64, lat: f64, radius: f64, steps: usize) -> SphericalPolygon {
        SphericalPolygon::from_cone(lon, lat, radius, steps).unwrap()
    }

    /// The complement of a cone: same boundary, inside point at the antipode.
    fn cone_complement(lon: f64, lat: f64, radius: f64, steps: usize) -> SphericalPolygon {
        let center = lonlat_to_vector(lon, lat);
        let pen = rotate_around(&center, &perpendicular(&center), radius.to_radians());
        #[allow(clippy::cast_precision_loss)]
        let points: Vec<_> = (0..steps)
            .map(|k| rotate_around(&pen, &center, TAU * k as f64 / steps as f64))
            .collect();
        SphericalPolygon::from_points(&points, &(-center)).unwrap()
    }

    fn first_loop(p: &SphericalPolygon) -> &LoopData {
        p.loops().next().unwrap().1
    }

    fn run(a: &SphericalPolygon, b: &SphericalPolygon, op: BooleanOp) -> Result<SphericalPolygon> {
        boolean_execute(a, b, op, Tolerance::default())
    }

    // ── Intersection ──

    #[test]
    fn intersect_overlapping_cones() {
        let a = cone(0.0, 0.0, 5.0, 24);
        let b = cone(4.0, 0.0, 5.0, 24);
        let r = run(&a, &b, BooleanOp::Intersect).unwrap();
        assert_eq!(r.loop_count(), 1);
        assert_relative_eq!(r.area(), 0.011_873_451_931_240_453, epsilon = 1e-9);
        assert!(r.area() < a.area() && r.area() < b.area());
        assert!(r.contains_lonlat(2.0, 0.0));
        assert!(!r.contains_lonlat(-2.0, 0.0));
    }

    #[test]
    fn intersect_contained_returns_inner() {
        let outer = cone(0.0, 0.0, 10.0, 16);
        let inner = cone(1.0, 1.0, 2.0, 16);
        let r = run(&outer, &inner, BooleanOp::Intersect).unwrap();
        assert_eq!(r.vertex_count(), 16);
        assert_relative_eq!(r.area(), inner.area(), epsilon = 1e-14);
        let r = run(&inner, &outer, BooleanOp::Intersect).unwrap();
        assert_relative_eq!(r.area(), inner.area(), epsilon = 1e-14);
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let r = run(&cone(0.0, 0.0, 10.0, 16), &cone(90.0, 0.0, 2.0, 16), BooleanOp::Intersect).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn intersect_identical_keeps_area() {
        let a = cone(10.0, 20.0, 5.0, 16);
        let b = cone(10.0, 20.0, 5.0, 16);
        let r = run(&a, &b, BooleanOp::Intersect).unwrap();
        assert_eq!(r.vertex_count(), 16);
        assert_relative_eq!(r.area(), a.area(), epsilon = 1e-12);
    }

    #[test]
    fn intersect_near_pole() {
        let r = run(&cone(0.0, 89.0, 3.0, 16), &cone(180.0, 89.0, 3.0, 16), BooleanOp::Intersect).unwrap();
        assert_eq!(r.loop_count(), 1);
        assert_eq!(r.vertex_count(), 16);
        assert_relative_eq!(r.area(), 0.004_858_858_338_018_024, epsilon = 1e-9);
        assert!(r.contains_lonlat(0.0, 90.0));
    }

    #[test]
    fn intersect_with_complement_is_empty() {
        let a = cone(0.0, 0.0, 5.0, 16);
        let r = run(&a, &cone_complement(0.0, 0.0, 5.0, 16), BooleanOp::Intersect).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn intersect_annulus_is_reported() {
        let err = run(&cone(0.0, 0.0, 10.0, 16), &cone_complement(0.0, 0.0, 5.0, 16), BooleanOp::Intersect)
            .unwrap_err();
        assert!(matches!(err, SkyclipError::Operation(OperationError::Annulus)));
    }

    #[test]
    fn intersect_two_components_with_bridge() {
        let pair = run(&cone(0.0, 0.0, 3.0, 16), &cone(10.0, 0.0, 3.0, 16), BooleanOp::Union).unwrap();
        let r = run(&pair, &cone(5.0, 0.0, 4.0, 16), BooleanOp::Intersect).unwrap();
        assert_eq!(r.loop_count(), 2);
        assert_relative_eq!(r.area(), 0.003_760_034_612_334_983_7, epsilon = 1e-9);
    }

    // ── Union ──

    #[test]
    fn union_overlapping_cones() {
        let a = cone(0.0, 0.0, 5.0, 24);
        let b = cone(4.0, 0.0, 5.0, 24);
        let u = run(&a, &b, BooleanOp::Union).unwrap();
        let i = run(&a, &b, BooleanOp::Intersect).unwrap();
        assert_eq!(u.loop_count(), 1);
        assert_eq!(u.vertex_count(), 32);
        assert_relative_eq!(u.area(), a.area() + b.area() - i.area(), epsilon = 1e-12);
    }

    #[test]
    fn union_contained_returns_outer() {
        let outer = cone(0.0, 0.0, 10.0, 16);
        let u = run(&outer, &cone(1.0, 1.0, 2.0, 16), BooleanOp::Union).unwrap();
        assert_eq!(u.loop_count(), 1);
        assert_relative_eq!(u.area(), outer.area(), epsilon = 1e-14);
    }

    #[test]
    fn union_disjoint_keeps_both() {
        let a = cone(0.0, 0.0, 10.0, 16);
        let b = cone(90.0, 0.0, 2.0, 16);
        let u = run(&a, &b, BooleanOp::Union).unwrap();
        assert_eq!(u.loop_count(), 2);
        assert_relative_eq!(u.area(), a.area() + b.area(), epsilon = 1e-14);
    }

    #[test]
    fn union_with_complement_covers_sphere() {
        let a = cone(0.0, 0.0, 5.0, 16);
        let err = run(&a, &cone_complement(0.0, 0.0, 5.0, 16), BooleanOp::Union).unwrap_err();
        assert!(matches!(err, SkyclipError::Operation(OperationError::CoversSphere)));
    }

    #[test]
    fn union_merges_bridging_loop() {
        let pair = run(&cone(0.0, 0.0, 3.0, 16), &cone(10.0, 0.0, 3.0, 16), BooleanOp::Union).unwrap();
        assert_eq!(pair.loop_count(), 2);
        let bridge = cone(5.0, 0.0, 4.0, 16);
        let u = run(&pair, &bridge, BooleanOp::Union).unwrap();
        assert_eq!(u.loop_count(), 1);
        assert!(u.contains_lonlat(0.0, 0.0) && u.contains_lonlat(10.0, 0.0));
    }

    // ── Empty operands ──

    #[test]
    fn empty_operands() {
        let a = cone(0.0, 0.0, 5.0, 16);
        let empty = SphericalPolygon::empty();
        assert!(run(&a, &empty, BooleanOp::Intersect).unwrap().is_empty());
        assert!(run(&empty, &a, BooleanOp::Intersect).unwrap().is_empty());
        assert_eq!(run(&a, &empty, BooleanOp::Union).unwrap().vertex_count(), 16);
        assert_eq!(run(&empty, &a, BooleanOp::Union).unwrap().vertex_count(), 16);
    }

    #[test]
    fn clip_loops_commutes_on_area() {
        let a = cone(0.0, 30.0, 6.0, 10);
        let b = cone(5.0, 33.0, 4.0, 7);
        let tol = Tolerance::default();
        let ab = clip_loops(first_loop(&a), first_loop(&b), BooleanOp::Intersect, tol).unwrap();
        let ba = clip_loops(first_loop(&b), first_loop(&a), BooleanOp::Intersect, tol).unwrap();
        let area = |loops: &[LoopData]| loops.iter().map(LoopData::area).sum::<f64>();
        assert_relative_eq!(area(&ab), area(&ba), epsilon = 1e-12);
        assert_eq!(
            ab.iter().map(LoopData::vertex_count).sum::<usize>(),
            ba.iter().map(LoopData::vertex_count).sum::<usize>()
        );
    }
}
