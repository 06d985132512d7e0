use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{OperationError, Result};
use crate::math::orientation::{edges_longest_first, left_probe, loop_area, on_boundary, turn_angle};
use crate::math::{Tolerance, Vector3};
use crate::polygon::LoopData;

use super::select::BooleanOp;

/// Probe offsets, as fractions of edge length, tried when placing the inside
/// point of a result loop.
const INSIDE_PROBES: [f64; 3] = [1e-3, 1e-6, 1e-9];

/// Links kept sub-arcs into closed loops of vertex IDs.
///
/// Each walk starts at the lowest unused edge and, at every vertex, takes the
/// unused outgoing edge that turns furthest left (lowest index on ties). Edge
/// usage is tracked in an explicit table and every walk is bounded by the
/// number of kept edges. Every step consumes an unused edge, so the bound
/// only trips if that invariant is broken.
///
/// # Errors
///
/// Returns [`OperationError::ClipNonTermination`] if a walk exceeds the bound
/// and [`OperationError::OpenBoundary`] if it reaches a dead end.
pub fn trace_loops(vertices: &[Vector3], kept: &[(usize, usize)]) -> Result<Vec<Vec<usize>>> {
    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (k, &(s, _)) in kept.iter().enumerate() {
        outgoing.entry(s).or_default().push(k);
    }

    let bound = kept.len();
    let mut used = vec![false; kept.len()];
    let mut walks = Vec::new();

    for first in 0..kept.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let start = kept[first].0;
        let mut current = first;
        let mut walk = vec![start];
        let mut steps = 0;

        loop {
            steps += 1;
            if steps > bound {
                return Err(OperationError::ClipNonTermination { steps, bound }.into());
            }
            let (s, e) = kept[current];
            if e == start {
                break;
            }
            walk.push(e);

            let turn = |k: usize| turn_angle(&vertices[s], &vertices[e], &vertices[kept[k].1]);
            let next = outgoing
                .get(&e)
                .into_iter()
                .flatten()
                .copied()
                .filter(|&k| !used[k])
                .max_by(|&x, &y| turn(x).total_cmp(&turn(y)).then(y.cmp(&x)))
                .ok_or(OperationError::OpenBoundary)?;
            used[next] = true;
            current = next;
        }
        trace!(vertices = walk.len(), "closed walk");
        walks.push(walk);
    }
    Ok(walks)
}

/// Turns closed walks into result loops, each with a verified inside point.
///
/// Walks shorter than three vertices are dropped, as are slivers with
/// negligible area where no probe lands inside.
///
/// # Errors
///
/// Returns [`OperationError::InsidePointNotFound`] for a loop of real area
/// with no usable probe, and [`OperationError::NonSimpleResult`] if one loop
/// ends up inside another.
pub fn build_loops(
    vertices: &[Vector3],
    walks: Vec<Vec<usize>>,
    a: &LoopData,
    b: &LoopData,
    op: BooleanOp,
    tol: Tolerance,
) -> Result<Vec<LoopData>> {
    let mut loops = Vec::with_capacity(walks.len());
    for walk in walks {
        if walk.len() < 3 {
            trace!(vertices = walk.len(), "dropping degenerate walk");
            continue;
        }
        let points: Vec<Vector3> = walk.into_iter().map(|k| vertices[k]).collect();
        let Some(inside) = find_inside_point(&points, a, b, op, tol) else {
            let area = loop_area(&points);
            if area.abs() < tol.eps() {
                debug!(area, vertices = points.len(), "dropping sliver loop");
                continue;
            }
            return Err(OperationError::InsidePointNotFound.into());
        };
        loops.push(LoopData::from_canonical(points, inside));
    }
    ensure_simple(&loops, tol)?;
    Ok(loops)
}

/// Finds a point just left of one of the loop's edges that belongs to the
/// result of `op` applied to the two operands.
fn find_inside_point(
    points: &[Vector3],
    a: &LoopData,
    b: &LoopData,
    op: BooleanOp,
    tol: Tolerance,
) -> Option<Vector3> {
    let n = points.len();
    let order = edges_longest_first(points);
    for fraction in INSIDE_PROBES {
        for &i in &order {
            let probe = left_probe(&points[i], &points[(i + 1) % n], fraction);
            if on_boundary(points, &probe, tol) {
                continue;
            }
            if op.admits(a.contains(&probe, tol), b.contains(&probe, tol)) {
                return Some(probe);
            }
        }
    }
    None
}

/// Rejects results where a vertex of one loop lies strictly inside another,
/// which would make the inner loop a hole.
fn ensure_simple(loops: &[LoopData], tol: Tolerance) -> Result<()> {
    if loops.len() < 2 {
        return Ok(());
    }
    for (i, outer) in loops.iter().enumerate() {
        for (j, inner) in loops.iter().enumerate() {
            if i == j {
                continue;
            }
            let nested = inner
                .points()
                .iter()
                .any(|p| outer.contains(p, tol) && !outer.is_on_boundary(p, tol));
            if nested {
                return Err(OperationError::NonSimpleResult.into());
            }
        }
    }
    Ok(())
}
