use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::math::vector::perpendicular;
use crate::math::Vector3;

use super::select::RingSource;

/// Classification of a sub-arc relative to the other loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeClass {
    /// The sub-arc runs through the other loop's region.
    Inside,
    /// The sub-arc runs outside the other loop's region.
    Outside,
    /// The other ring has the same edge in the same direction.
    SharedSame,
    /// The other ring has the same edge in the opposite direction.
    SharedOpposite,
}

/// Tangent directions of both rings at a node, as angles in the tangent
/// plane. Index 0 is ring A, index 1 is ring B.
#[derive(Debug, Clone, Copy)]
pub struct NodeDirections {
    outgoing: [f64; 2],
    incoming: [f64; 2],
}

/// Vertex IDs present in both rings.
#[must_use]
pub fn shared_nodes(ring_a: &[usize], ring_b: &[usize]) -> HashSet<usize> {
    let in_b: HashSet<usize> = ring_b.iter().copied().collect();
    ring_a.iter().copied().filter(|k| in_b.contains(k)).collect()
}

/// Directed edges of a ring as `(start, end)` vertex-ID pairs.
#[must_use]
pub fn edge_set(ring: &[usize]) -> HashSet<(usize, usize)> {
    let n = ring.len();
    (0..n).map(|i| (ring[i], ring[(i + 1) % n])).collect()
}

/// Measures, at each node, the directions towards the neighbouring vertices
/// of both rings.
///
/// The outgoing direction points at the next vertex, the incoming one back at
/// the previous vertex.
#[must_use]
pub fn node_directions(
    vertices: &[Vector3],
    ring_a: &[usize],
    ring_b: &[usize],
    nodes: &HashSet<usize>,
) -> HashMap<usize, NodeDirections> {
    let pos_a = positions(ring_a);
    let pos_b = positions(ring_b);
    nodes
        .iter()
        .filter_map(|&v| {
            let frame = TangentFrame::at(&vertices[v]);
            let mut outgoing = [0.0; 2];
            let mut incoming = [0.0; 2];
            for (side, (ring, pos)) in [(ring_a, &pos_a), (ring_b, &pos_b)].into_iter().enumerate() {
                let i = *pos.get(&v)?;
                let n = ring.len();
                outgoing[side] = frame.angle_to(&vertices[ring[(i + 1) % n]]);
                incoming[side] = frame.angle_to(&vertices[ring[(i + n - 1) % n]]);
            }
            Some((v, NodeDirections { outgoing, incoming }))
        })
        .collect()
}

/// Classifies every sub-arc of one ring against the other ring.
///
/// Shared edges are recognised by their endpoint IDs. A sub-arc leaving or
/// entering a node is inside the other loop when its direction falls within
/// the other ring's interior sector there. Sub-arcs between nodes inherit the
/// class of the nearest preceding sub-arc that leaves a node, which is the
/// same along the whole chain for simple loops.
///
/// This sector test stands in for a point-in-region test at each sub-arc's
/// midpoint, which misclassifies near-coincident edges.
///
/// # Errors
///
/// Returns [`OperationError::InconsistentClassification`] if a chain has no
/// anchoring node or its two ends disagree.
pub fn classify_ring(
    ring: &[usize],
    own: RingSource,
    directions: &HashMap<usize, NodeDirections>,
    other_edges: &HashSet<(usize, usize)>,
) -> Result<Vec<EdgeClass>> {
    let (own, other) = match own {
        RingSource::A => (0, 1),
        RingSource::B => (1, 0),
    };
    let n = ring.len();
    let mut classes: Vec<Option<EdgeClass>> = vec![None; n];
    let mut at_start: Vec<Option<EdgeClass>> = vec![None; n];
    let mut at_end: Vec<Option<EdgeClass>> = vec![None; n];

    for i in 0..n {
        let (s, e) = (ring[i], ring[(i + 1) % n]);
        if other_edges.contains(&(s, e)) {
            classes[i] = Some(EdgeClass::SharedSame);
            continue;
        }
        if other_edges.contains(&(e, s)) {
            classes[i] = Some(EdgeClass::SharedOpposite);
            continue;
        }
        if let Some(d) = directions.get(&s) {
            at_start[i] = Some(side_of(d.outgoing[own], d, other));
        }
        if let Some(d) = directions.get(&e) {
            at_end[i] = Some(side_of(d.incoming[own], d, other));
        }
    }

    for i in 0..n {
        if classes[i].is_some() {
            continue;
        }
        let anchor = (0..n)
            .map(|back| (i + n - back) % n)
            .find_map(|j| at_start[j])
            .ok_or(OperationError::InconsistentClassification)?;
        if at_end[i].is_some_and(|c| c != anchor) {
            return Err(OperationError::InconsistentClassification.into());
        }
        classes[i] = Some(anchor);
    }

    Ok(classes.into_iter().flatten().collect())
}

/// Inside when `direction` lies strictly within the other ring's interior
/// sector, which runs counter-clockwise from its outgoing to its incoming
/// direction.
fn side_of(direction: f64, d: &NodeDirections, other: usize) -> EdgeClass {
    let from = d.outgoing[other];
    let to = d.incoming[other];
    let offset = (direction - from).rem_euclid(TAU);
    let span = (to - from).rem_euclid(TAU);
    if offset > 0.0 && offset < span {
        EdgeClass::Inside
    } else {
        EdgeClass::Outside
    }
}

/// Last position of each vertex ID in a ring.
fn positions(ring: &[usize]) -> HashMap<usize, usize> {
    ring.iter().enumerate().map(|(i, &k)| (k, i)).collect()
}

/// Orthonormal basis of the tangent plane at a point; angles are measured
/// counter-clockwise seen from outside the sphere.
struct TangentFrame {
    origin: Vector3,
    e1: Vector3,
    e2: Vector3,
}

impl TangentFrame {
    fn at(origin: &Vector3) -> Self {
        let e1 = perpendicular(origin);
        let e2 = origin.cross(&e1);
        Self {
            origin: *origin,
            e1,
            e2,
        }
    }

    fn angle_to(&self, w: &Vector3) -> f64 {
        let t = w - self.origin * self.origin.dot(w);
        t.dot(&self.e2).atan2(t.dot(&self.e1)).rem_euclid(TAU)
    }
}
