use std::collections::{BTreeSet, HashMap};

use crate::error::{PolygonError, Result};
use crate::math::arc::{arc_contains_point, proper_crossing};
use crate::math::vector::angle_between;
use crate::math::{Tolerance, Vector3};

/// Two loops rewritten over a shared vertex table, with every touch and
/// crossing inserted into both rings.
#[derive(Debug)]
pub struct SplitRings {
    /// Unified vertices; rings refer to them by index.
    pub vertices: Vec<Vector3>,
    pub ring_a: Vec<usize>,
    pub ring_b: Vec<usize>,
    /// Number of transversal crossings found.
    pub crossings: usize,
}

/// Splits the edges of two loops at every point where they meet.
///
/// Vertex IDs are assigned in a fixed order (A's vertices, B's vertices,
/// then crossings), which makes the tie-break on equal arc positions
/// deterministic.
///
/// # Errors
///
/// Returns an error if a loop collapses to fewer than three vertices once
/// points closer than the tolerance are unified.
pub fn split_rings(a: &[Vector3], b: &[Vector3], tol: Tolerance) -> Result<SplitRings> {
    let mut table = VertexTable::new(tol.eps());
    let ring_a = collapse_ring(a.iter().map(|p| table.get_or_insert(p)).collect());
    let ring_b = collapse_ring(b.iter().map(|p| table.get_or_insert(p)).collect());
    for ring in [&ring_a, &ring_b] {
        if ring.len() < 3 {
            return Err(PolygonError::TooFewVertices { count: ring.len() }.into());
        }
    }

    let (na, nb) = (ring_a.len(), ring_b.len());
    let mut inserts_a: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); na];
    let mut inserts_b: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); nb];
    let mut crossings = 0;

    for i in 0..na {
        let (s0, e0) = (ring_a[i], ring_a[(i + 1) % na]);
        for j in 0..nb {
            let (s1, e1) = (ring_b[j], ring_b[(j + 1) % nb]);
            let (pa, pb) = (table.point(s0), table.point(e0));
            let (pc, pd) = (table.point(s1), table.point(e1));

            // Endpoints of one edge resting on the other (touches, overlaps).
            for (id, p) in [(s1, pc), (e1, pd)] {
                if id != s0 && id != e0 && arc_contains_point(&pa, &pb, &p, tol) {
                    inserts_a[i].insert(id);
                }
            }
            for (id, p) in [(s0, pa), (e0, pb)] {
                if id != s1 && id != e1 && arc_contains_point(&pc, &pd, &p, tol) {
                    inserts_b[j].insert(id);
                }
            }

            if !all_distinct([s0, e0, s1, e1]) {
                continue;
            }
            if let Some(x) = proper_crossing(&pa, &pb, &pc, &pd) {
                crossings += 1;
                let id = table.get_or_insert(&x);
                if id != s0 && id != e0 {
                    inserts_a[i].insert(id);
                }
                if id != s1 && id != e1 {
                    inserts_b[j].insert(id);
                }
            }
        }
    }

    let ring_a = rebuild_ring(&ring_a, &inserts_a, &table.points);
    let ring_b = rebuild_ring(&ring_b, &inserts_b, &table.points);
    Ok(SplitRings {
        vertices: table.points,
        ring_a,
        ring_b,
        crossings,
    })
}

/// Inserts split points into each edge, ordered by distance from the edge
/// start and then by vertex ID.
fn rebuild_ring(ring: &[usize], inserts: &[BTreeSet<usize>], vertices: &[Vector3]) -> Vec<usize> {
    let n = ring.len();
    let mut out = Vec::with_capacity(n + inserts.iter().map(BTreeSet::len).sum::<usize>());
    for i in 0..n {
        let (start, end) = (ring[i], ring[(i + 1) % n]);
        out.push(start);
        let origin = vertices[start];
        let mut extra: Vec<(f64, usize)> = inserts[i]
            .iter()
            .filter(|&&k| k != start && k != end)
            .map(|&k| (angle_between(&origin, &vertices[k]), k))
            .collect();
        extra.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
        out.extend(extra.into_iter().map(|(_, k)| k));
    }
    collapse_ring(out)
}

/// Removes consecutive repeats, including a repeat across the wrap-around.
fn collapse_ring(mut ring: Vec<usize>) -> Vec<usize> {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn all_distinct(ids: [usize; 4]) -> bool {
    (0..4).all(|i| (i + 1..4).all(|j| ids[i] != ids[j]))
}

/// Unifies points closer than the tolerance into one vertex ID.
///
/// Points are bucketed on a grid of tolerance-sized cells; a lookup scans the
/// 3x3x3 neighbourhood, so any point within the tolerance is found. When
/// several stored points match, the lowest ID wins.
struct VertexTable {
    cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<Vector3>,
}

impl VertexTable {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_key(&self, p: &Vector3) -> (i64, i64, i64) {
        let inv = 1.0 / self.cell_size;
        (
            (p.x * inv).floor() as i64,
            (p.y * inv).floor() as i64,
            (p.z * inv).floor() as i64,
        )
    }

    fn point(&self, id: usize) -> Vector3 {
        self.points[id]
    }

    fn get_or_insert(&mut self, point: &Vector3) -> usize {
        let key = self.cell_key(point);

        let mut found: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (key.0 + dx, key.1 + dy, key.2 + dz);
                    let Some(ids) = self.cells.get(&neighbor) else {
                        continue;
                    };
                    for &id in ids {
                        if (point - self.points[id]).norm() < self.cell_size {
                            found = Some(found.map_or(id, |f| f.min(id)));
                        }
                    }
                }
            }
        }
        if let Some(id) = found {
            return id;
        }

        let id = self.points.len();
        self.points.push(*point);
        self.cells.entry(key).or_default().push(id);
        id
    }
}
