use std::collections::HashSet;

use crate::connectivity_coder::{MAX_VALENCE, MIN_VALENCE};
use crate::corner_table::CornerTable;
use crate::geometry_indices::VertexIndex;
use crate::math_utils::{checked_dot_wide, triangle_normal, Vector3i};

/// One vertex picked for removal in the current decimation round, together
/// with its canonical ring and the fan chosen to retriangulate the hole.
#[derive(Debug, Clone)]
pub struct SelectedPatch {
    pub vertex: VertexIndex,
    /// One-ring in orientation order, rotated so the smallest id comes first.
    pub ring: Vec<VertexIndex>,
    /// Index into `ring` of the fan origin: the hole is filled with the
    /// triangles `(ring[o], ring[o+j], ring[o+j+1])`, indices mod ring length.
    pub fan_offset: u32,
}

/// Bookkeeping for edits accepted earlier in the same round.
///
/// Patches are applied together at the end of the round, so validity checks
/// against the corner table alone would miss conflicts between two patches
/// whose rings overlap: fan edges that coincide, a ring vertex whose valence
/// is eroded from both sides, or identical valence-3 fill triangles.
struct RoundState {
    conquered: Vec<bool>,
    valence_delta: Vec<i32>,
    new_edges: HashSet<(u32, u32)>,
    new_faces: HashSet<[u32; 3]>,
}

impl RoundState {
    fn new(num_vertices: usize) -> Self {
        Self {
            conquered: vec![false; num_vertices],
            valence_delta: vec![0; num_vertices],
            new_edges: HashSet::new(),
            new_faces: HashSet::new(),
        }
    }

    fn edge_key(a: VertexIndex, b: VertexIndex) -> (u32, u32) {
        if a.0 < b.0 {
            (a.0, b.0)
        } else {
            (b.0, a.0)
        }
    }

    fn face_key(a: VertexIndex, b: VertexIndex, c: VertexIndex) -> [u32; 3] {
        let raw = [a.0, b.0, c.0];
        let min_pos = (0..3).min_by_key(|&i| raw[i]).unwrap_or(0);
        [raw[min_pos], raw[(min_pos + 1) % 3], raw[(min_pos + 2) % 3]]
    }

    fn has_edge(&self, table: &CornerTable, a: VertexIndex, b: VertexIndex) -> bool {
        table.has_edge(a, b) || self.new_edges.contains(&Self::edge_key(a, b))
    }

    fn effective_valence(&self, table: &CornerTable, v: VertexIndex) -> i64 {
        table.valence(v) as i64 + self.valence_delta[v.index()] as i64
    }

    /// Valence change a ring vertex sees when the patch is applied: every
    /// ring vertex loses its edge to the removed vertex, the fan origin gains
    /// an edge to each non-adjacent ring vertex, and those targets gain one
    /// edge back.
    fn ring_valence_gain(n: usize, offset: usize, j: usize) -> i32 {
        let rel = (j + n - offset) % n;
        if rel == 0 {
            n as i32 - 3
        } else if rel == 1 || rel == n - 1 {
            0
        } else {
            1
        }
    }

    fn accept(&mut self, table: &CornerTable, patch: &SelectedPatch) {
        let n = patch.ring.len();
        let o = patch.fan_offset as usize;
        self.conquered[patch.vertex.index()] = true;
        for (j, &r) in patch.ring.iter().enumerate() {
            self.conquered[r.index()] = true;
            self.valence_delta[r.index()] += Self::ring_valence_gain(n, o, j) - 1;
        }
        if n == 3 {
            self.new_faces
                .insert(Self::face_key(patch.ring[0], patch.ring[1], patch.ring[2]));
        } else {
            for j in 2..n - 1 {
                self.new_edges
                    .insert(Self::edge_key(patch.ring[o], patch.ring[(o + j) % n]));
            }
        }
    }
}

/// Greedy deterministic sweep in ascending vertex id order.
///
/// A vertex is removed when it has not been conquered by an earlier patch
/// this round, its valence is within range, and at least one fan offset
/// yields a valid retriangulation; its whole ring is then conquered, which
/// keeps the removed set independent. Returns patches sorted by vertex id.
/// An empty result means the mesh cannot be decimated further.
pub fn select_patches(table: &CornerTable, positions: &[Vector3i]) -> Vec<SelectedPatch> {
    let mut state = RoundState::new(table.num_vertices());
    let mut patches = Vec::new();

    for v in 0..table.num_vertices() {
        let vertex = VertexIndex(v as u32);
        if state.conquered[v] {
            continue;
        }
        let valence = table.valence(vertex);
        if !(MIN_VALENCE..=MAX_VALENCE).contains(&valence) {
            continue;
        }
        let ring = canonical_ring(table, vertex);
        if let Some(fan_offset) = find_valid_fan(table, positions, &state, vertex, &ring) {
            let patch = SelectedPatch {
                vertex,
                ring,
                fan_offset,
            };
            state.accept(table, &patch);
            patches.push(patch);
        }
    }
    patches
}

/// One-ring rotated so the smallest vertex id comes first; orientation order
/// is preserved.
pub fn canonical_ring(table: &CornerTable, v: VertexIndex) -> Vec<VertexIndex> {
    let mut ring = table.vertex_ring(v);
    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|(_, r)| r.0)
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotate_left(min_pos);
    ring
}

/// Smallest fan offset whose retriangulation keeps the mesh a closed
/// manifold with consistent orientation, or `None` when every offset fails.
fn find_valid_fan(
    table: &CornerTable,
    positions: &[Vector3i],
    state: &RoundState,
    v: VertexIndex,
    ring: &[VertexIndex],
) -> Option<u32> {
    let n = ring.len();

    // Orientation reference: the summed normal of the faces being deleted.
    let mut patch_normal = [0i128; 3];
    for j in 0..n {
        let normal = triangle_normal(
            positions[v.index()],
            positions[ring[j].index()],
            positions[ring[(j + 1) % n].index()],
        );
        for k in 0..3 {
            patch_normal[k] = patch_normal[k].checked_add(normal[k])?;
        }
    }

    (0..n as u32).find(|&offset| fan_is_valid(table, positions, state, ring, offset, patch_normal))
}

fn fan_is_valid(
    table: &CornerTable,
    positions: &[Vector3i],
    state: &RoundState,
    ring: &[VertexIndex],
    offset: u32,
    patch_normal: [i128; 3],
) -> bool {
    let n = ring.len();
    let o = offset as usize;

    // Every ring vertex must stay at valence 3 or more after the patch,
    // accounting for edits already accepted this round.
    for (j, &r) in ring.iter().enumerate() {
        let post = state.effective_valence(table, r) - 1
            + RoundState::ring_valence_gain(n, o, j) as i64;
        if post < 3 {
            return false;
        }
    }

    if n == 3 {
        // The single fill triangle must not already exist on the far side of
        // the hole or be produced by another patch this round.
        if table.has_face(ring[0], ring[1], ring[2])
            || state
                .new_faces
                .contains(&RoundState::face_key(ring[0], ring[1], ring[2]))
        {
            return false;
        }
    } else {
        // Fan diagonals must all be new edges.
        for j in 2..n - 1 {
            if state.has_edge(table, ring[o], ring[(o + j) % n]) {
                return false;
            }
        }
    }

    // Every fill triangle must agree with the orientation of the deleted
    // patch.
    for j in 1..n - 1 {
        let normal = triangle_normal(
            positions[ring[o].index()],
            positions[ring[(o + j) % n].index()],
            positions[ring[(o + j + 1) % n].index()],
        );
        match checked_dot_wide(normal, patch_normal) {
            Some(d) if d > 0 => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corner_table::CornerTable;
    use crate::mesh::Face;

    fn tri(a: u32, b: u32, c: u32) -> Face {
        [VertexIndex(a), VertexIndex(b), VertexIndex(c)]
    }

    fn octahedron() -> (Vec<Vector3i>, Vec<Face>) {
        let positions = vec![
            [0, 0, 1000],
            [1000, 0, 0],
            [0, 1000, 0],
            [-1000, 0, 0],
            [0, -1000, 0],
            [0, 0, -1000],
        ];
        let faces = vec![
            tri(0, 1, 2),
            tri(0, 2, 3),
            tri(0, 3, 4),
            tri(0, 4, 1),
            tri(5, 2, 1),
            tri(5, 3, 2),
            tri(5, 4, 3),
            tri(5, 1, 4),
        ];
        (positions, faces)
    }

    fn tetrahedron() -> (Vec<Vector3i>, Vec<Face>) {
        let positions = vec![[0, 0, 0], [1000, 0, 0], [0, 1000, 0], [0, 0, 1000]];
        let faces = vec![tri(0, 2, 1), tri(0, 1, 3), tri(0, 3, 2), tri(1, 2, 3)];
        (positions, faces)
    }

    #[test]
    fn test_tetrahedron_is_terminal() {
        let (positions, faces) = tetrahedron();
        let table = CornerTable::build(4, &faces).unwrap();
        // Removing any vertex would leave its neighbors at valence 2.
        assert!(select_patches(&table, &positions).is_empty());
    }

    #[test]
    fn test_octahedron_removes_both_apexes() {
        let (positions, faces) = octahedron();
        let table = CornerTable::build(6, &faces).unwrap();
        let patches = select_patches(&table, &positions);
        // Vertex 0 goes first and conquers the equator. Vertex 5 is still
        // free; its fan diagonal restores the equator valences to 3, so it
        // is removed too and the round yields a tetrahedron.
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].vertex, VertexIndex(0));
        assert_eq!(patches[0].ring, vec![
            VertexIndex(1),
            VertexIndex(2),
            VertexIndex(3),
            VertexIndex(4),
        ]);
        assert_eq!(patches[0].fan_offset, 0);
        assert_eq!(patches[1].vertex, VertexIndex(5));
        // The top fan already claimed diagonal (1, 3), so the bottom fan has
        // to pivot off vertex 4 instead.
        assert_eq!(patches[1].fan_offset, 1);
    }

    #[test]
    fn test_canonical_ring_starts_at_min_id() {
        let (_, faces) = octahedron();
        let table = CornerTable::build(6, &faces).unwrap();
        for v in 0..6 {
            let ring = canonical_ring(&table, VertexIndex(v));
            let min = ring.iter().map(|r| r.0).min();
            assert_eq!(min, Some(ring[0].0));
        }
    }

    #[test]
    fn test_selection_is_deterministic() {
        let (positions, faces) = octahedron();
        let table = CornerTable::build(6, &faces).unwrap();
        let a = select_patches(&table, &positions);
        let b = select_patches(&table, &positions);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.vertex, pb.vertex);
            assert_eq!(pa.ring, pb.ring);
            assert_eq!(pa.fan_offset, pb.fan_offset);
        }
    }
}
