use crate::corner_table::CornerTable;
use crate::geometry_indices::VertexIndex;
use crate::math_utils::Vector3i;
use crate::mesh::{Face, MeshLevel};
use crate::patch_selector::{select_patches, SelectedPatch};
use crate::prediction_scheme::{compute_residual, predict_position};
use crate::refinement_record::RefinementRecord;

/// Result of one decimation round: the coarser level plus the records that
/// let a decoder reinsert every removed vertex exactly.
pub struct DecimationRound {
    pub coarse: MeshLevel,
    pub records: Vec<RefinementRecord>,
}

/// Removes one independent set of vertices and retriangulates the holes.
///
/// Returns `None` when no vertex can be removed, which is the natural end of
/// decimation (a tetrahedron, or any mesh where every candidate fails the
/// fan validity checks).
///
/// Surviving vertices are renumbered compactly in ascending order of their
/// old ids, so the decoder can invert the renumbering from the sorted list
/// of removed ids alone. The coarse face array lists surviving faces in
/// their original order followed by the fill fans in ascending removed-id
/// order.
pub fn decimate_round(level: &MeshLevel, table: &CornerTable) -> Option<DecimationRound> {
    let patches = select_patches(table, level.positions());
    if patches.is_empty() {
        return None;
    }

    let num_vertices = level.num_vertices();
    let mut removed_vertex = vec![false; num_vertices];
    let mut removed_face = vec![false; level.num_faces()];
    for patch in &patches {
        removed_vertex[patch.vertex.index()] = true;
        for f in table.faces_around_vertex(patch.vertex) {
            removed_face[f.index()] = true;
        }
    }

    // Order-preserving compaction of the survivors.
    let mut coarse_of = vec![VertexIndex(0); num_vertices];
    let mut positions: Vec<Vector3i> = Vec::with_capacity(num_vertices - patches.len());
    for v in 0..num_vertices {
        if !removed_vertex[v] {
            coarse_of[v] = VertexIndex(positions.len() as u32);
            positions.push(level.position(VertexIndex(v as u32)));
        }
    }

    let mut faces: Vec<Face> = Vec::with_capacity(level.num_faces() - 2 * patches.len());
    for (f, face) in level.faces().iter().enumerate() {
        if !removed_face[f] {
            faces.push([
                coarse_of[face[0].index()],
                coarse_of[face[1].index()],
                coarse_of[face[2].index()],
            ]);
        }
    }
    for patch in &patches {
        for fan_face in fan_faces(patch) {
            faces.push([
                coarse_of[fan_face[0].index()],
                coarse_of[fan_face[1].index()],
                coarse_of[fan_face[2].index()],
            ]);
        }
    }

    let records = patches
        .iter()
        .map(|patch| make_record(level, patch, &coarse_of))
        .collect();

    Some(DecimationRound {
        // Encoder-side intermediates are transient; level indices are
        // assigned on decode, counting up from the base at 0.
        coarse: MeshLevel::new(positions, faces, 0),
        records,
    })
}

/// Fill triangles of a patch, in fine-level vertex ids: a fan pivoting on
/// `ring[fan_offset]`.
pub fn fan_faces(patch: &SelectedPatch) -> Vec<Face> {
    let n = patch.ring.len();
    let o = patch.fan_offset as usize;
    (1..n - 1)
        .map(|j| {
            [
                patch.ring[o],
                patch.ring[(o + j) % n],
                patch.ring[(o + j + 1) % n],
            ]
        })
        .collect()
}

fn make_record(
    level: &MeshLevel,
    patch: &SelectedPatch,
    coarse_of: &[VertexIndex],
) -> RefinementRecord {
    let n = patch.ring.len();
    let o = patch.fan_offset as usize;
    let ring_positions: Vec<Vector3i> = patch
        .ring
        .iter()
        .map(|r| level.position(*r))
        .collect();
    let predicted = predict_position(&ring_positions);
    RefinementRecord {
        removed: patch.vertex,
        anchor: coarse_of[patch.ring[o].index()],
        ring_next: coarse_of[patch.ring[(o + 1) % n].index()],
        valence: n as u32,
        fan_offset: patch.fan_offset,
        residual: compute_residual(level.position(patch.vertex), predicted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: u32, b: u32, c: u32) -> Face {
        [VertexIndex(a), VertexIndex(b), VertexIndex(c)]
    }

    fn octahedron() -> MeshLevel {
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
        MeshLevel::new(positions, faces, 1)
    }

    fn tetrahedron() -> MeshLevel {
        let positions = vec![[0, 0, 0], [1000, 0, 0], [0, 1000, 0], [0, 0, 1000]];
        let faces = vec![tri(0, 2, 1), tri(0, 1, 3), tri(0, 3, 2), tri(1, 2, 3)];
        MeshLevel::new(positions, faces, 0)
    }

    #[test]
    fn test_tetrahedron_does_not_decimate() {
        let level = tetrahedron();
        let table = CornerTable::build(4, level.faces()).unwrap();
        assert!(decimate_round(&level, &table).is_none());
    }

    #[test]
    fn test_octahedron_collapses_to_tetrahedron() {
        let level = octahedron();
        let table = CornerTable::build(6, level.faces()).unwrap();
        let round = decimate_round(&level, &table).unwrap();

        assert_eq!(round.coarse.num_vertices(), 4);
        assert_eq!(round.coarse.num_faces(), 4);
        assert_eq!(round.coarse.level(), 0);
        // The coarse level is a valid closed manifold.
        CornerTable::build(round.coarse.num_vertices(), round.coarse.faces()).unwrap();
        // Survivors keep their relative order: equator 1..=4 becomes 0..=3.
        assert_eq!(round.coarse.position(VertexIndex(0)), [1000, 0, 0]);
        assert_eq!(round.coarse.position(VertexIndex(3)), [0, -1000, 0]);

        assert_eq!(round.records.len(), 2);
        let top = &round.records[0];
        assert_eq!(top.removed, VertexIndex(0));
        assert_eq!(top.valence, 4);
        assert_eq!(top.fan_offset, 0);
        // Fan origin is fine vertex 1, coarse vertex 0.
        assert_eq!(top.anchor, VertexIndex(0));
        assert_eq!(top.ring_next, VertexIndex(1));
        // Prediction is the equator centroid, the exact apex offset remains.
        assert_eq!(top.residual, [0, 0, 1000]);

        let bottom = &round.records[1];
        assert_eq!(bottom.removed, VertexIndex(5));
        assert_eq!(bottom.valence, 4);
        assert_eq!(bottom.fan_offset, 1);
        assert_eq!(bottom.residual, [0, 0, -1000]);
    }

    #[test]
    fn test_records_sorted_by_removed_id() {
        let level = octahedron();
        let table = CornerTable::build(6, level.faces()).unwrap();
        let round = decimate_round(&level, &table).unwrap();
        for pair in round.records.windows(2) {
            assert!(pair[0].removed.0 < pair[1].removed.0);
        }
    }
}
