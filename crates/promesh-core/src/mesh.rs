use crate::geometry_indices::{FaceIndex, VertexIndex};
use crate::math_utils::Vector3i;

pub type Face = [VertexIndex; 3];

/// One immutable resolution snapshot of a mesh.
///
/// Level 0 is the coarsest (base) mesh; indices increase toward the original
/// resolution. A level is never mutated after construction -- decimation and
/// refinement always build a new `MeshLevel`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeshLevel {
    positions: Vec<Vector3i>,
    faces: Vec<Face>,
    level: u32,
}

impl MeshLevel {
    pub fn new(positions: Vec<Vector3i>, faces: Vec<Face>, level: u32) -> Self {
        Self {
            positions,
            faces,
            level,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn position(&self, v: VertexIndex) -> Vector3i {
        self.positions[v.index()]
    }

    pub fn positions(&self) -> &[Vector3i] {
        &self.positions
    }

    pub fn face(&self, f: FaceIndex) -> Face {
        self.faces[f.index()]
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Faces rotated min-vertex-first and sorted.
    ///
    /// Decimation and refinement reorder the face array; connectivity is
    /// compared on this canonical form.
    pub fn canonical_faces(&self) -> Vec<[u32; 3]> {
        let mut out: Vec<[u32; 3]> = self
            .faces
            .iter()
            .map(|f| {
                let raw = [f[0].0, f[1].0, f[2].0];
                let min_pos = (0..3).min_by_key(|&i| raw[i]).unwrap_or(0);
                [
                    raw[min_pos],
                    raw[(min_pos + 1) % 3],
                    raw[(min_pos + 2) % 3],
                ]
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// True when both levels have identical vertex positions and the same
    /// oriented connectivity, ignoring face-array order.
    pub fn same_geometry(&self, other: &MeshLevel) -> bool {
        self.positions == other.positions && self.canonical_faces() == other.canonical_faces()
    }
}
