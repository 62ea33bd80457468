use crate::geometry_indices::{
    CornerIndex, FaceIndex, VertexIndex, INVALID_CORNER_INDEX,
};
use crate::mesh::Face;
use crate::status::{invalid_mesh, MeshCodecError};

/// Corner-based adjacency for a closed, orientation-consistent triangle mesh.
///
/// Corner `3 * f + i` is the i-th corner of face `f`. `opposite` links the two
/// corners facing the same edge from both sides; `swing_right`/`swing_left`
/// walk the faces around a vertex. Construction validates the closed
/// 2-manifold invariant and fails with `InvalidMesh` instead of repairing
/// anything: unknown vertex references, degenerate faces, edges with more or
/// fewer than two incident faces, inconsistent winding and non-manifold
/// (multi-cone) vertices are all rejected.
#[derive(Debug, Clone)]
pub struct CornerTable {
    corner_to_vertex: Vec<VertexIndex>,
    opposite_corners: Vec<CornerIndex>,
    vertex_corners: Vec<CornerIndex>,
    valences: Vec<u32>,
}

impl CornerTable {
    pub fn build(num_vertices: usize, faces: &[Face]) -> Result<Self, MeshCodecError> {
        let num_corners = faces.len() * 3;
        let mut corner_to_vertex = Vec::with_capacity(num_corners);
        for (f, face) in faces.iter().enumerate() {
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return Err(invalid_mesh(format!("degenerate face {}", f)));
            }
            for v in face {
                if v.index() >= num_vertices {
                    return Err(invalid_mesh(format!(
                        "face {} references unknown vertex {}",
                        f, v.0
                    )));
                }
                corner_to_vertex.push(*v);
            }
        }

        let mut table = Self {
            corner_to_vertex,
            opposite_corners: vec![INVALID_CORNER_INDEX; num_corners],
            vertex_corners: vec![INVALID_CORNER_INDEX; num_vertices],
            valences: vec![0; num_vertices],
        };
        table.compute_opposite_corners()?;
        table.compute_vertex_corners()?;
        Ok(table)
    }

    /// Pairs up the two corners facing each edge.
    ///
    /// Every undirected edge must carry exactly two corners, one per
    /// direction; a same-direction pair means inconsistent winding, any other
    /// count means an open boundary or a non-manifold edge.
    fn compute_opposite_corners(&mut self) -> Result<(), MeshCodecError> {
        // (min vertex, max vertex, direction flag, facing corner)
        let mut edges: Vec<(u32, u32, bool, u32)> = Vec::with_capacity(self.num_corners());
        for c in 0..self.num_corners() {
            let corner = CornerIndex(c as u32);
            let source = self.vertex(self.next(corner));
            let sink = self.vertex(self.previous(corner));
            let (lo, hi) = if source.0 < sink.0 {
                (source.0, sink.0)
            } else {
                (sink.0, source.0)
            };
            edges.push((lo, hi, source.0 < sink.0, c as u32));
        }
        edges.sort_unstable();

        let mut i = 0;
        while i < edges.len() {
            let (lo, hi, _, _) = edges[i];
            let mut j = i + 1;
            while j < edges.len() && edges[j].0 == lo && edges[j].1 == hi {
                j += 1;
            }
            match j - i {
                2 => {
                    let (_, _, dir_a, corner_a) = edges[i];
                    let (_, _, dir_b, corner_b) = edges[i + 1];
                    if dir_a == dir_b {
                        return Err(invalid_mesh(format!(
                            "inconsistent winding across edge ({}, {})",
                            lo, hi
                        )));
                    }
                    self.opposite_corners[corner_a as usize] = CornerIndex(corner_b);
                    self.opposite_corners[corner_b as usize] = CornerIndex(corner_a);
                }
                1 => {
                    return Err(invalid_mesh(format!(
                        "open boundary edge ({}, {})",
                        lo, hi
                    )));
                }
                n => {
                    return Err(invalid_mesh(format!(
                        "non-manifold edge ({}, {}) shared by {} faces",
                        lo, hi, n
                    )));
                }
            }
            i = j;
        }
        Ok(())
    }

    /// Assigns one corner per vertex and verifies each vertex has a single
    /// closed fan of faces around it.
    fn compute_vertex_corners(&mut self) -> Result<(), MeshCodecError> {
        let mut corners_at_vertex = vec![0u32; self.num_vertices()];
        for c in 0..self.num_corners() {
            let v = self.corner_to_vertex[c];
            corners_at_vertex[v.index()] += 1;
            if self.vertex_corners[v.index()] == INVALID_CORNER_INDEX {
                self.vertex_corners[v.index()] = CornerIndex(c as u32);
            }
        }

        for v in 0..self.num_vertices() {
            let count = corners_at_vertex[v];
            if count == 0 {
                return Err(invalid_mesh(format!("isolated vertex {}", v)));
            }
            // Walk the fan; a manifold vertex reaches every incident corner.
            let start = self.vertex_corners[v];
            let mut c = start;
            let mut ring_len = 0u32;
            loop {
                ring_len += 1;
                if ring_len > count {
                    return Err(invalid_mesh(format!("non-manifold vertex {}", v)));
                }
                c = self.swing_right(c);
                if c == start {
                    break;
                }
            }
            if ring_len != count {
                return Err(invalid_mesh(format!(
                    "non-manifold vertex {} ({} of {} corners reachable)",
                    v, ring_len, count
                )));
            }
            self.valences[v] = ring_len;
        }
        Ok(())
    }

    pub fn num_corners(&self) -> usize {
        self.corner_to_vertex.len()
    }

    pub fn num_faces(&self) -> usize {
        self.corner_to_vertex.len() / 3
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_corners.len()
    }

    pub fn vertex(&self, corner: CornerIndex) -> VertexIndex {
        self.corner_to_vertex[corner.0 as usize]
    }

    pub fn face(&self, corner: CornerIndex) -> FaceIndex {
        FaceIndex(corner.0 / 3)
    }

    pub fn next(&self, corner: CornerIndex) -> CornerIndex {
        if (corner.0 + 1) % 3 != 0 {
            CornerIndex(corner.0 + 1)
        } else {
            CornerIndex(corner.0 - 2)
        }
    }

    pub fn previous(&self, corner: CornerIndex) -> CornerIndex {
        if corner.0 % 3 != 0 {
            CornerIndex(corner.0 - 1)
        } else {
            CornerIndex(corner.0 + 2)
        }
    }

    pub fn opposite(&self, corner: CornerIndex) -> CornerIndex {
        self.opposite_corners[corner.0 as usize]
    }

    pub fn swing_right(&self, corner: CornerIndex) -> CornerIndex {
        self.next(self.opposite(self.next(corner)))
    }

    pub fn swing_left(&self, corner: CornerIndex) -> CornerIndex {
        self.previous(self.opposite(self.previous(corner)))
    }

    pub fn valence(&self, v: VertexIndex) -> u32 {
        self.valences[v.index()]
    }

    /// One-ring neighbors of `v` in orientation order (counterclockwise seen
    /// from outside). Consecutive ring entries `r[j]`, `r[j+1]` always span
    /// the incident face `(v, r[j], r[j+1])`.
    pub fn vertex_ring(&self, v: VertexIndex) -> Vec<VertexIndex> {
        let start = self.vertex_corners[v.index()];
        let mut ring = Vec::with_capacity(self.valence(v) as usize);
        let mut c = start;
        loop {
            ring.push(self.vertex(self.next(c)));
            c = self.swing_right(c);
            if c == start {
                break;
            }
        }
        ring
    }

    /// Faces around `v`, aligned with `vertex_ring`: entry j is the face
    /// `(v, ring[j], ring[j+1])`.
    pub fn faces_around_vertex(&self, v: VertexIndex) -> Vec<FaceIndex> {
        let start = self.vertex_corners[v.index()];
        let mut faces = Vec::with_capacity(self.valence(v) as usize);
        let mut c = start;
        loop {
            faces.push(self.face(c));
            c = self.swing_right(c);
            if c == start {
                break;
            }
        }
        faces
    }

    /// Corner at `from` whose face contains the directed edge `from -> to`,
    /// if that edge exists.
    pub fn corner_on_edge(&self, from: VertexIndex, to: VertexIndex) -> Option<CornerIndex> {
        let start = self.vertex_corners[from.index()];
        let mut c = start;
        loop {
            if self.vertex(self.next(c)) == to {
                return Some(c);
            }
            c = self.swing_right(c);
            if c == start {
                return None;
            }
        }
    }

    pub fn has_edge(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.corner_on_edge(a, b).is_some()
    }

    /// True when the oriented face `(a, b, c)` exists up to rotation.
    pub fn has_face(&self, a: VertexIndex, b: VertexIndex, c: VertexIndex) -> bool {
        match self.corner_on_edge(a, b) {
            Some(corner) => self.vertex(self.previous(corner)) == c,
            None => false,
        }
    }
}
