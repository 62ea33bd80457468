//! Shared closed-manifold test meshes, all wound counterclockwise seen from
//! outside.

use std::collections::HashMap;

use promesh_core::{Face, MeshLevel, Vector3i, VertexIndex};

pub fn tri(a: u32, b: u32, c: u32) -> Face {
    [VertexIndex(a), VertexIndex(b), VertexIndex(c)]
}

pub fn tetrahedron() -> MeshLevel {
    let positions = vec![[0, 0, 0], [1000, 0, 0], [0, 1000, 0], [0, 0, 1000]];
    let faces = vec![tri(0, 2, 1), tri(0, 1, 3), tri(0, 3, 2), tri(1, 2, 3)];
    MeshLevel::new(positions, faces, 0)
}

pub fn octahedron() -> MeshLevel {
    octahedron_with_positions(vec![
        [0, 0, 1000],
        [1000, 0, 0],
        [0, 1000, 0],
        [-1000, 0, 0],
        [0, -1000, 0],
        [0, 0, -1000],
    ])
}

pub fn octahedron_with_positions(positions: Vec<Vector3i>) -> MeshLevel {
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
    MeshLevel::new(positions, faces, 0)
}

/// Unit cube scaled by 1000, each square face split along the diagonal that
/// runs through the even-parity corners.
pub fn cube() -> MeshLevel {
    let positions = vec![
        [0, 0, 0],
        [1000, 0, 0],
        [1000, 1000, 0],
        [0, 1000, 0],
        [0, 0, 1000],
        [1000, 0, 1000],
        [1000, 1000, 1000],
        [0, 1000, 1000],
    ];
    let faces = vec![
        tri(0, 2, 1),
        tri(0, 3, 2),
        tri(4, 5, 7),
        tri(5, 6, 7),
        tri(0, 5, 4),
        tri(0, 1, 5),
        tri(2, 3, 7),
        tri(2, 7, 6),
        tri(0, 4, 7),
        tri(0, 7, 3),
        tri(1, 2, 5),
        tri(2, 6, 5),
    ];
    MeshLevel::new(positions, faces, 0)
}

pub fn icosahedron() -> MeshLevel {
    let t = 1618;
    let s = 1000;
    let positions = vec![
        [-s, t, 0],
        [s, t, 0],
        [-s, -t, 0],
        [s, -t, 0],
        [0, -s, t],
        [0, s, t],
        [0, -s, -t],
        [0, s, -t],
        [t, 0, -s],
        [t, 0, s],
        [-t, 0, -s],
        [-t, 0, s],
    ];
    let faces = vec![
        tri(0, 11, 5),
        tri(0, 5, 1),
        tri(0, 1, 7),
        tri(0, 7, 10),
        tri(0, 10, 11),
        tri(1, 5, 9),
        tri(5, 11, 4),
        tri(11, 10, 2),
        tri(10, 7, 6),
        tri(7, 1, 8),
        tri(3, 9, 4),
        tri(3, 4, 2),
        tri(3, 2, 6),
        tri(3, 6, 8),
        tri(3, 8, 9),
        tri(4, 9, 5),
        tri(2, 4, 11),
        tri(6, 2, 10),
        tri(8, 6, 7),
        tri(9, 8, 1),
    ];
    MeshLevel::new(positions, faces, 0)
}

/// One round of midpoint subdivision; winding is preserved. Coordinates
/// should be even so midpoints stay exact.
pub fn subdivide(mesh: &MeshLevel) -> MeshLevel {
    let mut positions: Vec<Vector3i> = mesh.positions().to_vec();
    let mut midpoints: HashMap<(u32, u32), VertexIndex> = HashMap::new();
    let mut faces: Vec<Face> = Vec::with_capacity(mesh.num_faces() * 4);

    let mut midpoint = |a: VertexIndex, b: VertexIndex, positions: &mut Vec<Vector3i>| {
        let key = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        *midpoints.entry(key).or_insert_with(|| {
            let pa = positions[a.0 as usize];
            let pb = positions[b.0 as usize];
            let id = VertexIndex(positions.len() as u32);
            positions.push([
                ((pa[0] as i64 + pb[0] as i64) / 2) as i32,
                ((pa[1] as i64 + pb[1] as i64) / 2) as i32,
                ((pa[2] as i64 + pb[2] as i64) / 2) as i32,
            ]);
            id
        })
    };

    for face in mesh.faces() {
        let [a, b, c] = *face;
        let mab = midpoint(a, b, &mut positions);
        let mbc = midpoint(b, c, &mut positions);
        let mca = midpoint(c, a, &mut positions);
        faces.push([a, mab, mca]);
        faces.push([mab, b, mbc]);
        faces.push([mca, mbc, c]);
        faces.push([mab, mbc, mca]);
    }
    MeshLevel::new(positions, faces, 0)
}
