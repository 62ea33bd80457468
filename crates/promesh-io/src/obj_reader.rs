//! OBJ format reader.
//!
//! Reads vertex positions and triangular faces; normals, texture
//! coordinates, groups and materials are skipped. Faces with more or fewer
//! than three corners are rejected rather than triangulated, since the codec
//! needs the input connectivity verbatim.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::MeshIoError;

/// A mesh as it appears in an OBJ file, before quantization.
#[derive(Debug, Default, Clone)]
pub struct ObjMesh {
    pub positions: Vec<[f64; 3]>,
    pub faces: Vec<[u32; 3]>,
}

pub fn read_obj<P: AsRef<Path>>(path: P) -> Result<ObjMesh, MeshIoError> {
    parse_obj(BufReader::new(File::open(path)?))
}

pub fn parse_obj<R: Read>(reader: BufReader<R>) -> Result<ObjMesh, MeshIoError> {
    let mut mesh = ObjMesh::default();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = line_number + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut position = [0f64; 3];
                for component in &mut position {
                    *component = parts
                        .next()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| MeshIoError::Parse {
                            line: line_number,
                            message: "vertex needs three numeric coordinates".into(),
                        })?;
                }
                mesh.positions.push(position);
            }
            Some("f") => {
                let mut face = [0u32; 3];
                let mut corners = 0;
                for part in parts {
                    if corners == 3 {
                        return Err(MeshIoError::Parse {
                            line: line_number,
                            message: "only triangular faces are supported".into(),
                        });
                    }
                    face[corners] = parse_face_index(part, mesh.positions.len(), line_number)?;
                    corners += 1;
                }
                if corners != 3 {
                    return Err(MeshIoError::Parse {
                        line: line_number,
                        message: "face needs three corners".into(),
                    });
                }
                mesh.faces.push(face);
            }
            _ => {}
        }
    }
    Ok(mesh)
}

/// Parses one `f` entry (`7`, `7/1`, `7/1/2`, `7//2`) into a zero-based
/// vertex index.
fn parse_face_index(
    part: &str,
    num_vertices: usize,
    line_number: usize,
) -> Result<u32, MeshIoError> {
    let vertex_field = part.split('/').next().unwrap_or(part);
    let parse_error = |message: &str| MeshIoError::Parse {
        line: line_number,
        message: message.into(),
    };
    let index: i64 = vertex_field
        .parse()
        .map_err(|_| parse_error("malformed face index"))?;
    // OBJ indices are one-based; negative indices count back from the most
    // recent vertex.
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        num_vertices as i64 + index
    } else {
        return Err(parse_error("face index zero is not valid"));
    };
    if resolved < 0 || resolved >= num_vertices as i64 {
        return Err(parse_error("face references a vertex that does not exist"));
    }
    Ok(resolved as u32)
}
