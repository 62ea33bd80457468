use crate::connectivity_coder::ConnectivityDecoder;
use crate::corner_table::CornerTable;
use crate::decoder_buffer::DecoderBuffer;
use crate::geometry_coder::GeometryDecoder;
use crate::geometry_indices::{FaceIndex, VertexIndex};
use crate::math_utils::Vector3i;
use crate::mesh::{Face, MeshLevel};
use crate::prediction_scheme::{apply_residual, predict_position};
use crate::refinement_record::{decode_plain_fields, RefinementRecord};
use crate::status::{corrupt_bitstream, MeshCodecError};
use crate::version::{PROMESH_MAGIC, PROMESH_MAJOR_VERSION};

/// Progressive mesh decoder.
///
/// Construction reads the header and the base mesh; each [`next_level`] call
/// consumes one refinement batch and replaces the current level with the
/// next finer one. Decoding can stop after any batch and still hold a valid
/// closed manifold.
///
/// [`next_level`]: ProgressiveDecoder::next_level
pub struct ProgressiveDecoder<'a> {
    buf: DecoderBuffer<'a>,
    current: MeshLevel,
    original_num_vertices: u64,
    remaining_batches: u64,
}

impl<'a> ProgressiveDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, MeshCodecError> {
        let mut buf = DecoderBuffer::new(data);
        let magic = buf.decode_slice(4)?;
        if magic != PROMESH_MAGIC {
            return Err(corrupt_bitstream("bad magic"));
        }
        let major = buf.decode_u8()?;
        let _minor = buf.decode_u8()?;
        if major > PROMESH_MAJOR_VERSION {
            return Err(corrupt_bitstream(format!(
                "unsupported bitstream version {}",
                major
            )));
        }
        let original_num_vertices = buf.decode_varint()?;
        let remaining_batches = buf.decode_varint()?;

        let base = decode_base_mesh(&mut buf)?;
        // The base must already be a closed manifold.
        CornerTable::build(base.num_vertices(), base.faces())
            .map_err(|e| corrupt_bitstream(format!("invalid base mesh: {}", e)))?;

        Ok(Self {
            buf,
            current: base,
            original_num_vertices,
            remaining_batches,
        })
    }

    pub fn current_level(&self) -> &MeshLevel {
        &self.current
    }

    pub fn remaining_batches(&self) -> u64 {
        self.remaining_batches
    }

    /// Applies the next refinement batch. Returns `None` once the stream is
    /// exhausted and the current level is the original mesh.
    pub fn next_level(&mut self) -> Result<Option<&MeshLevel>, MeshCodecError> {
        if self.remaining_batches == 0 {
            return Ok(None);
        }
        let fine = decode_batch(&mut self.buf, &self.current)?;
        #[cfg(debug_assertions)]
        {
            if let Err(e) = CornerTable::build(fine.num_vertices(), fine.faces()) {
                return Err(MeshCodecError::ReconstructionMismatch(format!(
                    "refined level {} is not a closed manifold: {}",
                    fine.level(),
                    e
                )));
            }
        }
        self.current = fine;
        self.remaining_batches -= 1;
        Ok(Some(&self.current))
    }

    /// Runs refinement to the end and returns the fully restored mesh.
    pub fn decode_all(mut self) -> Result<MeshLevel, MeshCodecError> {
        while self.next_level()?.is_some() {}
        if self.current.num_vertices() as u64 != self.original_num_vertices {
            return Err(corrupt_bitstream(format!(
                "stream promised {} vertices but refinement produced {}",
                self.original_num_vertices,
                self.current.num_vertices()
            )));
        }
        Ok(self.current)
    }
}

/// Decodes `data` all the way to the original mesh.
pub fn decode_mesh(data: &[u8]) -> Result<MeshLevel, MeshCodecError> {
    ProgressiveDecoder::new(data)?.decode_all()
}

fn decode_base_mesh(buf: &mut DecoderBuffer) -> Result<MeshLevel, MeshCodecError> {
    let num_vertices = buf.decode_varint()? as usize;
    if num_vertices.saturating_mul(12) > buf.remaining_size() {
        return Err(corrupt_bitstream("base vertex count exceeds stream size"));
    }
    let mut positions: Vec<Vector3i> = Vec::with_capacity(num_vertices);
    for _ in 0..num_vertices {
        positions.push([buf.decode_i32()?, buf.decode_i32()?, buf.decode_i32()?]);
    }

    let num_faces = buf.decode_varint()? as usize;
    let index_width = if num_vertices < 256 {
        1
    } else if num_vertices < 65536 {
        2
    } else {
        4
    };
    if num_faces.saturating_mul(3 * index_width) > buf.remaining_size() {
        return Err(corrupt_bitstream("base face count exceeds stream size"));
    }
    let mut faces: Vec<Face> = Vec::with_capacity(num_faces);
    for _ in 0..num_faces {
        let mut face = [VertexIndex(0); 3];
        for v in &mut face {
            let id = match index_width {
                1 => buf.decode_u8()? as u32,
                2 => buf.decode_u16()? as u32,
                _ => buf.decode_u32()?,
            };
            if id as usize >= num_vertices {
                return Err(corrupt_bitstream("base face references unknown vertex"));
            }
            *v = VertexIndex(id);
        }
        faces.push(face);
    }
    Ok(MeshLevel::new(positions, faces, 0))
}

/// Everything recovered from one record before the fine level is assembled.
struct DecodedPatch {
    removed: VertexIndex,
    ring: Vec<VertexIndex>,
    fan_faces: Vec<FaceIndex>,
    position: Vector3i,
}

fn decode_batch(buf: &mut DecoderBuffer, coarse: &MeshLevel) -> Result<MeshLevel, MeshCodecError> {
    let num_records = buf.decode_varint()? as usize;
    let fine_num_vertices = buf.decode_varint()? as usize;
    if fine_num_vertices != coarse.num_vertices() + num_records {
        return Err(corrupt_bitstream(format!(
            "batch of {} records cannot grow {} vertices to {}",
            num_records,
            coarse.num_vertices(),
            fine_num_vertices
        )));
    }

    let mut records = decode_plain_fields(num_records, buf)?;

    let connectivity_size = buf.decode_varint()? as usize;
    let mut connectivity = ConnectivityDecoder::new(buf.decode_slice(connectivity_size)?)?;
    for record in &mut records {
        let (valence, fan_offset) = connectivity.decode_record()?;
        record.valence = valence;
        record.fan_offset = fan_offset;
    }

    let geometry_size = buf.decode_varint()? as usize;
    let mut geometry = GeometryDecoder::new(buf.decode_slice(geometry_size)?)?;
    for record in &mut records {
        record.residual = geometry.decode_residual()?;
    }

    let table = CornerTable::build(coarse.num_vertices(), coarse.faces())
        .map_err(|e| corrupt_bitstream(format!("invalid coarse level: {}", e)))?;

    let mut removed_face = vec![false; coarse.num_faces()];
    let mut patches = Vec::with_capacity(num_records);
    for record in &records {
        if record.removed.index() >= fine_num_vertices {
            return Err(corrupt_bitstream("removed vertex id out of range"));
        }
        let patch = walk_fan(coarse, &table, record)?;
        for f in &patch.fan_faces {
            if removed_face[f.index()] {
                return Err(corrupt_bitstream("two records claim the same face"));
            }
            removed_face[f.index()] = true;
        }
        patches.push(patch);
    }

    Ok(assemble_fine_level(coarse, &removed_face, &patches))
}

/// Recovers a patch from its record by walking the fill fan in the coarse
/// mesh: starting at the directed edge (anchor, ring_next), swinging around
/// the fan origin visits the `valence - 2` fill triangles in order and reads
/// off the full ring of the removed vertex.
fn walk_fan(
    coarse: &MeshLevel,
    table: &CornerTable,
    record: &RefinementRecord,
) -> Result<DecodedPatch, MeshCodecError> {
    let n = record.valence as usize;
    let num_vertices = coarse.num_vertices();
    if record.anchor.index() >= num_vertices || record.ring_next.index() >= num_vertices {
        return Err(corrupt_bitstream("ring anchor out of range"));
    }
    // The fan cannot have more triangles than the origin has incident faces.
    if (n as u32 - 2) > table.valence(record.anchor) {
        return Err(corrupt_bitstream("fan larger than anchor valence"));
    }
    let start = table
        .corner_on_edge(record.anchor, record.ring_next)
        .ok_or_else(|| corrupt_bitstream("fan anchor edge does not exist"))?;

    let mut ring = Vec::with_capacity(n);
    ring.push(record.anchor);
    ring.push(record.ring_next);
    let mut fan_faces = Vec::with_capacity(n - 2);
    let mut corner = start;
    for i in 0..n - 2 {
        fan_faces.push(table.face(corner));
        ring.push(table.vertex(table.previous(corner)));
        if i + 1 < n - 2 {
            corner = table.swing_right(corner);
        }
    }

    // The walked ring starts at the fan origin; the smallest id must land
    // where the recorded offset says it was.
    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|(_, r)| r.0)
        .map(|(i, _)| i)
        .unwrap_or(0);
    if min_pos != (n - record.fan_offset as usize) % n {
        return Err(corrupt_bitstream("fan offset disagrees with walked ring"));
    }
    for i in 0..n {
        for j in i + 1..n {
            if ring[i] == ring[j] {
                return Err(corrupt_bitstream("walked ring revisits a vertex"));
            }
        }
    }

    let ring_positions: Vec<Vector3i> = ring.iter().map(|r| coarse.position(*r)).collect();
    let position = apply_residual(predict_position(&ring_positions), record.residual)?;

    Ok(DecodedPatch {
        removed: record.removed,
        ring,
        fan_faces,
        position,
    })
}

fn assemble_fine_level(
    coarse: &MeshLevel,
    removed_face: &[bool],
    patches: &[DecodedPatch],
) -> MeshLevel {
    let fine_num_vertices = coarse.num_vertices() + patches.len();

    // Invert the encoder's order-preserving renumbering: fine ids not on the
    // removed list belong to the survivors, in order.
    let mut fine_of_coarse = Vec::with_capacity(coarse.num_vertices());
    let mut positions: Vec<Vector3i> = vec![[0; 3]; fine_num_vertices];
    {
        let mut next_removed = 0;
        for fine_id in 0..fine_num_vertices {
            if next_removed < patches.len() && patches[next_removed].removed.index() == fine_id {
                positions[fine_id] = patches[next_removed].position;
                next_removed += 1;
            } else {
                positions[fine_id] = coarse.position(VertexIndex(fine_of_coarse.len() as u32));
                fine_of_coarse.push(VertexIndex(fine_id as u32));
            }
        }
    }

    let mut faces: Vec<Face> = Vec::with_capacity(coarse.num_faces() + 2 * patches.len());
    for (f, face) in coarse.faces().iter().enumerate() {
        if !removed_face[f] {
            faces.push([
                fine_of_coarse[face[0].index()],
                fine_of_coarse[face[1].index()],
                fine_of_coarse[face[2].index()],
            ]);
        }
    }
    for patch in patches {
        let n = patch.ring.len();
        for j in 0..n {
            faces.push([
                patch.removed,
                fine_of_coarse[patch.ring[j].index()],
                fine_of_coarse[patch.ring[(j + 1) % n].index()],
            ]);
        }
    }

    MeshLevel::new(positions, faces, coarse.level() + 1)
}
