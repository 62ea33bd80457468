use crate::connectivity_coder::ConnectivityEncoder;
use crate::corner_table::CornerTable;
use crate::decimator::decimate_round;
use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::geometry_coder::GeometryEncoder;
use crate::mesh::MeshLevel;
use crate::refinement_record::{encode_plain_fields, RefinementRecord};
use crate::status::{MeshCodecError, Status};
use crate::version::{PROMESH_MAGIC, PROMESH_MAJOR_VERSION, PROMESH_MINOR_VERSION};

/// Progressive mesh encoder.
///
/// Decimates the input level by level until nothing more can be removed (or
/// the configured round limit is hit), then writes the base mesh followed by
/// the refinement batches in coarse-to-fine order so the decoder can stop at
/// any intermediate resolution.
pub struct ProgressiveEncoder {
    options: EncoderOptions,
}

impl ProgressiveEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn encode(&self, mesh: &MeshLevel, out: &mut EncoderBuffer) -> Status {
        let mut table = CornerTable::build(mesh.num_vertices(), mesh.faces())?;
        let mut current = mesh.clone();

        // Batches come out finest-first; the stream wants them reversed.
        let mut batches: Vec<(usize, Vec<RefinementRecord>)> = Vec::new();
        while (batches.len() as u32) < self.options.max_rounds {
            let Some(round) = decimate_round(&current, &table) else {
                break;
            };
            batches.push((current.num_vertices(), round.records));
            current = round.coarse;
            table = CornerTable::build(current.num_vertices(), current.faces())?;
        }
        batches.reverse();

        out.encode_data(&PROMESH_MAGIC);
        out.encode_u8(PROMESH_MAJOR_VERSION);
        out.encode_u8(PROMESH_MINOR_VERSION);
        out.encode_varint(mesh.num_vertices() as u64);
        out.encode_varint(batches.len() as u64);

        encode_base_mesh(&current, out);
        for (fine_num_vertices, records) in &batches {
            encode_batch(records, *fine_num_vertices, out)?;
        }
        Ok(())
    }
}

fn encode_base_mesh(base: &MeshLevel, out: &mut EncoderBuffer) {
    out.encode_varint(base.num_vertices() as u64);
    for p in base.positions() {
        out.encode_i32(p[0]);
        out.encode_i32(p[1]);
        out.encode_i32(p[2]);
    }
    out.encode_varint(base.num_faces() as u64);
    // Index width switches with the vertex count, like sequential
    // connectivity coding.
    let num_vertices = base.num_vertices();
    for face in base.faces() {
        for v in face {
            if num_vertices < 256 {
                out.encode_u8(v.0 as u8);
            } else if num_vertices < 65536 {
                out.encode_u16(v.0 as u16);
            } else {
                out.encode_u32(v.0);
            }
        }
    }
}

fn encode_batch(
    records: &[RefinementRecord],
    fine_num_vertices: usize,
    out: &mut EncoderBuffer,
) -> Status {
    out.encode_varint(records.len() as u64);
    out.encode_varint(fine_num_vertices as u64);
    encode_plain_fields(records, out);

    let mut connectivity = ConnectivityEncoder::new();
    for record in records {
        connectivity.encode_record(record.valence, record.fan_offset);
    }
    let connectivity_data = connectivity.finish()?;
    out.encode_varint(connectivity_data.len() as u64);
    out.encode_data(&connectivity_data);

    let mut geometry = GeometryEncoder::new();
    for record in records {
        geometry.encode_residual(record.residual);
    }
    let geometry_data = geometry.finish()?;
    out.encode_varint(geometry_data.len() as u64);
    out.encode_data(&geometry_data);
    Ok(())
}

/// Encodes `mesh` into a fresh byte vector.
pub fn encode_mesh(mesh: &MeshLevel, options: EncoderOptions) -> Result<Vec<u8>, MeshCodecError> {
    let mut out = EncoderBuffer::new();
    ProgressiveEncoder::new(options).encode(mesh, &mut out)?;
    Ok(out.take())
}
