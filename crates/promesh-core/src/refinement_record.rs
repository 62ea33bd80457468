use crate::decoder_buffer::DecoderBuffer;
use crate::encoder_buffer::EncoderBuffer;
use crate::geometry_indices::VertexIndex;
use crate::math_utils::Vector3l;
use crate::status::MeshCodecError;

/// Everything needed to reinsert one removed vertex into a coarse level.
///
/// `removed` is the vertex id at the fine level; `anchor` and `ring_next`
/// are ids at the coarse level. `anchor` is the fan origin (the ring vertex
/// all fill triangles pivot on) and `ring_next` its counterclockwise ring
/// successor; the directed edge between them is where the decoder starts
/// walking the fill fan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RefinementRecord {
    pub removed: VertexIndex,
    pub anchor: VertexIndex,
    pub ring_next: VertexIndex,
    pub valence: u32,
    pub fan_offset: u32,
    pub residual: Vector3l,
}

/// Writes the directly stored fields of a batch: removed ids as deltas
/// (records are sorted ascending by `removed`), anchors, ring successors.
/// Valence, fan offset, and residual travel in the entropy substreams.
pub fn encode_plain_fields(records: &[RefinementRecord], buf: &mut EncoderBuffer) {
    let mut prev = 0u64;
    for (i, record) in records.iter().enumerate() {
        let id = record.removed.0 as u64;
        let delta = if i == 0 { id } else { id - prev };
        prev = id;
        buf.encode_varint(delta);
        buf.encode_varint(record.anchor.0 as u64);
        buf.encode_varint(record.ring_next.0 as u64);
    }
}

/// Reads back `count` records' plain fields; entropy-coded fields are left
/// at their defaults for the caller to fill in.
pub fn decode_plain_fields(
    count: usize,
    buf: &mut DecoderBuffer,
) -> Result<Vec<RefinementRecord>, MeshCodecError> {
    let mut records = Vec::with_capacity(count);
    let mut prev = 0u64;
    for i in 0..count {
        let delta = buf.decode_varint()?;
        if i > 0 && delta == 0 {
            return Err(MeshCodecError::CorruptBitstream(
                "removed vertex ids not strictly increasing".into(),
            ));
        }
        let id = prev
            .checked_add(delta)
            .filter(|&id| id <= u32::MAX as u64)
            .ok_or_else(|| {
                MeshCodecError::CorruptBitstream("removed vertex id overflows".into())
            })?;
        prev = id;
        let anchor = buf.decode_varint()?;
        let ring_next = buf.decode_varint()?;
        if anchor > u32::MAX as u64 || ring_next > u32::MAX as u64 {
            return Err(MeshCodecError::CorruptBitstream(
                "ring vertex id overflows".into(),
            ));
        }
        records.push(RefinementRecord {
            removed: VertexIndex(id as u32),
            anchor: VertexIndex(anchor as u32),
            ring_next: VertexIndex(ring_next as u32),
            ..Default::default()
        });
    }
    Ok(records)
}
