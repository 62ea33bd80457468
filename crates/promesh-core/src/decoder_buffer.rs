use byteorder::{ByteOrder, LittleEndian};

use crate::status::MeshCodecError;

/// Sequential reader over an encoded bitstream.
///
/// The mirror of [`crate::encoder_buffer::EncoderBuffer`]: little-endian
/// integers, LEB128 varints, and `Buffer` errors on underflow.
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn underflow(&self, need: usize) -> MeshCodecError {
        MeshCodecError::Buffer(format!(
            "unexpected end of buffer: need {} bytes, have {}",
            need,
            self.remaining_size()
        ))
    }

    pub fn decode_u8(&mut self) -> Result<u8, MeshCodecError> {
        if self.pos >= self.data.len() {
            return Err(self.underflow(1));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn decode_u16(&mut self) -> Result<u16, MeshCodecError> {
        let slice = self.decode_slice(2)?;
        Ok(LittleEndian::read_u16(slice))
    }

    pub fn decode_u32(&mut self) -> Result<u32, MeshCodecError> {
        let slice = self.decode_slice(4)?;
        Ok(LittleEndian::read_u32(slice))
    }

    pub fn decode_i32(&mut self) -> Result<i32, MeshCodecError> {
        let slice = self.decode_slice(4)?;
        Ok(LittleEndian::read_i32(slice))
    }

    pub fn decode_slice(&mut self, size: usize) -> Result<&'a [u8], MeshCodecError> {
        // size comes straight from stream varints, so it can be anything up
        // to u64::MAX; compare against what is left rather than summing.
        if size > self.remaining_size() {
            return Err(self.underflow(size));
        }
        let slice = &self.data[self.pos..self.pos + size];
        self.pos += size;
        Ok(slice)
    }

    pub fn decode_varint(&mut self) -> Result<u64, MeshCodecError> {
        let mut val = 0u64;
        let mut shift = 0;
        loop {
            let b = self.decode_u8()?;
            val |= ((b & 0x7F) as u64) << shift;
            if (b & 0x80) == 0 {
                break;
            }
            shift += 7;
            if shift >= 64 {
                return Err(MeshCodecError::Buffer("varint exceeds 64 bits".into()));
            }
        }
        Ok(val)
    }
}
