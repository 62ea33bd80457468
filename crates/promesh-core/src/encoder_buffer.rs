use byteorder::{LittleEndian, WriteBytesExt};

/// Byte-aligned output buffer for bitstream assembly.
///
/// All multi-byte integers are little-endian; varints are LEB128.
#[derive(Debug, Default, Clone)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,
}

impl EncoderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn take(self) -> Vec<u8> {
        self.buffer
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn encode_u16(&mut self, value: u16) {
        // Writing to a Vec cannot fail.
        let _ = self.buffer.write_u16::<LittleEndian>(value);
    }

    pub fn encode_u32(&mut self, value: u32) {
        let _ = self.buffer.write_u32::<LittleEndian>(value);
    }

    pub fn encode_i32(&mut self, value: i32) {
        let _ = self.buffer.write_i32::<LittleEndian>(value);
    }

    pub fn encode_data(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn encode_varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buffer.push(byte);
                break;
            }
            self.buffer.push(byte | 0x80);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_layout() {
        let mut buf = EncoderBuffer::new();
        buf.encode_u32(0x12345678);
        assert_eq!(buf.data(), &[0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_varint_boundaries() {
        let mut buf = EncoderBuffer::new();
        buf.encode_varint(0);
        buf.encode_varint(127);
        buf.encode_varint(128);
        assert_eq!(buf.data(), &[0x00, 0x7F, 0x80, 0x01]);
    }

    #[test]
    fn test_clear_and_take() {
        let mut buf = EncoderBuffer::new();
        buf.encode_data(b"abc");
        buf.clear();
        assert_eq!(buf.size(), 0);
        buf.encode_u8(7);
        assert_eq!(buf.take(), vec![7]);
    }
}
