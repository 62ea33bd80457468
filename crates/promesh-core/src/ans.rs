//! Binary rANS coder primitives.
//!
//! The probability argument is the chance of a zero bit scaled to 8-bit
//! precision (1..=255). The encoder emits bytes forward while the final state
//! is appended last, so the decoder starts from the end of the slice and
//! walks backward; callers are expected to feed symbols to the encoder in
//! reverse of the order the decoder will consume them.

use crate::status::MeshCodecError;

pub const ANS_P8_PRECISION: u32 = 256;
pub const ANS_L_BASE: u32 = 4096;
pub const ANS_IO_BASE: u32 = 256;

pub struct AnsEncoder {
    buf: Vec<u8>,
    state: u32,
}

impl Default for AnsEncoder {
    fn default() -> Self {
        Self {
            buf: Vec::new(),
            state: ANS_L_BASE,
        }
    }
}

impl AnsEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bit(&mut self, bit: bool, prob_zero: u8) {
        let p1 = ANS_P8_PRECISION - prob_zero as u32;
        let l_s = if bit { p1 } else { prob_zero as u32 };

        if self.state >= ANS_L_BASE / ANS_P8_PRECISION * ANS_IO_BASE * l_s {
            self.buf.push((self.state % ANS_IO_BASE) as u8);
            self.state /= ANS_IO_BASE;
        }

        let quot = self.state / l_s;
        let rem = self.state % l_s;
        self.state = quot * ANS_P8_PRECISION + rem + if bit { 0 } else { p1 };
    }

    /// Serializes the final state (1..4 bytes, tagged in the two high bits of
    /// the last byte) and returns the stream.
    pub fn finalize(mut self) -> Result<Vec<u8>, MeshCodecError> {
        let state = self.state - ANS_L_BASE;
        if state < (1 << 6) {
            self.buf.push(state as u8);
        } else if state < (1 << 14) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((0x01 << 6) | ((state >> 8) & 0x3F)) as u8);
        } else if state < (1 << 22) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((state >> 8) & 0xFF) as u8);
            self.buf.push(((0x02 << 6) | ((state >> 16) & 0x3F)) as u8);
        } else if state < (1 << 30) {
            self.buf.push((state & 0xFF) as u8);
            self.buf.push(((state >> 8) & 0xFF) as u8);
            self.buf.push(((state >> 16) & 0xFF) as u8);
            self.buf.push(((0x03 << 6) | ((state >> 24) & 0x3F)) as u8);
        } else {
            return Err(MeshCodecError::Buffer(format!(
                "ans state too large to serialize: {}",
                state
            )));
        }
        Ok(self.buf)
    }
}

pub struct AnsDecoder<'a> {
    buf: &'a [u8],
    buf_offset: usize,
    state: u32,
}

impl<'a> AnsDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, MeshCodecError> {
        let malformed = || MeshCodecError::Buffer("truncated ans stream".into());
        if buf.is_empty() {
            return Err(malformed());
        }
        let mut offset = buf.len() - 1;
        let tag = buf[offset];
        let extra_bytes = (tag >> 6) as usize;
        if offset < extra_bytes {
            return Err(malformed());
        }
        let mut state = (tag & 0x3F) as u32;
        for _ in 0..extra_bytes {
            offset -= 1;
            state = (state << 8) | buf[offset] as u32;
        }
        Ok(Self {
            buf,
            buf_offset: offset,
            state: state + ANS_L_BASE,
        })
    }

    fn normalize(&mut self) {
        while self.state < ANS_L_BASE && self.buf_offset > 0 {
            self.buf_offset -= 1;
            self.state = (self.state * ANS_IO_BASE) | self.buf[self.buf_offset] as u32;
        }
    }

    pub fn read_bit(&mut self, prob_zero: u8) -> bool {
        let p1 = ANS_P8_PRECISION - prob_zero as u32;
        self.normalize();

        let x = self.state;
        let quot = x / ANS_P8_PRECISION;
        let rem = x % ANS_P8_PRECISION;
        let xn = quot * p1;
        let bit = rem < p1;

        if bit {
            self.state = xn + rem;
        } else {
            self.state = x - xn - p1;
        }
        bit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_probability_round_trip() {
        let bits = [true, false, false, true, true, true, false, true, false];
        let p0 = 100u8;

        let mut enc = AnsEncoder::new();
        for &bit in bits.iter().rev() {
            enc.write_bit(bit, p0);
        }
        let data = enc.finalize().unwrap();

        let mut dec = AnsDecoder::new(&data).unwrap();
        for &bit in &bits {
            assert_eq!(dec.read_bit(p0), bit);
        }
    }

    #[test]
    fn test_varying_probabilities_round_trip() {
        // Probabilities must be replayed in matching order on both sides.
        let symbols: Vec<(bool, u8)> = (0u32..500)
            .map(|i| ((i * 7) % 3 == 0, (1 + (i * 13) % 255) as u8))
            .collect();

        let mut enc = AnsEncoder::new();
        for &(bit, p0) in symbols.iter().rev() {
            enc.write_bit(bit, p0);
        }
        let data = enc.finalize().unwrap();

        let mut dec = AnsDecoder::new(&data).unwrap();
        for &(bit, p0) in &symbols {
            assert_eq!(dec.read_bit(p0), bit);
        }
    }

    #[test]
    fn test_empty_stream_rejected() {
        assert!(AnsDecoder::new(&[]).is_err());
    }
}
