use crate::adaptive_bit_model::AdaptiveBitModel;
use crate::math_utils::{bits_required, Vector3l};
use crate::rans_bit_decoder::RansBitDecoder;
use crate::rans_bit_encoder::RansBitEncoder;
use crate::status::MeshCodecError;

const LENGTH_BITS: u32 = 6;

/// Encodes prediction residuals component by component.
///
/// A component is coded as a zero flag, then for non-zero values a sign bit,
/// the magnitude's bit length minus one in six adaptive contexts, and the
/// magnitude's remaining bits raw (the leading one bit is implicit).
#[derive(Default)]
pub struct GeometryEncoder {
    writer: RansBitEncoder,
    zero_model: AdaptiveBitModel,
    sign_model: AdaptiveBitModel,
    length_models: [AdaptiveBitModel; LENGTH_BITS as usize],
}

impl GeometryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_residual(&mut self, residual: Vector3l) {
        for &component in &residual {
            self.encode_component(component);
        }
    }

    fn encode_component(&mut self, value: i64) {
        self.writer.encode_bit(&mut self.zero_model, value == 0);
        if value == 0 {
            return;
        }
        self.writer.encode_bit(&mut self.sign_model, value < 0);
        let magnitude = value.unsigned_abs();
        let nbits = bits_required(magnitude);
        let length_symbol = nbits - 1;
        for i in (0..LENGTH_BITS).rev() {
            let bit = (length_symbol >> i) & 1 != 0;
            self.writer
                .encode_bit(&mut self.length_models[i as usize], bit);
        }
        if nbits > 1 {
            self.writer.encode_raw_bits(magnitude, nbits - 1);
        }
    }

    pub fn finish(self) -> Result<Vec<u8>, MeshCodecError> {
        self.writer.finish()
    }
}

pub struct GeometryDecoder<'a> {
    reader: RansBitDecoder<'a>,
    zero_model: AdaptiveBitModel,
    sign_model: AdaptiveBitModel,
    length_models: [AdaptiveBitModel; LENGTH_BITS as usize],
}

impl<'a> GeometryDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, MeshCodecError> {
        Ok(Self {
            reader: RansBitDecoder::new(data)?,
            zero_model: AdaptiveBitModel::new(),
            sign_model: AdaptiveBitModel::new(),
            length_models: Default::default(),
        })
    }

    pub fn decode_residual(&mut self) -> Result<Vector3l, MeshCodecError> {
        Ok([
            self.decode_component()?,
            self.decode_component()?,
            self.decode_component()?,
        ])
    }

    fn decode_component(&mut self) -> Result<i64, MeshCodecError> {
        if self.reader.decode_bit(&mut self.zero_model) {
            return Ok(0);
        }
        let negative = self.reader.decode_bit(&mut self.sign_model);
        let mut length_symbol = 0u32;
        for i in (0..LENGTH_BITS).rev() {
            let bit = self.reader.decode_bit(&mut self.length_models[i as usize]);
            length_symbol = (length_symbol << 1) | bit as u32;
        }
        let nbits = length_symbol + 1;
        let low = if nbits > 1 {
            self.reader.decode_raw_bits(nbits - 1)
        } else {
            0
        };
        let magnitude = (1u64 << (nbits - 1)) | low;
        if magnitude > i64::MAX as u64 {
            return Err(MeshCodecError::CorruptBitstream(
                "residual magnitude overflows".into(),
            ));
        }
        let magnitude = magnitude as i64;
        Ok(if negative { -magnitude } else { magnitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_residual_round_trip() {
        let residuals: Vec<Vector3l> = vec![
            [0, 0, 0],
            [1, -1, 0],
            [-500, 2, 123_456],
            [i32::MAX as i64, i32::MIN as i64, 0],
            [7, 7, 7],
            [-1, -1, -1],
            [1 << 40, -(1 << 40), 3],
        ];

        let mut enc = GeometryEncoder::new();
        for &r in &residuals {
            enc.encode_residual(r);
        }
        let data = enc.finish().unwrap();

        let mut dec = GeometryDecoder::new(&data).unwrap();
        for &expected in &residuals {
            assert_eq!(dec.decode_residual().unwrap(), expected);
        }
    }

    #[test]
    fn test_mostly_small_residuals_round_trip() {
        let residuals: Vec<Vector3l> = (0i64..1000)
            .map(|i| [(i % 5) - 2, (i % 3) - 1, (i * 31 % 7) - 3])
            .collect();

        let mut enc = GeometryEncoder::new();
        for &r in &residuals {
            enc.encode_residual(r);
        }
        let data = enc.finish().unwrap();

        let mut dec = GeometryDecoder::new(&data).unwrap();
        for &expected in &residuals {
            assert_eq!(dec.decode_residual().unwrap(), expected);
        }
    }
}
