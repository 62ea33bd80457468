use crate::adaptive_bit_model::AdaptiveBitModel;
use crate::ans::AnsDecoder;
use crate::status::MeshCodecError;

const RAW_PROB_ZERO: u8 = 128;

/// Adaptive binary decoder, the mirror of
/// [`crate::rans_bit_encoder::RansBitEncoder`].
pub struct RansBitDecoder<'a> {
    ans: AnsDecoder<'a>,
}

impl<'a> RansBitDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, MeshCodecError> {
        let ans = AnsDecoder::new(data)
            .map_err(|_| MeshCodecError::CorruptBitstream("malformed entropy stream".into()))?;
        Ok(Self { ans })
    }

    pub fn decode_bit(&mut self, model: &mut AdaptiveBitModel) -> bool {
        let bit = self.ans.read_bit(model.prob_zero());
        model.update(bit);
        bit
    }

    pub fn decode_raw_bits(&mut self, nbits: u32) -> u64 {
        debug_assert!(nbits <= 64);
        let mut value = 0u64;
        for _ in 0..nbits {
            value = (value << 1) | self.ans.read_bit(RAW_PROB_ZERO) as u64;
        }
        value
    }
}
