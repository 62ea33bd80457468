use crate::adaptive_bit_model::AdaptiveBitModel;
use crate::ans::AnsEncoder;
use crate::status::MeshCodecError;

/// Half of the 8-bit probability range, used for bits coded without a model.
const RAW_PROB_ZERO: u8 = 128;

/// Adaptive binary encoder on top of the rANS core.
///
/// rANS consumes symbols in reverse of decode order, but adaptive model
/// updates have to happen in forward order. Bits are therefore staged
/// together with the probability that was current when they were submitted,
/// and only flushed (reversed) into the rANS state in [`finish`].
///
/// [`finish`]: RansBitEncoder::finish
#[derive(Debug, Default)]
pub struct RansBitEncoder {
    staged: Vec<(bool, u8)>,
}

impl RansBitEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_bit(&mut self, model: &mut AdaptiveBitModel, bit: bool) {
        self.staged.push((bit, model.prob_zero()));
        model.update(bit);
    }

    /// Encodes the lowest `nbits` of `value`, most significant first, with a
    /// fixed even probability.
    pub fn encode_raw_bits(&mut self, value: u64, nbits: u32) {
        debug_assert!(nbits <= 64);
        for i in (0..nbits).rev() {
            let bit = (value >> i) & 1 != 0;
            self.staged.push((bit, RAW_PROB_ZERO));
        }
    }

    pub fn num_bits(&self) -> usize {
        self.staged.len()
    }

    pub fn finish(self) -> Result<Vec<u8>, MeshCodecError> {
        let mut ans = AnsEncoder::new();
        for &(bit, prob_zero) in self.staged.iter().rev() {
            ans.write_bit(bit, prob_zero);
        }
        ans.finalize()
    }
}
