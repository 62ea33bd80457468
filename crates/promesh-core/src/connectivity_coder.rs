use crate::adaptive_bit_model::AdaptiveBitModel;
use crate::rans_bit_decoder::RansBitDecoder;
use crate::rans_bit_encoder::RansBitEncoder;
use crate::status::MeshCodecError;

pub const MIN_VALENCE: u32 = 3;
pub const MAX_VALENCE: u32 = 12;

const VALENCE_BITS: u32 = 4;
const OFFSET_BITS: u32 = 4;

/// Encodes the connectivity side of a refinement record: the valence of the
/// removed vertex and the fan offset that disambiguates the retriangulation.
///
/// Each bit position gets its own adaptive context; both symbols are small
/// and heavily skewed, which the per-position models pick up quickly.
#[derive(Default)]
pub struct ConnectivityEncoder {
    writer: RansBitEncoder,
    valence_models: [AdaptiveBitModel; VALENCE_BITS as usize],
    offset_models: [AdaptiveBitModel; OFFSET_BITS as usize],
}

impl ConnectivityEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_record(&mut self, valence: u32, fan_offset: u32) {
        debug_assert!((MIN_VALENCE..=MAX_VALENCE).contains(&valence));
        debug_assert!(fan_offset < valence);
        let symbol = valence - MIN_VALENCE;
        for i in (0..VALENCE_BITS).rev() {
            let bit = (symbol >> i) & 1 != 0;
            self.writer
                .encode_bit(&mut self.valence_models[i as usize], bit);
        }
        for i in (0..OFFSET_BITS).rev() {
            let bit = (fan_offset >> i) & 1 != 0;
            self.writer
                .encode_bit(&mut self.offset_models[i as usize], bit);
        }
    }

    pub fn finish(self) -> Result<Vec<u8>, MeshCodecError> {
        self.writer.finish()
    }
}

pub struct ConnectivityDecoder<'a> {
    reader: RansBitDecoder<'a>,
    valence_models: [AdaptiveBitModel; VALENCE_BITS as usize],
    offset_models: [AdaptiveBitModel; OFFSET_BITS as usize],
}

impl<'a> ConnectivityDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, MeshCodecError> {
        Ok(Self {
            reader: RansBitDecoder::new(data)?,
            valence_models: Default::default(),
            offset_models: Default::default(),
        })
    }

    /// Returns `(valence, fan_offset)`.
    pub fn decode_record(&mut self) -> Result<(u32, u32), MeshCodecError> {
        let mut symbol = 0u32;
        for i in (0..VALENCE_BITS).rev() {
            let bit = self
                .reader
                .decode_bit(&mut self.valence_models[i as usize]);
            symbol = (symbol << 1) | bit as u32;
        }
        let valence = symbol + MIN_VALENCE;
        if valence > MAX_VALENCE {
            return Err(MeshCodecError::CorruptBitstream(format!(
                "decoded valence {} out of range",
                valence
            )));
        }
        let mut fan_offset = 0u32;
        for i in (0..OFFSET_BITS).rev() {
            let bit = self
                .reader
                .decode_bit(&mut self.offset_models[i as usize]);
            fan_offset = (fan_offset << 1) | bit as u32;
        }
        if fan_offset >= valence {
            return Err(MeshCodecError::CorruptBitstream(format!(
                "fan offset {} out of range for valence {}",
                fan_offset, valence
            )));
        }
        Ok((valence, fan_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let records: Vec<(u32, u32)> = vec![
            (3, 0),
            (4, 1),
            (6, 5),
            (12, 0),
            (12, 11),
            (5, 2),
            (3, 2),
            (7, 3),
        ];

        let mut enc = ConnectivityEncoder::new();
        for &(valence, offset) in &records {
            enc.encode_record(valence, offset);
        }
        let data = enc.finish().unwrap();

        let mut dec = ConnectivityDecoder::new(&data).unwrap();
        for &expected in &records {
            assert_eq!(dec.decode_record().unwrap(), expected);
        }
    }

    #[test]
    fn test_out_of_alphabet_valence_rejected() {
        // Hand-build a stream carrying valence symbol 15 (valence 18), which
        // no encoder emits. The decoder has to refuse it.
        let mut writer = RansBitEncoder::new();
        let mut models: [AdaptiveBitModel; VALENCE_BITS as usize] = Default::default();
        for i in (0..VALENCE_BITS).rev() {
            writer.encode_bit(&mut models[i as usize], true);
        }
        let data = writer.finish().unwrap();

        let mut dec = ConnectivityDecoder::new(&data).unwrap();
        assert!(matches!(
            dec.decode_record(),
            Err(MeshCodecError::CorruptBitstream(_))
        ));
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        // Valence 3 (symbol 0) paired with fan offset 5: the offset must be
        // below the valence.
        let mut writer = RansBitEncoder::new();
        let mut valence_models: [AdaptiveBitModel; VALENCE_BITS as usize] = Default::default();
        let mut offset_models: [AdaptiveBitModel; OFFSET_BITS as usize] = Default::default();
        for i in (0..VALENCE_BITS).rev() {
            writer.encode_bit(&mut valence_models[i as usize], false);
        }
        for i in (0..OFFSET_BITS).rev() {
            let bit = (5u32 >> i) & 1 != 0;
            writer.encode_bit(&mut offset_models[i as usize], bit);
        }
        let data = writer.finish().unwrap();

        let mut dec = ConnectivityDecoder::new(&data).unwrap();
        assert!(matches!(
            dec.decode_record(),
            Err(MeshCodecError::CorruptBitstream(_))
        ));
    }

    #[test]
    fn test_long_skewed_stream_round_trip() {
        // Mostly valence 6, the common case on regular meshes.
        let records: Vec<(u32, u32)> = (0u32..2000)
            .map(|i| {
                if i % 17 == 0 {
                    (3 + i % 10, (i % 3).min(2 + i % 10))
                } else {
                    (6, i % 6)
                }
            })
            .collect();

        let mut enc = ConnectivityEncoder::new();
        for &(valence, offset) in &records {
            enc.encode_record(valence, offset);
        }
        let data = enc.finish().unwrap();

        let mut dec = ConnectivityDecoder::new(&data).unwrap();
        for &expected in &records {
            assert_eq!(dec.decode_record().unwrap(), expected);
        }
    }
}
