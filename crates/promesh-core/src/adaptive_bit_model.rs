use crate::ans::ANS_P8_PRECISION;

const RESCALE_LIMIT: u32 = 1 << 16;

/// Frequency-counting model for a single binary context.
///
/// Encoder and decoder keep mirrored instances and must call [`update`]
/// after every coded bit so the probability estimates stay in sync.
///
/// [`update`]: AdaptiveBitModel::update
#[derive(Debug, Clone)]
pub struct AdaptiveBitModel {
    count_zero: u32,
    count_one: u32,
}

impl Default for AdaptiveBitModel {
    fn default() -> Self {
        Self {
            count_zero: 1,
            count_one: 1,
        }
    }
}

impl AdaptiveBitModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probability of a zero bit in 8-bit precision, clamped to 1..=255 so
    /// neither symbol ever becomes impossible.
    pub fn prob_zero(&self) -> u8 {
        let total = self.count_zero + self.count_one;
        let p = self.count_zero * ANS_P8_PRECISION / total;
        p.clamp(1, 255) as u8
    }

    pub fn update(&mut self, bit: bool) {
        if bit {
            self.count_one += 1;
        } else {
            self.count_zero += 1;
        }
        if self.count_zero + self.count_one > RESCALE_LIMIT {
            self.count_zero = (self.count_zero >> 1).max(1);
            self.count_one = (self.count_one >> 1).max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_probability_is_even() {
        let model = AdaptiveBitModel::new();
        assert_eq!(model.prob_zero(), 128);
    }

    #[test]
    fn test_adapts_toward_observed_bits() {
        let mut model = AdaptiveBitModel::new();
        for _ in 0..100 {
            model.update(false);
        }
        assert!(model.prob_zero() > 200);
        for _ in 0..1000 {
            model.update(true);
        }
        assert!(model.prob_zero() < 50);
    }

    #[test]
    fn test_probability_never_saturates() {
        let mut model = AdaptiveBitModel::new();
        for _ in 0..200_000 {
            model.update(true);
        }
        let p = model.prob_zero();
        assert!((1..=255).contains(&p));
    }
}
