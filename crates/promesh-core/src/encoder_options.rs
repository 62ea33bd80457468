/// Encoder configuration.
#[derive(Debug, Clone, Copy)]
pub struct EncoderOptions {
    /// Upper bound on decimation rounds. Decimation also stops on its own
    /// when no vertex can be removed, so this caps how many refinement
    /// batches the stream carries rather than forcing that many.
    pub max_rounds: u32,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_rounds: u32::MAX,
        }
    }
}

impl EncoderOptions {
    pub fn with_max_rounds(max_rounds: u32) -> Self {
        Self { max_rounds }
    }
}
