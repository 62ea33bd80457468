//! Promesh Core Library
//!
//! Progressive lossless compression for closed triangle meshes: the encoder
//! decimates the mesh level by level and the decoder replays the removals in
//! reverse, so any prefix of the stream yields a coarser but valid mesh and
//! the full stream restores the input exactly.

// =============================================================================
// Geometry and adjacency
// =============================================================================

pub mod corner_table;
pub mod geometry_indices;
pub mod math_utils;
pub mod mesh;

// =============================================================================
// Bitstream and entropy coding
// =============================================================================

pub mod adaptive_bit_model;
pub mod ans;
pub mod decoder_buffer;
pub mod encoder_buffer;
pub mod rans_bit_decoder;
pub mod rans_bit_encoder;

// =============================================================================
// Codec
// =============================================================================

pub mod connectivity_coder;
pub mod decimator;
pub mod encoder_options;
pub mod geometry_coder;
pub mod patch_selector;
pub mod prediction_scheme;
pub mod progressive_decoder;
pub mod progressive_encoder;
pub mod refinement_record;
pub mod status;
pub mod version;

// =============================================================================
// Re-exports
// =============================================================================

pub use adaptive_bit_model::AdaptiveBitModel;
pub use corner_table::CornerTable;
pub use decoder_buffer::DecoderBuffer;
pub use encoder_buffer::EncoderBuffer;
pub use encoder_options::EncoderOptions;
pub use geometry_indices::{CornerIndex, FaceIndex, VertexIndex};
pub use math_utils::{Vector3i, Vector3l};
pub use mesh::{Face, MeshLevel};
pub use progressive_decoder::{decode_mesh, ProgressiveDecoder};
pub use progressive_encoder::{encode_mesh, ProgressiveEncoder};
pub use refinement_record::RefinementRecord;
pub use status::{MeshCodecError, Status};
