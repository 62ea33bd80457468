use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshCodecError {
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    #[error("corrupt bitstream: {0}")]
    CorruptBitstream(String),
    #[error("reconstruction mismatch: {0}")]
    ReconstructionMismatch(String),
    #[error("buffer error: {0}")]
    Buffer(String),
}

pub type Status = Result<(), MeshCodecError>;

pub fn invalid_mesh(msg: impl Into<String>) -> MeshCodecError {
    MeshCodecError::InvalidMesh(msg.into())
}

pub fn corrupt_bitstream(msg: impl Into<String>) -> MeshCodecError {
    MeshCodecError::CorruptBitstream(msg.into())
}
