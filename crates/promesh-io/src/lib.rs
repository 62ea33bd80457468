//! I/O for the promesh codec: OBJ reading and writing plus the position
//! quantization that maps floating-point coordinates onto the integer grid
//! the codec works in.

pub mod obj_reader;
pub mod obj_writer;
pub mod quantizer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshIoError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

pub use obj_reader::{read_obj, ObjMesh};
pub use obj_writer::write_obj;
pub use quantizer::PositionQuantizer;
