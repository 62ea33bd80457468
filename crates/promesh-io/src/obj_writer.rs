//! OBJ format writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::obj_reader::ObjMesh;
use crate::MeshIoError;

pub fn write_obj<P: AsRef<Path>>(path: P, mesh: &ObjMesh) -> Result<(), MeshIoError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for f in &mesh.faces {
        // OBJ indices are one-based.
        writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }
    writer.flush()?;
    Ok(())
}
