//! Command-line encoder/decoder for progressive mesh streams.
//!
//! The `.pmc` file written here is a small container: the quantization grid
//! parameters (origin and step, needed to map the integer coordinates back
//! to floats) followed by the codec bitstream.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use promesh_core::{
    decode_mesh, encode_mesh, EncoderOptions, Face, MeshCodecError, MeshLevel, ProgressiveDecoder,
    VertexIndex,
};
use promesh_io::{read_obj, write_obj, MeshIoError, ObjMesh, PositionQuantizer};

const CONTAINER_PREFIX_SIZE: usize = 32;

#[derive(Error, Debug)]
enum ToolError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    MeshIo(#[from] MeshIoError),
    #[error(transparent)]
    Codec(#[from] MeshCodecError),
    #[error("bad container: {0}")]
    Container(String),
}

#[derive(Parser)]
#[command(name = "promesh", version, about = "Progressive lossless mesh codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress an OBJ mesh into a progressive stream.
    Encode {
        /// Input OBJ file (closed triangle mesh).
        input: PathBuf,
        /// Output .pmc file.
        output: PathBuf,
        /// Maximum number of decimation rounds; decimation always stops on
        /// its own once nothing more can be removed.
        #[arg(short, long)]
        iterations: Option<u32>,
        /// Position quantization bits.
        #[arg(short, long, default_value_t = 14)]
        bits: u32,
    },
    /// Restore the full-resolution OBJ from a progressive stream.
    Decode {
        /// Input .pmc file.
        input: PathBuf,
        /// Output OBJ file.
        output: PathBuf,
        /// Also write every resolution level as level_NNN.obj into this
        /// directory.
        #[arg(long)]
        dump_levels: Option<PathBuf>,
    },
    /// Print stream statistics without decoding the geometry.
    Info {
        /// Input .pmc file.
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), ToolError> {
    match command {
        Command::Encode {
            input,
            output,
            iterations,
            bits,
        } => encode_command(&input, &output, iterations, bits),
        Command::Decode {
            input,
            output,
            dump_levels,
        } => decode_command(&input, &output, dump_levels.as_deref()),
        Command::Info { input } => info_command(&input),
    }
}

fn encode_command(
    input: &Path,
    output: &Path,
    iterations: Option<u32>,
    bits: u32,
) -> Result<(), ToolError> {
    let obj = read_obj(input)?;
    let quantizer = PositionQuantizer::fit(&obj.positions, bits)?;
    let positions = obj.positions.iter().map(|p| quantizer.quantize(*p)).collect();
    let faces: Vec<Face> = obj
        .faces
        .iter()
        .map(|f| [VertexIndex(f[0]), VertexIndex(f[1]), VertexIndex(f[2])])
        .collect();
    let mesh = MeshLevel::new(positions, faces, 0);

    let options = match iterations {
        Some(n) => EncoderOptions::with_max_rounds(n),
        None => EncoderOptions::default(),
    };
    let stream = encode_mesh(&mesh, options)?;

    let mut file = Vec::with_capacity(CONTAINER_PREFIX_SIZE + stream.len());
    for v in quantizer.origin() {
        file.extend_from_slice(&v.to_le_bytes());
    }
    file.extend_from_slice(&quantizer.step().to_le_bytes());
    file.extend_from_slice(&stream);
    fs::write(output, &file)?;

    println!(
        "{} vertices, {} faces -> {} bytes",
        mesh.num_vertices(),
        mesh.num_faces(),
        file.len()
    );
    Ok(())
}

fn decode_command(
    input: &Path,
    output: &Path,
    dump_levels: Option<&Path>,
) -> Result<(), ToolError> {
    let file = fs::read(input)?;
    let (quantizer, stream) = split_container(&file)?;

    let mesh = match dump_levels {
        None => decode_mesh(stream)?,
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let mut decoder = ProgressiveDecoder::new(stream)?;
            loop {
                let level = decoder.current_level();
                let path = dir.join(format!("level_{:03}.obj", level.level()));
                write_obj(&path, &level_to_obj(level, &quantizer))?;
                if decoder.next_level()?.is_none() {
                    break;
                }
            }
            decoder.decode_all()?
        }
    };

    write_obj(output, &level_to_obj(&mesh, &quantizer))?;
    println!(
        "restored {} vertices, {} faces (level {})",
        mesh.num_vertices(),
        mesh.num_faces(),
        mesh.level()
    );
    Ok(())
}

fn info_command(input: &Path) -> Result<(), ToolError> {
    let file = fs::read(input)?;
    let (_, stream) = split_container(&file)?;
    let decoder = ProgressiveDecoder::new(stream)?;
    println!(
        "base: {} vertices, {} faces; {} refinement batches; {} bytes total",
        decoder.current_level().num_vertices(),
        decoder.current_level().num_faces(),
        decoder.remaining_batches(),
        file.len()
    );
    Ok(())
}

fn split_container(file: &[u8]) -> Result<(PositionQuantizer, &[u8]), ToolError> {
    if file.len() < CONTAINER_PREFIX_SIZE {
        return Err(ToolError::Container("file too short".into()));
    }
    let mut values = [0f64; 4];
    for (i, v) in values.iter_mut().enumerate() {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&file[i * 8..(i + 1) * 8]);
        *v = f64::from_le_bytes(raw);
    }
    let step = values[3];
    if !step.is_finite() || step <= 0.0 {
        return Err(ToolError::Container("invalid quantization step".into()));
    }
    Ok((
        PositionQuantizer::new([values[0], values[1], values[2]], step),
        &file[CONTAINER_PREFIX_SIZE..],
    ))
}

fn level_to_obj(level: &MeshLevel, quantizer: &PositionQuantizer) -> ObjMesh {
    ObjMesh {
        positions: level
            .positions()
            .iter()
            .map(|p| quantizer.dequantize(*p))
            .collect(),
        faces: level
            .faces()
            .iter()
            .map(|f| [f[0].0, f[1].0, f[2].0])
            .collect(),
    }
}
