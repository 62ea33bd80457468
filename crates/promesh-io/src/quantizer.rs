//! Uniform position quantization.
//!
//! The codec works on integer coordinates; this maps floating-point input
//! onto a grid spanning the mesh bounding box. Quantization is the only
//! lossy step in the pipeline, and round-tripping quantized values through
//! [`PositionQuantizer::dequantize`] and back is exact.

use promesh_core::Vector3i;

use crate::MeshIoError;

pub const MAX_QUANTIZATION_BITS: u32 = 30;

#[derive(Debug, Clone, Copy)]
pub struct PositionQuantizer {
    origin: [f64; 3],
    step: f64,
}

impl PositionQuantizer {
    /// Rebuilds a quantizer from stored grid parameters.
    pub fn new(origin: [f64; 3], step: f64) -> Self {
        Self { origin, step }
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Fits a grid with `2^bits` cells across the largest bounding-box
    /// extent of `points`.
    pub fn fit(points: &[[f64; 3]], bits: u32) -> Result<Self, MeshIoError> {
        if bits == 0 || bits > MAX_QUANTIZATION_BITS {
            return Err(MeshIoError::Unsupported(format!(
                "quantization bits must be in 1..={}, got {}",
                MAX_QUANTIZATION_BITS, bits
            )));
        }
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for p in points {
            for i in 0..3 {
                if !p[i].is_finite() {
                    return Err(MeshIoError::Unsupported(
                        "non-finite vertex coordinate".into(),
                    ));
                }
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        let extent = if points.is_empty() {
            0.0
        } else {
            (0..3).map(|i| max[i] - min[i]).fold(0.0, f64::max)
        };
        let origin = if points.is_empty() { [0.0; 3] } else { min };
        // A flat or single-point cloud still gets a usable grid.
        let step = if extent > 0.0 {
            extent / ((1u64 << bits) - 1) as f64
        } else {
            1.0
        };
        Ok(Self { origin, step })
    }

    pub fn quantize(&self, p: [f64; 3]) -> Vector3i {
        [
            ((p[0] - self.origin[0]) / self.step).round() as i32,
            ((p[1] - self.origin[1]) / self.step).round() as i32,
            ((p[2] - self.origin[2]) / self.step).round() as i32,
        ]
    }

    pub fn dequantize(&self, q: Vector3i) -> [f64; 3] {
        [
            self.origin[0] + q[0] as f64 * self.step,
            self.origin[1] + q[1] as f64 * self.step,
            self.origin[2] + q[2] as f64 * self.step,
        ]
    }
}
