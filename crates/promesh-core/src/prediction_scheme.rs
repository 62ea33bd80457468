use crate::math_utils::{Vector3i, Vector3l};
use crate::status::MeshCodecError;

/// Predicts a removed vertex position as the component-wise floor mean of
/// its ring neighbors.
///
/// All arithmetic is exact integer math so encoder and decoder compute the
/// identical prediction from the identical ring.
pub fn predict_position(ring: &[Vector3i]) -> Vector3i {
    debug_assert!(!ring.is_empty());
    let n = ring.len() as i64;
    let mut sum = [0i64; 3];
    for p in ring {
        sum[0] += p[0] as i64;
        sum[1] += p[1] as i64;
        sum[2] += p[2] as i64;
    }
    [
        sum[0].div_euclid(n) as i32,
        sum[1].div_euclid(n) as i32,
        sum[2].div_euclid(n) as i32,
    ]
}

pub fn compute_residual(actual: Vector3i, predicted: Vector3i) -> Vector3l {
    [
        actual[0] as i64 - predicted[0] as i64,
        actual[1] as i64 - predicted[1] as i64,
        actual[2] as i64 - predicted[2] as i64,
    ]
}

/// Applies a residual to a prediction, rejecting values outside the 32-bit
/// coordinate range.
pub fn apply_residual(
    predicted: Vector3i,
    residual: Vector3l,
) -> Result<Vector3i, MeshCodecError> {
    let mut out = [0i32; 3];
    for i in 0..3 {
        let v = predicted[i] as i64 + residual[i];
        out[i] = i32::try_from(v).map_err(|_| {
            MeshCodecError::CorruptBitstream(format!(
                "reconstructed coordinate {} outside 32-bit range",
                v
            ))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_mean_rounds_toward_negative_infinity() {
        let ring = [[0, 0, -1], [1, 0, -1], [0, 1, -1]];
        // x sum 1, y sum 1, z sum -3 over 3 neighbors.
        assert_eq!(predict_position(&ring), [0, 0, -1]);

        let ring = [[-1, -1, 0], [0, 0, 0]];
        assert_eq!(predict_position(&ring), [-1, -1, 0]);
    }

    #[test]
    fn test_residual_is_exact_inverse() {
        let ring = [
            [10, -3, 7],
            [-20, 5, 9],
            [3, 3, 3],
            [100, -50, 0],
            [1, 2, 3],
        ];
        let actual = [-12345, 67890, 7];
        let predicted = predict_position(&ring);
        let residual = compute_residual(actual, predicted);
        assert_eq!(apply_residual(predicted, residual).unwrap(), actual);
    }

    #[test]
    fn test_extreme_coordinates_round_trip() {
        let ring = [[i32::MAX, i32::MIN, 0], [i32::MAX, i32::MIN, 0]];
        let predicted = predict_position(&ring);
        assert_eq!(predicted, [i32::MAX, i32::MIN, 0]);

        let actual = [i32::MIN, i32::MAX, -1];
        let residual = compute_residual(actual, predicted);
        assert_eq!(apply_residual(predicted, residual).unwrap(), actual);
    }

    #[test]
    fn test_out_of_range_reconstruction_rejected() {
        let result = apply_residual([i32::MAX, 0, 0], [1, 0, 0]);
        assert!(matches!(
            result,
            Err(MeshCodecError::CorruptBitstream(_))
        ));
    }
}
