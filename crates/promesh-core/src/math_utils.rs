//! Exact integer geometry helpers.
//!
//! All orientation tests in the codec run on integer coordinates with wide
//! intermediates so that encoder and decoder can never disagree through
//! floating-point rounding.

use num_traits::PrimInt;

/// Quantized vertex position.
pub type Vector3i = [i32; 3];

/// Exact position delta (residual) type.
pub type Vector3l = [i64; 3];

pub fn sub(a: Vector3i, b: Vector3i) -> Vector3l {
    [
        a[0] as i64 - b[0] as i64,
        a[1] as i64 - b[1] as i64,
        a[2] as i64 - b[2] as i64,
    ]
}

pub fn cross_wide(a: Vector3l, b: Vector3l) -> [i128; 3] {
    [
        a[1] as i128 * b[2] as i128 - a[2] as i128 * b[1] as i128,
        a[2] as i128 * b[0] as i128 - a[0] as i128 * b[2] as i128,
        a[0] as i128 * b[1] as i128 - a[1] as i128 * b[0] as i128,
    ]
}

pub fn dot_wide(a: [i128; 3], b: [i128; 3]) -> i128 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Dot product that reports overflow instead of wrapping. Products of two
/// accumulated cross products can exceed 128 bits for coordinates near the
/// ends of the 32-bit range.
pub fn checked_dot_wide(a: [i128; 3], b: [i128; 3]) -> Option<i128> {
    let mut acc = 0i128;
    for i in 0..3 {
        acc = acc.checked_add(a[i].checked_mul(b[i])?)?;
    }
    Some(acc)
}

/// Normal (up to scale) of the oriented triangle (a, b, c).
pub fn triangle_normal(a: Vector3i, b: Vector3i, c: Vector3i) -> [i128; 3] {
    cross_wide(sub(b, a), sub(c, a))
}

/// Number of bits needed to represent `x` (0 for 0).
pub fn bits_required<T: PrimInt>(x: T) -> u32 {
    let total = (std::mem::size_of::<T>() * 8) as u32;
    total - x.leading_zeros()
}
