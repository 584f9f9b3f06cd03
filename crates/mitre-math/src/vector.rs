//! Dimension-checked vector utilities.
//!
//! These operate on plain slices so callers can pass nalgebra vectors
//! (`v.as_slice()`) or raw coordinate arrays alike.

use crate::{MathError, Result};

/// Vectors shorter than this are treated as zero length.
const ZERO_LENGTH: f64 = 1e-12;

/// Sum of element-wise products.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MathError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Euclidean norm. Zero-length vectors are rejected.
pub fn length(v: &[f64]) -> Result<f64> {
    let len = dot(v, v)?.sqrt();
    if len < ZERO_LENGTH {
        return Err(MathError::DegenerateVector);
    }
    Ok(len)
}

/// Angle between two vectors in radians, in `[0, π]`.
///
/// Evaluated as `2·atan2(|â − b̂|, |â + b̂|)` on the normalized inputs, which
/// equals `acos(â · b̂)` but stays exact for parallel and opposite vectors
/// where the cosine form loses precision.
pub fn angle_between(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MathError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let (la, lb) = (length(a)?, length(b)?);
    let (mut diff, mut sum) = (0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (ux, uy) = (x / la, y / lb);
        diff += (ux - uy) * (ux - uy);
        sum += (ux + uy) * (ux + uy);
    }
    Ok(2.0 * diff.sqrt().atan2(sum.sqrt()))
}
