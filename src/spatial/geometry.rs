//! Vector math on the discrete grid: distances and angles in degrees

use crate::core::error::{Result, RteError};
use crate::core::types::Vec2;

fn check_dimensions(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(RteError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Euclidean distance between two points of equal dimensionality
pub fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a, b)?;
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    Ok(sum.sqrt())
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`
///
/// Returns 0 when either vector is the zero vector.
pub fn angle_between(u: &[f64], v: &[f64]) -> Result<f64> {
    check_dimensions(u, v)?;
    if u.iter().all(|&c| c == 0.0) || v.iter().all(|&c| c == 0.0) {
        return Ok(0.0);
    }
    let origin = vec![0.0; u.len()];
    let dot: f64 = u.iter().zip(v).map(|(a, b)| a * b).sum();
    let cos = dot / (distance(u, &origin)? * distance(v, &origin)?);
    // Rounding can push parallel vectors just past +-1
    Ok(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Signed angle in degrees turning from `u` to `v`, in `(-180, 180]`
pub fn directed_angle(u: Vec2, v: Vec2) -> f64 {
    let raw = (v.y.atan2(v.x) - u.y.atan2(u.x)).to_degrees();
    if raw > 180.0 {
        raw - 360.0
    } else if raw <= -180.0 {
        raw + 360.0
    } else {
        raw
    }
}

/// Round an angle to whole degrees (ties to even)
pub fn round_degrees(angle: f64) -> i32 {
    angle.round_ties_even() as i32
}
