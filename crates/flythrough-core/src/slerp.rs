//! Spherical linear interpolation between orientation quaternions.
//!
//! Used to blend the anchor orientation of a camera path towards the live
//! viewer orientation. Unlike [`glam::Quat::slerp`], the result is left
//! un-normalized in the near-parallel fallback, and the degenerate threshold
//! is expressed on `sin θ` rather than on the dot product.

use glam::Quat;

use crate::error::Result;
use crate::pose::validate_quat;

/// Below this value of `sin θ` the two orientations are treated as identical
/// and blended linearly.
pub const SLERP_EPSILON: f32 = 1e-6;

/// Interpolates from `q1` to `q2` along the shortest great-circle arc.
///
/// Both inputs are normalized first. If their dot product is negative, `q2` is
/// negated so the interpolation never takes the long way around the
/// hypersphere. The output is a weighted sum of the inputs and is **not**
/// re-normalized; callers that need a strict unit quaternion must normalize it.
///
/// # Preconditions
///
/// Neither input may be zero-length. Use [`checked_slerp`] to get an error
/// instead of a NaN-filled result.
#[must_use]
pub fn slerp(q1: Quat, q2: Quat, t: f32) -> Quat {
    let q1 = q1.normalize();
    let mut q2 = q2.normalize();

    let mut dot = q1.dot(q2);
    if dot < 0.0 {
        q2 = -q2;
        dot = -dot;
    }

    let dot = dot.clamp(-1.0, 1.0);
    let theta = dot.acos();
    let sin_theta = theta.sin();
    if sin_theta < SLERP_EPSILON {
        return q1 * (1.0 - t) + q2 * t;
    }

    let s1 = ((1.0 - t) * theta).sin() / sin_theta;
    let s2 = (t * theta).sin() / sin_theta;
    q1 * s1 + q2 * s2
}

/// Like [`slerp`], but rejects zero-length or non-finite inputs.
pub fn checked_slerp(q1: Quat, q2: Quat, t: f32) -> Result<Quat> {
    validate_quat(q1)?;
    validate_quat(q2)?;
    Ok(slerp(q1, q2, t))
}

/// Angle in radians of the rotation that takes `a` to `b`, in `[0, π]`.
#[must_use]
pub fn angle_between(a: Quat, b: Quat) -> f32 {
    let dot = a.normalize().dot(b.normalize()).abs().min(1.0);
    2.0 * dot.acos()
}
