//! 3D vector type used throughout the engine
//!
//! `NVec3` is nalgebra's `Vector3<f64>`, which already provides add, subtract,
//! scale, negate, dot, magnitude and element-wise equality. The only extra
//! contract is a normalize that refuses zero-length input instead of
//! silently producing NaNs.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};

pub type NVec3 = Vector3<f64>;

/// Scale `v` in place to unit length and hand it back
///
/// Fails with [`SimError::DegenerateGeometry`] when `v` has zero magnitude.
/// Callers that need to keep the original must copy it first.
pub fn normalize_in_place(v: &mut NVec3) -> SimResult<&mut NVec3> {
    let norm = v.magnitude();
    if norm == 0.0 || !norm.is_finite() {
        return Err(SimError::DegenerateGeometry("cannot normalize a zero-length vector"));
    }
    *v /= norm;
    Ok(v)
}

/// Non-destructive variant of [`normalize_in_place`]
pub fn unit(v: &NVec3) -> SimResult<NVec3> {
    let mut out = *v;
    normalize_in_place(&mut out)?;
    Ok(out)
}

/// Coordinate axis selector used by the hinge policy and the squeeze setup
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "z")]
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> NVec3 {
        let mut out = NVec3::zeros();
        out[self.index()] = 1.0;
        out
    }
}
