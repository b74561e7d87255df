//! Gamma conversion for editing linear colors in a perceptual space.

use lc_math::Vector3;

/// Display gamma used by color pickers.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Gamma-encoded color to linear: `c^gamma` per component.
pub fn to_linear(color: Vector3, gamma: f32) -> Vector3 {
    Vector3::new(color.x.powf(gamma), color.y.powf(gamma), color.z.powf(gamma))
}

/// Linear color to gamma-encoded: `c^(1/gamma)` per component.
pub fn to_gamma(color: Vector3, gamma: f32) -> Vector3 {
    let inv = 1.0 / gamma;
    Vector3::new(color.x.powf(inv), color.y.powf(inv), color.z.powf(inv))
}
