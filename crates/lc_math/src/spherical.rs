//! Spherical coordinates, physics convention.
//!
//! A spherical coordinate is stored in a [`Vector3`] as
//! `(radius, inclination, azimuth)` with radius in `[0, inf)`, inclination
//! (theta) in `[0, pi]` measured from +Y, and azimuth (phi) in `[0, 2pi)`
//! measured around Y starting at +Z. Y points up.

use std::f32::consts::{PI, TAU};

use crate::Vector3;

/// Convert `(radius, inclination, azimuth)` to a cartesian point.
pub fn to_cartesian(spherical: Vector3) -> Vector3 {
    let (s_theta, c_theta) = spherical.y.sin_cos();
    let (s_phi, c_phi) = spherical.z.sin_cos();

    Vector3::new(
        spherical.x * s_theta * s_phi,
        spherical.x * c_theta,
        spherical.x * s_theta * c_phi,
    )
}

/// Partial derivative of [`to_cartesian`] with respect to the inclination.
///
/// Points along increasing theta, i.e. "down" the sphere, so its negation is
/// an up vector that stays well defined away from the poles.
pub fn d_theta_cartesian(spherical: Vector3) -> Vector3 {
    let (s_theta, c_theta) = spherical.y.sin_cos();
    let (s_phi, c_phi) = spherical.z.sin_cos();

    Vector3::new(
        spherical.x * c_theta * s_phi,
        -spherical.x * s_theta,
        spherical.x * c_theta * c_phi,
    )
}

/// Convert a cartesian point (relative to the origin) to spherical coordinates.
///
/// The inclination is `acos(y / r)`, evaluated as an `atan2` of the
/// horizontal and vertical extents so it stays accurate next to the poles.
/// The origin maps to `(0, 0, 0)`.
pub fn to_spherical(cartesian: Vector3) -> Vector3 {
    let r = cartesian.len();
    let horizontal = cartesian.x.hypot(cartesian.z);
    let inclination = horizontal.atan2(cartesian.y);
    let mut azimuth = cartesian.x.atan2(cartesian.z);

    // atan2 returns (-pi, pi]
    if azimuth < 0.0 {
        azimuth += TAU;
    }

    Vector3::new(r, inclination, azimuth)
}

/// Clamp the inclination of `spherical` to `[eps, pi - eps]`.
pub fn clamp_inclination(spherical: &mut Vector3, eps: f32) {
    spherical.y = spherical.y.max(eps).min(PI - eps);
}
