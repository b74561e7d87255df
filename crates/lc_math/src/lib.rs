//! Vector and matrix algebra plus the viewer camera.
//!
//! Matrices are row-major and premultiply column vectors. Conversions to
//! `glam` types are provided for callers that already use it.

mod camera;
mod matrix;
pub mod spherical;
mod vector;

pub use camera::{Camera, CameraBasis, CameraMode, POLE_EPSILON};
pub use matrix::Matrix4;
pub use vector::{Vector3, DEFAULT_PRECISION};
