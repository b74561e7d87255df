//! Monte Carlo lighting for triangle meshes.
//!
//! Estimates the irradiance a single point light delivers to a set of
//! triangles, and bakes per-vertex lighting for flat-shaded meshes.

mod bake;
mod color;
mod error;
mod irradiance;
mod light;
mod triangle;

pub use bake::{bake_vertices, BakeConfig, ShadingMode};
pub use color::{to_gamma, to_linear, DEFAULT_GAMMA};
pub use error::{LightingError, LightingResult};
pub use irradiance::{
    compute_irradiance, compute_irradiance_parallel, compute_shading, DISTANCE_EPSILON,
    PARALLEL_CHUNK_SIZE,
};
pub use light::Light;
pub use triangle::{total_area, triangles_from_vertices, Triangle};

/// Re-export the vector type used throughout the API
pub use lc_math::Vector3;
