//! Per-vertex lighting bake for flat-shaded meshes.
//!
//! Each triangle of a non-indexed vertex list gets one Monte Carlo estimate,
//! written to all three of its vertices. Progress is reported once per
//! triangle, which is also the granularity at which a bake can be cancelled.

use std::ops::ControlFlow;
use std::slice;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use lc_math::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::irradiance::{compute_irradiance, compute_shading, stream_seed};
use crate::triangle::triangles_from_vertices;
use crate::{Light, LightingError, LightingResult, Triangle};

/// Which estimator the bake runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Colored irradiance with distance falloff, back faces unlit.
    #[default]
    Irradiance,
    /// Plain `|N.L|`, written to all three channels.
    Shading,
}

impl FromStr for ShadingMode {
    type Err = LightingError;

    /// Case-insensitive `irradiance` or `shading`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "irradiance" => Ok(ShadingMode::Irradiance),
            "shading" => Ok(ShadingMode::Shading),
            _ => Err(LightingError::UnknownShadingMode(s.to_string())),
        }
    }
}

/// Bake settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Monte Carlo samples per triangle
    pub samples: u32,
    /// Base seed; a bake is reproducible for a fixed seed and mode
    pub seed: u64,
    pub mode: ShadingMode,
    /// Spread triangles over rayon workers
    pub parallel: bool,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            seed: 0,
            mode: ShadingMode::Irradiance,
            parallel: false,
        }
    }
}

impl BakeConfig {
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_mode(mut self, mode: ShadingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Estimate one triangle. Zero-area triangles have no defined normal and bake to black.
fn bake_triangle<R: Rng + ?Sized>(
    triangle: &Triangle,
    light: &Light,
    config: &BakeConfig,
    rng: &mut R,
) -> LightingResult<Vector3> {
    if triangle.area() == 0.0 {
        return Ok(Vector3::ZERO);
    }

    let triangles = slice::from_ref(triangle);
    match config.mode {
        ShadingMode::Irradiance => compute_irradiance(triangles, light, config.samples, rng),
        ShadingMode::Shading => {
            compute_shading(triangles, light, config.samples, rng).map(Vector3::splat)
        }
    }
}

/// Bake lighting for a flat, non-indexed triangle list.
///
/// Returns one value per vertex. `progress(done, total)` is called after each
/// triangle; returning `ControlFlow::Break` stops the bake with
/// [`LightingError::Cancelled`]. In parallel mode the callback is serialized
/// and triangles are reported in completion order.
pub fn bake_vertices<P>(
    vertices: &[Vector3],
    light: &Light,
    config: &BakeConfig,
    mut progress: P,
) -> LightingResult<Vec<Vector3>>
where
    P: FnMut(usize, usize) -> ControlFlow<()> + Send,
{
    let triangles = triangles_from_vertices(vertices)?;
    if triangles.is_empty() {
        return Err(LightingError::EmptyMesh);
    }
    if config.samples == 0 {
        return Err(LightingError::NoSamples);
    }

    let total = triangles.len();
    let degenerate = triangles.iter().filter(|t| t.area() == 0.0).count();
    if degenerate > 0 {
        log::warn!("{} of {} triangles have zero area and bake to black", degenerate, total);
    }

    log::info!(
        "Baking {:?} for {} triangles using {} samples{}",
        config.mode,
        total,
        config.samples,
        if config.parallel { " (parallel)" } else { "" }
    );
    let start = Instant::now();

    let per_triangle = if config.parallel {
        let done = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);
        let progress = Mutex::new(progress);

        triangles
            .par_iter()
            .enumerate()
            .map(|(index, triangle)| {
                if cancelled.load(Ordering::Relaxed) {
                    return Err(LightingError::Cancelled {
                        completed: done.load(Ordering::Relaxed),
                        total,
                    });
                }

                let mut rng = StdRng::seed_from_u64(stream_seed(config.seed, index as u64));
                let value = bake_triangle(triangle, light, config, &mut rng)?;

                // A poisoned lock only means another callback panicked
                let mut report = progress.lock().unwrap_or_else(|e| e.into_inner());
                let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("Triangle {} done ({} of {})", index, completed, total);
                if (*report)(completed, total).is_break() {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(LightingError::Cancelled { completed, total });
                }
                Ok(value)
            })
            .collect::<LightingResult<Vec<Vector3>>>()?
    } else {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut values = Vec::with_capacity(total);
        for (index, triangle) in triangles.iter().enumerate() {
            values.push(bake_triangle(triangle, light, config, &mut rng)?);
            log::debug!("Triangle {} done ({} of {})", index, index + 1, total);
            if progress(index + 1, total).is_break() {
                return Err(LightingError::Cancelled {
                    completed: index + 1,
                    total,
                });
            }
        }
        values
    };

    log::info!("Baked {} triangles in {:?}", total, start.elapsed());

    Ok(per_triangle
        .into_iter()
        .flat_map(|value| [value; 3])
        .collect())
}
