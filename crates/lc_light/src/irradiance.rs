//! Monte Carlo estimation of light arriving at a triangle mesh.
//!
//! Both estimators pick a triangle uniformly by index, draw an area-uniform
//! point on it, and weight the integrand by the inverse of the joint
//! probability `(1 / N) * (1 / area)`. The Monte Carlo mean is finally divided
//! by the total mesh area, turning the surface integral into an average.

use std::ops::{AddAssign, Div};

use lc_math::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::triangle::total_area;
use crate::{Light, LightingError, LightingResult, Triangle};

/// Lower bound on the squared light distance; keeps samples that land on
/// the light from blowing up.
pub const DISTANCE_EPSILON: f32 = 1e-5;

/// Samples per independent random stream in the parallel estimator.
pub const PARALLEL_CHUNK_SIZE: u32 = 4096;

fn check_inputs(triangles: &[Triangle], samples: u32) -> LightingResult<()> {
    if triangles.is_empty() {
        return Err(LightingError::EmptyMesh);
    }
    if samples == 0 {
        return Err(LightingError::NoSamples);
    }
    Ok(())
}

/// Derive the seed of an independent stream from a base seed.
pub(crate) fn stream_seed(seed: u64, stream: u64) -> u64 {
    seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Sum of `integrand / probability` over `samples` draws.
fn accumulate<T, R, F>(triangles: &[Triangle], samples: u32, rng: &mut R, integrand: F) -> T
where
    T: Copy + Default + AddAssign + Div<f32, Output = T>,
    R: Rng + ?Sized,
    F: Fn(&Triangle, Vector3) -> T,
{
    let pick_probability = 1.0 / triangles.len() as f32;
    let mut integral = T::default();

    for _ in 0..samples {
        let triangle = &triangles[rng.gen_range(0..triangles.len())];
        let point = triangle.uniform_sample(rng.gen(), rng.gen());
        let sample_probability = pick_probability * triangle.uniform_sample_pdf();
        integral += integrand(triangle, point) / sample_probability;
    }

    integral
}

/// Unit direction towards the light, or zero when `point` is on the light,
/// together with the squared distance.
fn direction_to_light(point: Vector3, light: &Light) -> (Vector3, f32) {
    let mut l = light.position - point;
    let distance_squared = l.sqr_len();
    l.normalize();
    (l, distance_squared)
}

fn irradiance_integrand(triangle: &Triangle, point: Vector3, light: &Light) -> Vector3 {
    let (l, distance_squared) = direction_to_light(point, light);
    let n_dot_l = triangle.normal().dot(l);
    light.radiant_color() * (n_dot_l.max(0.0) / distance_squared.max(DISTANCE_EPSILON))
}

fn shading_integrand(triangle: &Triangle, point: Vector3, light: &Light) -> f32 {
    let (l, _) = direction_to_light(point, light);
    Vector3::abs_cos_theta(triangle.normal(), l)
}

/// Average irradiance over `triangles` from a point light.
///
/// Estimates `Integral[color * intensity * max(0, N.L) / d^2, dA] / A` where
/// `A` is the total area of the mesh. Fails on an empty mesh or zero samples.
pub fn compute_irradiance<R: Rng + ?Sized>(
    triangles: &[Triangle],
    light: &Light,
    samples: u32,
    rng: &mut R,
) -> LightingResult<Vector3> {
    check_inputs(triangles, samples)?;

    let integral = accumulate(triangles, samples, rng, |triangle, point| {
        irradiance_integrand(triangle, point, light)
    });

    Ok(integral / samples as f32 / total_area(triangles))
}

/// Average directional shading `|N.L|` over `triangles`.
///
/// Shares the sampling of [`compute_irradiance`] but ignores light color,
/// intensity and distance falloff. The cosine is rectified rather than
/// clamped, so a light behind the surface still shades it.
pub fn compute_shading<R: Rng + ?Sized>(
    triangles: &[Triangle],
    light: &Light,
    samples: u32,
    rng: &mut R,
) -> LightingResult<f32> {
    check_inputs(triangles, samples)?;

    let integral = accumulate(triangles, samples, rng, |triangle, point| {
        shading_integrand(triangle, point, light)
    });

    Ok(integral / samples as f32 / total_area(triangles))
}

/// [`compute_irradiance`] split over rayon workers.
///
/// Samples are drawn in chunks of [`PARALLEL_CHUNK_SIZE`], each from its own
/// `StdRng` seeded from `seed` and the chunk index. Chunk sums are added in
/// chunk order, so the result depends only on `seed`, not on scheduling.
pub fn compute_irradiance_parallel(
    triangles: &[Triangle],
    light: &Light,
    samples: u32,
    seed: u64,
) -> LightingResult<Vector3> {
    check_inputs(triangles, samples)?;

    let chunks = samples.div_ceil(PARALLEL_CHUNK_SIZE);
    let partials: Vec<Vector3> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = StdRng::seed_from_u64(stream_seed(seed, chunk as u64));
            let count = PARALLEL_CHUNK_SIZE.min(samples - chunk * PARALLEL_CHUNK_SIZE);
            accumulate(triangles, count, &mut rng, |triangle, point| {
                irradiance_integrand(triangle, point, light)
            })
        })
        .collect();

    let integral = partials.into_iter().fold(Vector3::ZERO, |acc, partial| acc + partial);
    Ok(integral / samples as f32 / total_area(triangles))
}
