use std::env;
use std::ops::ControlFlow;
use std::str::FromStr;

use anyhow::{Context, Result};
use lc_light::{
    bake_vertices, compute_irradiance_parallel, to_gamma, triangles_from_vertices, BakeConfig,
    Light, ShadingMode, DEFAULT_GAMMA,
};
use lc_math::{Camera, CameraMode, Vector3};

/// Parse an optional setting, failing on values that don't parse.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {}: {:?}", name, value)),
        None => Ok(None),
    }
}

/// Build the bake settings from `LC_*` variables, falling back to defaults.
fn load_config(lookup: impl Fn(&str) -> Option<String>) -> Result<BakeConfig> {
    let mut config = BakeConfig::default();
    if let Some(samples) = parse_var(&lookup, "LC_SAMPLES")? {
        config = config.with_samples(samples);
    }
    if let Some(seed) = parse_var(&lookup, "LC_SEED")? {
        config = config.with_seed(seed);
    }
    if let Some(parallel) = parse_var(&lookup, "LC_PARALLEL")? {
        config = config.with_parallel(parallel);
    }
    if let Some(mode) = parse_var::<ShadingMode>(&lookup, "LC_MODE")? {
        config = config.with_mode(mode);
    }
    Ok(config)
}

/// Logger at `Info` unless `filters` (the `RUST_LOG` syntax) says otherwise.
fn logger_builder(filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
}

/// Unit cube centered at the origin as a flat triangle list, wound outwards.
fn cube_vertices() -> Vec<Vector3> {
    let faces = [
        (Vector3::X, Vector3::Y, Vector3::Z),
        (-Vector3::X, Vector3::Z, Vector3::Y),
        (Vector3::Y, Vector3::Z, Vector3::X),
        (-Vector3::Y, Vector3::X, Vector3::Z),
        (Vector3::Z, Vector3::X, Vector3::Y),
        (-Vector3::Z, Vector3::Y, Vector3::X),
    ];

    let mut vertices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let center = normal * 0.5;
        let (u, v) = (u * 0.5, v * 0.5);
        let corners = [center - u - v, center + u - v, center + u + v, center - u + v];
        vertices.extend([corners[0], corners[1], corners[2]]);
        vertices.extend([corners[0], corners[2], corners[3]]);
    }
    vertices
}

/// Drive the camera through a short orbit and report where it ends up.
fn frame_camera() {
    let mut camera = Camera::new()
        .with_position(Vector3::new(0.0, 0.0, 3.0), Vector3::ZERO)
        .with_lens(45f32.to_radians(), 16.0 / 9.0);

    camera.rotate(-0.4, 0.6);
    camera.zoom(0.9);
    camera.pan(0.1, 0.0, 0.0);
    log::info!("Arcball eye {}, target {}", camera.eye(), camera.target());

    camera.set_mode(CameraMode::Fps);
    camera.rotate(0.05, -0.1);
    log::info!("Fps eye {}, target {}", camera.eye(), camera.target());

    log::debug!("View matrix\n{}", camera.view_matrix());
    log::debug!("Projection matrix\n{}", camera.proj_matrix());
}

fn main() -> Result<()> {
    logger_builder(env::var("RUST_LOG").ok().as_deref()).init();

    log::info!("Starting lightcalc bake");

    let config = load_config(|name| env::var(name).ok())?;
    let light = Light::default();
    let vertices = cube_vertices();

    frame_camera();

    let values = bake_vertices(&vertices, &light, &config, |done, total| {
        log::info!("Computing lighting... {}/{}", done, total);
        ControlFlow::Continue(())
    })?;

    for (face, value) in values.chunks_exact(6).map(|quad| (quad[0] + quad[3]) * 0.5).enumerate() {
        log::info!(
            "Face {}: linear {}, display {}",
            face,
            value,
            to_gamma(value, DEFAULT_GAMMA)
        );
    }

    let triangles = triangles_from_vertices(&vertices)?;
    let average = compute_irradiance_parallel(&triangles, &light, config.samples.saturating_mul(64), config.seed)?;
    log::info!("Mesh average irradiance {}", average);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults_when_unset() {
        let config = load_config(vars(&[])).unwrap();
        assert_eq!(config, BakeConfig::default());
    }

    #[test]
    fn test_config_from_vars() {
        let config = load_config(vars(&[
            ("LC_SAMPLES", "64"),
            ("LC_SEED", "7"),
            ("LC_PARALLEL", "true"),
            ("LC_MODE", "Shading"),
        ]))
        .unwrap();
        assert_eq!(config.samples, 64);
        assert_eq!(config.seed, 7);
        assert!(config.parallel);
        assert_eq!(config.mode, ShadingMode::Shading);

        let config = load_config(vars(&[("LC_MODE", "irradiance")])).unwrap();
        assert_eq!(config.mode, ShadingMode::Irradiance);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        for (name, value) in [
            ("LC_SAMPLES", "many"),
            ("LC_SAMPLES", "-1"),
            ("LC_SEED", "0x10"),
            ("LC_PARALLEL", "yes"),
            ("LC_MODE", "shadng"),
        ] {
            let err = load_config(vars(&[(name, value)])).unwrap_err();
            assert!(err.to_string().contains(name), "{name}={value}: {err}");
        }
    }

    #[test]
    fn test_logger_defaults_to_info() {
        assert_eq!(logger_builder(None).build().filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_logger_filters_override_default() {
        assert_eq!(logger_builder(Some("debug")).build().filter(), log::LevelFilter::Debug);
        assert_eq!(logger_builder(Some("warn")).build().filter(), log::LevelFilter::Warn);
        assert_eq!(
            logger_builder(Some("lc_light=trace")).build().filter(),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_cube_faces_point_outwards() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);
        for triangle in triangles_from_vertices(&vertices).unwrap() {
            assert!(triangle.normal().dot(triangle.centroid()) > 0.0);
            assert!((triangle.area() - 0.5).abs() < 1e-6);
        }
    }
}
