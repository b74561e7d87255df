//! Camera with arcball and FPS navigation over a cached view-projection.

use serde::{Deserialize, Serialize};

use crate::spherical::{clamp_inclination, d_theta_cartesian, to_cartesian, to_spherical};
use crate::{Matrix4, Vector3};

/// Keeps orbiting and looking around away from the polar singularity.
pub const POLE_EPSILON: f32 = 1e-4;

/// How [`Camera::rotate`] moves the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// The look direction pivots around a fixed eye.
    Fps,
    /// The eye orbits around a fixed target.
    #[default]
    Arcball,
}

/// Orthonormal frame derived from the current eye and target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub front: Vector3,
    pub up: Vector3,
    pub right: Vector3,
}

/// Camera that acts either as a first-person or an arcball camera.
///
/// View and projection matrices are cached and recomputed lazily: every
/// setter that changes a value marks the cache dirty, and the matrix
/// getters rebuild it before returning.
#[derive(Debug, Clone)]
pub struct Camera {
    mode: CameraMode,

    // World space
    eye: Vector3,
    target: Vector3,

    // Vertical field of view in radians
    fov_y: f32,
    z_near: f32,
    z_far: f32,
    aspect: f32,

    dirty: bool,
    view_matrix: Matrix4,
    proj_matrix: Matrix4,
    view_proj_matrix: Matrix4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Arcball camera one unit in front of the origin, looking at it.
    pub fn new() -> Self {
        Self {
            mode: CameraMode::Arcball,
            eye: Vector3::new(0.0, 0.0, 1.0),
            target: Vector3::ZERO,
            fov_y: 60.0_f32.to_radians(),
            z_near: 0.01,
            z_far: 100.0,
            aspect: 1.0,
            dirty: true,
            view_matrix: Matrix4::IDENTITY,
            proj_matrix: Matrix4::IDENTITY,
            view_proj_matrix: Matrix4::IDENTITY,
        }
    }

    pub fn with_mode(mut self, mode: CameraMode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn with_position(mut self, eye: Vector3, target: Vector3) -> Self {
        self.set_eye(eye);
        self.set_target(target);
        self
    }

    pub fn with_lens(mut self, fov_y: f32, aspect: f32) -> Self {
        self.set_fov_y(fov_y);
        self.set_aspect(aspect);
        self
    }

    pub fn with_clip(mut self, z_near: f32, z_far: f32) -> Self {
        self.set_z_near(z_near);
        self.set_z_far(z_far);
        self
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn eye(&self) -> Vector3 {
        self.eye
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode != self.mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    pub fn set_eye(&mut self, eye: Vector3) {
        if eye != self.eye {
            self.eye = eye;
            self.dirty = true;
        }
    }

    pub fn set_target(&mut self, target: Vector3) {
        if target != self.target {
            self.target = target;
            self.dirty = true;
        }
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        if fov_y != self.fov_y {
            self.fov_y = fov_y;
            self.dirty = true;
        }
    }

    pub fn set_z_near(&mut self, z_near: f32) {
        if z_near != self.z_near {
            self.z_near = z_near;
            self.dirty = true;
        }
    }

    pub fn set_z_far(&mut self, z_far: f32) {
        if z_far != self.z_far {
            self.z_far = z_far;
            self.dirty = true;
        }
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect != self.aspect {
            self.aspect = aspect;
            self.dirty = true;
        }
    }

    /// Front, up and right vectors for the current eye and target.
    ///
    /// Up is the negated inclination derivative of the front direction, so
    /// it follows the camera over the top instead of flipping like a fixed
    /// world-up would.
    pub fn basis(&self) -> CameraBasis {
        let front = (self.target - self.eye).normalized();
        let up = -d_theta_cartesian(to_spherical(front)).normalized();
        let right = front.cross(up);
        CameraBasis { front, up, right }
    }

    /// Move eye and target together along the camera basis.
    pub fn pan(&mut self, x: f32, y: f32, z: f32) {
        let CameraBasis { front, up, right } = self.basis();
        let delta = right * x + up * y + front * z;
        self.set_target(self.target + delta);
        self.set_eye(self.eye + delta);
    }

    /// Rotate by `x` radians of inclination and `y` radians of azimuth.
    ///
    /// In arcball mode the eye orbits the target; in FPS mode the target
    /// pivots around the eye, with the inclination sign flipped so that the
    /// same pointer motion tilts the view the same way.
    pub fn rotate(&mut self, x: f32, y: f32) {
        match self.mode {
            CameraMode::Arcball => {
                let mut sp = to_spherical(self.eye - self.target);
                sp.y += x;
                sp.z += y;
                clamp_inclination(&mut sp, POLE_EPSILON);
                self.set_eye(self.target + to_cartesian(sp));
            }
            CameraMode::Fps => {
                let mut sp = to_spherical(self.target - self.eye);
                sp.y -= x;
                sp.z += y;
                clamp_inclination(&mut sp, POLE_EPSILON);
                self.set_target(self.eye + to_cartesian(sp));
            }
        }
    }

    /// Scale the eye-target distance by `factor`, keeping the target fixed.
    ///
    /// Not gated on the mode; zooming is only meaningful for arcball cameras.
    pub fn zoom(&mut self, factor: f32) {
        let distance = (self.target - self.eye).len() * factor;
        let front = self.basis().front;
        self.set_eye(self.target - front * distance);
    }

    fn compute_matrices(&mut self) {
        let basis = self.basis();
        self.view_matrix = Matrix4::look_at(self.eye, self.target, basis.up);
        self.proj_matrix = Matrix4::perspective(self.fov_y, self.aspect, self.z_near, self.z_far);
        self.view_proj_matrix = self.proj_matrix * self.view_matrix;
        self.dirty = false;

        log::debug!("Camera matrices recomputed: eye={} target={}", self.eye, self.target);
    }

    fn ensure_matrices(&mut self) {
        if self.dirty {
            self.compute_matrices();
        }
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&mut self) -> Matrix4 {
        self.ensure_matrices();
        self.view_matrix
    }

    /// Get the projection matrix (camera → clip space)
    pub fn proj_matrix(&mut self) -> Matrix4 {
        self.ensure_matrices();
        self.proj_matrix
    }

    /// Get the combined view-projection matrix
    pub fn view_proj_matrix(&mut self) -> Matrix4 {
        self.ensure_matrices();
        self.view_proj_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn inclination(v: Vector3) -> f64 {
        let (x, y, z) = (v.x as f64, v.y as f64, v.z as f64);
        (x * x + z * z).sqrt().atan2(y)
    }

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::new();
        assert_eq!(camera.mode(), CameraMode::Arcball);
        assert_eq!(camera.eye(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(camera.target(), Vector3::ZERO);
        assert!((camera.fov_y() - PI / 3.0).abs() < 1e-6);
        assert_eq!(camera.z_near(), 0.01);
        assert_eq!(camera.z_far(), 100.0);
        assert_eq!(camera.aspect(), 1.0);
        assert!(camera.is_dirty());
    }

    #[test]
    fn test_dirty_flag() {
        let mut camera = Camera::new();
        let first = camera.view_matrix();
        assert!(!camera.is_dirty());
        assert_eq!(camera.view_matrix(), first);

        // Same value does not invalidate the cache
        camera.set_eye(camera.eye());
        camera.set_aspect(1.0);
        assert!(!camera.is_dirty());

        camera.set_eye(Vector3::new(0.0, 0.0, 3.0));
        assert!(camera.is_dirty());
        let second = camera.view_matrix();
        assert!(!camera.is_dirty());
        assert_ne!(first, second);
    }

    #[test]
    fn test_every_setter_invalidates() {
        let mut camera = Camera::new();
        let setters: [fn(&mut Camera); 7] = [
            |c| c.set_mode(CameraMode::Fps),
            |c| c.set_eye(Vector3::new(1.0, 2.0, 3.0)),
            |c| c.set_target(Vector3::ONE),
            |c| c.set_fov_y(1.0),
            |c| c.set_z_near(0.5),
            |c| c.set_z_far(20.0),
            |c| c.set_aspect(2.0),
        ];
        for set in setters {
            camera.proj_matrix();
            assert!(!camera.is_dirty());
            set(&mut camera);
            assert!(camera.is_dirty());
        }
    }

    #[test]
    fn test_cached_matrices_consistent() {
        let mut camera = Camera::new()
            .with_position(Vector3::new(2.0, 1.0, 4.0), Vector3::new(0.0, 0.5, 0.0))
            .with_lens(0.9, 16.0 / 9.0);

        let view = camera.view_matrix();
        let proj = camera.proj_matrix();
        let view_proj = camera.view_proj_matrix();
        assert_eq!(view_proj, proj * view);
        assert_eq!(proj, Matrix4::perspective(0.9, 16.0 / 9.0, 0.01, 100.0));

        // Target sits straight ahead on -Z in view space
        let t = view.transform_point(camera.target());
        assert!(t.x.abs() < 1e-5 && t.y.abs() < 1e-5 && t.z < 0.0);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let camera = Camera::new().with_position(Vector3::new(3.0, 2.0, -1.0), Vector3::ZERO);
        let CameraBasis { front, up, right } = camera.basis();
        for v in [front, up, right] {
            assert!((v.len() - 1.0).abs() < 1e-5);
        }
        assert!(front.dot(up).abs() < 1e-5);
        assert!(front.dot(right).abs() < 1e-5);
        assert!(up.dot(right).abs() < 1e-5);
        // Camera is above the target, so up leans away from it
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_pan_moves_eye_and_target() {
        let mut camera = Camera::new();
        let offset = camera.target() - camera.eye();
        camera.view_matrix();

        camera.pan(1.0, 2.0, 0.5);
        assert!(camera.is_dirty());
        assert!((camera.target() - camera.eye()).approx_eq(&offset, 1e-6));

        // Default camera looks down -Z: right is +X, up is +Y
        assert!(camera.target().approx_eq(&Vector3::new(1.0, 2.0, -0.5), 1e-5));
    }

    #[test]
    fn test_arcball_rotate_orbits_target() {
        let mut camera = Camera::new().with_position(Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO);
        camera.rotate(0.0, PI / 2.0);
        assert_eq!(camera.target(), Vector3::ZERO);
        assert!(camera.eye().approx_eq(&Vector3::new(5.0, 0.0, 0.0), 1e-5));

        camera.rotate(0.3, 0.0);
        assert!(((camera.eye() - camera.target()).len() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_fps_rotate_pivots_around_eye() {
        let eye = Vector3::new(1.0, 2.0, 3.0);
        let mut camera = Camera::new()
            .with_mode(CameraMode::Fps)
            .with_position(eye, Vector3::new(1.0, 2.0, 2.0));

        camera.rotate(0.2, 0.0);
        assert_eq!(camera.eye(), eye);
        // Inclination decreases: the target tilts upwards
        assert!(camera.target().y > 2.0);
        assert!(((camera.target() - eye).len() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_arcball_pole_clamp() {
        let mut camera = Camera::new().with_position(Vector3::new(0.0, 0.0, 2.0), Vector3::ZERO);
        let lo = POLE_EPSILON as f64 - 1e-6;
        let hi = std::f64::consts::PI - POLE_EPSILON as f64 + 1e-6;

        for _ in 0..100 {
            camera.rotate(0.7, 0.1);
            let theta = inclination(camera.eye() - camera.target());
            assert!(theta >= lo && theta <= hi, "inclination {theta} escaped the clamp");
        }
        for _ in 0..200 {
            camera.rotate(-0.7, 0.1);
            let theta = inclination(camera.eye() - camera.target());
            assert!(theta >= lo && theta <= hi, "inclination {theta} escaped the clamp");
        }

        // The view stays well defined at the clamp
        let view = camera.view_matrix();
        assert!(view.v.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zoom() {
        let mut camera = Camera::new().with_position(Vector3::new(0.0, 3.0, 4.0), Vector3::ZERO);
        camera.zoom(2.0);
        assert!(camera.eye().approx_eq(&Vector3::new(0.0, 6.0, 8.0), 1e-5));
        camera.zoom(0.25);
        assert!(camera.eye().approx_eq(&Vector3::new(0.0, 1.5, 2.0), 1e-5));
        assert_eq!(camera.target(), Vector3::ZERO);
    }
}
