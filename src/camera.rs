//! Orbit camera with damped rotation.

use glam::{Mat4, Vec3};

use crate::params::RenderConfig;

/// Radians of rotation per pixel of mouse drag.
const ROTATE_SPEED: f32 = 0.005;
/// Distance multiplier per wheel line.
const ZOOM_STEP: f32 = 0.95;
/// Keeps the view direction off the up axis.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera circling `target`.
///
/// Drag input is accumulated as angular velocity and bled off by
/// [`OrbitCamera::update`], so the view keeps gliding briefly after the
/// mouse stops. The total rotation always equals the input.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Fraction of the pending rotation applied per update, in `(0, 1]`.
    /// Zero or less applies rotation immediately.
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Vertical field of view (degrees).
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl OrbitCamera {
    /// Camera placed at `position`, looking at `target`.
    pub fn from_position(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH),
            distance,
            target,
            damping: 0.05,
            min_distance: 0.1,
            max_distance: 50.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Camera set up from the render configuration, orbiting the origin.
    pub fn from_config(config: &RenderConfig) -> Self {
        let mut camera = Self::from_position(config.camera_position, Vec3::ZERO);
        camera.min_distance = config.min_distance;
        camera.max_distance = config.max_distance;
        camera.fov_degrees = config.fov_degrees;
        camera.near = config.near_plane;
        camera.far = config.far_plane;
        camera.distance = camera.distance.clamp(camera.min_distance, camera.max_distance);
        camera
    }

    /// Queue a rotation from a mouse drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * ROTATE_SPEED;
        self.pitch_velocity += dy * ROTATE_SPEED;
    }

    /// Zoom by wheel lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * ZOOM_STEP.powf(lines)).clamp(self.min_distance, self.max_distance);
    }

    /// Apply part of the pending rotation. Call once per frame.
    pub fn update(&mut self) {
        let factor = if self.damping > 0.0 { self.damping.min(1.0) } else { 1.0 };

        self.yaw += self.yaw_velocity * factor;
        self.pitch = (self.pitch + self.pitch_velocity * factor).clamp(-MAX_PITCH, MAX_PITCH);

        self.yaw_velocity *= 1.0 - factor;
        self.pitch_velocity *= 1.0 - factor;
    }

    /// Whether rotation is still pending.
    pub fn is_moving(&self) -> bool {
        self.yaw_velocity.abs() > 1e-5 || self.pitch_velocity.abs() > 1e-5
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_round_trips_start_position() {
        let start = Vec3::new(0.0, -3.0, 8.0);
        let camera = OrbitCamera::from_position(start, Vec3::ZERO);
        assert_vec_close(camera.position(), start);
        assert!((camera.distance - 73.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_default_matches_render_config() {
        let camera = OrbitCamera::default();
        assert_vec_close(camera.position(), RenderConfig::default().camera_position);
        assert_eq!(camera.min_distance, 0.1);
        assert_eq!(camera.max_distance, 50.0);
    }

    #[test]
    fn test_damping_glides_to_full_rotation() {
        let mut camera = OrbitCamera::default();
        let yaw0 = camera.yaw;
        camera.rotate(-100.0, 0.0);

        camera.update();
        let after_one = camera.yaw - yaw0;
        assert!(after_one > 0.0 && after_one < 0.5);
        assert!(camera.is_moving());

        for _ in 0..500 {
            camera.update();
        }
        assert!(!camera.is_moving());
        assert!((camera.yaw - yaw0 - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_zero_damping_is_immediate() {
        let mut camera = OrbitCamera::default();
        camera.damping = 0.0;
        let yaw0 = camera.yaw;
        camera.rotate(10.0, 0.0);
        camera.update();
        assert!((camera.yaw - (yaw0 - 0.05)).abs() < 1e-6);
        assert!(!camera.is_moving());
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.damping = 1.0;
        camera.rotate(0.0, 10_000.0);
        camera.update();
        assert!(camera.pitch <= MAX_PITCH);
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1_000.0);
        assert_eq!(camera.distance, camera.min_distance);
        camera.zoom(-1_000.0);
        assert_eq!(camera.distance, camera.max_distance);
    }

    #[test]
    fn test_view_proj_is_finite() {
        let camera = OrbitCamera::default();
        assert!(camera.view_proj(16.0 / 9.0).is_finite());
        assert!(camera.view_proj(0.0).is_finite());
    }
}
