//! Live shading parameters and render configuration.
//!
//! [`ShadingParams`] is the single owned parameter set the viewer mutates
//! (control panel, keyboard, CLI) and uploads into the uniform buffer every
//! frame. Every field has a documented range; [`ShadingParams::sanitized`]
//! enforces them before upload.

use std::ops::RangeInclusive;

use glam::Vec3;

use crate::shading::spectrum::{VISIBLE_MAX, VISIBLE_MIN};

/// Allowed time-frequency values.
pub const TIME_FREQUENCY_RANGE: RangeInclusive<f32> = 0.001..=0.1;
/// Allowed spatial-frequency values.
pub const SPATIAL_FREQUENCY_RANGE: RangeInclusive<f32> = 0.001..=0.05;
/// Allowed octave counts.
pub const OCTAVE_RANGE: RangeInclusive<u32> = 1..=10;
/// Allowed displacement amplitudes.
pub const AMPLITUDE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Allowed noise texture repeat factors.
pub const NOISE_STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Allowed opacities.
pub const OPACITY_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Allowed icosphere subdivision levels.
pub const SUBDIVISION_RANGE: RangeInclusive<u32> = 0..=50;
/// Allowed wavelength bounds in nanometres.
pub const WAVELENGTH_RANGE: RangeInclusive<f32> = VISIBLE_MIN..=VISIBLE_MAX;

/// Parameters of the displacement and colour pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingParams {
    /// How fast the noise field scrolls with time.
    pub time_frequency: f32,
    /// Scale applied to surface positions before sampling noise.
    pub spatial_frequency: f32,
    /// Number of fractal noise octaves.
    pub octaves: u32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// How many times the noise texture repeats across the UV range.
    pub noise_strength: f32,
    /// Output alpha.
    pub opacity: f32,
    /// Draw the mesh edges instead of filled triangles.
    pub wireframe: bool,
    /// Icosphere subdivision level.
    pub subdivisions: u32,
    /// Wavelength used for grazing angles (nm).
    pub min_wavelength: f32,
    /// Wavelength used for surfaces facing the camera (nm).
    pub max_wavelength: f32,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            time_frequency: 0.032,
            spatial_frequency: 0.005,
            octaves: 3,
            amplitude: 1.0,
            noise_strength: 2.0,
            opacity: 0.4,
            wireframe: false,
            subdivisions: 50,
            min_wavelength: VISIBLE_MIN,
            max_wavelength: VISIBLE_MAX,
        }
    }
}

fn clamp_range(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

impl ShadingParams {
    /// Copy with every field clamped into its allowed range.
    ///
    /// Wavelength bounds are swapped if `min > max`. NaN falls back to the
    /// lower end of the range.
    pub fn sanitized(&self) -> Self {
        let a = clamp_range(self.min_wavelength, &WAVELENGTH_RANGE);
        let b = clamp_range(self.max_wavelength, &WAVELENGTH_RANGE);

        Self {
            time_frequency: clamp_range(self.time_frequency, &TIME_FREQUENCY_RANGE),
            spatial_frequency: clamp_range(self.spatial_frequency, &SPATIAL_FREQUENCY_RANGE),
            octaves: self.octaves.clamp(*OCTAVE_RANGE.start(), *OCTAVE_RANGE.end()),
            amplitude: clamp_range(self.amplitude, &AMPLITUDE_RANGE),
            noise_strength: clamp_range(self.noise_strength, &NOISE_STRENGTH_RANGE),
            opacity: clamp_range(self.opacity, &OPACITY_RANGE),
            wireframe: self.wireframe,
            subdivisions: self
                .subdivisions
                .clamp(*SUBDIVISION_RANGE.start(), *SUBDIVISION_RANGE.end()),
            min_wavelength: a.min(b),
            max_wavelength: a.max(b),
        }
    }

    /// Add `delta` to the subdivision level, staying in range.
    pub fn step_subdivisions(&mut self, delta: i32) {
        let level = self.subdivisions as i32 + delta;
        self.subdivisions = level.clamp(
            *SUBDIVISION_RANGE.start() as i32,
            *SUBDIVISION_RANGE.end() as i32,
        ) as u32;
    }

    /// Add `delta` to the octave count, staying in range.
    pub fn step_octaves(&mut self, delta: i32) {
        let octaves = self.octaves as i32 + delta;
        self.octaves =
            octaves.clamp(*OCTAVE_RANGE.start() as i32, *OCTAVE_RANGE.end() as i32) as u32;
    }
}

/// Window, projection and scene configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels).
    pub window_width: u32,
    /// Window height (pixels).
    pub window_height: u32,
    /// Vertical field of view (degrees).
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near_plane: f32,
    /// Far clipping plane.
    pub far_plane: f32,
    /// Radius of the undisplaced sphere.
    pub sphere_radius: f32,
    /// Initial camera position; the camera orbits the origin.
    pub camera_position: Vec3,
    /// Closest the orbit camera may zoom.
    pub min_distance: f32,
    /// Farthest the orbit camera may zoom.
    pub max_distance: f32,
    /// Background colour.
    pub clear_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 100.0,
            sphere_radius: 2.5,
            camera_position: Vec3::new(0.0, -3.0, 8.0),
            min_distance: 0.1,
            max_distance: 50.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let params = ShadingParams::default();
        assert_eq!(params.sanitized(), params);
    }

    #[test]
    fn test_sanitize_clamps_every_field() {
        let params = ShadingParams {
            time_frequency: 5.0,
            spatial_frequency: -1.0,
            octaves: 0,
            amplitude: 9.0,
            noise_strength: f32::NAN,
            opacity: 1.5,
            wireframe: true,
            subdivisions: 500,
            min_wavelength: 100.0,
            max_wavelength: 10_000.0,
        }
        .sanitized();

        assert_eq!(params.time_frequency, 0.1);
        assert_eq!(params.spatial_frequency, 0.001);
        assert_eq!(params.octaves, 1);
        assert_eq!(params.amplitude, 2.0);
        assert_eq!(params.noise_strength, 0.0);
        assert_eq!(params.opacity, 1.0);
        assert!(params.wireframe);
        assert_eq!(params.subdivisions, 50);
        assert_eq!(params.min_wavelength, 380.0);
        assert_eq!(params.max_wavelength, 780.0);
    }

    #[test]
    fn test_sanitize_orders_wavelength_bounds() {
        let params = ShadingParams {
            min_wavelength: 700.0,
            max_wavelength: 450.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(params.min_wavelength, 450.0);
        assert_eq!(params.max_wavelength, 700.0);
    }

    #[test]
    fn test_step_helpers_saturate() {
        let mut params = ShadingParams::default();
        params.step_subdivisions(10);
        assert_eq!(params.subdivisions, 50);
        params.step_subdivisions(-45);
        assert_eq!(params.subdivisions, 5);
        params.step_subdivisions(-45);
        assert_eq!(params.subdivisions, 0);

        params.step_octaves(-5);
        assert_eq!(params.octaves, 1);
        params.step_octaves(20);
        assert_eq!(params.octaves, 10);
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        let config = RenderConfig {
            window_height: 0,
            ..Default::default()
        };
        assert_eq!(config.aspect_ratio(), 1280.0);
    }
}
