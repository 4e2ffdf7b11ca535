//! View-dependent iridescent colour for a single fragment.
//!
//! Mirrors [`crate::shader_utils::FRAGMENT_WGSL`]. The wavelength is picked
//! from the angle between the surface normal and the view direction, mapped
//! to a colour, blended towards white at grazing angles, then perturbed by
//! the tiling noise texture and gamma corrected.

use glam::{Vec3, Vec4};

use super::noise::mix;
use super::spectrum::wavelength_to_rgb;
use crate::params::ShadingParams;

/// Display gamma applied to the final colour.
pub const GAMMA: f32 = 2.2;

/// Per-fragment inputs interpolated from the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    /// Surface normal (need not be unit length).
    pub normal: Vec3,
    /// Fragment position in world space.
    pub position: Vec3,
    /// Red channel of the noise texture at this fragment, in `[0, 1]`.
    pub noise_sample: f32,
}

/// Unit vector along `v`, or zero when `v` is zero.
///
/// The vector is scaled by its largest component before measuring, so huge
/// and tiny finite inputs normalise without overflow or underflow.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let scale = v.abs().max_element();
    if scale > 0.0 && scale.is_finite() {
        let scaled = v / scale;
        scaled / scaled.length()
    } else {
        Vec3::ZERO
    }
}

/// Cosine of the angle between the normal and the direction to the camera.
///
/// Both points are halved before subtracting so the difference of two
/// finite positions stays finite.
pub fn view_alignment(normal: Vec3, position: Vec3, camera_position: Vec3) -> f32 {
    safe_normalize(normal).dot(safe_normalize(camera_position * 0.5 - position * 0.5))
}

/// Wavelength seen at a given alignment: `min` at grazing angles, `max` face-on.
#[inline]
pub fn view_wavelength(alignment: f32, min_wavelength: f32, max_wavelength: f32) -> f32 {
    mix(min_wavelength, max_wavelength, alignment.abs())
}

/// Clamp into `[min, max]` without panicking on inverted bounds.
#[inline]
fn clamp_wavelength(wavelength: f32, min_wavelength: f32, max_wavelength: f32) -> f32 {
    wavelength.max(min_wavelength).min(max_wavelength)
}

/// `color ^ (1 / gamma)` per channel.
#[inline]
pub fn gamma_correct(color: Vec3, gamma: f32) -> Vec3 {
    color.powf(1.0 / gamma)
}

/// Final RGBA of a fragment.
///
/// The noise sample shifts the wavelength by up to 1 nm and weights the
/// blend towards the shifted colour. Both colour lookups clamp the
/// wavelength into the configured bounds.
pub fn compose_fragment(input: &FragmentInput, camera_position: Vec3, params: &ShadingParams) -> Vec4 {
    let (min_w, max_w) = (params.min_wavelength, params.max_wavelength);
    let alignment = view_alignment(input.normal, input.position, camera_position);
    let facing = alignment.abs();

    let mut wavelength = view_wavelength(alignment, min_w, max_w);
    let wave_color = wavelength_to_rgb(clamp_wavelength(wavelength, min_w, max_w));
    let base_color = Vec3::ONE.lerp(wave_color, 1.0 - facing);

    let n = input.noise_sample;
    wavelength += n;
    let shifted_color = wavelength_to_rgb(clamp_wavelength(wavelength, min_w, max_w));
    let color = base_color.lerp(shifted_color, n);

    gamma_correct(color, GAMMA).extend(params.opacity)
}
