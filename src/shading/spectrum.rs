//! Wavelength to RGB mapping across the visible spectrum.
//!
//! Piecewise-linear bands from violet to red, dimmed towards the edges of
//! the visible range. Mirrors [`crate::shader_utils::SPECTRUM_WGSL`].

use glam::Vec3;

/// Shortest visible wavelength in nanometres.
pub const VISIBLE_MIN: f32 = 380.0;
/// Longest visible wavelength in nanometres.
pub const VISIBLE_MAX: f32 = 780.0;

/// End of the violet taper: intensity is full from here on.
const VIOLET_TAPER_END: f32 = 420.0;
/// Start of the red taper: intensity drops after this.
const RED_TAPER_START: f32 = 700.0;
/// Intensity at the very edges of the visible range.
const EDGE_INTENSITY: f32 = 0.1;

/// Position of `value` between `min` and `max`, 0 at `min`.
#[inline]
fn ramp_up(value: f32, min: f32, max: f32) -> f32 {
    (value - min) / (max - min)
}

/// Position of `value` between `min` and `max`, 1 at `min`.
#[inline]
fn ramp_down(value: f32, min: f32, max: f32) -> f32 {
    (max - value) / (max - min)
}

/// Hue of a wavelength before edge dimming.
///
/// Black outside `[380, 780]`, including NaN.
pub fn spectral_hue(wavelength: f32) -> Vec3 {
    let w = wavelength;
    if (380.0..440.0).contains(&w) {
        // violet -> blue
        Vec3::new(ramp_down(w, 380.0, 440.0), 0.0, 1.0)
    } else if (440.0..490.0).contains(&w) {
        // blue -> cyan
        Vec3::new(0.0, ramp_up(w, 440.0, 490.0), 1.0)
    } else if (490.0..510.0).contains(&w) {
        // cyan -> green
        Vec3::new(0.0, 1.0, ramp_down(w, 490.0, 510.0))
    } else if (510.0..580.0).contains(&w) {
        // green -> yellow
        Vec3::new(ramp_up(w, 510.0, 580.0), 1.0, 0.0)
    } else if (580.0..645.0).contains(&w) {
        // yellow -> red
        Vec3::new(1.0, ramp_down(w, 580.0, 645.0), 0.0)
    } else if (645.0..=VISIBLE_MAX).contains(&w) {
        Vec3::X
    } else {
        Vec3::ZERO
    }
}

/// Brightness multiplier tapering the violet and red extremes.
///
/// Full intensity by default; ramps from 0.1 to 1.0 over `[380, 420)` and
/// from 1.0 down to 0.1 over `(700, 780]`.
pub fn intensity_factor(wavelength: f32) -> f32 {
    let w = wavelength;
    if (VISIBLE_MIN..VIOLET_TAPER_END).contains(&w) {
        EDGE_INTENSITY + (1.0 - EDGE_INTENSITY) * ramp_up(w, VISIBLE_MIN, VIOLET_TAPER_END)
    } else if w > RED_TAPER_START && w <= VISIBLE_MAX {
        EDGE_INTENSITY + (1.0 - EDGE_INTENSITY) * ramp_down(w, RED_TAPER_START, VISIBLE_MAX)
    } else {
        1.0
    }
}

/// Approximate RGB colour of a wavelength in nanometres.
///
/// Total over the real line: anything outside the visible range is black.
pub fn wavelength_to_rgb(wavelength: f32) -> Vec3 {
    spectral_hue(wavelength) * intensity_factor(wavelength)
}
