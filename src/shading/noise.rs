//! Lattice noise driving the surface displacement.
//!
//! The GPU evaluates the same formulas from [`crate::shader_utils::NOISE_WGSL`].
//! These CPU versions back the unit tests and benchmarks; the shader itself
//! is only parsed and validated, not compared numerically.

use glam::Vec3;

/// Hard upper bound on the octaves accumulated by [`fractal_noise`].
///
/// The octave count is user-editable, so the loop is always clamped to this.
pub const MAX_OCTAVES: u32 = 32;

/// Period of the permutation polynomial.
pub const PERMUTE_PERIOD: f32 = 289.0;

/// GLSL-style `mod`: the result takes the sign of `y`.
#[inline]
pub(crate) fn modulo(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// Linear blend, `a` at `t = 0` and `b` at `t = 1`.
#[inline]
pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Scalar permutation `((x * 34 + 1) * x) mod 289`.
///
/// Deterministic scrambling with period 289. For integer inputs the result is
/// an integer in `[0, 289)`.
#[inline]
pub fn permute(x: f32) -> f32 {
    modulo((x * 34.0 + 1.0) * x, PERMUTE_PERIOD)
}

/// [`permute`] applied to each component.
#[inline]
pub fn permute3(v: Vec3) -> Vec3 {
    Vec3::new(permute(v.x), permute(v.y), permute(v.z))
}

/// 3D lattice noise.
///
/// Each corner of the unit cell containing `p` contributes the dot product of
/// its permuted coordinates with the offset to that corner; the eight values
/// are blended trilinearly with smoothstep weights. The output has no fixed
/// range: the permutation values are not normalised.
pub fn gradient_noise(p: Vec3) -> f32 {
    let cell = p.floor();
    lattice_blend(cell, p - cell)
}

/// Blend the eight corner contributions of `cell` at local offset `local`.
pub(crate) fn lattice_blend(cell: Vec3, local: Vec3) -> f32 {
    let u = local * local * (Vec3::splat(3.0) - local * 2.0);
    let corner = |offset: Vec3| permute3(cell + offset).dot(local - offset);

    let n000 = corner(Vec3::new(0.0, 0.0, 0.0));
    let n100 = corner(Vec3::new(1.0, 0.0, 0.0));
    let n010 = corner(Vec3::new(0.0, 1.0, 0.0));
    let n110 = corner(Vec3::new(1.0, 1.0, 0.0));
    let n001 = corner(Vec3::new(0.0, 0.0, 1.0));
    let n101 = corner(Vec3::new(1.0, 0.0, 1.0));
    let n011 = corner(Vec3::new(0.0, 1.0, 1.0));
    let n111 = corner(Vec3::new(1.0, 1.0, 1.0));

    mix(
        mix(mix(n000, n100, u.x), mix(n010, n110, u.x), u.y),
        mix(mix(n001, n101, u.x), mix(n011, n111, u.x), u.y),
        u.z,
    )
}

/// Fractal sum of [`gradient_noise`] octaves.
///
/// Starts at `amplitude` and frequency 1, halving the amplitude and doubling
/// the frequency after every octave. `octaves` is clamped to
/// `1..=MAX_OCTAVES`.
pub fn fractal_noise(p: Vec3, octaves: u32, amplitude: f32) -> f32 {
    let octaves = octaves.clamp(1, MAX_OCTAVES);
    let mut value = 0.0;
    let mut amplitude = amplitude;
    let mut frequency = 1.0;

    for _ in 0..octaves {
        value += gradient_noise(p * frequency) * amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_permute_matches_polynomial() {
        assert_eq!(permute(0.0), 0.0);
        assert_eq!(permute(1.0), 35.0);
        assert_eq!(permute(2.0), 138.0);
        // (34 * 3 + 1) * 3 = 309 -> 309 - 289
        assert_eq!(permute(3.0), 20.0);
    }

    #[test]
    fn test_permute_negative_lattice_stays_in_period() {
        for x in -50..50 {
            let v = permute(x as f32);
            assert!((0.0..PERMUTE_PERIOD).contains(&v), "permute({x}) = {v}");
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn test_noise_is_zero_at_origin_corner() {
        // Only corner 000 has weight at the origin, and its offset vector is zero.
        assert_eq!(gradient_noise(Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_noise_cell_boundaries_agree() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let cell = Vec3::new(
                rng.gen_range(-20..20) as f32,
                rng.gen_range(-20..20) as f32,
                rng.gen_range(-20..20) as f32,
            );
            let a: f32 = rng.gen();
            let b: f32 = rng.gen();

            let x_left = lattice_blend(cell, Vec3::new(1.0, a, b));
            let x_right = lattice_blend(cell + Vec3::X, Vec3::new(0.0, a, b));
            assert!((x_left - x_right).abs() < 1e-2, "{x_left} vs {x_right}");

            let y_left = lattice_blend(cell, Vec3::new(a, 1.0, b));
            let y_right = lattice_blend(cell + Vec3::Y, Vec3::new(a, 0.0, b));
            assert!((y_left - y_right).abs() < 1e-2, "{y_left} vs {y_right}");

            let z_left = lattice_blend(cell, Vec3::new(a, b, 1.0));
            let z_right = lattice_blend(cell + Vec3::Z, Vec3::new(a, b, 0.0));
            assert!((z_left - z_right).abs() < 1e-2, "{z_left} vs {z_right}");
        }
    }

    #[test]
    fn test_noise_continuous_across_integer_coordinate() {
        let p = Vec3::new(3.0, 0.25, 0.75);
        let eps = Vec3::new(1e-4, 0.0, 0.0);
        let below = gradient_noise(p - eps);
        let above = gradient_noise(p + eps);
        assert!((below - above).abs() < 1.0, "{below} vs {above}");
    }

    #[test]
    fn test_single_octave_is_scaled_noise() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let p = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
            let amplitude = rng.gen_range(0.0..2.0);
            assert_eq!(fractal_noise(p, 1, amplitude), gradient_noise(p) * amplitude);
        }
    }

    #[test]
    fn test_two_octaves_halve_amplitude_and_double_frequency() {
        let p = Vec3::new(0.3, 1.7, -2.2);
        let expected = gradient_noise(p) * 1.5 + gradient_noise(p * 2.0) * 0.75;
        assert!((fractal_noise(p, 2, 1.5) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_octaves_clamped() {
        let p = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(fractal_noise(p, 0, 1.0), fractal_noise(p, 1, 1.0));
        assert_eq!(fractal_noise(p, 1_000, 1.0), fractal_noise(p, MAX_OCTAVES, 1.0));
    }

    #[test]
    fn test_zero_amplitude_silences_noise() {
        assert_eq!(fractal_noise(Vec3::new(4.2, -1.3, 0.5), 5, 0.0), 0.0);
    }
}
