//! # Iridescent
//!
//! A procedurally displaced, iridescent sphere rendered with wgpu.
//!
//! Each vertex of a subdivided icosphere is pushed along its normal by a
//! fractal gradient-noise field that scrolls with time. Each fragment takes
//! its colour from a visible-light wavelength chosen by how directly the
//! surface faces the camera, perturbed by a tiling noise texture, and is
//! gamma corrected before output.
//!
//! ## Quick Start
//!
//! ```ignore
//! use iridescent::prelude::*;
//!
//! fn main() -> Result<(), ViewerError> {
//!     Viewer::new()
//!         .with_params(ShadingParams {
//!             octaves: 4,
//!             opacity: 0.6,
//!             ..Default::default()
//!         })
//!         .run()
//! }
//! ```
//!
//! ## Shading Pipeline
//!
//! The GPU shader and the CPU reference in [`shading`] implement the same
//! formulas:
//!
//! 1. [`shading::permute`] hashes lattice coordinates.
//! 2. [`shading::gradient_noise`] interpolates the eight corner gradients of
//!    a unit cell; [`shading::fractal_noise`] sums octaves of it.
//! 3. [`shading::displace_vertex`] moves a vertex by
//!    `sin(n)·cos(n)·normal` where `n` is the fractal noise at the scaled
//!    position.
//! 4. [`shading::wavelength_to_rgb`] maps 380–780 nm to a colour.
//! 5. [`shading::compose_fragment`] blends white with the spectral colour by
//!    view angle, perturbs the wavelength by the texture sample and applies
//!    gamma.
//!
//! The WGSL sources live in [`shader_utils`] and are assembled into one
//! module by [`shader::generate_render_shader`].
//!
//! ## Control Panel
//!
//! With the `egui` feature, an overlay exposes every [`ShadingParams`] field
//! as a slider. Without it, keyboard shortcuts cover the wireframe toggle,
//! subdivision level and octave count (see [`viewer`]).

pub mod camera;
pub mod error;
mod gpu;
pub mod mesh;
#[cfg(feature = "egui")]
pub mod panel;
pub mod params;
pub mod shader;
pub mod shader_utils;
pub mod shading;
pub mod textures;
pub mod time;
pub mod uniforms;
pub mod viewer;

pub use camera::OrbitCamera;
pub use error::{GpuError, TextureError, ViewerError};
pub use glam::{Vec2, Vec3, Vec4};
pub use mesh::{IcoSphere, Vertex};
pub use params::{RenderConfig, ShadingParams};
pub use textures::{AddressMode, FilterMode, NoiseTexture};
pub use time::Time;
pub use uniforms::ShadingUniforms;
pub use viewer::Viewer;

/// Everything needed to configure and open the viewer.
///
/// ```ignore
/// use iridescent::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::OrbitCamera;
    pub use crate::error::{GpuError, TextureError, ViewerError};
    pub use crate::mesh::IcoSphere;
    pub use crate::params::{RenderConfig, ShadingParams};
    pub use crate::shading::{compose_fragment, displace_vertex, wavelength_to_rgb, FragmentInput};
    pub use crate::textures::{AddressMode, FilterMode, NoiseTexture};
    pub use crate::time::Time;
    pub use crate::viewer::Viewer;
    pub use glam::{Vec2, Vec3, Vec4};
}
