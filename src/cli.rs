//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use iridescent::{RenderConfig, ShadingParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "iridescent")]
#[command(about = "Noise-displaced iridescent sphere", long_about = None)]
pub struct Args {
    /// Noise texture (PNG or JPEG). A procedural texture is used if omitted.
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,

    /// Seed for the procedural noise texture
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Fractal noise octaves (1-10)
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Displacement amplitude (0-2)
    #[arg(long)]
    pub amplitude: Option<f32>,

    /// Spatial noise frequency (0.001-0.05)
    #[arg(long)]
    pub frequency: Option<f32>,

    /// How fast the noise scrolls (0.001-0.1)
    #[arg(long)]
    pub time_frequency: Option<f32>,

    /// Noise texture repeats across the surface (0-10)
    #[arg(long)]
    pub noise_strength: Option<f32>,

    /// Surface opacity (0-1)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Icosphere subdivision level (0-50)
    #[arg(long)]
    pub subdivisions: Option<u32>,

    /// Wavelength at grazing angles, in nm
    #[arg(long, value_name = "NM")]
    pub min_wavelength: Option<f32>,

    /// Wavelength facing the camera, in nm
    #[arg(long, value_name = "NM")]
    pub max_wavelength: Option<f32>,

    /// Start in wireframe mode
    #[arg(long)]
    pub wireframe: bool,

    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl Args {
    /// Defaults overridden by whatever was passed. Not yet clamped.
    pub fn shading_params(&self) -> ShadingParams {
        let defaults = ShadingParams::default();
        ShadingParams {
            time_frequency: self.time_frequency.unwrap_or(defaults.time_frequency),
            spatial_frequency: self.frequency.unwrap_or(defaults.spatial_frequency),
            octaves: self.octaves.unwrap_or(defaults.octaves),
            amplitude: self.amplitude.unwrap_or(defaults.amplitude),
            noise_strength: self.noise_strength.unwrap_or(defaults.noise_strength),
            opacity: self.opacity.unwrap_or(defaults.opacity),
            wireframe: self.wireframe,
            subdivisions: self.subdivisions.unwrap_or(defaults.subdivisions),
            min_wavelength: self.min_wavelength.unwrap_or(defaults.min_wavelength),
            max_wavelength: self.max_wavelength.unwrap_or(defaults.max_wavelength),
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..Default::default()
        }
    }
}
