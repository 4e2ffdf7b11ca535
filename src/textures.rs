//! Noise texture feeding the fragment stage.
//!
//! The fragment shader reads the red channel at `fract(uv * noise_strength)`
//! and uses it to nudge the wavelength. The texture is either loaded from an
//! image file or generated from a seed.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::path::Path;

use glam::Vec2;

use crate::error::TextureError;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

/// Address mode for texture wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// Tile the texture (default). Coordinates wrap around.
    #[default]
    Repeat,
    /// Mirror the texture at boundaries.
    MirrorRepeat,
    /// Clamp to edge color.
    ClampToEdge,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// RGBA8 noise image plus sampling configuration.
///
/// Always holds at least one pixel and exactly `width * height * 4` bytes.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    data: Vec<u8>,
    width: u32,
    height: u32,
    filter: FilterMode,
    address_mode: AddressMode,
}

impl NoiseTexture {
    /// Wrap raw RGBA data.
    ///
    /// Fails if either dimension is zero or `data` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
            address_mode: AddressMode::Repeat,
        })
    }

    /// Load a texture from an image file (PNG or JPEG).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|source| TextureError::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (width, height) = img.dimensions();
        log::info!("loaded noise texture {} ({}x{})", path.display(), width, height);
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// Tileable grayscale value noise of `size × size` pixels.
    ///
    /// Four octaves over a wrapping lattice, so the left/right and top/bottom
    /// edges meet seamlessly. Equal seeds give identical textures.
    pub fn noise(size: u32, seed: u32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let v = tileable_value_noise(x as f32 / size as f32, y as f32 / size as f32, seed);
                let v = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Self {
            data,
            width: size,
            height: size,
            filter: FilterMode::Linear,
            address_mode: AddressMode::Repeat,
        }
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode for UV wrapping.
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn address_mode(&self) -> AddressMode {
        self.address_mode
    }

    /// Copy shrunk so neither side exceeds `max_dimension`, keeping the
    /// aspect ratio. `None` if the texture already fits.
    pub fn downscaled_to(&self, max_dimension: u32) -> Option<Self> {
        let max_dimension = max_dimension.max(1);
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return None;
        }

        let scale = |side: u32| ((side as u64 * max_dimension as u64 / longest as u64) as u32).max(1);
        let (width, height) = (scale(self.width), scale(self.height));

        let image = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())?;
        let resized = image::imageops::resize(&image, width, height, image::imageops::FilterType::Triangle);

        Some(Self {
            data: resized.into_raw(),
            width,
            height,
            filter: self.filter,
            address_mode: self.address_mode,
        })
    }

    /// Red channel of texel `(x, y)` in `[0, 1]`. Coordinates wrap.
    pub fn texel_red(&self, x: u32, y: u32) -> f32 {
        let x = x % self.width;
        let y = y % self.height;
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.data[offset] as f32 / 255.0
    }

    /// Nearest-texel red channel at `uv`, wrapped into `[0, 1)²`.
    pub fn sample_red(&self, uv: Vec2) -> f32 {
        let wrapped = wrap_uv(uv);
        let x = ((wrapped.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((wrapped.y * self.height as f32) as u32).min(self.height - 1);
        self.texel_red(x, y)
    }
}

/// Fractional part of each component, always in `[0, 1)`.
pub fn wrap_uv(uv: Vec2) -> Vec2 {
    let f = uv - uv.floor();
    // -tiny - floor(-tiny) rounds up to exactly 1.0
    Vec2::new(
        if f.x >= 1.0 { 0.0 } else { f.x },
        if f.y >= 1.0 { 0.0 } else { f.y },
    )
}

/// Repeat coordinate used by the fragment shader: `fract(uv * strength)`.
pub fn repeat_uv(uv: Vec2, noise_strength: f32) -> Vec2 {
    wrap_uv(uv * noise_strength)
}

fn tileable_value_noise(u: f32, v: f32, seed: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut total = 0.0;
    let mut cells = 8u32;
    for octave in 0..4 {
        value += lattice_value(u * cells as f32, v * cells as f32, cells, seed.wrapping_add(octave)) * amplitude;
        total += amplitude;
        amplitude *= 0.5;
        cells *= 2;
    }
    value / total
}

/// Smoothly interpolated lattice hash with period `cells` on both axes.
fn lattice_value(x: f32, y: f32, cells: u32, seed: u32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (tx, ty) = (x - x0, y - y0);
    let (sx, sy) = (tx * tx * (3.0 - 2.0 * tx), ty * ty * (3.0 - 2.0 * ty));

    let ix = x0 as u32 % cells;
    let iy = y0 as u32 % cells;
    let jx = (ix + 1) % cells;
    let jy = (iy + 1) % cells;

    let corner = |cx: u32, cy: u32| hash_noise(cx, cy, seed) as f32 / 255.0;
    let top = corner(ix, iy) + (corner(jx, iy) - corner(ix, iy)) * sx;
    let bottom = corner(ix, jy) + (corner(jx, jy) - corner(ix, jy)) * sx;
    top + (bottom - top) * sy
}

/// Simple hash-based noise function.
fn hash_noise(x: u32, y: u32, seed: u32) -> u8 {
    let mut n = x
        .wrapping_mul(374761393)
        .wrapping_add(y.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1013904223));
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n = n ^ (n >> 16);
    (n & 255) as u8
}
