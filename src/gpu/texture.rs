//! Noise texture upload.

use crate::textures::NoiseTexture;

/// Noise texture resident on the GPU.
pub struct GpuNoiseTexture {
    /// Kept alive alongside its view.
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuNoiseTexture {
    /// Upload `noise` as a linear (non-sRGB) RGBA8 texture.
    ///
    /// The red channel is read as data, not colour, so no sRGB decode.
    /// Images larger than the device allows are downscaled first.
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, noise: &NoiseTexture) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let downscaled = noise.downscaled_to(max_dimension);
        if let Some(fitted) = &downscaled {
            log::warn!(
                "noise texture {}x{} exceeds the device limit of {max_dimension}, downscaled to {}x{}",
                noise.width(),
                noise.height(),
                fitted.width(),
                fitted.height()
            );
        }
        let noise = downscaled.as_ref().unwrap_or(noise);

        let size = wgpu::Extent3d {
            width: noise.width(),
            height: noise.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Noise Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            noise.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(noise.width() * 4),
                rows_per_image: Some(noise.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Noise Texture View"),
            ..Default::default()
        });

        let address_mode = noise.address_mode().into();
        let filter = noise.filter().into();
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Noise Sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
        }
    }
}
