//! Error types for GPU setup, texture loading and the viewer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,

    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The surface reported no usable texture format.
    #[error("Surface supports no texture formats on this adapter")]
    NoSurfaceFormat,
}

/// Errors that can occur while building the noise texture.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Failed to open or decode an image file.
    #[error("Failed to load texture '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel data does not match the declared dimensions.
    #[error("RGBA data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Zero-sized image.
    #[error("Texture has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// Noise texture could not be built.
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages() {
        let err = TextureError::SizeMismatch { expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "RGBA data size mismatch: expected 16 bytes, got 12");
        assert!(GpuError::NoAdapter.to_string().contains("No compatible GPU adapter"));
    }

    #[test]
    fn test_viewer_error_wraps_sources() {
        let err: ViewerError = GpuError::NoAdapter.into();
        assert!(matches!(err, ViewerError::Gpu(GpuError::NoAdapter)));
        assert!(err.source().is_some());

        let err: ViewerError = TextureError::EmptyImage { width: 0, height: 0 }.into();
        assert!(err.to_string().starts_with("Texture error:"));
    }
}
