//! Error Types
//!
//! Failures that abort startup: assets that cannot be read, decoded or
//! compiled, and a GPU that cannot be brought up. Non-fatal conditions (settings, audio) are logged where they
//! happen and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading an asset from disk.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The image decoder rejected the file.
    #[error("cannot decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A mesh file was readable but malformed.
    #[error("{path}:{line}: {message}")]
    Mesh {
        path: PathBuf,
        line: usize,
        message: String,
    },
    /// The GPU rejected a shader module.
    #[error("shader {label} failed validation: {message}")]
    Shader { label: String, message: String },
    /// A texture directory yielded no usable images.
    #[error("no textures found in {0}")]
    EmptyTexturePool(PathBuf),
}

/// Errors raised while bringing up the GPU for a window.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("cannot create a surface for the window: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("cannot open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        AssetError::Image {
            path: path.into(),
            source,
        }
    }
}
