//! Shader Loading Utilities
//!
//! Loads WGSL shaders from disk at startup and compiles them inside a
//! validation error scope, so a broken shader is a startup error rather than
//! a panic at first draw.

use std::path::Path;

use crate::error::AssetError;

/// Load a shader from the filesystem at runtime.
pub fn load_shader_file(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| AssetError::io(path, e))
}

/// Create a wgpu shader module, failing if the device rejects it.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, AssetError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(AssetError::Shader {
            label: label.to_string(),
            message: error.to_string(),
        }),
        None => Ok(module),
    }
}

/// Load and compile a shader file in one step.
pub fn load_shader_module(
    device: &wgpu::Device,
    path: impl AsRef<Path>,
) -> Result<wgpu::ShaderModule, AssetError> {
    let path = path.as_ref();
    let source = load_shader_file(path)?;
    log::debug!("Compiling shader {}", path.display());
    create_shader_module(device, &path.display().to_string(), &source)
}
