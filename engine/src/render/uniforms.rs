//! Uniform Structs for GPU Shaders
//!
//! GPU-compatible uniform and instance structures. Each must match the WGSL
//! declarations in `resources/shaders/phong.wgsl` exactly; sizes are checked
//! at compile time.

use glam::{Mat4, Vec3, Vec4};

/// Number of point lights the shaders loop over.
pub const NR_POINT_LIGHTS: usize = 7;

/// Directional light.
///
/// WGSL layout (64 bytes):
///   offset  0: direction (vec3<f32>) + pad
///   offset 16: ambient   (vec3<f32>) + pad
///   offset 32: diffuse   (vec3<f32>) + pad
///   offset 48: specular  (vec3<f32>) + pad
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuDirLight {
    pub direction: [f32; 3],
    pub _pad0: f32,
    pub ambient: [f32; 3],
    pub _pad1: f32,
    pub diffuse: [f32; 3],
    pub _pad2: f32,
    pub specular: [f32; 3],
    pub _pad3: f32,
}

/// Point light with distance attenuation `1 / (c + l*d + q*d^2)`.
///
/// WGSL layout (64 bytes):
///   offset  0: position (vec3<f32>), constant_term (f32)
///   offset 16: ambient  (vec3<f32>), linear_term (f32)
///   offset 32: diffuse  (vec3<f32>), quadratic_term (f32)
///   offset 48: specular (vec3<f32>) + pad
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub constant_term: f32,
    pub ambient: [f32; 3],
    pub linear_term: f32,
    pub diffuse: [f32; 3],
    pub quadratic_term: f32,
    pub specular: [f32; 3],
    pub _pad0: f32,
}

/// Spot light with smooth edge between `cut_off` and `outer_cut_off`
/// (both cosines of the half angle).
///
/// WGSL layout (80 bytes):
///   offset  0: position  (vec3<f32>), cut_off (f32)
///   offset 16: direction (vec3<f32>), outer_cut_off (f32)
///   offset 32: ambient   (vec3<f32>), constant_term (f32)
///   offset 48: diffuse   (vec3<f32>), linear_term (f32)
///   offset 64: specular  (vec3<f32>), quadratic_term (f32)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuSpotLight {
    pub position: [f32; 3],
    pub cut_off: f32,
    pub direction: [f32; 3],
    pub outer_cut_off: f32,
    pub ambient: [f32; 3],
    pub constant_term: f32,
    pub diffuse: [f32; 3],
    pub linear_term: f32,
    pub specular: [f32; 3],
    pub quadratic_term: f32,
}

/// Per-frame scene constants, bound at group 0 binding 0.
///
/// WGSL layout (672 bytes):
///   offset   0: view_proj (mat4x4<f32>)
///   offset  64: view_pos (vec3<f32>), shininess (f32)
///   offset  80: dir_light (DirLight, 64)
///   offset 144: point_lights (array<PointLight, 7>, 448)
///   offset 592: spot_light (SpotLight, 80)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub shininess: f32,
    pub dir_light: GpuDirLight,
    pub point_lights: [GpuPointLight; NR_POINT_LIGHTS],
    pub spot_light: GpuSpotLight,
}

static_assertions::assert_eq_size!(GpuDirLight, [u8; 64]);
static_assertions::assert_eq_size!(GpuPointLight, [u8; 64]);
static_assertions::assert_eq_size!(GpuSpotLight, [u8; 80]);

const _: () = {
    assert!(
        std::mem::size_of::<SceneUniforms>() == 672,
        "SceneUniforms must match the WGSL Scene struct"
    );
};

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_pos: [0.0; 3],
            shininess: 32.0,
            dir_light: GpuDirLight::default(),
            point_lights: [GpuPointLight::default(); NR_POINT_LIGHTS],
            spot_light: GpuSpotLight::default(),
        }
    }
}

impl SceneUniforms {
    /// Set camera matrices and eye position.
    pub fn set_camera(&mut self, view_proj: Mat4, eye: Vec3) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.view_pos = eye.to_array();
    }
}

/// Per-draw instance data at vertex slot 1: model matrix columns and an RGBA tint.
///
/// WGSL locations 3..=6 hold the matrix columns, location 7 the tint.
/// Normals are transformed by the model matrix directly, so models must use
/// uniform scale.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

const _: () = {
    assert!(
        std::mem::size_of::<InstanceRaw>() == 80,
        "InstanceRaw must be exactly 80 bytes"
    );
};

impl InstanceRaw {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn new(model: Mat4, tint: Vec4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            tint: tint.to_array(),
        }
    }

    /// Vertex buffer layout at slot 1, stepped per instance.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_array_offset() {
        let u = SceneUniforms::default();
        let base = &u as *const _ as usize;
        let lights = &u.point_lights as *const _ as usize;
        let spot = &u.spot_light as *const _ as usize;
        assert_eq!(lights - base, 144);
        assert_eq!(spot - base, 592);
    }

    #[test]
    fn test_instance_keeps_translation_column() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::new(model, Vec4::ONE);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.tint, [1.0; 4]);
    }
}
