//! Render Module
//!
//! wgpu rendering for the labyrinth scene: GPU context, WGSL shader loading,
//! textures, meshes (including OBJ import), uniform layouts, the three scene
//! pipelines and the renderer that submits a [`FramePlan`] each frame.

pub mod frame_plan;
pub mod gpu_context;
pub mod mesh;
pub mod obj;
pub mod pipeline;
pub mod renderer;
pub mod shader_loader;
pub mod texture;
pub mod uniforms;

pub use frame_plan::{DrawBatch, FramePlan, MeshId, TextureId};
pub use gpu_context::{GpuContext, GpuContextConfig, DEPTH_FORMAT};
pub use mesh::{GpuMesh, Mesh, Vertex};
pub use obj::{load_obj, parse_obj};
pub use pipeline::ScenePipelines;
pub use renderer::Renderer;
pub use shader_loader::{create_shader_module, load_shader_file, load_shader_module};
pub use texture::Texture;
pub use uniforms::{
    GpuDirLight, GpuPointLight, GpuSpotLight, InstanceRaw, SceneUniforms, NR_POINT_LIGHTS,
};
