//! Scene Pipelines
//!
//! The three render pipelines a frame is drawn with:
//!
//! - **Opaque**: Phong, depth test and depth writes, no blending
//! - **Transparent**: Phong, depth test without writes, alpha blending
//! - **Lamp**: unlit tint color for light gizmos
//!
//! All share group 0 (scene uniforms); the Phong pipelines add group 1
//! (diffuse texture and sampler). Vertex slot 0 carries [`Vertex`], slot 1
//! carries [`InstanceRaw`].

use super::gpu_context::DEPTH_FORMAT;
use super::mesh::Vertex;
use super::uniforms::InstanceRaw;

/// Per-pipeline fixed-function state.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PipelineVariant {
    label: &'static str,
    fragment_entry: &'static str,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
    blend: wgpu::BlendState,
}

const OPAQUE: PipelineVariant = PipelineVariant {
    label: "Opaque Phong",
    fragment_entry: "fs_main",
    depth_write: true,
    depth_compare: wgpu::CompareFunction::Less,
    blend: wgpu::BlendState::REPLACE,
};

const TRANSPARENT: PipelineVariant = PipelineVariant {
    label: "Transparent Phong",
    fragment_entry: "fs_transparent",
    depth_write: false,
    depth_compare: wgpu::CompareFunction::LessEqual,
    blend: wgpu::BlendState::ALPHA_BLENDING,
};

const LAMP: PipelineVariant = PipelineVariant {
    label: "Lamp",
    fragment_entry: "fs_main",
    depth_write: true,
    depth_compare: wgpu::CompareFunction::Less,
    blend: wgpu::BlendState::REPLACE,
};

/// Bind group layouts and pipelines for one surface format and sample count.
pub struct ScenePipelines {
    pub scene_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub opaque: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub lamp: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        phong_shader: &wgpu::ShaderModule,
        lamp_shader: &wgpu::ShaderModule,
    ) -> Self {
        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let phong_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let lamp_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lamp Pipeline Layout"),
            bind_group_layouts: &[&scene_layout],
            push_constant_ranges: &[],
        });

        let build = |variant: PipelineVariant,
                     layout: &wgpu::PipelineLayout,
                     shader: &wgpu::ShaderModule| {
            create_pipeline(device, variant, layout, shader, color_format, sample_count)
        };

        let opaque = build(OPAQUE, &phong_layout, phong_shader);
        let transparent = build(TRANSPARENT, &phong_layout, phong_shader);
        let lamp = build(LAMP, &lamp_layout, lamp_shader);

        Self {
            scene_layout,
            texture_layout,
            opaque,
            transparent,
            lamp,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    variant: PipelineVariant,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", variant.label)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout(), InstanceRaw::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(variant.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(variant.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Terrain quads wind clockwise seen from above
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: variant.depth_write,
            depth_compare: variant.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
