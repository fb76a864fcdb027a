//! Scene Renderer
//!
//! Owns the pipelines, uploaded meshes and textures, and the per-frame
//! uniform and instance buffers. [`Renderer::render`] draws one [`FramePlan`]
//! into the surface in a single render pass.

use wgpu::util::DeviceExt;

use super::frame_plan::{DrawBatch, FramePlan, MeshId, TextureId};
use super::gpu_context::GpuContext;
use super::mesh::{GpuMesh, Mesh};
use super::pipeline::ScenePipelines;
use super::texture::{create_repeat_sampler, Texture};
use super::uniforms::{InstanceRaw, SceneUniforms};

/// Instances the buffer holds before its first growth.
const INITIAL_INSTANCE_CAPACITY: usize = 1024;

struct TextureSlot {
    _texture: Texture,
    bind_group: wgpu::BindGroup,
}

pub struct Renderer {
    pipelines: ScenePipelines,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white: TextureSlot,
    meshes: Vec<GpuMesh>,
    textures: Vec<TextureSlot>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    /// Scratch list of every instance in draw order
    instances: Vec<InstanceRaw>,
    pub clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(
        ctx: &GpuContext,
        phong_shader: &wgpu::ShaderModule,
        lamp_shader: &wgpu::ShaderModule,
    ) -> Self {
        let device = &ctx.device;
        let pipelines = ScenePipelines::new(
            device,
            ctx.format(),
            ctx.sample_count,
            phong_shader,
            lamp_shader,
        );

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &pipelines.scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let sampler = create_repeat_sampler(device);
        let white = Texture::solid(device, &ctx.queue, [255; 4], "White Texture");
        let white = Self::texture_slot(device, &pipelines, &sampler, white);

        let instance_buffer = Self::create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY);

        Self {
            pipelines,
            scene_buffer,
            scene_bind_group,
            sampler,
            white,
            meshes: Vec::new(),
            textures: Vec::new(),
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            instances: Vec::new(),
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
        }
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn texture_slot(
        device: &wgpu::Device,
        pipelines: &ScenePipelines,
        sampler: &wgpu::Sampler,
        texture: Texture,
    ) -> TextureSlot {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout: &pipelines.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        TextureSlot {
            _texture: texture,
            bind_group,
        }
    }

    /// Upload a mesh and return its handle.
    pub fn add_mesh(&mut self, device: &wgpu::Device, mesh: &Mesh, label: &str) -> MeshId {
        self.meshes.push(mesh.upload(device, label));
        MeshId(self.meshes.len() - 1)
    }

    /// Take ownership of an uploaded texture and return its handle.
    pub fn add_texture(&mut self, device: &wgpu::Device, texture: Texture) -> TextureId {
        let slot = Self::texture_slot(device, &self.pipelines, &self.sampler, texture);
        self.textures.push(slot);
        TextureId(self.textures.len() - 1)
    }

    fn bind_group_for(&self, texture: Option<TextureId>) -> &wgpu::BindGroup {
        texture
            .and_then(|id| self.textures.get(id.0))
            .map_or(&self.white.bind_group, |slot| &slot.bind_group)
    }

    /// Copy every instance of the plan into the GPU buffer, growing it if needed.
    fn upload_instances(&mut self, ctx: &GpuContext, plan: &FramePlan) {
        self.instances.clear();
        for batch in plan.batches() {
            self.instances.extend_from_slice(&batch.instances);
        }
        if self.instances.len() > self.instance_capacity {
            self.instance_capacity = self.instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(&ctx.device, self.instance_capacity);
            log::debug!("Instance buffer grown to {}", self.instance_capacity);
        }
        if !self.instances.is_empty() {
            ctx.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
        }
    }

    /// Draw one frame and present it.
    pub fn render(
        &mut self,
        ctx: &GpuContext,
        uniforms: &SceneUniforms,
        plan: &FramePlan,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = ctx.get_current_texture()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        ctx.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(uniforms));
        self.upload_instances(ctx, plan);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let (view, resolve_target) = match &ctx.msaa_view {
                Some(msaa) => (msaa, Some(&frame_view)),
                None => (&frame_view, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            let mut first = 0u32;
            pass.set_pipeline(&self.pipelines.opaque);
            first = self.draw_batches(&mut pass, &plan.opaque, first, true);
            pass.set_pipeline(&self.pipelines.transparent);
            first = self.draw_batches(&mut pass, &plan.transparent, first, true);
            pass.set_pipeline(&self.pipelines.lamp);
            self.draw_batches(&mut pass, &plan.lamps, first, false);
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Draw batches whose instances start at `first` in the instance buffer.
    /// Returns the index following the last instance drawn.
    fn draw_batches(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        batches: &[DrawBatch],
        mut first: u32,
        textured: bool,
    ) -> u32 {
        for batch in batches {
            let count = batch.instances.len() as u32;
            if let Some(mesh) = self.meshes.get(batch.mesh.0) {
                if textured {
                    pass.set_bind_group(1, self.bind_group_for(batch.texture), &[]);
                }
                mesh.draw_instanced(pass, first..first + count);
            } else {
                log::warn!("Draw batch references unknown mesh {:?}", batch.mesh);
            }
            first += count;
        }
        first
    }
}
