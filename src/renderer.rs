// ============================================================================
// renderer.rs — bouncelab
// Instanced ball renderer: one quad per ball, circle cut in the fragment
// shader. The ensemble draws in world traversal order with a single call.
// ============================================================================

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::world::World;

// ======================== GPU Structs ========================

/// Letterbox scale keeping the [-1, 1] arena square on any window shape.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewParams {
    scale: [f32; 2],
    _pad: [f32; 2],
}

/// Per-ball instance data, written every frame in traversal order.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BallInstance {
    center: [f32; 2],
    radius: f32,
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32];

// ======================== Renderer ========================

pub struct BallRenderer {
    pipeline: wgpu::RenderPipeline,
    view_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

impl BallRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("balls_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/balls.wgsl").into()),
        });

        let view_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("balls_view_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let view_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("balls_view_params"),
            contents: bytemuck::bytes_of(&ViewParams {
                scale: [1.0, 1.0],
                _pad: [0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("balls_view_bg"),
            layout: &view_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("balls_pipeline_layout"),
            bind_group_layouts: &[&view_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("balls_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<BallInstance>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRS,
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        Self {
            pipeline,
            view_buffer,
            bind_group,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
        }
    }

    /// Uploads view params and one instance per live ball, in traversal
    /// order. Grows the instance buffer geometrically when the ensemble
    /// outgrows it.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        world: &World,
        win_w: u32,
        win_h: u32,
    ) {
        let (w, h) = (win_w.max(1) as f32, win_h.max(1) as f32);
        let scale = if w >= h { [h / w, 1.0] } else { [1.0, w / h] };
        queue.write_buffer(
            &self.view_buffer,
            0,
            bytemuck::bytes_of(&ViewParams {
                scale,
                _pad: [0.0, 0.0],
            }),
        );

        let instances: Vec<BallInstance> = world
            .balls()
            .iter()
            .map(|ball| BallInstance {
                center: [ball.position.x, ball.position.y],
                radius: ball.radius(),
            })
            .collect();

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
            log::debug!("Instance buffer grown to {} slots", self.instance_capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Issues the instanced draw into an active render pass.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("balls_instances"),
        size: (capacity * std::mem::size_of::<BallInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
