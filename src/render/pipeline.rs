use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::texture;

/// Quad vertex: object-space position, diffuse colour, UV coords.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32x4,  // color
        2 => Float32x2,  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Two triangles covering [-1, 1]^2 at z = 0. U runs right-to-left and V
/// bottom-to-top to match the flipped view.
#[rustfmt::skip]
pub const QUAD_VERTICES: [Vertex; 6] = [
    Vertex { position: [ 1.0,  1.0, 0.0], color: WHITE, uv: [0.0, 1.0] },
    Vertex { position: [-1.0, -1.0, 0.0], color: WHITE, uv: [1.0, 0.0] },
    Vertex { position: [ 1.0, -1.0, 0.0], color: WHITE, uv: [0.0, 0.0] },
    Vertex { position: [-1.0, -1.0, 0.0], color: WHITE, uv: [1.0, 0.0] },
    Vertex { position: [ 1.0,  1.0, 0.0], color: WHITE, uv: [0.0, 1.0] },
    Vertex { position: [-1.0,  1.0, 0.0], color: WHITE, uv: [1.0, 1.0] },
];

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame uniform. Stride = 80 bytes (mat4 + mode, padded to 16).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SpriteUniform {
    pub mvp: [[f32; 4]; 4],
    pub mode: u32,
    pub _pad: [u32; 3],
}

impl SpriteUniform {
    pub fn new(mvp: Mat4, mode: u32) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
            mode,
            _pad: [0; 3],
        }
    }
}

/// All GPU resources for the sprite pipeline except the textures themselves.
pub struct SpritePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    pub layer_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl SpritePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_uniform_layout"),
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

        // Group 1 = base layer, group 2 = effect layer; same shape.
        let layer_layout = texture::layer_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &layer_layout, &layer_layout],
            push_constant_ranges: &[],
        });

        // Opaque: the blend recipe is done in the fragment shader.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // quad is seen from behind, no culling
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_uniform_buffer"),
            contents: bytemuck::bytes_of(&SpriteUniform::new(Mat4::IDENTITY, 0)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let sampler = texture::sprite_sampler(device);

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            layer_layout,
            sampler,
        }
    }

    /// Upload this frame's transform and blend mode.
    pub fn update_uniform(&self, queue: &wgpu::Queue, mvp: Mat4, mode: u32) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SpriteUniform::new(mvp, mode)),
        );
    }

    pub fn vertex_count(&self) -> u32 {
        QUAD_VERTICES.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<SpriteUniform>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
    }

    #[test]
    fn quad_covers_unit_square_with_full_uv_range() {
        let (mut min_uv, mut max_uv) = ([f32::MAX; 2], [f32::MIN; 2]);
        for v in QUAD_VERTICES {
            assert!(v.position[0].abs() == 1.0 && v.position[1].abs() == 1.0);
            for i in 0..2 {
                min_uv[i] = min_uv[i].min(v.uv[i]);
                max_uv[i] = max_uv[i].max(v.uv[i]);
            }
        }
        assert_eq!(min_uv, [0.0, 0.0]);
        assert_eq!(max_uv, [1.0, 1.0]);
    }

    #[test]
    fn uv_mirrors_position() {
        // u = (1 - x) / 2, v = (1 + y) / 2
        for v in QUAD_VERTICES {
            assert_eq!(v.uv[0], (1.0 - v.position[0]) / 2.0);
            assert_eq!(v.uv[1], (1.0 + v.position[1]) / 2.0);
        }
    }
}
