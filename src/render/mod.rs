pub mod pipeline;
pub mod texture;
pub mod transform;

use std::sync::Arc;
use winit::window::Window;

use crate::assets::TextureSet;
use crate::error::InitError;

use self::pipeline::{SpritePipeline, DEPTH_FORMAT};
use self::texture::LayerTextures;

/// Core GPU state: device, queue, surface, depth buffer, sprite pipeline and
/// the uploaded texture layers.
pub struct GpuState {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub sprite_pipeline: SpritePipeline,
    /// Format of the view every pass renders into; see `target_view_format`.
    target_format: wgpu::TextureFormat,
    present_modes: Vec<wgpu::PresentMode>,
    depth_view: wgpu::TextureView,
    base_layer: LayerTextures,
    effect_layer: LayerTextures,
}

/// Intermediate frame state returned by `begin_frame`.
pub struct FrameContext {
    pub output: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuState {
    /// Initialize wgpu, the sprite pipeline and upload both texture layers.
    /// A missing effect set binds a single white texel in its place.
    pub fn new(
        window: Arc<Window>,
        base: &TextureSet,
        effect: Option<&TextureSet>,
    ) -> Result<Self, InitError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;

        log::info!(
            "GPU adapter: {:?} ({:?})",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("spritewalk_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);

        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(InitError::NoSurfaceFormat)?;

        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let target_format = target_view_format(format);
        let view_formats = if target_format == format {
            vec![]
        } else {
            vec![target_format]
        };

        log::info!(
            "Surface: format={:?}, target={:?}, alpha_mode={:?}, present_modes={:?}",
            format,
            target_format,
            alpha_mode,
            surface_caps.present_modes,
        );

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats,
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, surface_config.width, surface_config.height);

        let sprite_pipeline = SpritePipeline::new(&device, target_format);

        let layout = &sprite_pipeline.layer_layout;
        let sampler = &sprite_pipeline.sampler;
        let base_layer = LayerTextures::upload(&device, &queue, layout, sampler, base, "base");
        let effect_layer = match effect {
            Some(set) => LayerTextures::upload(&device, &queue, layout, sampler, set, "effect"),
            None => LayerTextures::white(&device, &queue, layout, sampler, "effect"),
        };

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            sprite_pipeline,
            target_format,
            present_modes: surface_caps.present_modes,
            depth_view,
            base_layer,
            effect_layer,
        })
    }

    /// Resize the surface and depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Upload this frame's transform and blend mode.
    pub fn update_sprite(&self, mvp: glam::Mat4, mode: u32) {
        self.sprite_pipeline.update_uniform(&self.queue, mvp, mode);
    }

    /// Format render pipelines targeting the frame view must use.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Present modes the surface reports support for.
    pub fn present_modes(&self) -> &[wgpu::PresentMode] {
        &self.present_modes
    }

    /// Change the present mode at runtime. Modes the surface does not support
    /// are refused and leave the configuration untouched.
    pub fn set_present_mode(&mut self, mode: wgpu::PresentMode) -> bool {
        if !self.present_modes.contains(&mode) {
            log::warn!("Present mode {:?} not supported by this surface", mode);
            return false;
        }
        self.surface_config.present_mode = mode;
        self.surface
            .configure(&self.device, &self.surface_config);
        log::info!("Present mode changed to {:?}", mode);
        true
    }

    /// Acquire the next surface texture and create a command encoder.
    /// Returns None if the surface is lost/outdated (caller should skip this frame).
    pub fn begin_frame(&self) -> Option<FrameContext> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface
                    .configure(&self.device, &self.surface_config);
                return None;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return None;
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
                return None;
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.target_format),
            ..Default::default()
        });

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        Some(FrameContext {
            output,
            view,
            encoder,
        })
    }

    /// Clear colour + depth and draw the quad with the given layer slots bound.
    /// Out-of-range slots fall back to slot 0.
    pub fn draw_sprite(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        base_slot: usize,
        effect_slot: usize,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("sprite_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let (Some(base_bg), Some(effect_bg)) = (
            self.base_layer.get(base_slot).or_else(|| self.base_layer.get(0)),
            self.effect_layer.get(effect_slot).or_else(|| self.effect_layer.get(0)),
        ) else {
            return;
        };

        let p = &self.sprite_pipeline;
        render_pass.set_pipeline(&p.pipeline);
        render_pass.set_bind_group(0, &p.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, base_bg, &[]);
        render_pass.set_bind_group(2, effect_bg, &[]);
        render_pass.set_vertex_buffer(0, p.vertex_buffer.slice(..));
        render_pass.draw(0..p.vertex_count(), 0..1);
    }

    /// Create an egui render pass that preserves existing content (LoadOp::Load).
    /// Returns a 'static render pass suitable for egui_wgpu::Renderer::render().
    pub fn begin_egui_pass(
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) -> wgpu::RenderPass<'static> {
        let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        render_pass.forget_lifetime()
    }

    /// Submit the command encoder and present.
    pub fn finish_frame(
        &self,
        encoder: wgpu::CommandEncoder,
        output: wgpu::SurfaceTexture,
        extra_cmd_bufs: Vec<wgpu::CommandBuffer>,
    ) {
        self.queue.submit(
            extra_cmd_bufs
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        output.present();
    }
}

/// Non-sRGB counterpart of the surface format. Shader output is written
/// as-is so the composite lands on screen with the values `BlendRecipe`
/// computes.
pub fn target_view_format(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    surface_format.remove_srgb_suffix()
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
