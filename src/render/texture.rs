use crate::assets::{SpriteImage, TextureSet};

/// Layer texel format. Not sRGB: the shader adds and multiplies stored texel
/// values, so sampling must not linearise them first.
pub const LAYER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// True if `img` can be created as a 2D texture on a device whose
/// `max_texture_dimension_2d` is `max_dim`.
pub fn fits_texture_limit(img: &SpriteImage, max_dim: u32) -> bool {
    img.width > 0 && img.height > 0 && img.width <= max_dim && img.height <= max_dim
}

/// Bind group layout shared by both texture layers (texture + sampler).
pub fn layer_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("sprite_layer_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
    })
}

/// Point-sampled, edge-clamped sampler for sprite frames.
pub fn sprite_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sprite_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// One uploaded texture set: a bind group per slot.
pub struct LayerTextures {
    // Views in the bind groups keep these alive, but hold them anyway so the
    // textures drop with the layer.
    _textures: Vec<wgpu::Texture>,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl LayerTextures {
    /// Upload every image of `set`.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        set: &TextureSet,
        label: &str,
    ) -> Self {
        Self::from_images(device, queue, layout, sampler, set.images(), label)
    }

    /// Single white slot; bound where a layer has no images.
    pub fn white(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        label: &str,
    ) -> Self {
        Self::from_images(device, queue, layout, sampler, &[SpriteImage::white()], label)
    }

    fn from_images(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        images: &[SpriteImage],
        label: &str,
    ) -> Self {
        let max_dim = device.limits().max_texture_dimension_2d;
        let fallback = SpriteImage::white();
        let mut textures = Vec::with_capacity(images.len());
        let mut bind_groups = Vec::with_capacity(images.len());

        for (slot, img) in images.iter().enumerate() {
            let img = if fits_texture_limit(img, max_dim) {
                img
            } else {
                log::warn!(
                    "{label} slot {slot} is {}x{}, device limit is {max_dim}; using white",
                    img.width,
                    img.height,
                );
                &fallback
            };
            let size = wgpu::Extent3d {
                width: img.width,
                height: img.height,
                depth_or_array_layers: 1,
            };
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("{label}_{slot}")),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: LAYER_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &img.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * img.width),
                    rows_per_image: Some(img.height),
                },
                size,
            );

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label}_{slot}_bg")),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });

            textures.push(texture);
            bind_groups.push(bind_group);
        }

        log::info!("Uploaded {} {label} textures", bind_groups.len());

        Self {
            _textures: textures,
            bind_groups,
        }
    }

    /// Bind group for `slot`, or `None` if the set has no such slot.
    pub fn get(&self, slot: usize) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(slot)
    }
}
