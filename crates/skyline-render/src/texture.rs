//! GPU copies of landscape images, cached by texture handle.

use std::collections::HashMap;

use skyline_landscape::{TextureHandle, TextureImage, WeakTextureHandle};

/// A GPU texture with its view and ready-to-bind bind group.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
}

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Pixel data length doesn't match the expected size for the given dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

struct CachedTexture {
    source: WeakTextureHandle,
    texture: GpuTexture,
}

/// Uploads landscape images once and keeps them by handle id until every
/// handle to the image is gone.
pub struct TextureCache {
    textures: HashMap<u64, CachedTexture>,
    white: GpuTexture,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("landscape-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("landscape-texture-bind-group-layout"),
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

        let white = create_texture(
            device,
            queue,
            &bind_group_layout,
            &sampler,
            "white",
            &[255; 4],
            1,
            1,
        );

        Self {
            textures: HashMap::new(),
            white,
            sampler,
            bind_group_layout,
        }
    }

    /// Upload `handle`'s image unless it is cached already. Returns `false`
    /// while the handle is still pending.
    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: &TextureHandle,
    ) -> Result<bool, TextureError> {
        if self.textures.contains_key(&handle.id()) {
            return Ok(true);
        }
        let Some(image) = handle.get() else {
            return Ok(false);
        };
        let texture = upload_image(
            device,
            queue,
            &self.bind_group_layout,
            &self.sampler,
            handle.name(),
            image,
        )?;
        log::debug!(
            "Uploaded landscape texture '{}' ({}x{})",
            handle.name(),
            image.width(),
            image.height()
        );
        self.textures.insert(
            handle.id(),
            CachedTexture {
                source: handle.downgrade(),
                texture,
            },
        );
        Ok(true)
    }

    /// The cached texture for `handle`, if uploaded.
    pub fn get(&self, handle: &TextureHandle) -> Option<&GpuTexture> {
        self.textures.get(&handle.id()).map(|cached| &cached.texture)
    }

    /// Drop textures whose handles have all been dropped. Returns how many
    /// were released.
    pub fn evict_dropped(&mut self) -> usize {
        let before = self.textures.len();
        self.textures.retain(|_, cached| cached.source.is_alive());
        let evicted = before - self.textures.len();
        if evicted > 0 {
            log::debug!("Released {evicted} landscape textures");
        }
        evicted
    }

    /// Plain white texture for color-only draws.
    pub fn white(&self) -> &GpuTexture {
        &self.white
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Drop every cached texture, for instance after switching landscapes.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    name: &str,
    image: &TextureImage,
) -> Result<GpuTexture, TextureError> {
    validate(image.rgba(), image.width(), image.height())?;
    Ok(create_texture(
        device,
        queue,
        layout,
        sampler,
        name,
        image.rgba(),
        image.width(),
        image.height(),
    ))
}

#[allow(clippy::too_many_arguments)]
fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    name: &str,
    data: &[u8],
    width: u32,
    height: u32,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
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
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: None,
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{name}-bind-group")),
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

    GpuTexture {
        texture,
        view,
        bind_group,
        dimensions: (width, height),
    }
}

fn validate(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}
