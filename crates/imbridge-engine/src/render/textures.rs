//! Host textures and the bind groups draws attach.

use anyhow::Result;
use imbridge_core::BindGroupHandle;

use super::RenderCtx;

struct TextureEntry {
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Owns uploaded textures. Handles are indices and never reused.
pub struct TextureStore {
    sampler: wgpu::Sampler,
    entries: Vec<TextureEntry>,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device) -> Self {
        // Nearest filtering: fixed-function hosts mostly ship pixel art atlases.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("imbridge texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            sampler,
            entries: Vec::new(),
        }
    }

    /// Uploads tightly packed RGBA8 pixels and returns the handle of the
    /// texture's bind group (layout: [`super::PipelineRegistry::texture_layout`]).
    pub fn upload_rgba8(
        &mut self,
        ctx: &RenderCtx<'_>,
        layout: &wgpu::BindGroupLayout,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<BindGroupHandle> {
        validate_rgba8(width, height, pixels.len(), ctx.max_texture_size)?;

        let handle = BindGroupHandle(u32::try_from(self.entries.len())?);
        let label = format!("imbridge texture {}", handle.0);
        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        log::debug!("uploaded texture {} ({width}x{height})", handle.0);

        self.entries.push(TextureEntry {
            _texture: texture,
            bind_group,
        });
        Ok(handle)
    }

    pub fn bind_group(&self, handle: BindGroupHandle) -> Option<&wgpu::BindGroup> {
        self.entry(handle).map(|e| &e.bind_group)
    }

    pub fn contains(&self, handle: BindGroupHandle) -> bool {
        self.entry(handle).is_some()
    }

    fn entry(&self, handle: BindGroupHandle) -> Option<&TextureEntry> {
        self.entries.get(handle.0 as usize)
    }
}

pub(crate) fn validate_rgba8(width: u32, height: u32, len: usize, max_dimension: u32) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "texture has zero size ({width}x{height})");
    anyhow::ensure!(
        width <= max_dimension && height <= max_dimension,
        "texture {width}x{height} exceeds the device limit of {max_dimension}"
    );
    let expected = width as usize * height as usize * 4;
    anyhow::ensure!(
        len == expected,
        "rgba8 texture {width}x{height} needs {expected} bytes, got {len}"
    );
    Ok(())
}
