//! One wgpu render pipeline per [`PipelineId`], built once per surface format.

use anyhow::{Context, Result};
use imbridge_core::{DataType, ElementUsage, PipelineId, VertexElement, VertexFormat};

use super::RenderCtx;

/// Size of the projection uniform (`mat4x4<f32>`).
pub(crate) const PROJECTION_SIZE: u64 = 64;

/// Maps one vertex element to the wgpu attribute format the shaders read.
///
/// Integer colors are normalized; other integer elements stay integral.
/// Returns `None` for shapes wgpu cannot fetch (e.g. three 8-bit components).
pub fn attribute_format(element: &VertexElement) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let normalized = element.usage == ElementUsage::Color;
    let format = match (element.data_type, element.count) {
        (DataType::Float, 1) => F::Float32,
        (DataType::Float, 2) => F::Float32x2,
        (DataType::Float, 3) => F::Float32x3,
        (DataType::Float, 4) => F::Float32x4,
        (DataType::UByte, 4) if normalized => F::Unorm8x4,
        (DataType::UByte, 4) => F::Uint8x4,
        (DataType::Byte, 4) if normalized => F::Snorm8x4,
        (DataType::Byte, 4) => F::Sint8x4,
        (DataType::UShort, 2) => F::Uint16x2,
        (DataType::UShort, 4) => F::Uint16x4,
        (DataType::Short, 2) => F::Sint16x2,
        (DataType::Short, 4) => F::Sint16x4,
        (DataType::UInt, 1) => F::Uint32,
        (DataType::UInt, 2) => F::Uint32x2,
        (DataType::UInt, 3) => F::Uint32x3,
        (DataType::UInt, 4) => F::Uint32x4,
        (DataType::Int, 1) => F::Sint32,
        (DataType::Int, 2) => F::Sint32x2,
        (DataType::Int, 3) => F::Sint32x3,
        (DataType::Int, 4) => F::Sint32x4,
        _ => return None,
    };
    Some(format)
}

/// Shader locations follow element order; padding elements take space but no location.
pub fn vertex_attributes(format: &VertexFormat) -> Option<Vec<wgpu::VertexAttribute>> {
    let mut attributes = Vec::with_capacity(format.len());
    let mut location = 0;
    for (element, offset) in format.elements().iter().zip(format.offsets()) {
        if element.usage == ElementUsage::Padding {
            continue;
        }
        attributes.push(wgpu::VertexAttribute {
            format: attribute_format(element)?,
            offset: u64::from(offset),
            shader_location: location,
        });
        location += 1;
    }
    Some(attributes)
}

/// [`vertex_attributes`] for a pipeline's layout, as an error when wgpu cannot fetch it.
fn layout_attributes(label: &str, format: &VertexFormat) -> Result<Vec<wgpu::VertexAttribute>> {
    vertex_attributes(format)
        .with_context(|| format!("pipeline {label}: vertex layout has no wgpu attribute mapping"))
}

/// Registered pipelines plus the bind group layouts they share.
///
/// Group 0 is the projection uniform, group 1 the texture (textured pipeline only).
pub struct PipelineRegistry {
    surface_format: wgpu::TextureFormat,
    pipelines: Vec<wgpu::RenderPipeline>,
    projection_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
}

impl PipelineRegistry {
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self> {
        let projection_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imbridge projection bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(PROJECTION_SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("imbridge texture bgl"),
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

        let pipelines = build_all(ctx, &projection_layout, &texture_layout)?;

        Ok(Self {
            surface_format: ctx.surface_format,
            pipelines,
            projection_layout,
            texture_layout,
        })
    }

    /// Rebuilds the pipelines for a new surface format. Bind group layouts are
    /// kept, so bind groups created against them stay valid. On error the
    /// previous pipelines are left in place.
    pub fn rebuild(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        log::debug!(
            "rebuilding pipelines: {:?} -> {:?}",
            self.surface_format,
            ctx.surface_format
        );
        self.pipelines = build_all(ctx, &self.projection_layout, &self.texture_layout)?;
        self.surface_format = ctx.surface_format;
        Ok(())
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn get(&self, id: PipelineId) -> &wgpu::RenderPipeline {
        &self.pipelines[id.index()]
    }

    pub fn projection_layout(&self) -> &wgpu::BindGroupLayout {
        &self.projection_layout
    }

    pub fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }
}

fn build_all(
    ctx: &RenderCtx<'_>,
    projection_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> Result<Vec<wgpu::RenderPipeline>> {
    let color_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("imbridge position_color shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/position_color.wgsl").into()),
    });
    let tex_shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("imbridge position_tex shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/position_tex.wgsl").into()),
    });

    let color_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("imbridge color pipeline layout"),
        bind_group_layouts: &[projection_layout],
        immediate_size: 0,
    });
    let tex_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("imbridge textured pipeline layout"),
        bind_group_layouts: &[projection_layout, texture_layout],
        immediate_size: 0,
    });

    // Indexed by `PipelineId::index()`.
    PipelineId::ALL
        .iter()
        .map(|&id| -> Result<wgpu::RenderPipeline> {
            let (shader, layout) = if id.requires_texture() {
                (&tex_shader, &tex_layout)
            } else {
                (&color_shader, &color_layout)
            };
            let pipeline = build_pipeline(ctx, id, shader, layout)?;
            log::debug!("registered pipeline {} ({})", id.index(), id.label());
            Ok(pipeline)
        })
        .collect()
}

fn build_pipeline(
    ctx: &RenderCtx<'_>,
    id: PipelineId,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
) -> Result<wgpu::RenderPipeline> {
    let format = id.vertex_format();
    let attributes = layout_attributes(id.label(), &format)?;
    let label = format!("imbridge {} pipeline", id.label());

    Ok(ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: u64::from(format.vertex_size()),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        // Fixed-function hosts do not agree on winding; never cull.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    }))
}
