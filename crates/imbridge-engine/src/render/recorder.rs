//! wgpu implementation of the bridge's [`Backend`].
//!
//! Calls are recorded in order during the frame: buffers are uploaded right
//! away, draws capture the state current at the time of the call. `finish`
//! replays everything into a single render pass.

use std::fmt;

use imbridge_core::{Backend, BindGroupHandle, PipelineId};
use wgpu::util::DeviceExt;

use super::pipelines::PipelineRegistry;
use super::textures::TextureStore;
use super::{RenderCtx, RenderTarget};

/// A GPU buffer uploaded during this frame, referenced by index.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct BufferRef {
    slot: usize,
    len: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum DrawKind {
    Direct { vertices: u32 },
    Indexed { indices: BufferRef, count: u32 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct RecordedDraw {
    pipeline: PipelineId,
    texture: Option<BindGroupHandle>,
    projection: usize,
    vertices: BufferRef,
    kind: DrawKind,
}

/// Why a draw could not be recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum DrawError {
    NoPipeline,
    NoProjection,
    NoVertexBuffer,
    NoIndexBuffer,
    NoTexture(PipelineId),
    UnknownTexture(BindGroupHandle),
    Empty,
    VertexRange { needed: u64, available: u64 },
    IndexRange { needed: u64, available: u64 },
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::NoPipeline => write!(f, "no pipeline active"),
            DrawError::NoProjection => write!(f, "no projection matrix set"),
            DrawError::NoVertexBuffer => write!(f, "no vertex buffer set"),
            DrawError::NoIndexBuffer => write!(f, "no index buffer set"),
            DrawError::NoTexture(id) => write!(f, "pipeline {} needs a texture", id.label()),
            DrawError::UnknownTexture(h) => write!(f, "unknown texture bind group {}", h.0),
            DrawError::Empty => write!(f, "nothing to draw"),
            DrawError::VertexRange { needed, available } => {
                write!(f, "draw reads {needed} vertex bytes, buffer holds {available}")
            }
            DrawError::IndexRange { needed, available } => {
                write!(f, "draw reads {needed} index bytes, buffer holds {available}")
            }
        }
    }
}

/// Bytes past the last whole vertex when `len` bytes are read with the stride of `pipeline`.
fn stray_bytes(len: u64, pipeline: PipelineId) -> u64 {
    let stride = u64::from(pipeline.vertex_format().vertex_size());
    if stride == 0 { 0 } else { len % stride }
}

/// Backend state between calls.
#[derive(Debug, Default, Copy, Clone)]
struct PendingState {
    pipeline: Option<PipelineId>,
    texture: Option<BindGroupHandle>,
    projection: Option<usize>,
    vertices: Option<BufferRef>,
    indices: Option<BufferRef>,
}

impl PendingState {
    /// Snapshots the state for a draw, checking that the draw stays inside its buffers.
    fn capture(
        &self,
        request: DrawRequest,
        texture_known: impl Fn(BindGroupHandle) -> bool,
    ) -> Result<RecordedDraw, DrawError> {
        let pipeline = self.pipeline.ok_or(DrawError::NoPipeline)?;
        let projection = self.projection.ok_or(DrawError::NoProjection)?;
        let vertices = self.vertices.ok_or(DrawError::NoVertexBuffer)?;

        let texture = if pipeline.requires_texture() {
            let handle = self.texture.ok_or(DrawError::NoTexture(pipeline))?;
            if !texture_known(handle) {
                return Err(DrawError::UnknownTexture(handle));
            }
            Some(handle)
        } else {
            None
        };

        let stride = u64::from(pipeline.vertex_format().vertex_size());
        let (kind, vertices_needed) = match request {
            DrawRequest::Direct(0) | DrawRequest::Indexed(0) => return Err(DrawError::Empty),
            DrawRequest::Direct(count) => (DrawKind::Direct { vertices: count }, u64::from(count)),
            DrawRequest::Indexed(count) => {
                let indices = self.indices.ok_or(DrawError::NoIndexBuffer)?;
                let needed = u64::from(count) * 4;
                if needed > indices.len {
                    return Err(DrawError::IndexRange {
                        needed,
                        available: indices.len,
                    });
                }
                // Quad lowering references vertices 0..=3.
                (DrawKind::Indexed { indices, count }, 4)
            }
        };

        let needed = vertices_needed * stride;
        if needed > vertices.len {
            return Err(DrawError::VertexRange {
                needed,
                available: vertices.len,
            });
        }

        Ok(RecordedDraw {
            pipeline,
            texture,
            projection,
            vertices,
            kind,
        })
    }
}

#[derive(Debug, Copy, Clone)]
enum DrawRequest {
    Direct(u32),
    Indexed(u32),
}

/// Records one frame's worth of bridge calls.
///
/// Obtained from [`super::Renderer::begin_frame`].
pub struct FrameRecorder<'a> {
    ctx: &'a RenderCtx<'a>,
    pipelines: &'a PipelineRegistry,
    textures: &'a TextureStore,

    state: PendingState,
    buffers: Vec<wgpu::Buffer>,
    projections: Vec<wgpu::BindGroup>,
    draws: Vec<RecordedDraw>,
    skipped: u32,
}

impl<'a> FrameRecorder<'a> {
    pub(crate) fn new(ctx: &'a RenderCtx<'a>, pipelines: &'a PipelineRegistry, textures: &'a TextureStore) -> Self {
        Self {
            ctx,
            pipelines,
            textures,
            state: PendingState::default(),
            buffers: Vec::new(),
            projections: Vec::new(),
            draws: Vec::new(),
            skipped: 0,
        }
    }

    /// Draws rejected so far (see the log for reasons).
    pub fn skipped_count(&self) -> u32 {
        self.skipped
    }

    /// Encodes every recorded draw, in call order, into one render pass that
    /// loads the existing contents of `target`. Returns the number of draws.
    pub fn finish(self, target: &mut RenderTarget<'_>) -> usize {
        if self.draws.is_empty() {
            return 0;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imbridge draw pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let mut bound: Option<PipelineId> = None;
        for draw in &self.draws {
            if bound != Some(draw.pipeline) {
                rpass.set_pipeline(self.pipelines.get(draw.pipeline));
                bound = Some(draw.pipeline);
            }

            rpass.set_bind_group(0, &self.projections[draw.projection], &[]);
            if let Some(bind_group) = draw.texture.and_then(|h| self.textures.bind_group(h)) {
                rpass.set_bind_group(1, bind_group, &[]);
            }
            rpass.set_vertex_buffer(0, self.buffers[draw.vertices.slot].slice(..));

            match draw.kind {
                DrawKind::Direct { vertices } => rpass.draw(0..vertices, 0..1),
                DrawKind::Indexed { indices, count } => {
                    rpass.set_index_buffer(self.buffers[indices.slot].slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..count, 0, 0..1);
                }
            }
        }

        log::trace!("encoded {} draws ({} skipped)", self.draws.len(), self.skipped);
        self.draws.len()
    }

    fn upload(&mut self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> Option<BufferRef> {
        // Zero-sized buffers cannot be sliced for binding.
        if contents.is_empty() {
            log::debug!("{label}: empty upload ignored");
            return None;
        }

        let buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage,
        });
        let slot = self.buffers.len();
        self.buffers.push(buffer);
        Some(BufferRef {
            slot,
            len: contents.len() as u64,
        })
    }

    fn record(&mut self, request: DrawRequest) {
        let textures = self.textures;
        match self.state.capture(request, |h| textures.contains(h)) {
            Ok(draw) => self.draws.push(draw),
            Err(err) => {
                self.skipped += 1;
                log::warn!("skipping draw: {err}");
            }
        }
    }
}

impl Backend for FrameRecorder<'_> {
    fn use_pipeline(&mut self, id: PipelineId) {
        if self.state.pipeline != Some(id) {
            self.state.pipeline = Some(id);
            // Texture bindings do not carry over to another pipeline.
            self.state.texture = None;
        }
    }

    fn attach_texture_bind_group(&mut self, handle: BindGroupHandle) {
        self.state.texture = Some(handle);
    }

    fn set_projection_matrix(&mut self, matrix: [f32; 16]) {
        let buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("imbridge projection ubo"),
            contents: bytemuck::cast_slice(&matrix),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("imbridge projection bind group"),
            layout: self.pipelines.projection_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        self.state.projection = Some(self.projections.len());
        self.projections.push(bind_group);
    }

    fn set_vertex_buffer(&mut self, bytes: Vec<u8>) {
        self.state.vertices = self.upload("imbridge vertex buffer", &bytes, wgpu::BufferUsages::VERTEX);

        if let (Some(id), Some(vertices)) = (self.state.pipeline, self.state.vertices) {
            let stray = stray_bytes(vertices.len, id);
            if stray != 0 {
                log::debug!(
                    "{} vertex data is not a whole number of {}-byte vertices ({stray} bytes left over)",
                    id.label(),
                    id.vertex_format().vertex_size()
                );
            }
        }
    }

    fn set_index_buffer(&mut self, indices: Vec<u32>) {
        self.state.indices = self.upload(
            "imbridge index buffer",
            bytemuck::cast_slice(&indices),
            wgpu::BufferUsages::INDEX,
        );
    }

    fn draw_indexed(&mut self, count: u32) {
        self.record(DrawRequest::Indexed(count));
    }

    fn draw(&mut self, vertex_count: u32) {
        self.record(DrawRequest::Direct(vertex_count));
    }
}
