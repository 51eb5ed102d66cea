//! Contracts the bridge consumes: the native backend and the host render state.

use crate::classify::PipelineId;
use crate::matrix::ColumnMajor;

/// Opaque handle to a backend-owned texture bind group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BindGroupHandle(pub u32);

/// Command sink of the native graphics backend.
///
/// Calls are synchronous and applied in order. Buffers are passed by value:
/// ownership moves to the backend with the call. Backends report their own
/// failures; nothing flows back to the caller.
pub trait Backend {
    /// Makes `id` the active pipeline. Re-activating the active pipeline is a no-op.
    fn use_pipeline(&mut self, id: PipelineId);

    /// Binds a texture bind group for the pending draw.
    fn attach_texture_bind_group(&mut self, handle: BindGroupHandle);

    /// Sets the projection matrix (column-major) for this and later draws.
    fn set_projection_matrix(&mut self, matrix: [f32; 16]);

    fn set_vertex_buffer(&mut self, bytes: Vec<u8>);

    fn set_index_buffer(&mut self, indices: Vec<u32>);

    /// Draws `count` indices from the current index buffer.
    fn draw_indexed(&mut self, count: u32);

    /// Draws `vertex_count` vertices from the current vertex buffer, non-indexed.
    fn draw(&mut self, vertex_count: u32);
}

/// Read-only view of the host's render state.
pub trait HostState {
    type Projection: ColumnMajor;

    /// The current projection matrix.
    fn projection_matrix(&self) -> &Self::Projection;

    /// Bind group of the texture bound to the active texture slot, if any.
    fn active_texture_bind_group(&self) -> Option<BindGroupHandle>;
}
