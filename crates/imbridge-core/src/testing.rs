//! Recording backend for unit tests (no GPU required).

use crate::backend::{Backend, BindGroupHandle};
use crate::classify::PipelineId;

/// One call received by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    UsePipeline(PipelineId),
    AttachTexture(BindGroupHandle),
    SetProjection([f32; 16]),
    SetVertexBuffer(Vec<u8>),
    SetIndexBuffer(Vec<u32>),
    DrawIndexed(u32),
    Draw(u32),
}

/// Backend that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl Backend for RecordingBackend {
    fn use_pipeline(&mut self, id: PipelineId) {
        self.calls.push(BackendCall::UsePipeline(id));
    }

    fn attach_texture_bind_group(&mut self, handle: BindGroupHandle) {
        self.calls.push(BackendCall::AttachTexture(handle));
    }

    fn set_projection_matrix(&mut self, matrix: [f32; 16]) {
        self.calls.push(BackendCall::SetProjection(matrix));
    }

    fn set_vertex_buffer(&mut self, bytes: Vec<u8>) {
        self.calls.push(BackendCall::SetVertexBuffer(bytes));
    }

    fn set_index_buffer(&mut self, indices: Vec<u32>) {
        self.calls.push(BackendCall::SetIndexBuffer(indices));
    }

    fn draw_indexed(&mut self, count: u32) {
        self.calls.push(BackendCall::DrawIndexed(count));
    }

    fn draw(&mut self, vertex_count: u32) {
        self.calls.push(BackendCall::Draw(vertex_count));
    }
}
