//! Immediate-mode → pipeline draw bridge.
//!
//! Hosts that still speak the fixed-function vocabulary (raw vertex bytes, a
//! declared vertex format and a draw mode) hand each batch to a
//! [`DrawTranslator`], which resolves a pipeline, forwards the projection
//! matrix and vertex data, lowers quads to indexed triangles and issues the
//! draw on a [`Backend`].
//!
//! This crate carries no GPU or windowing dependencies; `imbridge-engine`
//! provides the wgpu backend.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`format`] | `VertexFormat`, `VertexElement`, `DrawMode` |
//! | [`classify`] | `PipelineId`, `classify` |
//! | [`matrix`] | `ColumnMajor`, `RowMajorMatrix`, `to_column_major` |
//! | [`backend`] | `Backend`, `HostState`, `BindGroupHandle` |
//! | [`host`] | `TextureSlots`, `RenderState` |
//! | [`translator`] | `DrawTranslator`, `DrawBatch`, `DrawStats` |
//!
//! # Quick start
//!
//! ```rust
//! use imbridge_core::{DrawBatch, DrawMode, DrawTranslator, RenderState, RowMajorMatrix, VertexFormat};
//! # use imbridge_core::{Backend, BindGroupHandle, PipelineId};
//! # struct Nop;
//! # impl Backend for Nop {
//! #     fn use_pipeline(&mut self, _: PipelineId) {}
//! #     fn attach_texture_bind_group(&mut self, _: BindGroupHandle) {}
//! #     fn set_projection_matrix(&mut self, _: [f32; 16]) {}
//! #     fn set_vertex_buffer(&mut self, _: Vec<u8>) {}
//! #     fn set_index_buffer(&mut self, _: Vec<u32>) {}
//! #     fn draw_indexed(&mut self, _: u32) {}
//! #     fn draw(&mut self, _: u32) {}
//! # }
//! # let mut backend = Nop;
//!
//! let host = RenderState::new(RowMajorMatrix::IDENTITY);
//! let format = VertexFormat::position_color();
//! let vertices = [0u8; 16 * 3];
//!
//! let mut translator = DrawTranslator::default();
//! translator.submit(&host, &mut backend, DrawBatch {
//!     vertex_bytes: &vertices,
//!     format: &format,
//!     mode: DrawMode::Triangles,
//!     primitive_count: 3,
//!     vertex_count: 3,
//! });
//! assert_eq!(translator.stats().direct_draws, 1);
//! ```

pub mod backend;
pub mod classify;
pub mod error;
pub mod format;
pub mod host;
pub mod matrix;
pub mod translator;

#[cfg(test)]
mod testing;

pub use backend::{Backend, BindGroupHandle, HostState};
pub use classify::{PipelineId, classify};
pub use error::{TextureSlotError, UnsupportedLayout};
pub use format::{DataType, DrawMode, ElementUsage, VertexElement, VertexFormat};
pub use host::{MAX_TEXTURE_SLOTS, RenderState, TextureSlots};
pub use matrix::{ColumnMajor, RowMajorMatrix, to_column_major};
pub use translator::{
    DrawBatch, DrawStats, DrawTranslator, DropReporting, QUAD_INDICES, TranslatorConfig,
};

pub use glam;
