//! wgpu backend for the draw bridge.
//!
//! The bridge's pipeline ids map to render pipelines built here. A frame is
//! recorded through [`FrameRecorder`] (the [`imbridge_core::Backend`]
//! implementation) and encoded into the frame's render target in one pass.
//!
//! Convention:
//! - Vertex data is consumed exactly as the host packed it.
//! - Group 0 holds the projection uniform, group 1 the texture and sampler.

mod ctx;
mod pipelines;
mod recorder;
mod renderer;
mod textures;

pub use ctx::{RenderCtx, RenderTarget};
pub use pipelines::{PipelineRegistry, attribute_format, vertex_attributes};
pub use recorder::FrameRecorder;
pub use renderer::Renderer;
pub use textures::TextureStore;
