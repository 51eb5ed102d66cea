use anyhow::Result;
use imbridge_core::BindGroupHandle;

use super::pipelines::PipelineRegistry;
use super::recorder::FrameRecorder;
use super::textures::TextureStore;
use super::RenderCtx;

/// Owns the GPU side of the bridge: registered pipelines and host textures.
///
/// GPU resources are created on first use, from the first [`RenderCtx`] seen.
/// Pipelines are rebuilt if the surface format changes.
#[derive(Default)]
pub struct Renderer {
    pipelines: Option<PipelineRegistry>,
    textures: Option<TextureStore>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads an RGBA8 texture and returns the bind group handle the host
    /// binds to a texture slot.
    pub fn upload_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<BindGroupHandle> {
        let (pipelines, textures) = self.ensure(ctx)?;
        textures.upload_rgba8(ctx, pipelines.texture_layout(), width, height, rgba)
    }

    /// Starts recording a frame. Feed the recorder to the translator, then
    /// call [`FrameRecorder::finish`] with the frame's render target.
    pub fn begin_frame<'a>(&'a mut self, ctx: &'a RenderCtx<'a>) -> Result<FrameRecorder<'a>> {
        let (pipelines, textures) = self.ensure(ctx)?;
        Ok(FrameRecorder::new(ctx, pipelines, textures))
    }

    fn ensure(&mut self, ctx: &RenderCtx<'_>) -> Result<(&PipelineRegistry, &mut TextureStore)> {
        let pipelines = match self.pipelines.take() {
            Some(mut pipelines) => {
                if pipelines.surface_format() != ctx.surface_format
                    && let Err(e) = pipelines.rebuild(ctx)
                {
                    // Old pipelines stay; the next frame retries.
                    self.pipelines = Some(pipelines);
                    return Err(e);
                }
                self.pipelines.insert(pipelines)
            }
            None => self.pipelines.insert(PipelineRegistry::new(ctx)?),
        };
        let textures = self.textures.get_or_insert_with(|| TextureStore::new(ctx.device));
        Ok((&*pipelines, textures))
    }
}
