use imbridge_core::{
    DrawBatch, DrawMode, DrawTranslator, RenderState, RowMajorMatrix, TranslatorConfig,
    VertexElement, VertexFormat,
};
use imbridge_engine::core::{App, AppControl, FrameCtx};
use imbridge_engine::render::Renderer;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::geometry::{VertexWriter, checkerboard};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.07,
    g: 0.07,
    b: 0.09,
    a: 1.0,
};

/// Frames between stats reports.
const REPORT_EVERY: u64 = 300;

/// One host batch, packed once.
struct Batch {
    name: &'static str,
    format: VertexFormat,
    mode: DrawMode,
    primitives: u32,
    vertices: VertexWriter,
}

impl Batch {
    fn as_draw(&self) -> DrawBatch<'_> {
        DrawBatch {
            vertex_bytes: self.vertices.bytes(),
            format: &self.format,
            mode: self.mode,
            primitive_count: self.primitives,
            vertex_count: self.vertices.vertex_count(),
        }
    }
}

/// What the wgpu backend did with the draws the translator handed it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BackendTally {
    encoded: u64,
    skipped: u64,
}

impl BackendTally {
    fn add_frame(&mut self, encoded: usize, skipped: u32) {
        self.encoded += encoded as u64;
        self.skipped += u64::from(skipped);
    }
}

enum Texture {
    Pending,
    Ready,
    Failed,
}

/// Host that submits the same handful of fixed-function batches every frame.
pub struct Demo {
    translator: DrawTranslator,
    renderer: Renderer,
    host: RenderState,
    texture: Texture,
    batches: Vec<Batch>,
    backend: BackendTally,
}

impl Demo {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            translator: DrawTranslator::new(config),
            renderer: Renderer::new(),
            host: RenderState::default(),
            texture: Texture::Pending,
            batches: scene(),
            backend: BackendTally::default(),
        }
    }
}

impl App for Demo {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // Host coordinates: pixels, top-left origin.
        let (w, h) = ctx.window.physical_size();
        self.host.projection = RowMajorMatrix::orthographic(0.0, w as f32, h as f32, 0.0, -1.0, 1.0);

        if ctx.frame_index % REPORT_EVERY == 0 {
            let stats = self.translator.stats();
            log::info!("{stats:?} {:?}", self.backend);
            ctx.window.set_title(&format!(
                "imbridge studio [{}] draws: {} dropped: {} gpu skipped: {}",
                ctx.gpu.backend_name(),
                stats.submitted,
                stats.dropped(),
                self.backend.skipped
            ));
        }

        let Self {
            translator,
            renderer,
            host,
            texture,
            batches,
            backend,
        } = self;

        ctx.render(CLEAR, |rctx, target| {
            if let Texture::Pending = texture {
                let pixels = checkerboard(8, [235, 235, 235, 255], [40, 120, 200, 255]);
                *texture = match renderer.upload_texture(rctx, 8, 8, &pixels) {
                    Ok(handle) => {
                        host.textures.bind(Some(handle));
                        Texture::Ready
                    }
                    Err(e) => {
                        log::error!("checkerboard upload failed: {e:#}");
                        Texture::Failed
                    }
                };
            }

            let mut recorder = match renderer.begin_frame(rctx) {
                Ok(recorder) => recorder,
                Err(e) => {
                    log::error!("frame skipped: {e:#}");
                    return;
                }
            };
            for batch in batches.iter() {
                log::trace!("host batch {}", batch.name);
                translator.submit(&*host, &mut recorder, batch.as_draw());
            }
            let skipped = recorder.skipped_count();
            backend.add_frame(recorder.finish(target), skipped);
        })
    }
}

fn scene() -> Vec<Batch> {
    let mut triangle = VertexWriter::new();
    triangle
        .color([160.0, 80.0, 0.0], [230, 60, 60, 255])
        .color([260.0, 260.0, 0.0], [60, 230, 60, 255])
        .color([60.0, 260.0, 0.0], [60, 60, 230, 255]);

    // Corners clockwise from top-left, as `QUAD_INDICES` expects.
    let mut quad = VertexWriter::new();
    quad.textured([320.0, 80.0, 0.0], [0.0, 0.0])
        .textured([500.0, 80.0, 0.0], [1.0, 0.0])
        .textured([500.0, 260.0, 0.0], [1.0, 1.0])
        .textured([320.0, 260.0, 0.0], [0.0, 1.0]);

    let mut fan = VertexWriter::new();
    fan.color_float([560.0, 80.0, 0.0], [1.0, 0.8, 0.2, 1.0])
        .color_float([740.0, 80.0, 0.0], [1.0, 0.4, 0.1, 0.9])
        .color_float([560.0, 260.0, 0.0], [0.6, 0.1, 0.4, 0.8])
        .color_float([740.0, 80.0, 0.0], [1.0, 0.4, 0.1, 0.9])
        .color_float([740.0, 260.0, 0.0], [0.2, 0.1, 0.6, 0.6])
        .color_float([560.0, 260.0, 0.0], [0.6, 0.1, 0.4, 0.8]);

    let mut lit = VertexWriter::new();
    lit.normal([60.0, 320.0, 0.0], [0, 0, 127])
        .normal([260.0, 320.0, 0.0], [0, 0, 127])
        .normal([160.0, 480.0, 0.0], [0, 0, 127]);

    let mut line = VertexWriter::new();
    line.color([320.0, 320.0, 0.0], [255; 4])
        .color([500.0, 480.0, 0.0], [255; 4]);

    vec![
        Batch {
            name: "vertex-colored triangle",
            format: VertexFormat::position_color(),
            mode: DrawMode::Triangles,
            primitives: 1,
            vertices: triangle,
        },
        Batch {
            name: "textured quad",
            format: VertexFormat::position_texture(),
            mode: DrawMode::Quads,
            primitives: 1,
            vertices: quad,
        },
        Batch {
            name: "float-colored triangles",
            format: VertexFormat::position_color_float(),
            mode: DrawMode::Triangles,
            primitives: 2,
            vertices: fan,
        },
        // No pipeline takes normals: dropped before reaching the backend.
        Batch {
            name: "lit triangle",
            format: VertexFormat::new([VertexElement::POSITION, VertexElement::NORMAL]),
            mode: DrawMode::Triangles,
            primitives: 1,
            vertices: lit,
        },
        // Lines are forwarded but not drawn.
        Batch {
            name: "line",
            format: VertexFormat::position_color(),
            mode: DrawMode::Lines,
            primitives: 1,
            vertices: line,
        },
    ]
}
