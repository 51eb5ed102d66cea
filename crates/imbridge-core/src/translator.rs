//! One host batch in, one pipeline-based draw out.

use crate::backend::{Backend, HostState};
use crate::classify::{PipelineId, classify};
use crate::format::{DrawMode, VertexFormat};
use crate::matrix::to_column_major;

/// Index pattern splitting one quad (`0 1 2 3`) into two triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// One immediate-mode batch as handed over by the host.
#[derive(Debug, Copy, Clone)]
pub struct DrawBatch<'a> {
    /// Raw vertex bytes. The whole slice is forwarded.
    pub vertex_bytes: &'a [u8],
    pub format: &'a VertexFormat,
    pub mode: DrawMode,
    /// Element count reported by the host; informational only.
    pub primitive_count: u32,
    pub vertex_count: u32,
}

/// How dropped batches are reported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum DropReporting {
    /// Count only.
    Silent,
    /// Warn the first time each drop reason occurs, then log at debug level.
    #[default]
    WarnOnce,
    /// Warn on every dropped batch.
    Every,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct TranslatorConfig {
    pub drop_reporting: DropReporting,
}

/// Running counters kept by a [`DrawTranslator`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    /// Batches that resolved to a pipeline and reached the backend.
    pub submitted: u64,
    pub indexed_draws: u64,
    pub direct_draws: u64,
    pub unsupported_layout: u64,
    pub unsupported_mode: u64,
    /// Textured batches dropped because no texture was bound to the active slot.
    pub missing_texture: u64,
    /// Submitted batches whose vertex stride differs from the pipeline's.
    /// Not a drop: the bytes are forwarded as they are.
    pub stride_mismatch: u64,
}

impl DrawStats {
    pub fn dropped(&self) -> u64 {
        self.unsupported_layout + self.unsupported_mode + self.missing_texture
    }
}

#[derive(Debug, Copy, Clone)]
enum DropReason {
    Layout,
    Mode,
    Texture,
}

/// Translates immediate-mode batches into backend calls.
///
/// Holds no render state between calls; the counters are diagnostics only.
#[derive(Debug, Default)]
pub struct DrawTranslator {
    config: TranslatorConfig,
    stats: DrawStats,
    warned: [bool; 3],
}

impl DrawTranslator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = DrawStats::default();
    }

    /// Submits one batch.
    ///
    /// Unsupported layouts and textured batches without a bound texture issue
    /// no backend call at all. Modes other than quads and triangles forward
    /// pipeline, matrix and vertices but draw nothing.
    pub fn submit<H, B>(&mut self, host: &H, backend: &mut B, batch: DrawBatch<'_>)
    where
        H: HostState + ?Sized,
        B: Backend + ?Sized,
    {
        let pipeline = match classify(batch.format) {
            Ok(id) => id,
            Err(err) => {
                self.stats.unsupported_layout += 1;
                self.report(DropReason::Layout, format_args!("dropping batch: {err}"));
                return;
            }
        };

        let texture = if pipeline.requires_texture() {
            let Some(handle) = host.active_texture_bind_group() else {
                self.stats.missing_texture += 1;
                self.report(
                    DropReason::Texture,
                    format_args!("dropping {} batch: no texture bound", pipeline.label()),
                );
                return;
            };
            Some(handle)
        } else {
            None
        };

        let stride = batch.format.vertex_size();
        let expected = pipeline.vertex_format().vertex_size();
        if stride != expected {
            self.stats.stride_mismatch += 1;
            log::debug!(
                "{} batch has {stride}-byte vertices, pipeline reads {expected}",
                pipeline.label()
            );
        }

        log::trace!(
            "submit {} mode={:?} vertices={} primitives={} bytes={}",
            pipeline.label(),
            batch.mode,
            batch.vertex_count,
            batch.primitive_count,
            batch.vertex_bytes.len()
        );

        backend.use_pipeline(pipeline);
        if let Some(handle) = texture {
            backend.attach_texture_bind_group(handle);
        }

        backend.set_projection_matrix(to_column_major(host.projection_matrix()));
        backend.set_vertex_buffer(batch.vertex_bytes.to_vec());
        self.stats.submitted += 1;

        self.lower(pipeline, backend, batch);
    }

    fn lower<B: Backend + ?Sized>(&mut self, pipeline: PipelineId, backend: &mut B, batch: DrawBatch<'_>) {
        match batch.mode {
            // Single quad per batch; further vertices are not indexed.
            DrawMode::Quads => {
                backend.set_index_buffer(QUAD_INDICES.to_vec());
                backend.draw_indexed(QUAD_INDICES.len() as u32);
                self.stats.indexed_draws += 1;
            }
            DrawMode::Triangles => {
                backend.draw(batch.vertex_count);
                self.stats.direct_draws += 1;
            }
            other => {
                self.stats.unsupported_mode += 1;
                self.report(
                    DropReason::Mode,
                    format_args!("no draw for {} batch: unsupported mode {other:?}", pipeline.label()),
                );
            }
        }
    }

    fn report(&mut self, reason: DropReason, message: std::fmt::Arguments<'_>) {
        match self.config.drop_reporting {
            DropReporting::Silent => {}
            DropReporting::Every => log::warn!("{message}"),
            DropReporting::WarnOnce => {
                let warned = &mut self.warned[reason as usize];
                if *warned {
                    log::debug!("{message}");
                } else {
                    *warned = true;
                    log::warn!("{message} (further occurrences logged at debug level)");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BindGroupHandle;
    use crate::format::VertexElement;
    use crate::host::RenderState;
    use crate::matrix::RowMajorMatrix;
    use crate::testing::{BackendCall, RecordingBackend};

    fn projection() -> RowMajorMatrix {
        RowMajorMatrix::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ])
    }

    fn host() -> RenderState {
        RenderState::new(projection())
    }

    fn textured_host() -> RenderState {
        let mut host = host();
        host.textures.activate(1).unwrap();
        host.textures.bind(Some(BindGroupHandle(42)));
        host
    }

    fn batch<'a>(bytes: &'a [u8], format: &'a VertexFormat, mode: DrawMode, vertices: u32) -> DrawBatch<'a> {
        DrawBatch {
            vertex_bytes: bytes,
            format,
            mode,
            primitive_count: vertices,
            vertex_count: vertices,
        }
    }

    fn run(host: &RenderState, batch: DrawBatch<'_>) -> (Vec<BackendCall>, DrawStats) {
        let mut translator = DrawTranslator::default();
        let mut backend = RecordingBackend::default();
        translator.submit(host, &mut backend, batch);
        (backend.calls, translator.stats())
    }

    // ── pipeline selection ────────────────────────────────────────────────

    #[test]
    fn packed_color_triangles_issue_full_sequence() {
        let format = VertexFormat::position_color();
        let bytes = vec![0xAB; 48];
        let (calls, stats) = run(&host(), batch(&bytes, &format, DrawMode::Triangles, 3));

        assert_eq!(
            calls,
            vec![
                BackendCall::UsePipeline(PipelineId::PositionColor),
                BackendCall::SetProjection(to_column_major(&projection())),
                BackendCall::SetVertexBuffer(bytes.clone()),
                BackendCall::Draw(3),
            ]
        );
        assert_eq!(stats.submitted, 1);
        assert_eq!(stats.direct_draws, 1);
    }

    #[test]
    fn float_color_uses_expanded_pipeline() {
        let format = VertexFormat::position_color_float();
        let (calls, _) = run(&host(), batch(&[0; 84], &format, DrawMode::Triangles, 3));
        assert_eq!(calls[0], BackendCall::UsePipeline(PipelineId::PositionColorFloat));
        assert!(!calls.iter().any(|c| matches!(c, BackendCall::AttachTexture(_))));
    }

    #[test]
    fn textured_batch_attaches_active_texture_before_drawing() {
        let format = VertexFormat::position_texture();
        let (calls, _) = run(&textured_host(), batch(&[0; 80], &format, DrawMode::Quads, 4));

        assert_eq!(calls[0], BackendCall::UsePipeline(PipelineId::PositionTexture));
        assert_eq!(calls[1], BackendCall::AttachTexture(BindGroupHandle(42)));

        let attach = calls.iter().position(|c| matches!(c, BackendCall::AttachTexture(_)));
        let draw = calls.iter().position(|c| matches!(c, BackendCall::DrawIndexed(_)));
        assert!(attach.unwrap() < draw.unwrap());
    }

    #[test]
    fn textured_batch_without_texture_is_dropped() {
        let format = VertexFormat::position_texture();
        let (calls, stats) = run(&host(), batch(&[0; 80], &format, DrawMode::Quads, 4));
        assert!(calls.is_empty());
        assert_eq!(stats.missing_texture, 1);
        assert_eq!(stats.submitted, 0);
    }

    #[test]
    fn unsupported_layout_makes_no_backend_calls() {
        let format = VertexFormat::new([VertexElement::POSITION, VertexElement::COLOR, VertexElement::UV0]);
        let (calls, stats) = run(&textured_host(), batch(&[0; 96], &format, DrawMode::Quads, 4));
        assert!(calls.is_empty());
        assert_eq!(stats.unsupported_layout, 1);
        assert_eq!(stats.dropped(), 1);
    }

    // ── topology lowering ─────────────────────────────────────────────────

    #[test]
    fn quads_always_emit_one_quad_of_indices() {
        let format = VertexFormat::position_color();
        for vertices in [0, 4, 8, 400] {
            let bytes = vec![0; vertices as usize * 16];
            let (calls, stats) = run(&host(), batch(&bytes, &format, DrawMode::Quads, vertices));
            assert_eq!(
                &calls[3..],
                &[
                    BackendCall::SetIndexBuffer(vec![0, 1, 3, 1, 2, 3]),
                    BackendCall::DrawIndexed(6),
                ]
            );
            assert_eq!(stats.indexed_draws, 1);
        }
    }

    #[test]
    fn triangles_draw_exactly_vertex_count() {
        let format = VertexFormat::position_color();
        let (calls, _) = run(&host(), batch(&[0; 16 * 9], &format, DrawMode::Triangles, 9));
        assert_eq!(calls.last(), Some(&BackendCall::Draw(9)));
        assert!(!calls.iter().any(|c| matches!(c, BackendCall::SetIndexBuffer(_))));
    }

    #[test]
    fn other_modes_issue_no_draw() {
        let format = VertexFormat::position_color();
        for mode in [
            DrawMode::Lines,
            DrawMode::LineStrip,
            DrawMode::DebugLines,
            DrawMode::DebugLineStrip,
            DrawMode::TriangleStrip,
            DrawMode::TriangleFan,
        ] {
            let (calls, stats) = run(&host(), batch(&[0; 64], &format, mode, 4));
            assert!(
                !calls
                    .iter()
                    .any(|c| matches!(c, BackendCall::Draw(_) | BackendCall::DrawIndexed(_))),
                "{mode:?} must not draw"
            );
            assert_eq!(stats.unsupported_mode, 1);
        }
    }

    // ── buffers ───────────────────────────────────────────────────────────

    #[test]
    fn vertex_buffer_is_forwarded_byte_for_byte() {
        let format = VertexFormat::position_color();
        // Deliberately not a multiple of the stride: nothing is padded or cut.
        let bytes: Vec<u8> = (0..=50).collect();
        let (calls, _) = run(&host(), batch(&bytes, &format, DrawMode::Triangles, 3));
        let forwarded = calls.iter().find_map(|c| match c {
            BackendCall::SetVertexBuffer(b) => Some(b.clone()),
            _ => None,
        });
        assert_eq!(forwarded, Some(bytes));
    }

    #[test]
    fn every_call_resends_matrix_and_vertices() {
        let format = VertexFormat::position_color();
        let host = host();
        let mut translator = DrawTranslator::default();
        let mut backend = RecordingBackend::default();
        for _ in 0..3 {
            translator.submit(&host, &mut backend, batch(&[1; 48], &format, DrawMode::Triangles, 3));
        }
        let count = |pred: fn(&BackendCall) -> bool| backend.calls.iter().filter(|c| pred(c)).count();
        assert_eq!(count(|c| matches!(c, BackendCall::UsePipeline(_))), 3);
        assert_eq!(count(|c| matches!(c, BackendCall::SetProjection(_))), 3);
        assert_eq!(count(|c| matches!(c, BackendCall::SetVertexBuffer(_))), 3);
        assert_eq!(translator.stats().submitted, 3);
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    #[test]
    fn stats_accumulate_and_reset() {
        let mut translator = DrawTranslator::new(TranslatorConfig {
            drop_reporting: DropReporting::Silent,
        });
        let mut backend = RecordingBackend::default();
        let host = host();
        let good = VertexFormat::position_color();
        let bad = VertexFormat::new([VertexElement::POSITION]);

        translator.submit(&host, &mut backend, batch(&[0; 64], &good, DrawMode::Quads, 4));
        translator.submit(&host, &mut backend, batch(&[0; 48], &good, DrawMode::Triangles, 3));
        translator.submit(&host, &mut backend, batch(&[0; 48], &good, DrawMode::Lines, 2));
        translator.submit(&host, &mut backend, batch(&[0; 12], &bad, DrawMode::Triangles, 1));

        let stats = translator.stats();
        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.indexed_draws, 1);
        assert_eq!(stats.direct_draws, 1);
        assert_eq!(stats.unsupported_mode, 1);
        assert_eq!(stats.unsupported_layout, 1);
        assert_eq!(stats.dropped(), 2);

        translator.reset_stats();
        assert_eq!(translator.stats(), DrawStats::default());
    }

    #[test]
    fn short_uv_batch_is_forwarded_but_flagged() {
        let short_uv = VertexFormat::new([VertexElement::POSITION, VertexElement::UV1]);
        let bytes = vec![0; 4 * 16];
        let (calls, stats) = run(&textured_host(), batch(&bytes, &short_uv, DrawMode::Quads, 4));

        assert_eq!(calls[0], BackendCall::UsePipeline(PipelineId::PositionTexture));
        assert_eq!(calls.last(), Some(&BackendCall::DrawIndexed(6)));
        assert_eq!(stats.submitted, 1);
        assert_eq!(stats.stride_mismatch, 1);
        assert_eq!(stats.dropped(), 0);

        let canonical = VertexFormat::position_texture();
        let (_, stats) = run(&textured_host(), batch(&[0; 80], &canonical, DrawMode::Quads, 4));
        assert_eq!(stats.stride_mismatch, 0);
    }

    /// One batch per drop reason: layout, mode, then texture.
    fn drop_each_reason(translator: &mut DrawTranslator) {
        let mut backend = RecordingBackend::default();
        let untextured = host();
        let position_only = VertexFormat::new([VertexElement::POSITION]);
        let color = VertexFormat::position_color();
        let textured = VertexFormat::position_texture();

        translator.submit(&untextured, &mut backend, batch(&[0; 36], &position_only, DrawMode::Triangles, 3));
        translator.submit(&untextured, &mut backend, batch(&[0; 32], &color, DrawMode::Lines, 2));
        translator.submit(&untextured, &mut backend, batch(&[0; 80], &textured, DrawMode::Quads, 4));
    }

    #[test]
    fn warn_once_flags_each_reason_on_first_drop() {
        let mut translator = DrawTranslator::default();
        assert_eq!(translator.config.drop_reporting, DropReporting::WarnOnce);
        assert_eq!(translator.warned, [false; 3]);

        let mut backend = RecordingBackend::default();
        let position_only = VertexFormat::new([VertexElement::POSITION]);
        translator.submit(&host(), &mut backend, batch(&[0; 36], &position_only, DrawMode::Triangles, 3));
        assert_eq!(translator.warned, [true, false, false]);

        for _ in 0..3 {
            drop_each_reason(&mut translator);
        }
        assert_eq!(translator.warned, [true; 3]);

        let stats = translator.stats();
        assert_eq!(stats.unsupported_layout, 4);
        assert_eq!(stats.unsupported_mode, 3);
        assert_eq!(stats.missing_texture, 3);
    }

    #[test]
    fn silent_and_every_never_set_warn_flags() {
        for drop_reporting in [DropReporting::Silent, DropReporting::Every] {
            let mut translator = DrawTranslator::new(TranslatorConfig { drop_reporting });
            for _ in 0..3 {
                drop_each_reason(&mut translator);
            }
            assert_eq!(translator.warned, [false; 3], "{drop_reporting:?}");
            assert_eq!(translator.stats().dropped(), 9, "{drop_reporting:?}");
        }
    }
}
