//! Vertex layout → pipeline classification.

use crate::error::UnsupportedLayout;
use crate::format::{DataType, ElementUsage, VertexFormat};

/// Pipelines known to the bridge. Discriminants are the ids the backend
/// registers its pipelines under.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum PipelineId {
    /// Vertex color, packed as four unsigned bytes.
    PositionColor = 0,
    /// Textured, sampled from the active texture's bind group.
    PositionTexture = 1,
    /// Vertex color, four floats.
    PositionColorFloat = 2,
}

impl PipelineId {
    pub const ALL: [PipelineId; 3] = [
        PipelineId::PositionColor,
        PipelineId::PositionTexture,
        PipelineId::PositionColorFloat,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether draws on this pipeline need a texture bind group attached.
    pub const fn requires_texture(self) -> bool {
        matches!(self, PipelineId::PositionTexture)
    }

    /// Canonical vertex format the pipeline's vertex stage consumes.
    pub fn vertex_format(self) -> VertexFormat {
        match self {
            PipelineId::PositionColor => VertexFormat::position_color(),
            PipelineId::PositionTexture => VertexFormat::position_texture(),
            PipelineId::PositionColorFloat => VertexFormat::position_color_float(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PipelineId::PositionColor => "position_color",
            PipelineId::PositionTexture => "position_texture",
            PipelineId::PositionColorFloat => "position_color_float",
        }
    }
}

/// Picks the pipeline for `format`. First match wins:
///
/// 1. `position, color`: ubyte color → [`PipelineId::PositionColor`],
///    float color → [`PipelineId::PositionColorFloat`], anything else is unsupported.
/// 2. `position, uv` → [`PipelineId::PositionTexture`].
/// 3. Everything else is unsupported.
pub fn classify(format: &VertexFormat) -> Result<PipelineId, UnsupportedLayout> {
    let shape = match format.elements() {
        [position, second] if position.usage == ElementUsage::Position => Some(second),
        _ => None,
    };

    match shape {
        Some(color) if color.usage == ElementUsage::Color => match color.data_type {
            DataType::UByte => Ok(PipelineId::PositionColor),
            DataType::Float => Ok(PipelineId::PositionColorFloat),
            other => Err(UnsupportedLayout::ColorType(other)),
        },
        Some(uv) if uv.usage == ElementUsage::Uv => Ok(PipelineId::PositionTexture),
        _ => Err(UnsupportedLayout::Shape {
            elements: format.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::VertexElement;

    fn fmt(elements: &[VertexElement]) -> VertexFormat {
        VertexFormat::new(elements.to_vec())
    }

    // ── supported shapes ──────────────────────────────────────────────────

    #[test]
    fn ubyte_color_selects_packed_color_pipeline() {
        assert_eq!(classify(&VertexFormat::position_color()), Ok(PipelineId::PositionColor));
    }

    #[test]
    fn float_color_selects_expanded_color_pipeline() {
        assert_eq!(
            classify(&VertexFormat::position_color_float()),
            Ok(PipelineId::PositionColorFloat)
        );
    }

    #[test]
    fn uv_selects_textured_pipeline() {
        let id = classify(&VertexFormat::position_texture()).unwrap();
        assert_eq!(id, PipelineId::PositionTexture);
        assert!(id.requires_texture());
    }

    #[test]
    fn classification_ignores_component_counts() {
        // Structural identity only looks at role, position and color type.
        let pos2 = VertexElement::new(ElementUsage::Position, DataType::Float, 2);
        let rgb = VertexElement::new(ElementUsage::Color, DataType::UByte, 3);
        assert_eq!(classify(&fmt(&[pos2, rgb])), Ok(PipelineId::PositionColor));

        let short_uv = VertexElement::UV1;
        assert_eq!(
            classify(&fmt(&[VertexElement::POSITION, short_uv])),
            Ok(PipelineId::PositionTexture)
        );
    }

    // ── unsupported ───────────────────────────────────────────────────────

    #[test]
    fn other_color_types_are_unsupported() {
        for ty in [DataType::Byte, DataType::UShort, DataType::Short, DataType::UInt, DataType::Int] {
            let color = VertexElement::new(ElementUsage::Color, ty, 4);
            assert_eq!(
                classify(&fmt(&[VertexElement::POSITION, color])),
                Err(UnsupportedLayout::ColorType(ty))
            );
        }
    }

    #[test]
    fn three_element_layouts_are_unsupported() {
        let format = fmt(&[VertexElement::POSITION, VertexElement::COLOR, VertexElement::UV0]);
        assert_eq!(classify(&format), Err(UnsupportedLayout::Shape { elements: 3 }));
    }

    #[test]
    fn swapped_order_is_unsupported() {
        let format = fmt(&[VertexElement::COLOR, VertexElement::POSITION]);
        assert_eq!(classify(&format), Err(UnsupportedLayout::Shape { elements: 2 }));

        let format = fmt(&[VertexElement::UV0, VertexElement::POSITION]);
        assert!(classify(&format).is_err());
    }

    #[test]
    fn position_only_and_empty_are_unsupported() {
        assert!(classify(&fmt(&[VertexElement::POSITION])).is_err());
        assert_eq!(
            classify(&VertexFormat::new(Vec::new())),
            Err(UnsupportedLayout::Shape { elements: 0 })
        );
    }

    #[test]
    fn position_normal_is_unsupported() {
        let format = fmt(&[VertexElement::POSITION, VertexElement::NORMAL]);
        assert!(classify(&format).is_err());
    }

    // ── ids ───────────────────────────────────────────────────────────────

    #[test]
    fn ids_round_trip_through_index() {
        for id in PipelineId::ALL {
            assert_eq!(PipelineId::from_index(id.index()), Some(id));
        }
        assert_eq!(PipelineId::from_index(3), None);
    }

    #[test]
    fn canonical_formats_classify_to_their_own_id() {
        for id in PipelineId::ALL {
            assert_eq!(classify(&id.vertex_format()), Ok(id));
        }
    }
}
