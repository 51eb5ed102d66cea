//! Vertex layout descriptors and draw modes as declared by the host.

/// Scalar type of a single vertex element component.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DataType {
    Float,
    UByte,
    Byte,
    UShort,
    Short,
    UInt,
    Int,
}

impl DataType {
    /// Size of one component in bytes.
    pub const fn size(self) -> u32 {
        match self {
            DataType::UByte | DataType::Byte => 1,
            DataType::UShort | DataType::Short => 2,
            DataType::Float | DataType::UInt | DataType::Int => 4,
        }
    }
}

/// Semantic role of a vertex element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementUsage {
    Position,
    Normal,
    Color,
    Uv,
    Padding,
    Generic,
}

/// One attribute inside a vertex: role, component type and component count.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexElement {
    pub usage: ElementUsage,
    pub data_type: DataType,
    pub count: u8,
}

impl VertexElement {
    pub const POSITION: Self = Self::new(ElementUsage::Position, DataType::Float, 3);
    pub const COLOR: Self = Self::new(ElementUsage::Color, DataType::UByte, 4);
    pub const COLOR_FLOAT: Self = Self::new(ElementUsage::Color, DataType::Float, 4);
    pub const UV0: Self = Self::new(ElementUsage::Uv, DataType::Float, 2);
    pub const UV1: Self = Self::new(ElementUsage::Uv, DataType::Short, 2);
    pub const NORMAL: Self = Self::new(ElementUsage::Normal, DataType::Byte, 3);
    pub const PADDING: Self = Self::new(ElementUsage::Padding, DataType::Byte, 1);

    pub const fn new(usage: ElementUsage, data_type: DataType, count: u8) -> Self {
        Self { usage, data_type, count }
    }

    /// Size of the whole element in bytes.
    pub const fn size(&self) -> u32 {
        self.data_type.size() * self.count as u32
    }
}

/// Ordered per-vertex attribute list describing a raw vertex byte stream.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
}

impl VertexFormat {
    pub fn new(elements: impl Into<Vec<VertexElement>>) -> Self {
        Self { elements: elements.into() }
    }

    /// `position(float3) + color(ubyte4)`: the packed vertex-color layout.
    pub fn position_color() -> Self {
        Self::new([VertexElement::POSITION, VertexElement::COLOR])
    }

    /// `position(float3) + color(float4)`: the expanded vertex-color layout.
    pub fn position_color_float() -> Self {
        Self::new([VertexElement::POSITION, VertexElement::COLOR_FLOAT])
    }

    /// `position(float3) + uv(float2)`: the textured layout.
    pub fn position_texture() -> Self {
        Self::new([VertexElement::POSITION, VertexElement::UV0])
    }

    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Byte stride of one vertex.
    pub fn vertex_size(&self) -> u32 {
        self.elements.iter().map(VertexElement::size).sum()
    }

    /// Byte offset of each element inside a vertex, in declaration order.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.elements.iter().scan(0u32, |acc, e| {
            let at = *acc;
            *acc += e.size();
            Some(at)
        })
    }
}

/// Primitive topology requested by the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Lines,
    LineStrip,
    DebugLines,
    DebugLineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}
