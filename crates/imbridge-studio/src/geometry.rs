//! Packs demo vertices the way a fixed-function host would: tightly, in
//! declaration order, native endian.

use imbridge_core::VertexFormat;

#[derive(Debug, Default)]
pub struct VertexWriter {
    bytes: Vec<u8>,
    vertices: u32,
}

impl VertexWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position + packed RGBA8 color.
    pub fn color(&mut self, pos: [f32; 3], rgba: [u8; 4]) -> &mut Self {
        self.position(pos);
        self.bytes.extend_from_slice(&rgba);
        self.vertices += 1;
        self
    }

    /// Position + float RGBA color.
    pub fn color_float(&mut self, pos: [f32; 3], rgba: [f32; 4]) -> &mut Self {
        self.position(pos);
        self.floats(&rgba);
        self.vertices += 1;
        self
    }

    /// Position + texture coordinate.
    pub fn textured(&mut self, pos: [f32; 3], uv: [f32; 2]) -> &mut Self {
        self.position(pos);
        self.floats(&uv);
        self.vertices += 1;
        self
    }

    /// Position + normal packed as three signed bytes.
    pub fn normal(&mut self, pos: [f32; 3], normal: [i8; 3]) -> &mut Self {
        self.position(pos);
        self.bytes.extend(normal.iter().map(|&n| n as u8));
        self.vertices += 1;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices
    }

    /// Whether the packed data matches `format`'s stride exactly.
    pub fn fits(&self, format: &VertexFormat) -> bool {
        self.bytes.len() == self.vertices as usize * format.vertex_size() as usize
    }

    fn position(&mut self, pos: [f32; 3]) {
        self.floats(&pos);
    }

    fn floats(&mut self, values: &[f32]) {
        for v in values {
            self.bytes.extend_from_slice(&v.to_ne_bytes());
        }
    }
}

/// `size x size` RGBA8 checkerboard with 1-texel cells.
pub fn checkerboard(size: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            pixels.extend_from_slice(if (x + y) % 2 == 0 { &a } else { &b });
        }
    }
    pixels
}
