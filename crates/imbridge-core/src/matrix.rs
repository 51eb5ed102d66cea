//! Projection matrix serialization.
//!
//! Backends expect a flat, column-major `[f32; 16]`: element `i` is
//! `column(i / 4)[i % 4]`. Hosts keep matrices in whatever order suits them,
//! so every host matrix type states how to write itself column-major.

/// A 4×4 matrix that can be written out in column-major order.
pub trait ColumnMajor {
    fn write_column_major(&self, out: &mut [f32; 16]);
}

/// Serializes `matrix` into the layout backends consume.
pub fn to_column_major<M: ColumnMajor + ?Sized>(matrix: &M) -> [f32; 16] {
    let mut out = [0.0; 16];
    matrix.write_column_major(&mut out);
    out
}

impl ColumnMajor for glam::Mat4 {
    fn write_column_major(&self, out: &mut [f32; 16]) {
        self.write_cols_to_slice(out);
    }
}

impl ColumnMajor for [f32; 16] {
    /// Already column-major.
    fn write_column_major(&self, out: &mut [f32; 16]) {
        *out = *self;
    }
}

/// Matrix stored row by row, `rows[r][c]`, the way fixed-function hosts
/// usually keep their `aRC` fields.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RowMajorMatrix {
    pub rows: [[f32; 4]; 4],
}

impl RowMajorMatrix {
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Orthographic projection with a `[0, 1]` depth range.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Self::from_rows([
            [2.0 / w, 0.0, 0.0, -(right + left) / w],
            [0.0, 2.0 / h, 0.0, -(top + bottom) / h],
            [0.0, 0.0, -1.0 / d, -near / d],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Default for RowMajorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColumnMajor for RowMajorMatrix {
    fn write_column_major(&self, out: &mut [f32; 16]) {
        for (r, row) in self.rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out[c * 4 + r] = *value;
            }
        }
    }
}

impl From<RowMajorMatrix> for glam::Mat4 {
    fn from(m: RowMajorMatrix) -> Self {
        glam::Mat4::from_cols_array(&to_column_major(&m))
    }
}
