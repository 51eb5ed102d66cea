use std::fmt;

use crate::format::DataType;

/// Why a vertex layout has no matching pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UnsupportedLayout {
    /// `position + color`, but the color is neither ubyte nor float.
    ColorType(DataType),
    /// The element sequence matches none of the known layouts.
    Shape { elements: usize },
}

impl fmt::Display for UnsupportedLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedLayout::ColorType(ty) => {
                write!(f, "unsupported color data type {ty:?} in position+color layout")
            }
            UnsupportedLayout::Shape { elements } => {
                write!(f, "no pipeline for a {elements}-element vertex layout")
            }
        }
    }
}

impl std::error::Error for UnsupportedLayout {}

/// Invalid texture slot operation on [`crate::TextureSlots`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureSlotError {
    pub slot: usize,
    pub max: usize,
}

impl fmt::Display for TextureSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture slot {} out of range (max {})", self.slot, self.max)
    }
}

impl std::error::Error for TextureSlotError {}
