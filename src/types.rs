//! Core pipeline types: vertices, triangles, textures and lookup tables

use crate::error::RenderError;
use crate::math::{Vec2, Vec4};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Palette index reserved for "fully transparent, do not draw".
pub const TRANSPARENT_INDEX: u8 = 255;

bitflags! {
    /// What the pipeline writes per pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderMode: u8 {
        const COLOR = 1;
        const DEPTH = 2;
    }
}

/// Which transformed-space facing gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Numeric representation the scanline mapper runs on. Both back-ends produce
/// visually equivalent output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterBackend {
    Fixed,
    Float,
}

/// Which half of a decomposed triangle a scanline pass fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleHalf {
    FlatTop,
    FlatBottom,
}

/// Per-context rasterization options.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderOptions {
    pub backend: RasterBackend,
    /// Clip triangles against the near plane instead of rejecting them whole.
    pub near_clip: bool,
    /// Narrower field of view and doubled aspect for split-screen layouts.
    pub split_screen: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            backend: RasterBackend::Float,
            near_clip: false,
            split_screen: false,
        }
    }
}

/// One triangle vertex: homogeneous position plus UV in texel units
/// (`[0, texture width/height]`, not normalized).
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub position: Vec4,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec4, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// A triangle handed to the pipeline, with its texture and optional
/// per-triangle lookup tables.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    pub vertices: [Vertex; 3],
    pub texture: &'a Texture,
    pub translation: Option<&'a TranslationTable>,
    pub colormap: Option<&'a Colormap>,
    pub transmap: Option<&'a TranslucencyTable>,
    pub flipped: bool,
}

impl<'a> Triangle<'a> {
    pub fn new(vertices: [Vertex; 3], texture: &'a Texture) -> Self {
        Self {
            vertices,
            texture,
            translation: None,
            colormap: None,
            transmap: None,
            flipped: false,
        }
    }

    pub fn with_translation(mut self, translation: &'a TranslationTable) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn with_colormap(mut self, colormap: &'a Colormap) -> Self {
        self.colormap = Some(colormap);
        self
    }

    pub fn with_transmap(mut self, transmap: &'a TranslucencyTable) -> Self {
        self.transmap = Some(transmap);
        self
    }

    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }
}

/// Paletted texture: one palette index per texel.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    data: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, RenderError> {
        if data.len() != (width * height) as usize {
            return Err(RenderError::TextureSize {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Sample with modulo wrapping in both axes.
    pub fn texel(&self, u: u16, v: u16) -> u8 {
        let u = (u as u32 % self.width) as usize;
        let v = (v as u32 % self.height) as usize;
        self.data[v * self.width as usize + u]
    }
}

/// Palette recoloring remap, applied before the colormap.
#[derive(Debug, Clone)]
pub struct TranslationTable(pub [u8; 256]);

impl TranslationTable {
    pub fn apply(&self, pixel: u8) -> u8 {
        self.0[pixel as usize]
    }
}

/// Light/fog tint remap, applied after the translation table.
#[derive(Debug, Clone)]
pub struct Colormap(pub [u8; 256]);

impl Colormap {
    pub fn apply(&self, pixel: u8) -> u8 {
        self.0[pixel as usize]
    }
}

/// Precomputed blend of (source, destination) palette index pairs,
/// substituting for alpha blending in a paletted color system.
#[derive(Clone)]
pub struct TranslucencyTable(Box<[u8; 65536]>);

impl TranslucencyTable {
    pub fn new(table: Box<[u8; 65536]>) -> Self {
        Self(table)
    }

    pub fn blend(&self, source: u8, destination: u8) -> u8 {
        self.0[((source as usize) << 8) | destination as usize]
    }
}

impl std::fmt::Debug for TranslucencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TranslucencyTable(..)")
    }
}

/// Per-column vertical clip ranges supplied by the scene layer. A pixel at
/// column `x` is kept only when `ceiling[x] < y < floor[x]`, and columns at or
/// beyond `view_width` end the scanline. Columns past the end of the arrays
/// are unclipped.
#[derive(Debug, Clone)]
pub struct ColumnClip {
    pub ceiling: Vec<i16>,
    pub floor: Vec<i16>,
    pub view_width: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_rejects_mismatched_data() {
        let err = Texture::new(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, RenderError::TextureSize { actual: 15, .. }));
    }

    #[test]
    fn texel_wraps_both_axes() {
        let tex = Texture::new(2, 2, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(tex.texel(0, 0), 10);
        assert_eq!(tex.texel(3, 0), 20);
        assert_eq!(tex.texel(0, 5), 30);
        assert_eq!(tex.texel(65535, 0), 20);
    }

    #[test]
    fn translucency_indexing() {
        let mut table = Box::new([0u8; 65536]);
        table[(7 << 8) | 3] = 99;
        let t = TranslucencyTable::new(table);
        assert_eq!(t.blend(7, 3), 99);
        assert_eq!(t.blend(3, 7), 0);
    }
}
