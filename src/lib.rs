//! Paletted software 3D triangle rasterizer
//!
//! Renders textured triangles into a one-byte-per-pixel framebuffer with a
//! separate 16.16 fixed-point depth buffer, the way a classic 2.5D engine
//! draws its models:
//! - view/projection transform, backface culling, optional near-plane clipping
//! - flat-top/flat-bottom decomposition with perspective-correct UVs
//! - two interchangeable scanline back-ends (fixed-point and floating-point)
//! - palette-index pixel output with translation, colormap and translucency
//!   table stages
//!
//! The crate only rasterizes. Model loading, palette generation and the video
//! surface that finally displays the framebuffer are the caller's business.

pub mod math;
pub mod types;

mod clip;
mod context;
mod error;
mod framebuffer;
mod pixel;
mod raster;
mod span;
mod target;
mod viewpoint;

pub use context::{RenderContext, SubView};
pub use error::RenderError;
pub use framebuffer::Framebuffer;
pub use target::RenderTarget;
pub use types::{
    ColumnClip, Colormap, CullMode, RasterBackend, RenderMode, RenderOptions, Texture,
    TranslationTable, TranslucencyTable, Triangle, Vertex, TRANSPARENT_INDEX,
};
pub use viewpoint::{CameraPose, Viewpoint};
