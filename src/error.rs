//! Pipeline errors
//!
//! Almost everything in the pipeline fails silently (a degenerate or
//! off-screen triangle just draws nothing). These are the exceptions: contract
//! violations that mean the pipeline was driven out of order.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A triangle was transformed before `begin_frame` built the frame's
    /// view-projection matrix.
    #[error("no active frame; call begin_frame before transforming triangles")]
    NoActiveFrame,

    /// `restore_viewpoint` without a matching `store_viewpoint`.
    #[error("restore_viewpoint without a matching store_viewpoint")]
    UnbalancedRestore,

    /// Texture byte buffer does not match the declared dimensions.
    #[error("texture data length {actual} does not match {width}x{height}")]
    TextureSize { width: u32, height: u32, actual: usize },
}
