//! Render target: dimensions, projection parameters and the depth buffer

use crate::math::Fixed;
use crate::types::{CullMode, RenderMode};

/// Near plane distance used for clipping and frustum rejection.
pub const NEAR_PLANE: f32 = 16.0;
/// Far plane distance.
pub const FAR_PLANE: f32 = 32768.0;

/// The surface-independent half of the pipeline's output state: everything
/// but the color pixels themselves.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub width: i32,
    pub height: i32,
    pub aspect_ratio: f32,
    /// Field of view, degrees.
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub mode: RenderMode,
    pub cull_mode: CullMode,
    depth: Vec<Fixed>,
}

impl RenderTarget {
    pub(crate) fn new(width: i32, height: i32, aspect_ratio: f32, fov: f32) -> Self {
        Self {
            width,
            height,
            aspect_ratio,
            fov,
            near_plane: NEAR_PLANE,
            far_plane: FAR_PLANE,
            mode: RenderMode::COLOR | RenderMode::DEPTH,
            cull_mode: CullMode::Front,
            depth: vec![Fixed::ZERO; (width * height) as usize],
        }
    }

    /// Reset every depth entry to the clear value (0 = infinitely far, since
    /// the buffer stores inverse depth).
    pub fn clear_depth(&mut self) {
        self.depth.fill(Fixed::ZERO);
    }

    /// Stored inverse depth at a pixel. Larger means nearer.
    pub fn depth_at(&self, x: i32, y: i32) -> Fixed {
        self.depth[(y * self.width + x) as usize]
    }

    pub(crate) fn depth_entry(&mut self, x: i32, y: i32) -> &mut Fixed {
        &mut self.depth[(y * self.width + x) as usize]
    }

    /// True when the target writes depth but not color.
    pub(crate) fn depth_only(&self) -> bool {
        self.mode & (RenderMode::COLOR | RenderMode::DEPTH) == RenderMode::DEPTH
    }

    #[cfg(test)]
    pub(crate) fn depth_len(&self) -> usize {
        self.depth.len()
    }
}
