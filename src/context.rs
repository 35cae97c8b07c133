//! Pipeline state threaded explicitly through the render calls
//!
//! One `RenderContext` owns the render target (with its depth buffer), the
//! current viewpoint and the viewpoint stack for nested sub-views. The caller
//! passes the destination `Framebuffer` into each draw call, so the pipeline
//! has exclusive access to both buffers for the duration of a call.

use crate::error::RenderError;
use crate::math::Mat4;
use crate::target::RenderTarget;
use crate::types::{ColumnClip, CullMode, RenderMode, RenderOptions};
use crate::viewpoint::{CameraPose, Viewpoint};
use log::{debug, trace};
use std::ops::{Deref, DerefMut};

/// Base field of view before the split-screen adjustment, degrees.
const BASE_FOV: f32 = 90.0 - 48.0 / 1.7;
/// Split-screen divides the fov (and doubles the aspect) by this.
const SPLIT_DEN: f32 = 1.7;
/// The projection matrix uses its own tiny near distance; near-plane
/// rejection and clipping use `RenderTarget::near_plane` instead.
const PROJECTION_NEAR: f32 = 0.1;

pub struct RenderContext {
    pub target: RenderTarget,
    pub options: RenderOptions,
    pub(crate) viewpoint: Option<Viewpoint>,
    pub(crate) view_projection: Option<Mat4>,
    pub(crate) y_shear: i32,
    pub(crate) column_clip: Option<ColumnClip>,
    projection: Mat4,
    saved: Vec<CameraPose>,
}

impl RenderContext {
    pub fn new(width: i32, height: i32) -> Self {
        let options = RenderOptions::default();
        let (aspect, fov) = viewport_params(width, height, options.split_screen);
        let mut ctx = Self {
            target: RenderTarget::new(width, height, aspect, fov),
            options,
            viewpoint: None,
            view_projection: None,
            y_shear: 0,
            column_clip: None,
            projection: Mat4::identity(),
            saved: Vec::new(),
        };
        ctx.rebuild_projection();
        ctx
    }

    /// Resize the render target. Reallocates the depth buffer, resets the
    /// mode flags and cull mode, and rebuilds the projection matrix. Must run
    /// before any draw call after a resolution change.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        let (aspect, fov) = viewport_params(width, height, self.options.split_screen);
        debug!("viewport {width}x{height}, aspect {aspect:.3}, fov {fov:.1}");
        self.target = RenderTarget::new(width, height, aspect, fov);
        self.rebuild_projection();
        // the old matrix no longer matches the target
        if let Some(vp) = self.viewpoint {
            self.apply_viewpoint(Viewpoint::from_pose(vp.pose, self.projection));
        }
    }

    fn rebuild_projection(&mut self) {
        self.projection = Mat4::perspective(
            self.target.fov.to_radians(),
            self.target.aspect_ratio,
            PROJECTION_NEAR,
            self.target.far_plane,
        );
    }

    /// Start a frame: build the view matrix from the camera pose, combine it
    /// with the projection, and clear the depth buffer. Every transform until
    /// the next `begin_frame` uses the resulting matrix.
    pub fn begin_frame(&mut self, pose: CameraPose) {
        trace!("begin_frame at ({}, {}, {}), yaw {}", pose.x, pose.y, pose.z, pose.yaw);
        self.apply_viewpoint(Viewpoint::from_pose(pose, self.projection));
        self.target.clear_depth();
    }

    /// Swap in another viewpoint mid-frame without clearing the depth buffer.
    /// Used for sprite-local portal sub-views.
    pub fn set_viewpoint(&mut self, pose: CameraPose) {
        self.apply_viewpoint(Viewpoint::from_pose(pose, self.projection));
    }

    fn apply_viewpoint(&mut self, vp: Viewpoint) {
        self.view_projection = Some(vp.view_projection());
        self.y_shear = vp.pose.y_shear;
        self.viewpoint = Some(vp);
    }

    /// Push the current camera pose for a nested sub-view. Pairs with
    /// `restore_viewpoint`; nesting must be strict.
    pub fn store_viewpoint(&mut self) -> Result<(), RenderError> {
        let vp = self.viewpoint.as_ref().ok_or(RenderError::NoActiveFrame)?;
        trace!("store viewpoint (depth {})", self.saved.len() + 1);
        self.saved.push(vp.pose);
        Ok(())
    }

    /// Pop and reinstate the most recently stored viewpoint.
    pub fn restore_viewpoint(&mut self) -> Result<(), RenderError> {
        let pose = self.saved.pop().ok_or(RenderError::UnbalancedRestore)?;
        trace!("restore viewpoint (depth {})", self.saved.len());
        self.set_viewpoint(pose);
        Ok(())
    }

    /// Scoped sub-view: stores the current viewpoint, swaps in `pose`, and
    /// restores on drop, including on early-return paths.
    pub fn sub_view(&mut self, pose: CameraPose) -> Result<SubView<'_>, RenderError> {
        self.store_viewpoint()?;
        self.set_viewpoint(pose);
        Ok(SubView { ctx: self })
    }

    /// Reset the depth buffer mid-frame, for sub-view boundaries.
    pub fn clear_depth(&mut self) {
        self.target.clear_depth();
    }

    /// Install or remove per-column vertical clip ranges.
    pub fn set_column_clip(&mut self, clip: Option<ColumnClip>) {
        self.column_clip = clip;
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.target.cull_mode = mode;
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.target.mode = mode;
    }

    pub fn viewpoint(&self) -> Option<&Viewpoint> {
        self.viewpoint.as_ref()
    }
}

fn viewport_params(width: i32, height: i32, split_screen: bool) -> (f32, f32) {
    let mut fov = BASE_FOV;
    let mut aspect = width as f32 / height as f32;
    if split_screen {
        fov /= SPLIT_DEN;
        aspect *= 2.0;
    }
    (aspect, fov)
}

/// Guard returned by [`RenderContext::sub_view`]. Derefs to the context;
/// restores the stored viewpoint when dropped.
pub struct SubView<'a> {
    ctx: &'a mut RenderContext,
}

impl Deref for SubView<'_> {
    type Target = RenderContext;
    fn deref(&self) -> &RenderContext {
        self.ctx
    }
}

impl DerefMut for SubView<'_> {
    fn deref_mut(&mut self) -> &mut RenderContext {
        self.ctx
    }
}

impl Drop for SubView<'_> {
    fn drop(&mut self) {
        // the guard pushed exactly one pose, so the pop cannot fail
        let _ = self.ctx.restore_viewpoint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_reallocates_depth_buffer() {
        let mut ctx = RenderContext::new(8, 8);
        ctx.set_viewport(4, 4);
        assert_eq!(ctx.target.width, 4);
        assert_eq!(ctx.target.depth_len(), 16);
    }

    #[test]
    fn split_screen_narrows_fov_and_doubles_aspect() {
        let (aspect, fov) = viewport_params(320, 200, false);
        let (split_aspect, split_fov) = viewport_params(320, 200, true);
        assert!((split_fov - fov / 1.7).abs() < 1e-4);
        assert!((split_aspect - aspect * 2.0).abs() < 1e-4);
    }

    #[test]
    fn restore_without_store_is_an_error() {
        let mut ctx = RenderContext::new(4, 4);
        ctx.begin_frame(CameraPose::default());
        assert_eq!(ctx.restore_viewpoint(), Err(RenderError::UnbalancedRestore));
    }

    #[test]
    fn store_requires_an_active_frame() {
        let mut ctx = RenderContext::new(4, 4);
        assert_eq!(ctx.store_viewpoint(), Err(RenderError::NoActiveFrame));
    }

    #[test]
    fn sub_view_restores_on_drop() {
        let mut ctx = RenderContext::new(4, 4);
        let outer = CameraPose { x: 1.0, ..Default::default() };
        let inner = CameraPose { x: 9.0, y_shear: 3, ..Default::default() };
        ctx.begin_frame(outer);
        {
            let sub = ctx.sub_view(inner).unwrap();
            assert_eq!(sub.viewpoint().unwrap().pose, inner);
            assert_eq!(sub.y_shear, 3);
        }
        assert_eq!(ctx.viewpoint().unwrap().pose, outer);
        assert_eq!(ctx.y_shear, 0);
    }
}
