//! Camera pose and the derived view/projection state

use crate::math::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// Scene-space camera pose. The scene uses x/y for the ground plane and z for
/// height; the pipeline maps this onto its own axes when the viewpoint is
/// built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Yaw in radians; zero looks along the pipeline's forward axis.
    pub yaw: f32,
    /// Vertical look offset in pixels, applied per scanline.
    pub y_shear: i32,
}

/// Camera state for one frame or sub-view: pose, basis vectors and the view
/// and projection matrices. Rebuilt by `begin_frame`, read-only while
/// triangles are drawn.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub pose: CameraPose,
    pub position: Vec4,
    pub target: Vec4,
    pub up: Vec4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Viewpoint {
    /// Build the viewpoint from a scene pose: the eye maps to pipeline space
    /// as (x, -z, -y) and the forward vector (0, 0, -1) is rotated about the
    /// up axis by `yaw`.
    pub fn from_pose(pose: CameraPose, projection: Mat4) -> Self {
        let position = Vec4::new(pose.x, -pose.z, -pose.y);
        let up = Vec4::new(0.0, 1.0, 0.0);
        let target = Vec4::new(0.0, 0.0, -1.0).rotate(pose.yaw, up.x, up.y, up.z);
        let view = Mat4::look_at(position, target, up);
        Self {
            pose,
            position,
            target,
            up,
            view,
            projection,
        }
    }

    /// Combined matrix every triangle of the frame is transformed by.
    pub fn view_projection(&self) -> Mat4 {
        self.view * self.projection
    }
}
