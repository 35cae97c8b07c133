//! Triangle transform, cull and screen-space decomposition
//!
//! `transform_triangle` is the pipeline entry: view-projection transform,
//! backface cull, optional near-plane clip. `draw_triangle` projects to
//! screen pixels, splits the triangle into flat-bottom/flat-top halves and
//! hands each to the configured scanline back-end.

use crate::clip::clip_near_plane;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::framebuffer::Framebuffer;
use crate::math::{lerp, Fixed};
use crate::span;
use crate::types::{CullMode, RasterBackend, Triangle, TriangleHalf, Vertex};

/// All three vertices sharing a screen x or y (at 16.16 granularity) make the
/// triangle degenerate.
fn is_degenerate(v0: &Vertex, v1: &Vertex, v2: &Vertex) -> bool {
    let x = [
        Fixed::from_f32(v0.position.x),
        Fixed::from_f32(v1.position.x),
        Fixed::from_f32(v2.position.x),
    ];
    let y = [
        Fixed::from_f32(v0.position.y),
        Fixed::from_f32(v1.position.y),
        Fixed::from_f32(v2.position.y),
    ];
    (x[0] == x[1] && x[0] == x[2]) || (y[0] == y[1] && y[0] == y[2])
}

fn behind_view_frustum(near_plane: f32, v0: &Vertex, v1: &Vertex, v2: &Vertex) -> bool {
    let near = near_plane / 2.0;
    if v0.position.z < near || v1.position.z < near || v2.position.z < near {
        return true;
    }
    if v0.position.z < 1.0 || v1.position.z < 1.0 || v2.position.z < 1.0 {
        return true;
    }
    // all beyond the far side of the frustum
    v0.position.z > v0.position.w && v1.position.z > v1.position.w && v2.position.z > v2.position.w
}

impl RenderContext {
    /// Transform a camera-relative triangle by the frame's view-projection
    /// matrix, cull, optionally clip against the near plane, and rasterize
    /// whatever survives. Culled, clipped-away and degenerate triangles
    /// silently produce no pixels.
    pub fn transform_triangle(
        &mut self,
        fb: &mut Framebuffer,
        tri: &Triangle,
    ) -> Result<(), RenderError> {
        let matrix = self.view_projection.ok_or(RenderError::NoActiveFrame)?;

        let mut transformed = *tri;
        for vertex in &mut transformed.vertices {
            vertex.position = matrix.transform(vertex.position);
        }

        if self.target.cull_mode != CullMode::None {
            let [v0, v1, v2] = &transformed.vertices;
            let d1 = v1.position - v0.position;
            let d2 = v2.position - v0.position;
            let normal = d1.cross(d2);
            let mut dot = -v0.position.dot(normal);
            if transformed.flipped {
                dot = -dot;
            }
            match self.target.cull_mode {
                CullMode::Back if dot >= 0.0 => return Ok(()),
                CullMode::Front if dot < 0.0 => return Ok(()),
                _ => {}
            }
        }

        if self.options.near_clip {
            for clipped in clip_near_plane(&transformed, self.target.near_plane) {
                self.draw_triangle(fb, &clipped);
            }
        } else {
            self.draw_triangle(fb, &transformed);
        }
        Ok(())
    }

    /// Rasterize an already transformed triangle: perspective divide, screen
    /// mapping, vertex sort and flat-top/flat-bottom decomposition.
    pub fn draw_triangle(&mut self, fb: &mut Framebuffer, tri: &Triangle) {
        let aspect = self.target.aspect_ratio;
        let width = self.target.width as f32;
        let height = self.target.height as f32;

        let mut v0 = tri.vertices[0];
        let mut v1 = tri.vertices[1];
        let mut v2 = tri.vertices[2];

        for vertex in [&mut v0, &mut v1, &mut v2] {
            let p = &mut vertex.position;
            p.x /= p.z / aspect;
            p.y /= p.z / aspect;
            p.x = ((p.x + 1.0) / 2.0) * width;
            p.y = ((p.y + 1.0) / 2.0) * height;
        }

        if behind_view_frustum(self.target.near_plane, &v0, &v1, &v2) {
            return;
        }

        // sort so that v0 is topmost, v2 in the middle, v1 at the bottom
        if v2.position.y > v1.position.y {
            std::mem::swap(&mut v1, &mut v2);
        }
        if v0.position.y > v1.position.y {
            std::mem::swap(&mut v0, &mut v1);
        }
        if v0.position.y > v2.position.y {
            std::mem::swap(&mut v0, &mut v2);
        }

        if is_degenerate(&v0, &v1, &v2) {
            return;
        }

        // Split into flat-bottom + flat-top halves through a synthetic fourth
        // vertex at v2's scanline: Intercept Theorem for x, inverse-depth
        // lerp for z, and perspective-correct UV interpolation.
        let mut v3 = Vertex::default();
        v3.position.x = v0.position.x
            + (v1.position.x - v0.position.x) * (v2.position.y - v0.position.y)
                / (v1.position.y - v0.position.y);
        v3.position.y = v2.position.y;
        v3.position.z = 0.0;

        let diff = v1.position - v0.position;
        let diff2 = v3.position - v0.position;
        let mut ratio_u = 1.0;
        let mut ratio_v = 1.0;
        if diff.x != 0.0 {
            ratio_u = diff2.x / diff.x;
        }
        if diff.y != 0.0 {
            ratio_v = diff2.y / diff.y;
        }

        let inv_z0 = 1.0 / v0.position.z;
        let inv_z1 = 1.0 / v1.position.z;
        if Fixed::from_f32(v0.position.x) != Fixed::from_f32(v1.position.x) {
            let r = (v3.position.x - v1.position.x) / (v0.position.x - v1.position.x);
            v3.position.z = 1.0 / lerp(inv_z1, inv_z0, r);
        } else {
            v3.position.z = v0.position.z;
        }
        v3.uv.x = v3.position.z * lerp(v0.uv.x * inv_z0, v1.uv.x * inv_z1, ratio_u);
        v3.uv.y = v3.position.z * lerp(v0.uv.y * inv_z0, v1.uv.y * inv_z1, ratio_v);

        // keep the right-hand base vertex first for consistent span order
        if v3.position.x < v2.position.x {
            std::mem::swap(&mut v3, &mut v2);
        }

        if !is_degenerate(&v0, &v3, &v2) {
            let mut half = *tri;
            half.vertices = [v0, v3, v2];
            self.dispatch(fb, &half, TriangleHalf::FlatBottom);
        }
        if !is_degenerate(&v1, &v3, &v2) {
            let mut half = *tri;
            half.vertices = [v1, v3, v2];
            self.dispatch(fb, &half, TriangleHalf::FlatTop);
        }
    }

    fn dispatch(&mut self, fb: &mut Framebuffer, tri: &Triangle, half: TriangleHalf) {
        let clip = self.column_clip.as_ref();
        match self.options.backend {
            RasterBackend::Fixed => {
                span::textured_triangle_fixed(&mut self.target, fb, clip, self.y_shear, tri, half)
            }
            RasterBackend::Float => {
                span::textured_triangle_float(&mut self.target, fb, clip, self.y_shear, tri, half)
            }
        }
    }
}
