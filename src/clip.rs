//! Near-plane triangle clipping
//!
//! Runs in transformed space, against the plane z = near with normal +z.
//! Value-based: the input triangle is untouched and up to two new triangles
//! come back.

use crate::math::{intersect_plane, Vec2, Vec4};
use crate::types::{Triangle, Vertex};
use arrayvec::ArrayVec;

fn lerp_uv(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    Vec2::new(
        t * (to.x - from.x) + from.x,
        t * (to.y - from.y) + from.y,
    )
}

fn intersect_vertex(plane_point: Vec4, normal: Vec4, from: &Vertex, to: &Vertex) -> Vertex {
    let (position, t) = intersect_plane(plane_point, normal, from.position, to.position);
    Vertex::new(position, lerp_uv(from.uv, to.uv, t))
}

/// Clip a transformed triangle against the near plane. Returns zero, one or
/// two triangles depending on how many vertices are on the visible side.
pub(crate) fn clip_near_plane<'a>(tri: &Triangle<'a>, near: f32) -> ArrayVec<Triangle<'a>, 2> {
    let plane_point = Vec4::new(0.0, 0.0, near);
    let normal = Vec4::new(0.0, 0.0, 1.0).normalize();

    let mut inside: ArrayVec<&Vertex, 3> = ArrayVec::new();
    let mut outside: ArrayVec<&Vertex, 3> = ArrayVec::new();
    for vertex in &tri.vertices {
        if vertex.position.plane_distance(normal, plane_point) >= 0.0 {
            inside.push(vertex);
        } else {
            outside.push(vertex);
        }
    }

    let mut out = ArrayVec::new();
    match inside.len() {
        // entirely behind the plane
        0 => {}
        3 => out.push(*tri),
        1 => {
            let mut clipped = *tri;
            clipped.vertices = [
                *inside[0],
                intersect_vertex(plane_point, normal, inside[0], outside[0]),
                intersect_vertex(plane_point, normal, inside[0], outside[1]),
            ];
            out.push(clipped);
        }
        _ => {
            let shared = intersect_vertex(plane_point, normal, inside[0], outside[0]);

            let mut first = *tri;
            first.vertices = [*inside[0], *inside[1], shared];
            out.push(first);

            let mut second = *tri;
            second.vertices = [
                *inside[1],
                shared,
                intersect_vertex(plane_point, normal, inside[1], outside[0]),
            ];
            out.push(second);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Texture;

    fn texture() -> Texture {
        Texture::new(2, 2, vec![0; 4]).unwrap()
    }

    fn tri<'a>(zs: [f32; 3], texture: &'a Texture) -> Triangle<'a> {
        let vertices = [
            Vertex::new(Vec4::new(0.0, 0.0, zs[0]), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec4::new(10.0, 0.0, zs[1]), Vec2::new(2.0, 0.0)),
            Vertex::new(Vec4::new(0.0, 10.0, zs[2]), Vec2::new(0.0, 2.0)),
        ];
        Triangle::new(vertices, texture)
    }

    #[test]
    fn fully_outside_is_discarded() {
        let tex = texture();
        assert!(clip_near_plane(&tri([4.0, 8.0, 2.0], &tex), 16.0).is_empty());
    }

    #[test]
    fn fully_inside_passes_through_unchanged() {
        let tex = texture();
        let input = tri([20.0, 30.0, 40.0], &tex);
        let out = clip_near_plane(&input, 16.0);
        assert_eq!(out.len(), 1);
        for (a, b) in out[0].vertices.iter().zip(input.vertices.iter()) {
            assert_eq!(a.position.z, b.position.z);
        }
    }

    #[test]
    fn one_inside_yields_one_triangle_on_the_plane() {
        let tex = texture();
        let out = clip_near_plane(&tri([32.0, 8.0, 8.0], &tex), 16.0);
        assert_eq!(out.len(), 1);
        let v = &out[0].vertices;
        assert_eq!(v[0].position.z, 32.0);
        assert!((v[1].position.z - 16.0).abs() < 1e-4);
        assert!((v[2].position.z - 16.0).abs() < 1e-4);
        // z goes 32 -> 8, the plane sits at t = 2/3 along each clipped edge
        assert!((v[1].uv.x - 2.0 * (2.0 / 3.0)).abs() < 1e-4);
        assert!((v[2].uv.y - 2.0 * (2.0 / 3.0)).abs() < 1e-4);
    }

    #[test]
    fn two_inside_yields_two_triangles() {
        let tex = texture();
        let out = clip_near_plane(&tri([32.0, 64.0, 8.0], &tex), 16.0);
        assert_eq!(out.len(), 2);
        for tri in &out {
            for v in &tri.vertices {
                assert!(v.position.z >= 16.0 - 1e-3);
            }
        }
        // each new vertex interpolates its own edge parameter
        let second = &out[1];
        let t = (64.0 - 16.0) / (64.0 - 8.0);
        assert!((second.vertices[2].uv.y - t * 2.0).abs() < 1e-4);
    }
}
