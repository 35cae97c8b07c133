//! Scanline texture mappers
//!
//! Two back-ends fill a flat-top or flat-bottom half-triangle scanline by
//! scanline: one in 16.16 fixed-point, one in floating point. Both
//! interpolate inverse depth and inverse-depth-weighted UVs across each span
//! (perspective-correct), wrap UVs modulo the texture size, and emit pixels
//! through the drawers in `pixel`.

use crate::framebuffer::Framebuffer;
use crate::math::{lerp, Fixed};
use crate::pixel;
use crate::target::RenderTarget;
use crate::types::{ColumnClip, Triangle, TriangleHalf, TRANSPARENT_INDEX};

/// Per-span interpolation bounds, in the back-end's numeric type.
struct Span<T> {
    start_x: T,
    start_x_prestep: T,
    end_x_prestep: T,
    start_inv_z: T,
    end_inv_z: T,
    start_u: T,
    end_u: T,
    start_v: T,
    end_v: T,
    inv_line_length: T,
}

fn emit(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    tri: &Triangle,
    x: i32,
    y: i32,
    texel: u8,
    inv_z: Fixed,
) {
    if texel == TRANSPARENT_INDEX {
        return;
    }
    let mut pixel_value = texel;
    if let Some(translation) = tri.translation {
        pixel_value = translation.apply(pixel_value);
    }
    if let Some(colormap) = tri.colormap {
        pixel_value = colormap.apply(pixel_value);
    }
    match tri.transmap {
        Some(transmap) => pixel::draw_translucent_pixel(target, fb, transmap, x, y, pixel_value),
        None => pixel::draw_pixel(target, fb, x, y, pixel_value, inv_z),
    }
}

/// Returns true when the span should stop at this column.
fn column_ends_span(target: &RenderTarget, clip: Option<&ColumnClip>, ix: i32) -> bool {
    if ix >= target.width {
        return true;
    }
    matches!(clip, Some(c) if ix >= c.view_width)
}

/// Returns true when this pixel is outside the target or the column clip
/// range and must be skipped without side effects.
fn pixel_clipped(clip: Option<&ColumnClip>, ix: i32, y: i32) -> bool {
    if ix < 0 {
        return true;
    }
    let Some(c) = clip else {
        return false;
    };
    // columns past the end of the clip arrays are unclipped
    match (c.ceiling.get(ix as usize), c.floor.get(ix as usize)) {
        (Some(&ceiling), Some(&floor)) => y >= floor as i32 || y <= ceiling as i32,
        _ => false,
    }
}

fn span_fixed(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    clip: Option<&ColumnClip>,
    y_shear: i32,
    tri: &Triangle,
    y: Fixed,
    span: &Span<Fixed>,
) {
    let depth_only = target.depth_only();
    let y_row = y.to_i32() + y_shear;

    let mut x = span.start_x_prestep;
    while x <= span.end_x_prestep {
        let ix = x.to_i32();
        if column_ends_span(target, clip, ix) {
            break;
        }
        if !pixel_clipped(clip, ix, y_row) {
            // interpolate 1/z across the scanline, then recover true z
            let r = (x - span.start_x).mul(span.inv_line_length);
            let inv_z = Fixed::lerp(span.start_inv_z, span.end_inv_z, r);
            let z = Fixed::ONE.div(inv_z);
            if depth_only {
                pixel::draw_pixel(target, fb, ix, y_row, 0, inv_z);
            } else {
                let u = z.mul(Fixed::lerp(span.start_u, span.end_u, r)).to_i32() as u16;
                let v = z.mul(Fixed::lerp(span.start_v, span.end_v, r)).to_i32() as u16;
                let texel = tri.texture.texel(u, v);
                emit(target, fb, tri, ix, y_row, texel, inv_z);
            }
        }
        x += Fixed::ONE;
    }
}

/// Fixed-point scanline mapper for one half-triangle.
pub(crate) fn textured_triangle_fixed(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    clip: Option<&ColumnClip>,
    y_shear: i32,
    tri: &Triangle,
    half: TriangleHalf,
) {
    let [v0, v1, v2] = &tri.vertices;
    let v0x = Fixed::from_f32(v0.position.x);
    let v0y = Fixed::from_f32(v0.position.y);
    let v0z = Fixed::from_f32(v0.position.z);
    let v0u = Fixed::from_f32(v0.uv.x);
    let v0v = Fixed::from_f32(v0.uv.y);

    let v1x = Fixed::from_f32(v1.position.x);
    let v1z = Fixed::from_f32(v1.position.z);
    let v1u = Fixed::from_f32(v1.uv.x);
    let v1v = Fixed::from_f32(v1.uv.y);

    let v2x = Fixed::from_f32(v2.position.x);
    let v2y = Fixed::from_f32(v2.position.y);
    let v2z = Fixed::from_f32(v2.position.z);
    let v2u = Fixed::from_f32(v2.uv.x);
    let v2v = Fixed::from_f32(v2.uv.y);

    let (y_dir, inv_dy, num_scanlines, prestep) = match half {
        TriangleHalf::FlatBottom => {
            if v2y - v0y < Fixed::ONE {
                return;
            }
            let dy = (v2y - v0y).ceil();
            (Fixed::ONE, Fixed::ONE.div(dy), dy.to_i32(), v0y.ceil() - v0y)
        }
        TriangleHalf::FlatTop => {
            if v0y - v2y < Fixed::ONE {
                return;
            }
            let dy = (v0y - v2y).ceil();
            (-Fixed::ONE, Fixed::ONE.div(dy), dy.to_i32(), v2y.ceil() - v2y)
        }
    };

    if num_scanlines >= target.height {
        return;
    }

    let dx_left = (v2x - v0x).mul(inv_dy);
    let dx_right = (v1x - v0x).mul(inv_dy);
    let mut start_x = v0x;
    let mut end_x = v0x;
    let mut start_x_prestep = start_x + dx_left.mul(prestep);
    let mut end_x_prestep = end_x + dx_right.mul(prestep);

    let inv_z0 = Fixed::ONE.div(v0z);
    let inv_z1 = Fixed::ONE.div(v1z);
    let inv_z2 = Fixed::ONE.div(v2z);
    let inv_y02 = Fixed::ONE.div(v0y - v2y);

    let mut y = v0y;
    for line in 0..=num_scanlines {
        let line_length = end_x - start_x;
        if line_length > Fixed::ZERO {
            let r1 = (v0y - y).mul(inv_y02);
            let span = Span {
                start_x,
                start_x_prestep,
                end_x_prestep,
                start_inv_z: Fixed::lerp(inv_z0, inv_z2, r1),
                end_inv_z: Fixed::lerp(inv_z0, inv_z1, r1),
                start_u: Fixed::lerp(v0u.mul(inv_z0), v2u.mul(inv_z2), r1),
                start_v: Fixed::lerp(v0v.mul(inv_z0), v2v.mul(inv_z2), r1),
                end_u: Fixed::lerp(v0u.mul(inv_z0), v1u.mul(inv_z1), r1),
                end_v: Fixed::lerp(v0v.mul(inv_z0), v1v.mul(inv_z1), r1),
                inv_line_length: Fixed::ONE.div(line_length),
            };
            span_fixed(target, fb, clip, y_shear, tri, y, &span);
        }

        start_x += dx_left;
        end_x += dx_right;
        // the prestepped bounds freeze for the last two scanlines
        if line < num_scanlines - 1 {
            start_x_prestep += dx_left;
            end_x_prestep += dx_right;
        }
        y += y_dir;
    }
}

fn span_float(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    clip: Option<&ColumnClip>,
    y_shear: i32,
    tri: &Triangle,
    y: f32,
    span: &Span<f32>,
) {
    let depth_only = target.depth_only();
    let y_row = Fixed::from_f32(y).to_i32() + y_shear;

    let mut x = span.start_x_prestep;
    while x <= span.end_x_prestep {
        let ix = Fixed::from_f32(x).to_i32();
        if column_ends_span(target, clip, ix) {
            break;
        }
        if !pixel_clipped(clip, ix, y_row) {
            let r = (x - span.start_x) * span.inv_line_length;
            let inv_z = lerp(span.start_inv_z, span.end_inv_z, r);
            let z = 1.0 / inv_z;
            let depth = Fixed::from_f32(inv_z);
            if depth_only {
                pixel::draw_pixel(target, fb, ix, y_row, 0, depth);
            } else {
                let u = Fixed::from_f32(z * lerp(span.start_u, span.end_u, r)).to_i32() as u16;
                let v = Fixed::from_f32(z * lerp(span.start_v, span.end_v, r)).to_i32() as u16;
                let texel = tri.texture.texel(u, v);
                emit(target, fb, tri, ix, y_row, texel, depth);
            }
        }
        x += 1.0;
    }
}

/// Floating-point scanline mapper for one half-triangle.
pub(crate) fn textured_triangle_float(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    clip: Option<&ColumnClip>,
    y_shear: i32,
    tri: &Triangle,
    half: TriangleHalf,
) {
    let [v0, v1, v2] = &tri.vertices;
    let v0x = v0.position.x;
    let v0y = v0.position.y;
    let v0z = v0.position.z;
    let v1x = v1.position.x;
    let v1z = v1.position.z;
    let v2x = v2.position.x;
    let v2y = v2.position.y;
    let v2z = v2.position.z;

    let (y_dir, inv_dy, num_scanlines, prestep) = match half {
        TriangleHalf::FlatBottom => {
            if v2y - v0y < 1.0 {
                return;
            }
            let dy = (v2y - v0y).ceil();
            (1.0f32, 1.0 / dy, dy as i32, v0y.ceil() - v0y)
        }
        TriangleHalf::FlatTop => {
            if v0y - v2y < 1.0 {
                return;
            }
            let dy = (v0y - v2y).ceil();
            (-1.0f32, 1.0 / dy, dy as i32, v2y.ceil() - v2y)
        }
    };

    if num_scanlines >= target.height {
        return;
    }

    let dx_left = (v2x - v0x) * inv_dy;
    let dx_right = (v1x - v0x) * inv_dy;
    let mut start_x = v0x;
    let mut end_x = v0x;
    let mut start_x_prestep = start_x + dx_left * prestep;
    let mut end_x_prestep = end_x + dx_right * prestep;

    let inv_z0 = 1.0 / v0z;
    let inv_z1 = 1.0 / v1z;
    let inv_z2 = 1.0 / v2z;
    let inv_y02 = 1.0 / (v0y - v2y);

    let mut y = v0y;
    for line in 0..=num_scanlines {
        let line_length = end_x - start_x;
        if line_length > 0.0 {
            let r1 = (v0y - y) * inv_y02;
            let span = Span {
                start_x,
                start_x_prestep,
                end_x_prestep,
                start_inv_z: lerp(inv_z0, inv_z2, r1),
                end_inv_z: lerp(inv_z0, inv_z1, r1),
                start_u: lerp(v0.uv.x * inv_z0, v2.uv.x * inv_z2, r1),
                start_v: lerp(v0.uv.y * inv_z0, v2.uv.y * inv_z2, r1),
                end_u: lerp(v0.uv.x * inv_z0, v1.uv.x * inv_z1, r1),
                end_v: lerp(v0.uv.y * inv_z0, v1.uv.y * inv_z1, r1),
                inv_line_length: 1.0 / line_length,
            };
            span_float(target, fb, clip, y_shear, tri, y, &span);
        }

        start_x += dx_left;
        end_x += dx_right;
        if line < num_scanlines - 1 {
            start_x_prestep += dx_left;
            end_x_prestep += dx_right;
        }
        y += y_dir;
    }
}
