//! Pixel drawers
//!
//! The last stage of the pipeline: one call per visible pixel. The opaque
//! drawer is gated by the depth test; the translucent drawer blends through
//! the translucency table and neither tests nor writes depth.

use crate::framebuffer::Framebuffer;
use crate::math::Fixed;
use crate::target::RenderTarget;
use crate::types::TranslucencyTable;

/// Write one opaque pixel. The write goes through only when the new inverse
/// depth is strictly greater (nearer) than the stored value; depth is written
/// even when the target is in depth-only mode and the color is skipped.
pub(crate) fn draw_pixel(
    target: &mut RenderTarget,
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    color: u8,
    depth: Fixed,
) {
    if x >= target.width || x < 0 || y >= target.height || y < 0 {
        return;
    }
    if target.depth_at(x, y) >= depth {
        return;
    }

    let fx = x + fb.window_x;
    let fy = y + fb.window_y;
    if fx >= fb.width || fx < 0 || fy >= fb.height || fy < 0 {
        return;
    }

    *target.depth_entry(x, y) = depth;
    if !target.depth_only() {
        fb.set(fx, fy, color);
    }
}

/// Write one translucent pixel: the framebuffer gets the table's blend of the
/// source color and the pixel already there. Translucent surfaces do not
/// occlude, so depth is neither tested nor written.
pub(crate) fn draw_translucent_pixel(
    target: &RenderTarget,
    fb: &mut Framebuffer,
    transmap: &TranslucencyTable,
    x: i32,
    y: i32,
    color: u8,
) {
    if x >= target.width || x < 0 || y >= target.height || y < 0 {
        return;
    }

    let fx = x + fb.window_x;
    let fy = y + fb.window_y;
    if fx >= fb.width || fx < 0 || fy >= fb.height || fy < 0 {
        return;
    }

    let destination = fb.pixel(fx, fy);
    fb.set(fx, fy, transmap.blend(color, destination));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RenderMode;

    #[test]
    fn depth_test_is_strictly_greater() {
        let mut target = RenderTarget::new(2, 2, 1.0, 60.0);
        let mut fb = Framebuffer::new(2, 2);

        draw_pixel(&mut target, &mut fb, 0, 0, 5, Fixed(100));
        assert_eq!(fb.pixel(0, 0), 5);

        // equal depth loses
        draw_pixel(&mut target, &mut fb, 0, 0, 9, Fixed(100));
        assert_eq!(fb.pixel(0, 0), 5);

        // nearer wins
        draw_pixel(&mut target, &mut fb, 0, 0, 9, Fixed(101));
        assert_eq!(fb.pixel(0, 0), 9);
    }

    #[test]
    fn depth_only_writes_depth_but_not_color() {
        let mut target = RenderTarget::new(2, 2, 1.0, 60.0);
        target.mode = RenderMode::DEPTH;
        let mut fb = Framebuffer::new(2, 2);

        draw_pixel(&mut target, &mut fb, 1, 1, 5, Fixed(100));
        assert_eq!(fb.pixel(1, 1), 0);
        assert_eq!(target.depth_at(1, 1), Fixed(100));
    }

    #[test]
    fn out_of_bounds_is_a_silent_skip() {
        let mut target = RenderTarget::new(2, 2, 1.0, 60.0);
        let mut fb = Framebuffer::new(2, 2);
        draw_pixel(&mut target, &mut fb, -1, 0, 5, Fixed(100));
        draw_pixel(&mut target, &mut fb, 0, 2, 5, Fixed(100));
        assert!(fb.data().iter().all(|&p| p == 0));
    }

    #[test]
    fn window_offset_relocates_the_write() {
        let mut target = RenderTarget::new(2, 2, 1.0, 60.0);
        let mut fb = Framebuffer::new(4, 4);
        fb.window_x = 2;
        fb.window_y = 1;
        draw_pixel(&mut target, &mut fb, 0, 0, 5, Fixed(100));
        assert_eq!(fb.pixel(2, 1), 5);
    }

    #[test]
    fn translucent_blends_without_touching_depth() {
        let mut table = Box::new([0u8; 65536]);
        table[(4usize << 8) | 7] = 42;
        let transmap = TranslucencyTable::new(table);

        let target = RenderTarget::new(2, 2, 1.0, 60.0);
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(7);

        draw_translucent_pixel(&target, &mut fb, &transmap, 0, 0, 4);
        assert_eq!(fb.pixel(0, 0), 42);
        assert_eq!(target.depth_at(0, 0), Fixed::ZERO);
    }
}
