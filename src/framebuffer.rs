//! Paletted destination surface
//!
//! One palette index per pixel. The render window may sit inside a larger
//! surface (status bars, borders), located by `window_x`/`window_y`.

#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub width: i32,
    pub height: i32,
    /// Offset of the render window inside the surface.
    pub window_x: i32,
    pub window_y: i32,
    data: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            window_x: 0,
            window_y: 0,
            data: vec![0; (width * height) as usize],
        }
    }

    pub fn clear(&mut self, index: u8) {
        self.data.fill(index);
    }

    pub fn pixel(&self, x: i32, y: i32) -> u8 {
        self.data[(y * self.width + x) as usize]
    }

    pub(crate) fn set(&mut self, x: i32, y: i32, index: u8) {
        self.data[(y * self.width + x) as usize] = index;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = Framebuffer::new(4, 3);
        fb.clear(7);
        assert!(fb.data().iter().all(|&p| p == 7));
        assert_eq!(fb.data().len(), 12);
    }
}
