use crate::colour::{self, ALPHA_OPAQUE};
use crate::session::Renderer;

/// Owned ARGB pixel buffer that frames are composited into.
///
/// Every composite starts from a buffer cleared to `background`, so skipped
/// (black) pixels and LED margins show the background colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    background: u32,
    pixels: Vec<u32>,
    frames_ready: u64,
}

impl Raster {
    pub fn new(background: u32) -> Self {
        Self {
            width: 0,
            height: 0,
            background: colour::opaque(background),
            pixels: Vec::new(),
            frames_ready: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn frames_ready(&self) -> u64 {
        self.frames_ready
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Pixels that differ from the background.
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .iter()
            .filter(|pixel| **pixel != self.background)
            .count()
    }

    /// One string per row, six hex digits per pixel.
    pub fn rows_hex(&self) -> Vec<String> {
        if self.width == 0 {
            return Vec::new();
        }
        self.pixels
            .chunks(self.width as usize)
            .map(|row| {
                row.iter()
                    .map(|pixel| format!("{:06x}", pixel & colour::RGB_MASK))
                    .collect()
            })
            .collect()
    }
}

impl Default for Raster {
    fn default() -> Self {
        Self::new(ALPHA_OPAQUE)
    }
}

impl Renderer for Raster {
    fn on_dimensions_changed(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.pixels = vec![self.background; width as usize * height as usize];
        }
    }

    fn raster_mut(&mut self) -> Option<&mut [u32]> {
        self.pixels.fill(self.background);
        Some(&mut self.pixels)
    }

    fn on_raster_ready(&mut self, _width: u32, _height: u32) {
        self.frames_ready += 1;
    }
}
