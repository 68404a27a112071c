//! Raster compositing.
//!
//! Compositors turn a frame's pixel data into packed ARGB values inside a
//! caller-owned buffer. Both paths validate first and then write through
//! [`Canvas::set_pixel`], which applies LED cell expansion and skips black.
//! The buffer is only borrowed for the duration of one composite.

pub mod bitplane;
pub mod error;
pub mod rgb;

pub use bitplane::{BitplaneImage, ColourSource, join_planes, planes_are_valid};
pub use error::CompositeError;
pub use rgb::RgbImage;

use crate::colour;
use crate::matrix::{Dimensions, LedMatrix};

/// Borrowed raster with the geometry needed to place logical pixels.
///
/// # Examples
/// ```
/// use dmdview_core::{Dimensions, LedMatrix};
/// use dmdview_core::composite::Canvas;
///
/// let mut buffer = vec![0u32; 9];
/// let mut canvas = Canvas::new(&mut buffer, Dimensions::new(1, 1), LedMatrix::default()).unwrap();
/// canvas.set_pixel(0, 0, 0x00FF_0000);
/// assert_eq!(buffer[0], 0xFFFF_0000);
/// assert_eq!(buffer[2], 0);
/// ```
#[derive(Debug)]
pub struct Canvas<'a> {
    buffer: &'a mut [u32],
    dimensions: Dimensions,
    led: LedMatrix,
    stride: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(
        buffer: &'a mut [u32],
        dimensions: Dimensions,
        led: LedMatrix,
    ) -> Result<Self, CompositeError> {
        let (width, height) = led.raster_size(dimensions);
        let needed = width as usize * height as usize;
        if buffer.len() < needed {
            return Err(CompositeError::BufferTooSmall {
                needed,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            buffer,
            dimensions,
            led,
            stride: width as usize,
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Write one logical pixel.
    ///
    /// Black (`0x000000` in the RGB channels) is skipped and the buffer keeps
    /// whatever was there, so callers clear to their background first.
    pub fn set_pixel(&mut self, x: u32, y: u32, colour: u32) {
        if colour::is_blank(colour) {
            return;
        }
        let colour = colour::opaque(colour);
        if self.led.enabled {
            self.fill_cell(x, y, colour);
        } else {
            let index = y as usize * self.stride + x as usize;
            if let Some(slot) = self.buffer.get_mut(index) {
                *slot = colour;
            }
        }
    }

    fn fill_cell(&mut self, x: u32, y: u32, colour: u32) {
        let origin_x = x as usize * self.led.cell_width() as usize;
        let origin_y = y as usize * self.led.cell_height() as usize;
        for row in 0..self.led.pixel_height {
            let line = (origin_y + row as usize) * self.stride + origin_x;
            for column in 0..self.led.pixel_width {
                if !self.led.lights(row, column) {
                    continue;
                }
                if let Some(slot) = self.buffer.get_mut(line + column as usize) {
                    *slot = colour;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, CompositeError};
    use crate::matrix::{Dimensions, LedMatrix, LedShape};

    const BG: u32 = 0xFF12_3456;

    #[test]
    fn led_cell_leaves_margin_untouched() {
        let led = LedMatrix::new(2, 2, 1, true);
        let mut buffer = vec![BG; 9];
        let mut canvas = Canvas::new(&mut buffer, Dimensions::new(1, 1), led).unwrap();
        canvas.set_pixel(0, 0, 0x00AB_CDEF);

        let c = 0xFFAB_CDEF;
        assert_eq!(buffer, vec![c, c, BG, c, c, BG, BG, BG, BG]);
    }

    #[test]
    fn led_cells_are_offset_by_cell_size() {
        let led = LedMatrix::new(2, 2, 1, true);
        let mut buffer = vec![0; 6 * 3];
        let mut canvas = Canvas::new(&mut buffer, Dimensions::new(2, 1), led).unwrap();
        canvas.set_pixel(1, 0, 0x0000_00FF);

        let c = 0xFF00_00FF;
        assert_eq!(
            buffer,
            vec![
                0, 0, 0, c, c, 0, //
                0, 0, 0, c, c, 0, //
                0, 0, 0, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn disabled_led_writes_one_pixel() {
        let mut buffer = vec![0; 4];
        let mut canvas =
            Canvas::new(&mut buffer, Dimensions::new(2, 2), LedMatrix::disabled()).unwrap();
        canvas.set_pixel(1, 1, 0x0011_2233);
        assert_eq!(buffer, vec![0, 0, 0, 0xFF11_2233]);
    }

    #[test]
    fn black_pixels_are_skipped() {
        let mut buffer = vec![BG; 4];
        let mut canvas =
            Canvas::new(&mut buffer, Dimensions::new(2, 2), LedMatrix::disabled()).unwrap();
        canvas.set_pixel(0, 0, 0x0000_0000);
        canvas.set_pixel(1, 0, 0xFF00_0000);
        assert_eq!(buffer, vec![BG; 4]);
    }

    #[test]
    fn round_cell_skips_corners() {
        let led = LedMatrix::new(3, 3, 0, true).with_shape(LedShape::Round);
        let mut buffer = vec![0; 9];
        let mut canvas = Canvas::new(&mut buffer, Dimensions::new(1, 1), led).unwrap();
        canvas.set_pixel(0, 0, 0x0000_0001);

        let c = 0xFF00_0001;
        assert_eq!(buffer, vec![0, c, 0, c, c, c, 0, c, 0]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut buffer = vec![0; 8];
        let err = Canvas::new(&mut buffer, Dimensions::new(1, 1), LedMatrix::default())
            .unwrap_err();
        assert_eq!(
            err,
            CompositeError::BufferTooSmall {
                needed: 9,
                actual: 8
            }
        );
    }
}
