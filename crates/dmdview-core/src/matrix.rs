//! Display geometry: logical dimensions and LED cell expansion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical size of the dot matrix, in source pixels.
///
/// # Examples
/// ```
/// use dmdview_core::Dimensions;
///
/// let dims = Dimensions::new(128, 32);
/// assert_eq!(dims.area(), 4096);
/// assert_eq!(dims.to_string(), "128x32");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Shape drawn inside each LED cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedShape {
    #[default]
    Square,
    /// Corner cells of the block stay dark (blocks of at least 3x3 only).
    Round,
}

impl fmt::Display for LedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedShape::Square => f.write_str("square"),
            LedShape::Round => f.write_str("round"),
        }
    }
}

/// How one logical pixel expands into a block of raster pixels.
///
/// A 2x2 block with a margin of 1 draws a single pixel as:
///
/// ```text
/// xx.
/// xx.
/// ...
/// ```
///
/// where `x` is written and `.` is margin the compositor never touches.
///
/// # Examples
/// ```
/// use dmdview_core::{Dimensions, LedMatrix};
///
/// let led = LedMatrix::new(2, 2, 1, true);
/// assert_eq!(led.cell_width(), 3);
/// assert_eq!(led.raster_size(Dimensions::new(128, 32)), (384, 96));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedMatrix {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub margin: u32,
    pub enabled: bool,
    #[serde(default)]
    pub shape: LedShape,
}

impl LedMatrix {
    pub const fn new(pixel_width: u32, pixel_height: u32, margin: u32, enabled: bool) -> Self {
        Self {
            pixel_width,
            pixel_height,
            margin,
            enabled,
            shape: LedShape::Square,
        }
    }

    /// One raster pixel per logical pixel.
    pub const fn disabled() -> Self {
        Self::new(1, 1, 0, false)
    }

    pub const fn with_shape(mut self, shape: LedShape) -> Self {
        self.shape = shape;
        self
    }

    pub const fn cell_width(&self) -> u32 {
        self.pixel_width.saturating_add(self.margin)
    }

    pub const fn cell_height(&self) -> u32 {
        self.pixel_height.saturating_add(self.margin)
    }

    /// Raster size needed to show `dimensions`.
    pub fn raster_size(&self, dimensions: Dimensions) -> (u32, u32) {
        if self.enabled {
            (
                dimensions.width.saturating_mul(self.cell_width()),
                dimensions.height.saturating_mul(self.cell_height()),
            )
        } else {
            (dimensions.width, dimensions.height)
        }
    }

    /// Whether the block cell at (`row`, `column`) is drawn.
    pub fn lights(&self, row: u32, column: u32) -> bool {
        match self.shape {
            LedShape::Square => true,
            LedShape::Round => {
                if self.pixel_width < 3 || self.pixel_height < 3 {
                    return true;
                }
                let edge_row = row == 0 || row + 1 == self.pixel_height;
                let edge_column = column == 0 || column + 1 == self.pixel_width;
                !(edge_row && edge_column)
            }
        }
    }
}

impl Default for LedMatrix {
    fn default() -> Self {
        Self::new(2, 2, 1, true)
    }
}

impl fmt::Display for LedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixelWidth:{} pixelHeight:{} margin:{} enabled:{} shape:{}",
            self.pixel_width, self.pixel_height, self.margin, self.enabled, self.shape
        )
    }
}
