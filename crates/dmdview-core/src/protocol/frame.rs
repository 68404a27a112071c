use std::fmt;

use super::error::DecodeError;
use super::layout;
use crate::matrix::Dimensions;

/// Ordered table of packed `0xRRGGBB` colours, indexed by palette index.
pub type Palette = Vec<u32>;

/// Number of bit-planes in a plane-bearing frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    Two,
    Four,
}

impl BitDepth {
    /// Number of planes, which is also the bits per palette index.
    pub const fn planes(self) -> usize {
        match self {
            BitDepth::Two => 2,
            BitDepth::Four => 4,
        }
    }

    /// Number of distinct palette indices (`2^planes`).
    pub const fn levels(self) -> usize {
        1 << self.planes()
    }

    /// Length a standalone palette must have to be used for gray frames.
    pub const fn palette_len(self) -> usize {
        self.planes() * 4
    }
}

/// Frame kinds named by the wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    ColouredGray4,
    ColouredGray2,
    Gray2Planes,
    Gray4Planes,
    Rgb24,
    Dimensions,
    Colour,
    Palette,
    ClearColour,
    ClearPalette,
    GameName,
}

impl FrameKind {
    /// Exact, case-sensitive lookup in the tag table.
    ///
    /// # Examples
    /// ```
    /// use dmdview_core::protocol::FrameKind;
    ///
    /// assert_eq!(FrameKind::from_tag("gray4Planes"), Some(FrameKind::Gray4Planes));
    /// assert_eq!(FrameKind::from_tag("Gray4Planes"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        layout::FRAME_TAGS
            .iter()
            .find(|(candidate, _)| *candidate == tag)
            .map(|(_, kind)| *kind)
    }

    pub fn tag(self) -> &'static str {
        match self {
            FrameKind::ColouredGray4 => layout::TAG_COLOURED_GRAY_4,
            FrameKind::ColouredGray2 => layout::TAG_COLOURED_GRAY_2,
            FrameKind::Gray2Planes => layout::TAG_GRAY_2_PLANES,
            FrameKind::Gray4Planes => layout::TAG_GRAY_4_PLANES,
            FrameKind::Rgb24 => layout::TAG_RGB24,
            FrameKind::Dimensions => layout::TAG_DIMENSIONS,
            FrameKind::Colour => layout::TAG_COLOUR,
            FrameKind::Palette => layout::TAG_PALETTE,
            FrameKind::ClearColour => layout::TAG_CLEAR_COLOUR,
            FrameKind::ClearPalette => layout::TAG_CLEAR_PALETTE,
            FrameKind::GameName => layout::TAG_GAME_NAME,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One decoded message.
///
/// Each variant carries only the fields its kind defines. `Invalid` keeps the
/// kind the tag announced (when it could be read) and the reason the payload
/// was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    ColouredGray {
        depth: BitDepth,
        timestamp: i32,
        palette: Palette,
        planes: Vec<u8>,
    },
    GrayPlanes {
        depth: BitDepth,
        timestamp: i32,
        planes: Vec<u8>,
    },
    Rgb24 {
        timestamp: i32,
        planes: Vec<u8>,
    },
    Dimensions(Dimensions),
    Colour(u32),
    Palette(Palette),
    ClearColour,
    ClearPalette,
    GameName(String),
    Unknown {
        tag: String,
    },
    Invalid {
        kind: Option<FrameKind>,
        error: DecodeError,
    },
}

/// Borrowed view of the pixel data carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterPayload<'a> {
    Bitplanes {
        depth: BitDepth,
        palette: Option<&'a [u32]>,
        planes: &'a [u8],
    },
    Rgb24 {
        planes: &'a [u8],
    },
}

impl<'a> RasterPayload<'a> {
    pub fn planes(&self) -> &'a [u8] {
        match *self {
            RasterPayload::Bitplanes { planes, .. } => planes,
            RasterPayload::Rgb24 { planes } => planes,
        }
    }
}

impl Frame {
    /// Build an `rgb24` frame from pre-recorded BGR triplets (timestamp 0).
    pub fn from_bgr(bgr: Vec<u8>) -> Self {
        Frame::Rgb24 {
            timestamp: 0,
            planes: bgr,
        }
    }

    /// Wire kind of a decoded frame; `None` for `Unknown` and `Invalid`.
    pub fn kind(&self) -> Option<FrameKind> {
        let kind = match self {
            Frame::ColouredGray {
                depth: BitDepth::Two,
                ..
            } => FrameKind::ColouredGray2,
            Frame::ColouredGray {
                depth: BitDepth::Four,
                ..
            } => FrameKind::ColouredGray4,
            Frame::GrayPlanes {
                depth: BitDepth::Two,
                ..
            } => FrameKind::Gray2Planes,
            Frame::GrayPlanes {
                depth: BitDepth::Four,
                ..
            } => FrameKind::Gray4Planes,
            Frame::Rgb24 { .. } => FrameKind::Rgb24,
            Frame::Dimensions(_) => FrameKind::Dimensions,
            Frame::Colour(_) => FrameKind::Colour,
            Frame::Palette(_) => FrameKind::Palette,
            Frame::ClearColour => FrameKind::ClearColour,
            Frame::ClearPalette => FrameKind::ClearPalette,
            Frame::GameName(_) => FrameKind::GameName,
            Frame::Unknown { .. } | Frame::Invalid { .. } => return None,
        };
        Some(kind)
    }

    /// Wire tag for decoded frames, `unknown` or `invalid` otherwise.
    pub fn label(&self) -> &'static str {
        match self {
            Frame::Unknown { .. } => layout::LABEL_UNKNOWN,
            Frame::Invalid { .. } => layout::LABEL_INVALID,
            _ => self.kind().map(FrameKind::tag).unwrap_or(layout::LABEL_INVALID),
        }
    }

    pub fn timestamp(&self) -> Option<i32> {
        match self {
            Frame::ColouredGray { timestamp, .. }
            | Frame::GrayPlanes { timestamp, .. }
            | Frame::Rgb24 { timestamp, .. } => Some(*timestamp),
            _ => None,
        }
    }

    pub fn raster_payload(&self) -> Option<RasterPayload<'_>> {
        match self {
            Frame::ColouredGray {
                depth,
                palette,
                planes,
                ..
            } => Some(RasterPayload::Bitplanes {
                depth: *depth,
                palette: Some(palette.as_slice()),
                planes: planes.as_slice(),
            }),
            Frame::GrayPlanes { depth, planes, .. } => Some(RasterPayload::Bitplanes {
                depth: *depth,
                palette: None,
                planes: planes.as_slice(),
            }),
            Frame::Rgb24 { planes, .. } => Some(RasterPayload::Rgb24 {
                planes: planes.as_slice(),
            }),
            _ => None,
        }
    }

    /// Raw plane bytes of plane-bearing frames.
    pub fn planes(&self) -> Option<&[u8]> {
        self.raster_payload().map(|payload| payload.planes())
    }

    pub fn is_raster(&self) -> bool {
        self.raster_payload().is_some()
    }
}
