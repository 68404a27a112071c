use super::frame::FrameKind;

pub const TAG_COLOURED_GRAY_4: &str = "coloredGray4";
pub const TAG_COLOURED_GRAY_2: &str = "coloredGray2";
pub const TAG_GRAY_2_PLANES: &str = "gray2Planes";
pub const TAG_GRAY_4_PLANES: &str = "gray4Planes";
pub const TAG_RGB24: &str = "rgb24";
pub const TAG_DIMENSIONS: &str = "dimensions";
pub const TAG_COLOUR: &str = "color";
pub const TAG_PALETTE: &str = "palette";
pub const TAG_CLEAR_COLOUR: &str = "clearColor";
pub const TAG_CLEAR_PALETTE: &str = "clearPalette";
pub const TAG_GAME_NAME: &str = "gameName";

/// Tag string to frame kind, matched exactly.
pub const FRAME_TAGS: [(&str, FrameKind); 11] = [
    (TAG_COLOURED_GRAY_4, FrameKind::ColouredGray4),
    (TAG_COLOURED_GRAY_2, FrameKind::ColouredGray2),
    (TAG_GRAY_2_PLANES, FrameKind::Gray2Planes),
    (TAG_GRAY_4_PLANES, FrameKind::Gray4Planes),
    (TAG_RGB24, FrameKind::Rgb24),
    (TAG_DIMENSIONS, FrameKind::Dimensions),
    (TAG_COLOUR, FrameKind::Colour),
    (TAG_PALETTE, FrameKind::Palette),
    (TAG_CLEAR_COLOUR, FrameKind::ClearColour),
    (TAG_CLEAR_PALETTE, FrameKind::ClearPalette),
    (TAG_GAME_NAME, FrameKind::GameName),
];

pub const LABEL_UNKNOWN: &str = "unknown";
pub const LABEL_INVALID: &str = "invalid";

pub const STRING_TERMINATOR: u8 = 0x00;
pub const INT_LEN: usize = 4;
pub const PALETTE_ENTRY_LEN: usize = INT_LEN;
pub const BGR_TRIPLET_LEN: usize = 3;

/// Largest width or height accepted from a `dimensions` message. Bounds the
/// raster a single message can allocate once LED cells are expanded.
pub const MAX_DIMENSION: u32 = 1024;
