use thiserror::Error;

/// Reasons a composite produced no image.
///
/// Validation runs before any pixel is written, so a failed composite leaves
/// the target buffer as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    #[error("invalid plane data: {planes} bytes for {depth} planes over area {area}")]
    InvalidPlaneShape {
        planes: usize,
        depth: usize,
        area: usize,
    },
    #[error("invalid RGB24 data: {length} bytes for area {area}")]
    InvalidRgbShape { length: usize, area: usize },
    #[error("palette too short: need {needed} colours, got {actual}")]
    PaletteTooShort { needed: usize, actual: usize },
    #[error("raster too small: need {needed} pixels, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
}
