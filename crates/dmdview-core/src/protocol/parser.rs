use tracing::{trace, warn};

use super::error::DecodeError;
use super::frame::{BitDepth, Frame, FrameKind, Palette};
use super::layout;
use super::reader::ByteCursor;
use crate::matrix::Dimensions;

/// Decode one message into a frame.
///
/// Never fails: an unrecognised tag yields `Frame::Unknown` and a payload
/// that does not match its kind yields `Frame::Invalid`. Callers drop both
/// and keep the stream open.
///
/// # Examples
/// ```
/// use dmdview_core::Dimensions;
/// use dmdview_core::protocol::{Frame, decode};
///
/// let mut message = b"dimensions\0".to_vec();
/// message.extend_from_slice(&128i32.to_le_bytes());
/// message.extend_from_slice(&32i32.to_le_bytes());
/// assert_eq!(decode(&message), Frame::Dimensions(Dimensions::new(128, 32)));
/// ```
pub fn decode(payload: &[u8]) -> Frame {
    let mut cursor = ByteCursor::new(payload);
    let kind = match read_kind(&mut cursor) {
        Ok(kind) => kind,
        Err(DecodeError::UnknownKind { tag }) => {
            warn!(tag = %tag, "unknown frame type");
            return Frame::Unknown { tag };
        }
        Err(error) => {
            warn!(%error, bytes = payload.len(), "message carries no frame type");
            return Frame::Invalid { kind: None, error };
        }
    };

    let remaining = cursor.remaining();
    match read_payload(kind, &mut cursor) {
        Ok(frame) => {
            trace!(%kind, timestamp = ?frame.timestamp(), "decoded frame");
            frame
        }
        Err(error) => {
            warn!(%kind, remaining, %error, "frame data was not as expected");
            Frame::Invalid {
                kind: Some(kind),
                error,
            }
        }
    }
}

/// Decode one message, surfacing every failure as an error.
///
/// Unlike [`decode`], an unrecognised tag is `DecodeError::UnknownKind`.
pub fn try_decode(payload: &[u8]) -> Result<Frame, DecodeError> {
    let mut cursor = ByteCursor::new(payload);
    let kind = read_kind(&mut cursor)?;
    read_payload(kind, &mut cursor)
}

fn read_kind(cursor: &mut ByteCursor<'_>) -> Result<FrameKind, DecodeError> {
    let tag = cursor.read_null_terminated_string(true)?;
    FrameKind::from_tag(&tag).ok_or(DecodeError::UnknownKind { tag })
}

fn read_payload(kind: FrameKind, cursor: &mut ByteCursor<'_>) -> Result<Frame, DecodeError> {
    let frame = match kind {
        FrameKind::GameName => Frame::GameName(cursor.read_null_terminated_string(false)?),
        FrameKind::Dimensions => Frame::Dimensions(read_dimensions(cursor)?),
        FrameKind::ColouredGray2 => read_coloured_gray(BitDepth::Two, cursor)?,
        FrameKind::ColouredGray4 => read_coloured_gray(BitDepth::Four, cursor)?,
        FrameKind::Gray2Planes => read_gray_planes(BitDepth::Two, cursor)?,
        FrameKind::Gray4Planes => read_gray_planes(BitDepth::Four, cursor)?,
        FrameKind::Rgb24 => {
            let timestamp = cursor.read_i32()?;
            Frame::Rgb24 {
                timestamp,
                planes: cursor.read_rest().to_vec(),
            }
        }
        FrameKind::Colour => Frame::Colour(cursor.read_i32()? as u32),
        FrameKind::Palette => Frame::Palette(read_palette(cursor)?),
        FrameKind::ClearColour => Frame::ClearColour,
        FrameKind::ClearPalette => Frame::ClearPalette,
    };
    Ok(frame)
}

fn read_coloured_gray(depth: BitDepth, cursor: &mut ByteCursor<'_>) -> Result<Frame, DecodeError> {
    let timestamp = cursor.read_i32()?;
    let palette = read_palette(cursor)?;
    Ok(Frame::ColouredGray {
        depth,
        timestamp,
        palette,
        planes: cursor.read_rest().to_vec(),
    })
}

fn read_gray_planes(depth: BitDepth, cursor: &mut ByteCursor<'_>) -> Result<Frame, DecodeError> {
    let timestamp = cursor.read_i32()?;
    Ok(Frame::GrayPlanes {
        depth,
        timestamp,
        planes: cursor.read_rest().to_vec(),
    })
}

fn read_dimensions(cursor: &mut ByteCursor<'_>) -> Result<Dimensions, DecodeError> {
    let width = read_extent(cursor, "width")?;
    let height = read_extent(cursor, "height")?;
    Ok(Dimensions::new(width, height))
}

fn read_extent(cursor: &mut ByteCursor<'_>, field: &'static str) -> Result<u32, DecodeError> {
    let value = cursor.read_i32()?;
    u32::try_from(value)
        .ok()
        .filter(|extent| *extent <= layout::MAX_DIMENSION)
        .ok_or(DecodeError::InvalidShape {
            field,
            value: i64::from(value),
        })
}

/// Length-prefixed palette: an `i32` count followed by that many `i32` colours.
fn read_palette(cursor: &mut ByteCursor<'_>) -> Result<Palette, DecodeError> {
    let count = cursor.read_i32()?;
    let invalid = DecodeError::InvalidShape {
        field: "palette length",
        value: i64::from(count),
    };
    let len = usize::try_from(count).map_err(|_| invalid.clone())?;
    let needed = len
        .checked_mul(layout::PALETTE_ENTRY_LEN)
        .ok_or(invalid)?;
    cursor.require(needed)?;

    (0..len)
        .map(|_| cursor.read_i32().map(|colour| colour as u32))
        .collect()
}
