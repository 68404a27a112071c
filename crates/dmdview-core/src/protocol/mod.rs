//! dmdext wire protocol decoding.
//!
//! The protocol follows the same layered structure as every decoder here:
//! - `layout`: wire constants and the tag table (source of truth)
//! - `reader`: the bounds-checked byte cursor
//! - `frame`: the decoded frame model
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Each message starts with optional `0x00` padding, then a null-terminated
//! ASCII tag naming the frame kind, then a kind-specific little-endian payload.
//! Decoding is pure: a malformed message becomes `Frame::Invalid` and an
//! unrecognised tag becomes `Frame::Unknown`, so a single bad message never
//! ends the stream.

pub mod error;
pub mod frame;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use frame::{BitDepth, Frame, FrameKind, Palette, RasterPayload};
pub use parser::{decode, try_decode};
pub use reader::{ByteCursor, Endian};
