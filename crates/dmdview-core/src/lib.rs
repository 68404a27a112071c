//! dmdview core library: dmdext frame decoding and dot-matrix compositing.
//!
//! Messages from a dmdext client are decoded into frames (`protocol`), applied
//! to a per-connection [`FrameSession`], and raster frames are composited into
//! a caller-owned ARGB buffer with optional LED cell expansion (`composite`).
//! Decoding and compositing are pure and synchronous; all file I/O for replay
//! is isolated in `source`.
//!
//! Invariants:
//! - A malformed or unknown message never ends the stream.
//! - A rejected frame leaves the previously rendered image in place.
//! - Replay reports are deterministic for a given input and options.
//!
//! # Examples
//! ```no_run
//! use dmdview_core::{ReplayOptions, replay_files};
//!
//! let report = replay_files(&["capture/0001.bin"], &ReplayOptions::default())?;
//! println!("frames rendered: {}", report.session.frames_rendered);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod colour;
pub mod composite;
mod matrix;
pub mod protocol;
mod raster;
mod replay;
mod session;
mod source;

pub use matrix::{Dimensions, LedMatrix, LedShape};
pub use raster::Raster;
pub use replay::{OPENING_ORIGIN, ReplayError, ReplayOptions, replay_files, replay_source};
pub use session::{FrameSession, OPENING_DIMENSIONS, Outcome, Renderer};
pub use source::{FileMessageSource, MemorySource, MessageEvent, MessageSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Replay report with messages in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// LED geometry the replay rendered with.
    pub led_matrix: LedMatrix,
    pub messages: Vec<MessageSummary>,
    pub session: SessionSummary,
    /// Absent when no dimensions were ever set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster: Option<RasterSummary>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use dmdview_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "dmdview".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "dmdview");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// What happened to one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummary {
    pub origin: String,
    pub bytes: u64,
    /// Wire tag, or `unknown` / `invalid`.
    pub kind: String,
    /// One of `rendered`, `duplicate`, `no_dimensions`, `rejected`,
    /// `state_updated`, `ignored`.
    pub outcome: String,
    /// Unknown tag, decode error or composite error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Session state at the end of a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    /// `#rrggbb`.
    pub base_colour: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_len: Option<usize>,
    pub frames_rendered: u64,
    pub duplicates: u64,
    pub rejected: u64,
}

/// Final raster after LED expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterSummary {
    pub width: u32,
    pub height: u32,
    /// Pixels that differ from the background colour.
    pub lit_pixels: u64,
    /// Six hex digits per pixel, one string per row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
}

/// Report with tool metadata and default session fields filled in.
///
/// # Examples
/// ```
/// use dmdview_core::{LedMatrix, make_empty_report};
///
/// let report = make_empty_report(LedMatrix::default());
/// assert_eq!(report.report_version, dmdview_core::REPORT_VERSION);
/// assert_eq!(report.session.base_colour, "#ec843d");
/// ```
pub fn make_empty_report(led: LedMatrix) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "dmdview".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        led_matrix: led,
        messages: vec![],
        session: SessionSummary {
            dimensions: None,
            game_name: None,
            base_colour: colour::to_hex(colour::DEFAULT_COLOUR),
            palette_len: None,
            frames_rendered: 0,
            duplicates: 0,
            rejected: 0,
        },
        raster: None,
    }
}
