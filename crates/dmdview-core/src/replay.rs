use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::colour::{self, ALPHA_OPAQUE};
use crate::matrix::LedMatrix;
use crate::protocol::{Frame, decode, layout};
use crate::raster::Raster;
use crate::session::{FrameSession, Outcome};
use crate::source::{FileMessageSource, MessageEvent, MessageSource, SourceError};
use crate::{MessageSummary, RasterSummary, Report, SessionSummary, make_empty_report};

/// Origin recorded for the opening frame in a replay report.
pub const OPENING_ORIGIN: &str = "<opening>";

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Settings for one replay run. Missing fields take their defaults when
/// read from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    pub led: LedMatrix,
    /// Colour the raster is cleared to before each composite.
    pub background: u32,
    /// BGR image shown at 128x32 before the first message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_frame: Option<Vec<u8>>,
    /// Include every raster row as hex in the report.
    pub include_pixels: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            led: LedMatrix::default(),
            background: ALPHA_OPAQUE,
            opening_frame: None,
            include_pixels: false,
        }
    }
}

/// Replay message files in order and report what the display did.
pub fn replay_files<P: AsRef<Path>>(
    paths: &[P],
    options: &ReplayOptions,
) -> Result<Report, ReplayError> {
    let source = FileMessageSource::open(paths)?;
    replay_source(source, options)
}

pub fn replay_source<S: MessageSource>(
    mut source: S,
    options: &ReplayOptions,
) -> Result<Report, ReplayError> {
    let mut session = FrameSession::new(options.led);
    let mut raster = Raster::new(options.background);
    let mut messages = Vec::new();

    if let Some(bgr) = &options.opening_frame {
        let outcome = session.show_opening_frame(bgr.clone(), &mut raster);
        messages.push(MessageSummary {
            origin: OPENING_ORIGIN.to_string(),
            bytes: bgr.len() as u64,
            kind: layout::TAG_RGB24.to_string(),
            outcome: outcome.label().to_string(),
            detail: rejection(&outcome),
        });
    }

    while let Some(MessageEvent { origin, data }) = source.next_message()? {
        let frame = decode(&data);
        let kind = frame.label().to_string();
        let dropped = match &frame {
            Frame::Unknown { tag } => Some(tag.clone()),
            Frame::Invalid { error, .. } => Some(error.to_string()),
            _ => None,
        };
        let outcome = session.apply(frame, &mut raster);
        messages.push(MessageSummary {
            origin,
            bytes: data.len() as u64,
            kind,
            outcome: outcome.label().to_string(),
            detail: rejection(&outcome).or(dropped),
        });
    }

    info!(
        messages = messages.len(),
        rendered = session.frames_rendered(),
        "replay finished"
    );

    let mut report = make_empty_report(options.led);
    report.messages = messages;
    report.session = summarize_session(&session);
    report.raster = summarize_raster(&raster, options.include_pixels);
    Ok(report)
}

fn rejection(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Rejected(error) => Some(error.to_string()),
        _ => None,
    }
}

fn summarize_session(session: &FrameSession) -> SessionSummary {
    SessionSummary {
        dimensions: session.dimensions(),
        game_name: session.game_name().map(str::to_string),
        base_colour: colour::to_hex(session.colour()),
        palette_len: session.palette().map(<[u32]>::len),
        frames_rendered: session.frames_rendered(),
        duplicates: session.duplicates(),
        rejected: session.rejected(),
    }
}

fn summarize_raster(raster: &Raster, include_pixels: bool) -> Option<RasterSummary> {
    if raster.width() == 0 || raster.height() == 0 {
        return None;
    }
    Some(RasterSummary {
        width: raster.width(),
        height: raster.height(),
        lit_pixels: raster.lit_pixels() as u64,
        rows: include_pixels.then(|| raster.rows_hex()),
    })
}
