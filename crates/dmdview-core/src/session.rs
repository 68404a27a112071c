//! Per-connection display state.
//!
//! A [`FrameSession`] owns everything a client has told the display so far
//! (dimensions, palette, base colour, game name) and the last rendered frame.
//! Frames are applied strictly in arrival order; raster frames are composited
//! into a buffer borrowed from a [`Renderer`] for the duration of one call.

use tracing::{debug, info, warn};

use crate::colour::{self, DEFAULT_COLOUR, Hsl};
use crate::composite::{BitplaneImage, Canvas, ColourSource, CompositeError, RgbImage};
use crate::matrix::{Dimensions, LedMatrix};
use crate::protocol::{BitDepth, Frame, Palette, RasterPayload, decode};

/// Logical size used for the splash image shown before a client connects.
pub const OPENING_DIMENSIONS: Dimensions = Dimensions::new(128, 32);

/// Sink for composited pixels.
pub trait Renderer {
    /// Raster size (after LED expansion) for the next frames.
    fn on_dimensions_changed(&mut self, width: u32, height: u32);
    /// Pixel buffer for one composite pass, or `None` when nothing is attached.
    fn raster_mut(&mut self) -> Option<&mut [u32]>;
    /// A composite finished; the buffer now holds a complete image.
    fn on_raster_ready(&mut self, width: u32, height: u32);
}

/// What applying one frame did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    /// Same kind and planes as the previous raster frame.
    Duplicate,
    /// Raster frame arrived before any `dimensions` message.
    NoDimensions,
    Rejected(CompositeError),
    StateUpdated,
    /// `Unknown` and `Invalid` frames.
    Ignored,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Rendered => "rendered",
            Outcome::Duplicate => "duplicate",
            Outcome::NoDimensions => "no_dimensions",
            Outcome::Rejected(_) => "rejected",
            Outcome::StateUpdated => "state_updated",
            Outcome::Ignored => "ignored",
        }
    }
}

/// Display state for one connection.
///
/// # Examples
/// ```
/// use dmdview_core::{FrameSession, LedMatrix, Outcome, Raster};
///
/// let mut session = FrameSession::new(LedMatrix::disabled());
/// let mut raster = Raster::default();
///
/// let mut dims = b"dimensions\0".to_vec();
/// dims.extend_from_slice(&8i32.to_le_bytes());
/// dims.extend_from_slice(&1i32.to_le_bytes());
/// assert_eq!(session.deliver(&dims, &mut raster), Outcome::StateUpdated);
///
/// let mut frame = b"gray2Planes\0".to_vec();
/// frame.extend_from_slice(&0i32.to_le_bytes());
/// frame.extend_from_slice(&[0xFF, 0xFF]);
/// assert_eq!(session.deliver(&frame, &mut raster), Outcome::Rendered);
/// assert_eq!(session.deliver(&frame, &mut raster), Outcome::Duplicate);
/// ```
#[derive(Debug, Clone)]
pub struct FrameSession {
    led: LedMatrix,
    dimensions: Option<Dimensions>,
    palette: Option<Palette>,
    colour: u32,
    hsl: Hsl,
    game_name: Option<String>,
    previous: Option<Frame>,
    frames_rendered: u64,
    duplicates: u64,
    rejected: u64,
}

impl FrameSession {
    pub fn new(led: LedMatrix) -> Self {
        Self {
            led,
            dimensions: None,
            palette: None,
            colour: DEFAULT_COLOUR,
            hsl: Hsl::from_rgb(DEFAULT_COLOUR),
            game_name: None,
            previous: None,
            frames_rendered: 0,
            duplicates: 0,
            rejected: 0,
        }
    }

    /// Decode one message and apply it.
    pub fn deliver<R: Renderer + ?Sized>(&mut self, bytes: &[u8], renderer: &mut R) -> Outcome {
        self.apply(decode(bytes), renderer)
    }

    pub fn apply<R: Renderer + ?Sized>(&mut self, frame: Frame, renderer: &mut R) -> Outcome {
        match frame {
            Frame::ColouredGray { .. } | Frame::GrayPlanes { .. } | Frame::Rgb24 { .. } => {
                self.render(frame, renderer)
            }
            Frame::Dimensions(dimensions) => {
                self.set_dimensions(dimensions, renderer);
                Outcome::StateUpdated
            }
            Frame::Colour(colour) => {
                info!(colour = %colour::to_hex(colour), "base colour set");
                self.set_colour(colour);
                Outcome::StateUpdated
            }
            Frame::Palette(palette) => {
                info!(entries = palette.len(), "palette set");
                self.palette = Some(palette);
                Outcome::StateUpdated
            }
            Frame::ClearColour => {
                info!("base colour cleared");
                self.set_colour(DEFAULT_COLOUR);
                Outcome::StateUpdated
            }
            Frame::ClearPalette => {
                info!("palette cleared");
                self.palette = None;
                Outcome::StateUpdated
            }
            Frame::GameName(name) => {
                info!(game = %name, "game name set");
                self.game_name = Some(name);
                Outcome::StateUpdated
            }
            Frame::Unknown { .. } | Frame::Invalid { .. } => Outcome::Ignored,
        }
    }

    /// Show a pre-recorded BGR image at 128x32 before any client connects.
    pub fn show_opening_frame<R: Renderer + ?Sized>(
        &mut self,
        bgr: Vec<u8>,
        renderer: &mut R,
    ) -> Outcome {
        self.set_dimensions(OPENING_DIMENSIONS, renderer);
        self.apply(Frame::from_bgr(bgr), renderer)
    }

    /// Forget what the last client sent. Dimensions are kept so the raster
    /// currently on screen stays valid; counters are kept for reporting.
    pub fn reset(&mut self) {
        debug!("session reset");
        self.palette = None;
        self.game_name = None;
        self.previous = None;
        self.set_colour(DEFAULT_COLOUR);
    }

    pub fn led(&self) -> LedMatrix {
        self.led
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn palette(&self) -> Option<&[u32]> {
        self.palette.as_deref()
    }

    pub fn colour(&self) -> u32 {
        self.colour
    }

    pub fn hsl(&self) -> Hsl {
        self.hsl
    }

    pub fn game_name(&self) -> Option<&str> {
        self.game_name.as_deref()
    }

    pub fn previous(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    fn set_colour(&mut self, colour: u32) {
        self.colour = colour;
        self.hsl = Hsl::from_rgb(colour);
    }

    fn set_dimensions<R: Renderer + ?Sized>(&mut self, dimensions: Dimensions, renderer: &mut R) {
        if self.dimensions != Some(dimensions) {
            info!(%dimensions, "dimensions changed");
            self.previous = None;
        }
        self.dimensions = Some(dimensions);
        let (width, height) = self.led.raster_size(dimensions);
        renderer.on_dimensions_changed(width, height);
    }

    fn is_new_frame(&self, frame: &Frame) -> bool {
        match &self.previous {
            Some(previous) => previous.kind() != frame.kind() || previous.planes() != frame.planes(),
            None => true,
        }
    }

    fn render<R: Renderer + ?Sized>(&mut self, frame: Frame, renderer: &mut R) -> Outcome {
        let Some(dimensions) = self.dimensions else {
            debug!(kind = frame.label(), "raster frame before dimensions");
            return Outcome::NoDimensions;
        };
        if !self.is_new_frame(&frame) {
            debug!(kind = frame.label(), timestamp = ?frame.timestamp(), "duplicate frame");
            self.duplicates += 1;
            return Outcome::Duplicate;
        }

        if let Err(error) = self.composite(&frame, dimensions, renderer) {
            warn!(kind = frame.label(), %error, "frame rejected");
            self.rejected += 1;
            return Outcome::Rejected(error);
        }

        let (width, height) = self.led.raster_size(dimensions);
        renderer.on_raster_ready(width, height);
        self.frames_rendered += 1;
        self.previous = Some(frame);
        Outcome::Rendered
    }

    fn composite<R: Renderer + ?Sized>(
        &self,
        frame: &Frame,
        dimensions: Dimensions,
        renderer: &mut R,
    ) -> Result<(), CompositeError> {
        let Some(payload) = frame.raster_payload() else {
            return Ok(());
        };
        match payload {
            RasterPayload::Bitplanes {
                depth,
                palette,
                planes,
            } => {
                let colours = self.colour_source(depth, palette)?;
                let image = BitplaneImage::new(planes, depth, dimensions, colours)?;
                let mut canvas = Canvas::new(raster(renderer), dimensions, self.led)?;
                image.composite(&mut canvas);
            }
            RasterPayload::Rgb24 { planes } => {
                let image = RgbImage::new(planes, dimensions)?;
                let mut canvas = Canvas::new(raster(renderer), dimensions, self.led)?;
                image.composite(&mut canvas);
            }
        }
        Ok(())
    }

    /// Frame palette first; then the standalone palette when its length fits
    /// the depth exactly; otherwise the gradient over the base colour.
    fn colour_source<'p>(
        &'p self,
        depth: BitDepth,
        frame_palette: Option<&'p [u32]>,
    ) -> Result<ColourSource<'p>, CompositeError> {
        if let Some(palette) = frame_palette {
            return ColourSource::palette(palette, depth);
        }
        match self.palette.as_deref() {
            Some(palette) if palette.len() == depth.palette_len() => {
                ColourSource::palette(palette, depth)
            }
            _ => Ok(ColourSource::gradient(self.hsl, depth)),
        }
    }
}

fn raster<R: Renderer + ?Sized>(renderer: &mut R) -> &mut [u32] {
    renderer.raster_mut().unwrap_or_default()
}

impl Default for FrameSession {
    fn default() -> Self {
        Self::new(LedMatrix::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameSession, Outcome, Renderer};
    use crate::composite::CompositeError;
    use crate::matrix::{Dimensions, LedMatrix};
    use crate::protocol::{BitDepth, Frame};

    #[derive(Default)]
    struct Recorder {
        size: (u32, u32),
        buffer: Vec<u32>,
        resized: Vec<(u32, u32)>,
        ready: usize,
    }

    impl Renderer for Recorder {
        fn on_dimensions_changed(&mut self, width: u32, height: u32) {
            self.size = (width, height);
            self.buffer = vec![0; width as usize * height as usize];
            self.resized.push((width, height));
        }

        fn raster_mut(&mut self) -> Option<&mut [u32]> {
            Some(&mut self.buffer)
        }

        fn on_raster_ready(&mut self, _width: u32, _height: u32) {
            self.ready += 1;
        }
    }

    fn gray2(timestamp: i32, planes: &[u8]) -> Frame {
        Frame::GrayPlanes {
            depth: BitDepth::Two,
            timestamp,
            planes: planes.to_vec(),
        }
    }

    #[test]
    fn raster_before_dimensions_is_dropped() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        let outcome = session.apply(gray2(0, &[0xFF, 0xFF]), &mut renderer);
        assert_eq!(outcome, Outcome::NoDimensions);
        assert_eq!(renderer.ready, 0);
        assert!(session.previous().is_none());
    }

    #[test]
    fn dimensions_report_expanded_size() {
        let mut session = FrameSession::default();
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(128, 32)), &mut renderer);
        assert_eq!(renderer.resized, vec![(384, 96)]);
    }

    #[test]
    fn duplicate_ignores_timestamp() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut renderer);

        assert_eq!(session.apply(gray2(1, &[0x01, 0x00]), &mut renderer), Outcome::Rendered);
        assert_eq!(session.apply(gray2(2, &[0x01, 0x00]), &mut renderer), Outcome::Duplicate);
        assert_eq!(session.apply(gray2(3, &[0x02, 0x00]), &mut renderer), Outcome::Rendered);
        assert_eq!(renderer.ready, 2);
        assert_eq!(session.duplicates(), 1);
    }

    #[test]
    fn same_planes_different_kind_is_new() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut renderer);

        assert_eq!(session.apply(gray2(0, &[0x01, 0x00]), &mut renderer), Outcome::Rendered);

        let coloured = Frame::ColouredGray {
            depth: BitDepth::Two,
            timestamp: 0,
            palette: vec![0, 0x00FF_0000, 0, 0],
            planes: vec![0x01, 0x00],
        };
        assert_eq!(session.apply(coloured, &mut renderer), Outcome::Rendered);
        assert_eq!(renderer.buffer[0], 0xFFFF_0000);
    }

    #[test]
    fn rejected_frame_keeps_previous() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut renderer);
        session.apply(gray2(0, &[0xFF, 0x00]), &mut renderer);
        let before = renderer.buffer.clone();

        let outcome = session.apply(gray2(0, &[0xFF]), &mut renderer);
        assert_eq!(
            outcome,
            Outcome::Rejected(CompositeError::InvalidPlaneShape {
                planes: 1,
                depth: 2,
                area: 8
            })
        );
        assert_eq!(renderer.buffer, before);
        assert_eq!(session.previous(), Some(&gray2(0, &[0xFF, 0x00])));
        assert_eq!(session.rejected(), 1);
    }

    #[test]
    fn standalone_palette_used_only_at_exact_length() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut renderer);

        let palette = vec![0, 0x0000_00AA, 0, 0, 0, 0, 0, 0];
        session.apply(Frame::Palette(palette), &mut renderer);
        session.apply(gray2(0, &[0x01, 0x00]), &mut renderer);
        assert_eq!(renderer.buffer[0], 0xFF00_00AA);

        session.apply(Frame::Palette(vec![0, 0x0000_00AA, 0, 0]), &mut renderer);
        session.apply(Frame::Colour(0xFF0000), &mut renderer);
        session.apply(gray2(0, &[0x02, 0x00]), &mut renderer);
        assert_eq!(renderer.buffer[1], 0xFF40_0000);
    }

    #[test]
    fn state_frames_update_session() {
        let mut session = FrameSession::default();
        let mut renderer = Recorder::default();

        session.apply(Frame::Colour(0xFF4500), &mut renderer);
        assert_eq!(session.colour(), 0xFF4500);
        session.apply(Frame::ClearColour, &mut renderer);
        assert_eq!(session.colour(), 0xEC843D);

        session.apply(Frame::Palette(vec![1, 2]), &mut renderer);
        assert_eq!(session.palette(), Some(&[1u32, 2][..]));
        session.apply(Frame::ClearPalette, &mut renderer);
        assert_eq!(session.palette(), None);

        let outcome = session.apply(Frame::GameName("afm_113b".to_string()), &mut renderer);
        assert_eq!(outcome, Outcome::StateUpdated);
        assert_eq!(session.game_name(), Some("afm_113b"));

        let unknown = Frame::Unknown {
            tag: "bogus".to_string(),
        };
        assert_eq!(session.apply(unknown, &mut renderer), Outcome::Ignored);
    }

    #[test]
    fn reset_keeps_dimensions() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut renderer);
        session.apply(Frame::Colour(0x123456), &mut renderer);
        session.apply(gray2(0, &[0x01, 0x00]), &mut renderer);

        session.reset();
        assert_eq!(session.dimensions(), Some(Dimensions::new(8, 1)));
        assert_eq!(session.colour(), 0xEC843D);
        assert!(session.previous().is_none());
        assert_eq!(session.apply(gray2(0, &[0x01, 0x00]), &mut renderer), Outcome::Rendered);
    }

    #[test]
    fn opening_frame_sets_splash_dimensions() {
        let mut session = FrameSession::new(LedMatrix::disabled());
        let mut renderer = Recorder::default();
        let mut bgr = vec![0u8; 128 * 32 * 3];
        bgr[0] = 0xFF;

        let outcome = session.show_opening_frame(bgr, &mut renderer);
        assert_eq!(outcome, Outcome::Rendered);
        assert_eq!(session.dimensions(), Some(Dimensions::new(128, 32)));
        assert_eq!(renderer.buffer[0], 0xFF00_00FF);
    }

    #[test]
    fn missing_buffer_is_rejected() {
        struct Detached;
        impl Renderer for Detached {
            fn on_dimensions_changed(&mut self, _width: u32, _height: u32) {}
            fn raster_mut(&mut self) -> Option<&mut [u32]> {
                None
            }
            fn on_raster_ready(&mut self, _width: u32, _height: u32) {}
        }

        let mut session = FrameSession::new(LedMatrix::disabled());
        session.apply(Frame::Dimensions(Dimensions::new(8, 1)), &mut Detached);
        let outcome = session.apply(gray2(0, &[0x01, 0x00]), &mut Detached);
        assert_eq!(
            outcome,
            Outcome::Rejected(CompositeError::BufferTooSmall {
                needed: 8,
                actual: 0
            })
        );
    }
}
