use std::path::PathBuf;

use crate::foundation::core::Fps;
use crate::foundation::error::ReelResult;
use crate::render::FrameRgba;

/// Configuration provided to a [`FrameSink`] at the start of a render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Target video bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Optional narration audio to attach.
    pub audio: Option<AudioInput>,
}

/// Narration audio input for sinks that support audio encoding.
#[derive(Debug, Clone)]
pub struct AudioInput {
    /// Path to an encoded audio file (wav/mp3/...).
    pub path: PathBuf,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// `push_frame` is called once per output frame, in playback order, between
/// exactly one `begin` and one `end`.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push the next frame in playback order.
    fn push_frame(&mut self, frame: &FrameRgba) -> ReelResult<()>;
    /// Called once after the last frame; finalizes the artifact.
    fn end(&mut self) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<FrameRgba>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[FrameRgba] {
        &self.frames
    }

    /// `true` once `end` ran.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRgba) -> ReelResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}
