use crate::foundation::error::{ReelError, ReelResult};

/// Output dimensions in pixels.
///
/// Both sides must be non-zero and even (required for yuv420p MP4 output).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("resolution sides must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "resolution sides must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(Self { width, height })
    }

    /// Parse a `WxH` label such as `"1280x720"`.
    ///
    /// This is the boundary where stringly-typed user input becomes a
    /// structured pair; everything past it works with validated numbers.
    pub fn parse(label: &str) -> ReelResult<Self> {
        let s = label.trim();
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| ReelError::validation(format!("resolution '{s}' must look like WxH")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| ReelError::validation(format!("invalid resolution width '{w}'")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| ReelError::validation(format!("invalid resolution height '{h}'")))?;
        Self::new(width, height)
    }

    /// Number of pixels in one frame.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Whole frames-per-second output rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(
    /// Frames per second, must be > 0.
    pub u32,
);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> ReelResult<Self> {
        if fps == 0 {
            return Err(ReelError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Convert seconds to a frame count using round-to-nearest semantics.
    pub fn secs_to_frames(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) / self.as_f64()
    }
}
