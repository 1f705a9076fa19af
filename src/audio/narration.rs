use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::warn;

use crate::foundation::error::{ReelError, ReelResult};

/// How the narration audio came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NarrationSource {
    /// Produced by the speech synthesis service.
    Synthesized,
    /// Supplied by the user.
    Uploaded,
}

/// The single optional audio asset driving or accompanying the video.
#[derive(Clone, Debug)]
pub struct NarrationTrack {
    /// Audio file location.
    pub path: PathBuf,
    /// Origin of the audio.
    pub source: NarrationSource,
    /// Total duration in seconds; `None` when probing failed, in which case
    /// timeline generation falls back to per-image durations.
    pub duration_secs: Option<f64>,
}

impl NarrationTrack {
    /// Create a track and probe its duration with `ffprobe`.
    ///
    /// A failed probe is recoverable: the track is still usable, it just
    /// cannot drive scene timing.
    pub fn from_file(path: impl Into<PathBuf>, source: NarrationSource) -> Self {
        let path = path.into();
        let duration_secs = match probe_duration_secs(&path) {
            Ok(d) => Some(d),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not probe narration duration");
                None
            }
        };
        Self {
            path,
            source,
            duration_secs,
        }
    }

    /// Create a track with a known duration, skipping the probe.
    pub fn with_duration(
        path: impl Into<PathBuf>,
        source: NarrationSource,
        duration_secs: f64,
    ) -> Self {
        Self {
            path: path.into(),
            source,
            duration_secs: Some(duration_secs),
        }
    }

    /// Create a track whose duration is unknown.
    pub fn unprobed(path: impl Into<PathBuf>, source: NarrationSource) -> Self {
        Self {
            path: path.into(),
            source,
            duration_secs: None,
        }
    }
}

/// Probe a media file's duration in seconds using `ffprobe`.
pub fn probe_duration_secs(path: &Path) -> ReelResult<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            ReelError::external(
                "ffprobe",
                None,
                format!("failed to run ffprobe (is it installed and on PATH?): {e}"),
            )
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelError::external(
            "ffprobe",
            None,
            format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_output(stdout: &str) -> ReelResult<f64> {
    let secs = stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| ReelError::external("ffprobe", None, format!("unparseable duration '{}'", stdout.trim())))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ReelError::external(
            "ffprobe",
            None,
            format!("non-positive duration {secs}"),
        ));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_seconds() {
        assert!((parse_probe_output("7.424000\n").unwrap() - 7.424).abs() < 1e-9);
    }

    #[test]
    fn parse_rejects_garbage_and_non_positive() {
        assert!(parse_probe_output("N/A\n").is_err());
        assert!(parse_probe_output("").is_err());
        assert!(parse_probe_output("0.0").is_err());
        assert!(parse_probe_output("-3.0").is_err());
    }

    #[test]
    fn unprobed_track_has_no_duration() {
        let track = NarrationTrack::unprobed("voice.mp3", NarrationSource::Uploaded);
        assert!(track.duration_secs.is_none());
    }
}
