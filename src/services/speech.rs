use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::foundation::error::{ReelError, ReelResult};

/// Baseline speaking rate in words per minute at `rate == 1.0`.
const BASE_WPM: f64 = 175.0;

/// Text-to-speech collaborator.
pub trait SpeechSynthesizer {
    /// Synthesize `text` in `language` at the given rate multiplier into a
    /// WAV file at `out_path`.
    ///
    /// Empty or blank text is rejected before the backend runs; backend
    /// failures surface as recoverable [`ReelError::ExternalService`] values.
    fn synthesize(&self, text: &str, language: &str, rate: f64, out_path: &Path)
    -> ReelResult<()>;
}

/// Synthesizer driving the `espeak-ng` binary.
#[derive(Clone, Debug)]
pub struct EspeakSynthesizer {
    binary: PathBuf,
}

impl Default for EspeakSynthesizer {
    fn default() -> Self {
        Self::new("espeak-ng")
    }
}

impl EspeakSynthesizer {
    /// Use a specific binary (an absolute path or a name looked up on PATH).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn synthesize(
        &self,
        text: &str,
        language: &str,
        rate: f64,
        out_path: &Path,
    ) -> ReelResult<()> {
        validate_request(text, rate)?;

        let wpm = (BASE_WPM * rate).round().clamp(80.0, 450.0) as u32;
        debug!(language, wpm, out = %out_path.display(), "synthesizing narration");

        let output = Command::new(&self.binary)
            .args(["-v", language.trim(), "-s", &wpm.to_string(), "-w"])
            .arg(out_path)
            .arg(text)
            .output()
            .map_err(|e| {
                ReelError::external(
                    "speech synthesis",
                    None,
                    format!(
                        "failed to run '{}' (is it installed and on PATH?): {e}",
                        self.binary.display()
                    ),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::external(
                "speech synthesis",
                None,
                format!("{} exited with {}: {}", self.binary.display(), output.status, stderr.trim()),
            ));
        }
        Ok(())
    }
}

fn validate_request(text: &str, rate: f64) -> ReelResult<()> {
    if text.trim().is_empty() {
        return Err(ReelError::validation("narration text must be non-empty"));
    }
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ReelError::validation(
            "speech rate multiplier must be finite and > 0",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected_before_the_backend_runs() {
        // The binary does not exist; validation must fire first.
        let synth = EspeakSynthesizer::new("/definitely/not/a/binary");
        let err = synth
            .synthesize("   ", "en", 1.0, Path::new("out.wav"))
            .unwrap_err();
        assert!(matches!(err, ReelError::Validation(_)));
    }

    #[test]
    fn bad_rate_is_rejected() {
        assert!(validate_request("hello", 0.0).is_err());
        assert!(validate_request("hello", f64::NAN).is_err());
        validate_request("hello", 1.25).unwrap();
    }

    #[test]
    fn missing_binary_surfaces_as_external_error() {
        let synth = EspeakSynthesizer::new("/definitely/not/a/binary");
        let err = synth
            .synthesize("hello", "en", 1.0, Path::new("out.wav"))
            .unwrap_err();
        assert!(matches!(err, ReelError::ExternalService { .. }));
    }
}
