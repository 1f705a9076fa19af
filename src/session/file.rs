use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::effects::TransitionKind;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{ReelError, ReelResult};
use crate::project::{ProjectSettings, QualityPreset, TextAnchor};

/// A project description loaded from JSON, as consumed by the CLI.
///
/// User-facing fields are strings (`"1280x720"`, `"crossfade"`); this loader
/// is the boundary where they are parsed into closed types.
#[derive(Debug, Deserialize)]
pub struct ProjectFile {
    /// Media entries in playback order.
    pub media: Vec<MediaEntry>,
    /// Optional narration audio file.
    #[serde(default)]
    pub narration: Option<PathBuf>,
    /// Optional output settings; defaults apply per field.
    #[serde(default)]
    pub settings: SettingsEntry,
}

/// One media entry in a project file.
#[derive(Debug, Deserialize)]
pub struct MediaEntry {
    /// Image file path (relative paths resolve against the project file).
    pub path: PathBuf,
    /// Display duration override in seconds.
    #[serde(default)]
    pub duration_secs: Option<f64>,
    /// Text overlay applied to the generated scene.
    #[serde(default)]
    pub text: Option<String>,
    /// Transition override for the generated scene.
    #[serde(default)]
    pub transition: Option<String>,
}

/// Stringly settings block of a project file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettingsEntry {
    /// `WxH` label, e.g. `"1280x720"`.
    pub resolution: Option<String>,
    /// Frames per second.
    pub fps: Option<u32>,
    /// Default transition identifier.
    pub transition: Option<String>,
    /// Transition duration in seconds.
    pub transition_secs: Option<f64>,
    /// Quality preset identifier.
    pub quality: Option<String>,
    /// Text anchor identifier.
    pub text_anchor: Option<String>,
}

impl ProjectFile {
    /// Load and deserialize a project file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::validation(format!("failed to read project file '{}': {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ReelError::validation(format!("invalid project file '{}': {e}", path.display()))
        })
    }

    /// Parse the stringly settings block into validated [`ProjectSettings`].
    pub fn settings(&self) -> ReelResult<ProjectSettings> {
        let mut settings = ProjectSettings::default();
        if let Some(label) = self.settings.resolution.as_deref() {
            settings.resolution = Resolution::parse(label)?;
        }
        if let Some(fps) = self.settings.fps {
            settings.fps = Fps::new(fps)?;
        }
        if let Some(kind) = self.settings.transition.as_deref() {
            settings.default_transition = TransitionKind::parse(kind)?;
        }
        if let Some(secs) = self.settings.transition_secs {
            settings.transition_secs = secs;
        }
        if let Some(preset) = self.settings.quality.as_deref() {
            settings.quality = QualityPreset::parse(preset)?;
        }
        if let Some(anchor) = self.settings.text_anchor.as_deref() {
            settings.text_anchor = TextAnchor::parse(anchor)?;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_block_parses_at_the_boundary() {
        let file: ProjectFile = serde_json::from_str(
            r#"{
                "media": [
                    {"path": "a.png", "duration_secs": 2.5, "text": "Intro"},
                    {"path": "b.png", "transition": "none"}
                ],
                "narration": "voice.wav",
                "settings": {
                    "resolution": "640x360",
                    "fps": 24,
                    "transition": "dissolve",
                    "transition_secs": 0.25,
                    "quality": "low",
                    "text_anchor": "bottom-right"
                }
            }"#,
        )
        .unwrap();

        let settings = file.settings().unwrap();
        assert_eq!(settings.resolution, Resolution { width: 640, height: 360 });
        assert_eq!(settings.fps, Fps(24));
        assert_eq!(settings.default_transition, TransitionKind::Crossfade);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.text_anchor, TextAnchor::BottomRight);
        assert_eq!(file.media.len(), 2);
        assert_eq!(file.media[0].text.as_deref(), Some("Intro"));
    }

    #[test]
    fn bad_labels_are_rejected() {
        let file: ProjectFile = serde_json::from_str(
            r#"{"media": [], "settings": {"resolution": "huge"}}"#,
        )
        .unwrap();
        assert!(file.settings().is_err());

        let file: ProjectFile = serde_json::from_str(
            r#"{"media": [], "settings": {"transition": "wipe"}}"#,
        )
        .unwrap();
        assert!(file.settings().is_err());
    }

    #[test]
    fn empty_settings_block_yields_defaults() {
        let file: ProjectFile = serde_json::from_str(r#"{"media": []}"#).unwrap();
        let settings = file.settings().unwrap();
        assert_eq!(settings.resolution, Resolution { width: 1280, height: 720 });
    }
}
