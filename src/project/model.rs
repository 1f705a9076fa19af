use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::effects::TransitionKind;
use crate::foundation::core::{Fps, Resolution};
use crate::foundation::error::{ReelError, ReelResult};

/// Default display duration for an imported image, in seconds.
pub const DEFAULT_ITEM_SECS: f64 = 3.0;

/// Where a media item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaOrigin {
    /// Downloaded from the image search service.
    SearchResult,
    /// Supplied by the user.
    UserUpload,
}

/// A still image contributed to the project.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaItem {
    /// Image file location.
    pub path: PathBuf,
    /// Import origin.
    pub origin: MediaOrigin,
    /// Display duration in seconds, user-editable before timeline generation.
    #[serde(default = "default_item_secs")]
    pub duration_secs: f64,
    /// Photographer or source credit, when known.
    #[serde(default)]
    pub credit: Option<String>,
}

fn default_item_secs() -> f64 {
    DEFAULT_ITEM_SECS
}

impl MediaItem {
    /// Create an item with the default display duration.
    pub fn new(path: impl Into<PathBuf>, origin: MediaOrigin) -> Self {
        Self {
            path: path.into(),
            origin,
            duration_secs: DEFAULT_ITEM_SECS,
            credit: None,
        }
    }

    /// Set the display duration, which must be finite and positive.
    pub fn set_duration(&mut self, secs: f64) -> ReelResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ReelError::validation(
                "media item duration must be finite and > 0",
            ));
        }
        self.duration_secs = secs;
        Ok(())
    }
}

/// One timeline entry derived from a media item.
///
/// Immediately after generation `start_secs` equals the sum of all preceding
/// durations. Edits do not keep that in sync; callers that consume
/// `start_secs` after editing must run
/// [`Timeline::recompute_start_times`](crate::timeline::Timeline::recompute_start_times)
/// first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Visual content location.
    pub content: PathBuf,
    /// Start offset in seconds, derived at generation time.
    pub start_secs: f64,
    /// Display duration in seconds.
    pub duration_secs: f64,
    /// Optional text overlay; empty means none.
    #[serde(default)]
    pub text_overlay: String,
    /// Transition applied at this scene's entry boundary.
    #[serde(default)]
    pub transition: TransitionKind,
}

/// Encode quality tiers, mapped to a fixed decreasing bitrate table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityPreset {
    /// 8000 kbit/s.
    High,
    /// 4000 kbit/s.
    #[default]
    Medium,
    /// 1500 kbit/s.
    Low,
}

impl QualityPreset {
    /// Parse a user-facing quality identifier.
    pub fn parse(preset: &str) -> ReelResult<Self> {
        match preset.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ReelError::validation(format!(
                "unknown quality preset '{other}'"
            ))),
        }
    }

    /// Target video bitrate in kbit/s.
    pub fn bitrate_kbps(self) -> u32 {
        match self {
            Self::High => 8000,
            Self::Medium => 4000,
            Self::Low => 1500,
        }
    }
}

/// Placement of the text overlay layer within the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnchor {
    /// Centered horizontally along the bottom edge.
    #[default]
    Bottom,
    /// Centered horizontally along the top edge.
    Top,
    /// Dead center.
    Center,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl TextAnchor {
    /// Parse a user-facing anchor identifier.
    pub fn parse(anchor: &str) -> ReelResult<Self> {
        match anchor.trim().to_ascii_lowercase().as_str() {
            "bottom" => Ok(Self::Bottom),
            "top" => Ok(Self::Top),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "bottom-left" | "bottomleft" => Ok(Self::BottomLeft),
            "bottom-right" | "bottomright" => Ok(Self::BottomRight),
            other => Err(ReelError::validation(format!(
                "unknown text anchor '{other}'"
            ))),
        }
    }
}

/// Project-wide output and styling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Output resolution.
    pub resolution: Resolution,
    /// Output frame rate.
    pub fps: Fps,
    /// Transition assigned to freshly generated scenes.
    pub default_transition: TransitionKind,
    /// Boundary transition duration in seconds; 0 disables composition.
    pub transition_secs: f64,
    /// Encode quality tier.
    pub quality: QualityPreset,
    /// Text overlay placement.
    pub text_anchor: TextAnchor,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution {
                width: 1280,
                height: 720,
            },
            fps: Fps(30),
            default_transition: TransitionKind::Crossfade,
            transition_secs: 0.5,
            quality: QualityPreset::Medium,
            text_anchor: TextAnchor::Bottom,
        }
    }
}

impl ProjectSettings {
    /// Validate field invariants after deserialization or manual edits.
    pub fn validate(&self) -> ReelResult<()> {
        Resolution::new(self.resolution.width, self.resolution.height)?;
        Fps::new(self.fps.0)?;
        if !self.transition_secs.is_finite() || self.transition_secs < 0.0 {
            return Err(ReelError::validation(
                "transition duration must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_item_defaults_to_three_seconds() {
        let item = MediaItem::new("a.png", MediaOrigin::UserUpload);
        assert_eq!(item.duration_secs, DEFAULT_ITEM_SECS);
        assert!(item.credit.is_none());
    }

    #[test]
    fn media_item_rejects_bad_durations() {
        let mut item = MediaItem::new("a.png", MediaOrigin::SearchResult);
        assert!(item.set_duration(0.0).is_err());
        assert!(item.set_duration(-1.0).is_err());
        assert!(item.set_duration(f64::NAN).is_err());
        item.set_duration(5.5).unwrap();
        assert_eq!(item.duration_secs, 5.5);
    }

    #[test]
    fn quality_table_is_decreasing() {
        assert!(QualityPreset::High.bitrate_kbps() > QualityPreset::Medium.bitrate_kbps());
        assert!(QualityPreset::Medium.bitrate_kbps() > QualityPreset::Low.bitrate_kbps());
    }

    #[test]
    fn anchor_parse_accepts_aliases() {
        assert_eq!(TextAnchor::parse("Bottom-Left").unwrap(), TextAnchor::BottomLeft);
        assert_eq!(TextAnchor::parse("middle").unwrap(), TextAnchor::Center);
        assert!(TextAnchor::parse("left").is_err());
    }

    #[test]
    fn default_settings_validate() {
        ProjectSettings::default().validate().unwrap();

        let mut bad = ProjectSettings::default();
        bad.transition_secs = -0.1;
        assert!(bad.validate().is_err());
    }
}
