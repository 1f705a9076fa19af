use tracing::{debug, info, warn};

use crate::audio::NarrationTrack;
use crate::effects::TransitionKind;
use crate::foundation::error::{ReelError, ReelResult};
use crate::project::{MediaItem, ProjectSettings, Scene};

/// The ordered scene list representing the full video.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    scenes: Vec<Scene>,
}

impl Timeline {
    /// Derive a scene list from the project's media items and optional narration.
    ///
    /// Timing policy: when narration is present and its duration is known, the
    /// narration duration is divided evenly across all items and per-image
    /// durations are ignored (audio wins). When there is no narration, or its
    /// duration could not be probed, each scene keeps its item's configured
    /// duration.
    ///
    /// Generation replaces any prior scene list wholesale; per-scene edits made
    /// before regenerating (overlays, transitions) are not carried over.
    pub fn generate(
        media: &[MediaItem],
        narration: Option<&NarrationTrack>,
        settings: &ProjectSettings,
    ) -> ReelResult<Self> {
        if media.is_empty() {
            return Err(ReelError::EmptyProject);
        }

        let audio_per_item = match narration {
            None => None,
            Some(track) => match track.duration_secs {
                Some(d) if d.is_finite() && d > 0.0 => {
                    let per = d / media.len() as f64;
                    info!(
                        narration_secs = d,
                        per_item_secs = per,
                        "narration timing overrides per-image durations"
                    );
                    Some(per)
                }
                _ => {
                    warn!(
                        path = %track.path.display(),
                        "narration duration unavailable; falling back to per-image durations"
                    );
                    None
                }
            },
        };

        let mut scenes = Vec::with_capacity(media.len());
        let mut start = 0.0f64;
        for item in media {
            let duration = match audio_per_item {
                Some(per) => per,
                None => item.duration_secs,
            };
            if !duration.is_finite() || duration <= 0.0 {
                return Err(ReelError::validation(format!(
                    "media item '{}' has non-positive duration",
                    item.path.display()
                )));
            }

            scenes.push(Scene {
                content: item.path.clone(),
                start_secs: start,
                duration_secs: duration,
                text_overlay: String::new(),
                transition: settings.default_transition,
            });
            start += duration;
        }

        debug!(scenes = scenes.len(), total_secs = start, "timeline generated");
        Ok(Self { scenes })
    }

    /// Borrow the ordered scene list.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// `true` when the timeline holds no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Sum of all scene durations in seconds.
    pub fn total_secs(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration_secs).sum()
    }

    /// Set one scene's duration. Does not recompute start times.
    pub fn set_duration(&mut self, index: usize, secs: f64) -> ReelResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ReelError::validation(
                "scene duration must be finite and > 0",
            ));
        }
        self.scene_mut(index)?.duration_secs = secs;
        Ok(())
    }

    /// Set one scene's text overlay. An empty string clears it.
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) -> ReelResult<()> {
        self.scene_mut(index)?.text_overlay = text.into();
        Ok(())
    }

    /// Set one scene's entry transition.
    pub fn set_transition(&mut self, index: usize, kind: TransitionKind) -> ReelResult<()> {
        self.scene_mut(index)?.transition = kind;
        Ok(())
    }

    /// Swap a scene with its predecessor. Does not recompute start times.
    pub fn swap_earlier(&mut self, index: usize) -> ReelResult<()> {
        self.check_index(index)?;
        if index == 0 {
            return Err(ReelError::validation("first scene has no predecessor"));
        }
        self.scenes.swap(index - 1, index);
        Ok(())
    }

    /// Swap a scene with its successor. Does not recompute start times.
    pub fn swap_later(&mut self, index: usize) -> ReelResult<()> {
        self.check_index(index)?;
        if index + 1 >= self.scenes.len() {
            return Err(ReelError::validation("last scene has no successor"));
        }
        self.scenes.swap(index, index + 1);
        Ok(())
    }

    /// Delete and return one scene. Does not recompute start times.
    pub fn remove(&mut self, index: usize) -> ReelResult<Scene> {
        self.check_index(index)?;
        Ok(self.scenes.remove(index))
    }

    /// Restore the contiguity invariant: each scene starts where the previous
    /// one ends, the first at zero.
    pub fn recompute_start_times(&mut self) {
        let mut start = 0.0f64;
        for scene in &mut self.scenes {
            scene.start_secs = start;
            start += scene.duration_secs;
        }
    }

    fn scene_mut(&mut self, index: usize) -> ReelResult<&mut Scene> {
        let len = self.scenes.len();
        self.scenes
            .get_mut(index)
            .ok_or_else(|| ReelError::validation(format!("scene index {index} out of range (len {len})")))
    }

    fn check_index(&self, index: usize) -> ReelResult<()> {
        if index >= self.scenes.len() {
            return Err(ReelError::validation(format!(
                "scene index {index} out of range (len {})",
                self.scenes.len()
            )));
        }
        Ok(())
    }
}
