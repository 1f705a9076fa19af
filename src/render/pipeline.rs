use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audio::NarrationTrack;
use crate::effects::crossfade_rgba8;
use crate::encode::{AudioInput, FfmpegSink, FfmpegSinkOpts, FrameSink, SinkConfig};
use crate::foundation::error::{ReelError, ReelResult};
use crate::project::{ProjectSettings, Scene};
use crate::render::clip::{SceneClip, build_scene_clip};
use crate::render::frame::FrameRgba;
use crate::render::plan::{ConcatPlan, FrameSources};
use crate::render::progress::{ProgressReporter, STAGE_ASSEMBLY, STAGE_AUDIO, STAGE_CLIPS};

/// Summary of one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderStats {
    /// Frames actually emitted to the sink.
    pub frames_emitted: u64,
    /// Scenes dropped because their source was unavailable.
    pub scenes_skipped: usize,
    /// `true` when audio/video duration reconciliation truncated either side.
    pub truncated: bool,
    /// Output duration in seconds.
    pub output_secs: f64,
}

/// Run the ordered render pipeline against an arbitrary sink.
///
/// Stages, in order: clip-build (with text compositing), concatenation
/// planning (with crossfade overlaps), audio attachment (duration
/// reconciliation by truncating the longer side), then frame streaming and
/// finalization. Progress reported through `on_progress` is monotone and
/// reaches 1.0 only when the sink finalizes successfully.
///
/// Scenes whose source cannot be read are dropped with a warning rather than
/// failing the render; see the error taxonomy notes on
/// [`ReelError::MediaUnavailable`].
pub fn render_timeline(
    scenes: &[Scene],
    narration: Option<&NarrationTrack>,
    settings: &ProjectSettings,
    on_progress: Option<&mut dyn FnMut(f32)>,
    sink: &mut dyn FrameSink,
) -> ReelResult<RenderStats> {
    settings.validate()?;
    let mut progress = ProgressReporter::new(on_progress);

    if scenes.is_empty() {
        return Err(ReelError::EmptyTimeline);
    }

    // Stage 1: clip-build + text-composite.
    let mut clips: Vec<SceneClip> = Vec::with_capacity(scenes.len());
    let mut scenes_skipped = 0usize;
    for (i, scene) in scenes.iter().enumerate() {
        match build_scene_clip(scene, settings) {
            Ok(clip) => clips.push(clip),
            Err(ReelError::MediaUnavailable { path }) => {
                warn!(path = %path.display(), "scene source unavailable; dropping scene");
                scenes_skipped += 1;
            }
            Err(other) => return Err(other),
        }
        progress.report(STAGE_CLIPS * (i + 1) as f32 / scenes.len() as f32);
    }

    if clips.is_empty() {
        return Err(ReelError::NoClipsProduced);
    }

    // Stage 2: transition + concatenate.
    let plan = ConcatPlan::build(&clips, settings.transition_secs, settings.fps)?;
    progress.report(STAGE_ASSEMBLY);

    // Stage 3: audio-attach. The longer of {video, narration} is truncated to
    // the shorter: the frame loop stops early, `-shortest` trims the audio.
    let mut total_frames = plan.total_frames();
    let mut truncated = false;
    if let Some(track) = narration
        && let Some(narr_secs) = track.duration_secs
    {
        let narr_frames = settings.fps.secs_to_frames(narr_secs).max(1);
        if narr_frames < total_frames {
            info!(
                video_frames = total_frames,
                narr_frames, "truncating video to narration length"
            );
            total_frames = narr_frames;
            truncated = true;
        } else if narr_frames > total_frames {
            info!(
                video_frames = total_frames,
                narr_frames, "narration will be truncated to video length"
            );
            truncated = true;
        }
    }

    sink.begin(SinkConfig {
        width: settings.resolution.width,
        height: settings.resolution.height,
        fps: settings.fps,
        bitrate_kbps: settings.quality.bitrate_kbps(),
        audio: narration.map(|track| AudioInput {
            path: track.path.clone(),
        }),
    })?;
    progress.report(STAGE_AUDIO);

    // Stage 4: stream frames in playback order.
    let mut scratch = FrameRgba::new_filled(
        settings.resolution.width,
        settings.resolution.height,
        [0, 0, 0, 255],
    );
    for frame_idx in 0..total_frames {
        match plan.sources_at(frame_idx)? {
            FrameSources::Single(clip) => sink.push_frame(&clips[clip].frame)?,
            FrameSources::Blend {
                outgoing,
                incoming,
                progress: t,
            } => {
                crossfade_rgba8(
                    &mut scratch.data,
                    &clips[outgoing].frame.data,
                    &clips[incoming].frame.data,
                    t,
                );
                sink.push_frame(&scratch)?;
            }
        }
        // Cap below 1.0; full completion is only reported after `end`.
        progress.report(STAGE_AUDIO + 0.19 * (frame_idx + 1) as f32 / total_frames as f32);
    }

    sink.end()?;
    progress.report(1.0);

    let stats = RenderStats {
        frames_emitted: total_frames,
        scenes_skipped,
        truncated,
        output_secs: settings.fps.frames_to_secs(total_frames),
    };
    info!(
        frames = stats.frames_emitted,
        skipped = stats.scenes_skipped,
        secs = stats.output_secs,
        "render pipeline complete"
    );
    Ok(stats)
}

/// Render straight to a timestamp-suffixed MP4 under `out_dir`.
///
/// On failure any partially written artifact is removed so a failed render
/// never leaves a half-written file behind.
pub fn render_to_mp4(
    scenes: &[Scene],
    narration: Option<&NarrationTrack>,
    settings: &ProjectSettings,
    out_dir: &Path,
    file_stem: &str,
    on_progress: Option<&mut dyn FnMut(f32)>,
) -> ReelResult<(PathBuf, RenderStats)> {
    let out_path = timestamped_output_path(out_dir, file_stem);
    let stats = render_to_mp4_at(scenes, narration, settings, &out_path, on_progress)?;
    Ok((out_path, stats))
}

/// Render to an MP4 at an exact path, removing any partial artifact on failure.
pub fn render_to_mp4_at(
    scenes: &[Scene],
    narration: Option<&NarrationTrack>,
    settings: &ProjectSettings,
    out_path: &Path,
    on_progress: Option<&mut dyn FnMut(f32)>,
) -> ReelResult<RenderStats> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out_path));

    match render_timeline(scenes, narration, settings, on_progress, &mut sink) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            if out_path.exists()
                && let Err(rm) = std::fs::remove_file(out_path)
            {
                warn!(path = %out_path.display(), error = %rm, "failed to remove partial artifact");
            }
            Err(e)
        }
    }
}

/// Deterministic, unix-seconds-suffixed artifact path.
pub fn timestamped_output_path(dir: &Path, stem: &str) -> PathBuf {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    dir.join(format!("{stem}_{secs}.mp4"))
}
