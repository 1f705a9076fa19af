use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::clip::SceneClip;

/// One clip's placement on the output frame timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipSpan {
    /// First output frame this clip contributes to.
    pub start_frame: u64,
    /// Number of frames the clip is held for.
    pub frames: u64,
    /// Leading frames shared with the previous clip (crossfade overlap).
    pub overlap_in: u64,
}

/// Which clip(s) produce a given output frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameSources {
    /// Exactly one clip is visible.
    Single(usize),
    /// Two clips overlap inside a crossfade boundary.
    Blend {
        /// Index of the clip fading out.
        outgoing: usize,
        /// Index of the clip fading in.
        incoming: usize,
        /// Incoming clip weight in `[0, 1)`, linear over the overlap.
        progress: f64,
    },
}

/// Frame-accurate concatenation plan for an ordered clip list.
///
/// The plan is pure bookkeeping: clip offsets, boundary overlaps, and the
/// total frame count. Executing it (sampling pixels, blending, encoding) is
/// the pipeline's job, which keeps the sequencing logic testable on its own.
#[derive(Clone, Debug)]
pub struct ConcatPlan {
    spans: Vec<ClipSpan>,
    total_frames: u64,
    fps: Fps,
}

impl ConcatPlan {
    /// Place every clip on the output timeline.
    ///
    /// A boundary is composited only when the incoming clip's transition is
    /// composited (currently crossfade) and `transition_secs > 0`. The overlap
    /// is clamped so it never exceeds either adjacent clip, nor eats into the
    /// previous boundary's overlap.
    pub fn build(clips: &[SceneClip], transition_secs: f64, fps: Fps) -> ReelResult<Self> {
        if clips.is_empty() {
            return Err(ReelError::NoClipsProduced);
        }
        if !transition_secs.is_finite() || transition_secs < 0.0 {
            return Err(ReelError::validation(
                "transition duration must be finite and >= 0",
            ));
        }

        let mut spans: Vec<ClipSpan> = Vec::with_capacity(clips.len());
        let mut cursor = 0u64;
        for (i, clip) in clips.iter().enumerate() {
            let frames = fps.secs_to_frames(clip.duration_secs).max(1);

            let overlap_in = if i == 0 || !clip.transition.is_composited() || transition_secs <= 0.0
            {
                0
            } else {
                let prev = &spans[i - 1];
                let prev_tail = prev.frames.saturating_sub(prev.overlap_in);
                let wanted_secs = transition_secs
                    .min(clips[i - 1].duration_secs)
                    .min(clip.duration_secs);
                fps.secs_to_frames(wanted_secs).min(prev_tail).min(frames)
            };

            let start_frame = cursor - overlap_in;
            spans.push(ClipSpan {
                start_frame,
                frames,
                overlap_in,
            });
            cursor = start_frame + frames;
        }

        Ok(Self {
            spans,
            total_frames: cursor,
            fps,
        })
    }

    /// Total output frames after overlap composition.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Total output duration in seconds.
    pub fn total_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames)
    }

    /// Per-clip spans in playback order.
    pub fn spans(&self) -> &[ClipSpan] {
        &self.spans
    }

    /// Resolve which clip(s) produce output frame `frame`.
    pub fn sources_at(&self, frame: u64) -> ReelResult<FrameSources> {
        if frame >= self.total_frames {
            return Err(ReelError::validation(format!(
                "frame {frame} outside plan (total {})",
                self.total_frames
            )));
        }

        let mut current = 0usize;
        for (i, span) in self.spans.iter().enumerate() {
            if span.start_frame <= frame && frame < span.start_frame + span.frames {
                current = i;
            }
        }

        let span = &self.spans[current];
        if current > 0 && span.overlap_in > 0 {
            let prev = &self.spans[current - 1];
            if frame < prev.start_frame + prev.frames {
                let progress = (frame - span.start_frame) as f64 / span.overlap_in as f64;
                return Ok(FrameSources::Blend {
                    outgoing: current - 1,
                    incoming: current,
                    progress,
                });
            }
        }
        Ok(FrameSources::Single(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::TransitionKind;
    use crate::render::frame::FrameRgba;

    fn clip(duration_secs: f64, transition: TransitionKind) -> SceneClip {
        SceneClip {
            frame: FrameRgba::new_filled(2, 2, [0, 0, 0, 255]),
            duration_secs,
            transition,
        }
    }

    #[test]
    fn hard_cuts_concatenate_exactly() {
        let clips = vec![
            clip(2.0, TransitionKind::None),
            clip(3.0, TransitionKind::None),
        ];
        let plan = ConcatPlan::build(&clips, 0.5, Fps(10)).unwrap();
        assert_eq!(plan.total_frames(), 50);
        assert_eq!(plan.spans()[1].start_frame, 20);
        assert_eq!(plan.spans()[1].overlap_in, 0);
        assert_eq!(plan.sources_at(19).unwrap(), FrameSources::Single(0));
        assert_eq!(plan.sources_at(20).unwrap(), FrameSources::Single(1));
    }

    #[test]
    fn crossfade_overlaps_and_shortens_total() {
        let clips = vec![
            clip(3.0, TransitionKind::None),
            clip(3.0, TransitionKind::Crossfade),
        ];
        let plan = ConcatPlan::build(&clips, 1.0, Fps(10)).unwrap();
        // 30 + 30 - 10 overlap.
        assert_eq!(plan.total_frames(), 50);
        assert_eq!(plan.spans()[1].start_frame, 20);
        assert_eq!(plan.spans()[1].overlap_in, 10);

        assert_eq!(plan.sources_at(19).unwrap(), FrameSources::Single(0));
        match plan.sources_at(25).unwrap() {
            FrameSources::Blend {
                outgoing,
                incoming,
                progress,
            } => {
                assert_eq!((outgoing, incoming), (0, 1));
                assert!((progress - 0.5).abs() < 1e-9);
            }
            other => panic!("expected blend, got {other:?}"),
        }
        assert_eq!(plan.sources_at(30).unwrap(), FrameSources::Single(1));
    }

    #[test]
    fn blend_progress_is_monotone_across_the_overlap() {
        let clips = vec![
            clip(2.0, TransitionKind::None),
            clip(2.0, TransitionKind::Crossfade),
        ];
        let plan = ConcatPlan::build(&clips, 0.8, Fps(25)).unwrap();

        let mut last = -1.0f64;
        for frame in 0..plan.total_frames() {
            if let FrameSources::Blend { progress, .. } = plan.sources_at(frame).unwrap() {
                assert!(progress > last);
                assert!((0.0..1.0).contains(&progress));
                last = progress;
            }
        }
        assert!(last >= 0.0, "no blend frames were produced");
    }

    #[test]
    fn zero_duration_or_non_composited_kinds_cut() {
        let clips = vec![
            clip(2.0, TransitionKind::None),
            clip(2.0, TransitionKind::Crossfade),
        ];
        let plan = ConcatPlan::build(&clips, 0.0, Fps(10)).unwrap();
        assert_eq!(plan.total_frames(), 40);
        assert_eq!(plan.spans()[1].overlap_in, 0);

        // Fade and slide kinds degrade to cuts.
        let clips = vec![clip(2.0, TransitionKind::None), clip(2.0, TransitionKind::Fade)];
        let plan = ConcatPlan::build(&clips, 1.0, Fps(10)).unwrap();
        assert_eq!(plan.spans()[1].overlap_in, 0);
    }

    #[test]
    fn overlap_is_clamped_to_short_neighbors() {
        let clips = vec![
            clip(0.4, TransitionKind::None),
            clip(5.0, TransitionKind::Crossfade),
        ];
        let plan = ConcatPlan::build(&clips, 2.0, Fps(10)).unwrap();
        // Wanted 20 frames, but the outgoing clip only has 4.
        assert_eq!(plan.spans()[1].overlap_in, 4);
        assert_eq!(plan.spans()[1].start_frame, 0);
    }

    #[test]
    fn empty_clip_list_is_rejected() {
        assert!(matches!(
            ConcatPlan::build(&[], 0.5, Fps(10)).unwrap_err(),
            ReelError::NoClipsProduced
        ));
    }

    #[test]
    fn sub_frame_durations_round_up_to_one_frame() {
        let clips = vec![clip(0.01, TransitionKind::None)];
        let plan = ConcatPlan::build(&clips, 0.0, Fps(10)).unwrap();
        assert_eq!(plan.total_frames(), 1);
        assert_eq!(plan.sources_at(0).unwrap(), FrameSources::Single(0));
    }
}
