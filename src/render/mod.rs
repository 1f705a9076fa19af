//! The staged render pipeline: clip-build, text-composite, transition,
//! concatenate, audio-attach, encode.

mod clip;
mod frame;
mod job;
mod pipeline;
mod plan;
mod progress;
mod text;

pub use clip::{SceneClip, build_scene_clip};
pub use frame::FrameRgba;
pub use job::{RenderJob, RenderStatus};
pub use pipeline::{
    RenderStats, render_timeline, render_to_mp4, render_to_mp4_at, timestamped_output_path,
};
pub use plan::{ClipSpan, ConcatPlan, FrameSources};
