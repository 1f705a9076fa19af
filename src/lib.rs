//! Storyreel assembles short narrated videos from still images, text
//! overlays, and crossfade transitions, exporting MP4 through ffmpeg.
//!
//! The flow is session-oriented:
//!
//! - Collect media, narration, and settings into a [`Project`]
//! - Generate a [`Timeline`] (audio-synchronized or per-image timing)
//! - Render through the staged pipeline into a [`RenderJob`] artifact
//!
//! The render pipeline is an explicit ordered sequence of stages (clip-build,
//! text-composite, transition, concatenate, audio-attach, encode), each
//! independently testable; the encode seam is the [`encode::FrameSink`]
//! trait, backed by ffmpeg in production and an in-memory sink in tests.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Session-scoped media storage.
pub mod assets;
/// Narration track handling.
pub mod audio;
/// Boundary transitions.
pub mod effects;
/// Encoding sinks.
pub mod encode;
/// Project data model.
pub mod project;
/// Staged render pipeline.
pub mod render;
/// External collaborators (speech synthesis, image search).
pub mod services;
/// Session aggregate and project files.
pub mod session;
/// Timeline synthesis and editing.
pub mod timeline;

pub use crate::foundation::core::{Fps, Resolution};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::audio::{NarrationSource, NarrationTrack};
pub use crate::effects::TransitionKind;
pub use crate::project::{MediaItem, MediaOrigin, ProjectSettings, QualityPreset, Scene, TextAnchor};
pub use crate::render::{RenderJob, RenderStats, RenderStatus};
pub use crate::session::Project;
pub use crate::timeline::Timeline;
