//! Encoding sinks: the ffmpeg subprocess backend and an in-memory test double.

mod ffmpeg;
mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use sink::{AudioInput, FrameSink, InMemorySink, SinkConfig};
