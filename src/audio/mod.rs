//! Narration track handling.

mod narration;

pub use narration::{NarrationSource, NarrationTrack, probe_duration_secs};
