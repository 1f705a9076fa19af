//! External collaborators: speech synthesis and image search.

mod search;
mod speech;

pub use search::{ImageHit, ImageSearchProvider, PexelsClient, fetch_bytes};
pub use speech::{EspeakSynthesizer, SpeechSynthesizer};
