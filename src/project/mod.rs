//! Project data model: media items, scenes, and output settings.

mod model;

pub use model::{
    DEFAULT_ITEM_SECS, MediaItem, MediaOrigin, ProjectSettings, QualityPreset, Scene, TextAnchor,
};
