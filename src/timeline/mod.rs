//! Timeline synthesis and post-generation editing.

mod builder;

pub use builder::Timeline;
