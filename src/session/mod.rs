//! Session-scoped project aggregate and project-file loading.

mod file;
mod project;

pub use file::{MediaEntry, ProjectFile, SettingsEntry};
pub use project::Project;
