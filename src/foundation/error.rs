use std::path::{Path, PathBuf};

/// Convenience result type used across storyreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided or project data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Timeline generation was requested with zero media items.
    #[error("project has no media items; add images before generating a timeline")]
    EmptyProject,

    /// Rendering was requested with an empty scene list.
    #[error("timeline is empty; generate a timeline before rendering")]
    EmptyTimeline,

    /// Every scene in the timeline was dropped during clip building.
    #[error("no clips could be produced; every scene source was unavailable")]
    NoClipsProduced,

    /// A scene's visual content could not be located or decoded.
    #[error("media unavailable: '{}'", .path.display())]
    MediaUnavailable {
        /// Path of the missing or unreadable source.
        path: PathBuf,
    },

    /// A collaborator (speech synthesis, image search, media probing) failed.
    #[error("{service} error: {detail}")]
    ExternalService {
        /// Human-readable name of the failing collaborator.
        service: String,
        /// HTTP status when the failure came from a web API.
        status: Option<u16>,
        /// Upstream detail, surfaced verbatim (includes the status when present).
        detail: String,
    },

    /// The encode backend failed during final export.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::MediaUnavailable`] value.
    pub fn media_unavailable(path: impl AsRef<Path>) -> Self {
        Self::MediaUnavailable {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build a [`ReelError::ExternalService`] value.
    ///
    /// When `status` is set it is folded into the detail so that the HTTP
    /// status stays visible wherever the error is displayed.
    pub fn external(
        service: impl Into<String>,
        status: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        let detail = detail.into();
        let detail = match status {
            Some(code) => format!("http status {code}: {detail}"),
            None => detail,
        };
        Self::ExternalService {
            service: service.into(),
            status,
            detail,
        }
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_folds_status_into_detail() {
        let err = ReelError::external("image search", Some(403), "forbidden");
        match &err {
            ReelError::ExternalService { status, detail, .. } => {
                assert_eq!(*status, Some(403));
                assert!(detail.contains("403"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        assert!(err.to_string().contains("image search"));
    }

    #[test]
    fn media_unavailable_names_the_path() {
        let err = ReelError::media_unavailable("missing/photo.png");
        assert!(err.to_string().contains("missing/photo.png"));
    }
}
