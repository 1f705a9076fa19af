use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::project::{ProjectSettings, Scene};

/// Terminal outcome tracking for one export attempt.
///
/// The only legal transitions are `Pending -> Succeeded` and
/// `Pending -> Failed`; there is no retry and no cancellation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderStatus {
    /// The render is in flight.
    Pending,
    /// The artifact at `output_path` is complete and valid.
    Succeeded,
    /// The render aborted; no artifact is referenced.
    Failed {
        /// Captured error detail.
        detail: String,
    },
}

/// The record of one export attempt and its outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderJob {
    /// Scene list snapshot taken when the render started.
    pub scenes: Vec<Scene>,
    /// Narration file attached to the render, if any.
    pub narration: Option<PathBuf>,
    /// Settings snapshot taken when the render started.
    pub settings: ProjectSettings,
    /// Target artifact path.
    pub output_path: PathBuf,
    /// Current status.
    pub status: RenderStatus,
}

impl RenderJob {
    /// Create a pending job snapshot.
    pub fn pending(
        scenes: Vec<Scene>,
        narration: Option<PathBuf>,
        settings: ProjectSettings,
        output_path: PathBuf,
    ) -> Self {
        Self {
            scenes,
            narration,
            settings,
            output_path,
            status: RenderStatus::Pending,
        }
    }

    /// `true` once the job reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, RenderStatus::Pending)
    }

    /// `true` when the job finished with a valid artifact.
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RenderStatus::Succeeded)
    }

    /// Failure detail for failed jobs.
    pub fn failure_detail(&self) -> Option<&str> {
        match &self.status {
            RenderStatus::Failed { detail } => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn mark_succeeded(&mut self) {
        debug_assert!(!self.is_terminal(), "render job already terminal");
        self.status = RenderStatus::Succeeded;
    }

    pub(crate) fn mark_failed(&mut self, detail: impl Into<String>) {
        debug_assert!(!self.is_terminal(), "render job already terminal");
        self.status = RenderStatus::Failed {
            detail: detail.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_walks_pending_to_terminal() {
        let mut job = RenderJob::pending(
            Vec::new(),
            None,
            ProjectSettings::default(),
            PathBuf::from("out.mp4"),
        );
        assert!(!job.is_terminal());

        job.mark_failed("boom");
        assert!(job.is_terminal());
        assert!(!job.succeeded());
        assert_eq!(job.failure_detail(), Some("boom"));
    }
}
