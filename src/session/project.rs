use std::path::Path;

use tracing::info;

use crate::assets::SessionStore;
use crate::audio::{NarrationSource, NarrationTrack};
use crate::foundation::error::{ReelError, ReelResult};
use crate::project::{MediaItem, MediaOrigin, ProjectSettings};
use crate::render::{RenderJob, render_to_mp4_at, timestamped_output_path};
use crate::services::{ImageSearchProvider, SpeechSynthesizer, fetch_bytes};
use crate::timeline::Timeline;

/// The single mutable project aggregate owned by one session.
///
/// Everything a session touches (media list, timeline, narration, settings,
/// render history, temp storage) hangs off this value; there are no ambient
/// globals. `&mut self` on every mutating operation is what enforces the
/// one-writer, one-render-in-flight execution model. Temp media is reclaimed
/// when the project is dropped.
pub struct Project {
    media: Vec<MediaItem>,
    timeline: Option<Timeline>,
    narration: Option<NarrationTrack>,
    settings: ProjectSettings,
    store: SessionStore,
    jobs: Vec<RenderJob>,
    videos_created: u32,
}

impl Project {
    /// Create a project with a fresh session store.
    pub fn new(settings: ProjectSettings) -> ReelResult<Self> {
        Ok(Self::with_store(settings, SessionStore::create()?))
    }

    /// Create a project over an existing store.
    pub fn with_store(settings: ProjectSettings, store: SessionStore) -> Self {
        Self {
            media: Vec::new(),
            timeline: None,
            narration: None,
            settings,
            store,
            jobs: Vec::new(),
            videos_created: 0,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Mutable settings access.
    pub fn settings_mut(&mut self) -> &mut ProjectSettings {
        &mut self.settings
    }

    /// Imported media in insertion order.
    pub fn media(&self) -> &[MediaItem] {
        &self.media
    }

    /// The current timeline, when one has been generated.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Mutable timeline access for post-generation edits.
    pub fn timeline_mut(&mut self) -> Option<&mut Timeline> {
        self.timeline.as_mut()
    }

    /// The attached narration, if any.
    pub fn narration(&self) -> Option<&NarrationTrack> {
        self.narration.as_ref()
    }

    /// Render history, oldest first.
    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    /// Number of successful renders this session.
    pub fn videos_created(&self) -> u32 {
        self.videos_created
    }

    /// Session store root, for callers staging their own files.
    pub fn store_root(&self) -> &Path {
        self.store.root()
    }

    /// Add an already-materialized media item. Returns its index.
    pub fn add_media(&mut self, item: MediaItem) -> usize {
        self.media.push(item);
        self.media.len() - 1
    }

    /// Import an uploaded file into the session store. Returns its index.
    pub fn import_upload(&mut self, file_name: &str, bytes: &[u8]) -> ReelResult<usize> {
        let path = self.store.import_bytes(file_name, bytes)?;
        Ok(self.add_media(MediaItem::new(path, MediaOrigin::UserUpload)))
    }

    /// Search for images and import every hit into the session store.
    ///
    /// Returns the number of imported items. Search and download failures are
    /// surfaced to the caller; nothing is retried.
    pub fn import_search_results(
        &mut self,
        provider: &dyn ImageSearchProvider,
        query: &str,
        count: usize,
    ) -> ReelResult<usize> {
        let hits = provider.search(query, count)?;
        let imported = hits.len();
        for (i, hit) in hits.into_iter().enumerate() {
            let bytes = fetch_bytes(&hit.image_url)?;
            let name = hit
                .image_url
                .rsplit('/')
                .next()
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("search_{i}.jpg"));
            let path = self.store.import_bytes(&name, &bytes)?;
            let mut item = MediaItem::new(path, MediaOrigin::SearchResult);
            item.credit = Some(hit.photographer);
            self.media.push(item);
        }
        info!(query, imported, "imported search results");
        Ok(imported)
    }

    /// Set one media item's display duration.
    pub fn set_media_duration(&mut self, index: usize, secs: f64) -> ReelResult<()> {
        let len = self.media.len();
        let item = self.media.get_mut(index).ok_or_else(|| {
            ReelError::validation(format!("media index {index} out of range (len {len})"))
        })?;
        item.set_duration(secs)
    }

    /// Remove one media item.
    pub fn remove_media(&mut self, index: usize) -> ReelResult<MediaItem> {
        if index >= self.media.len() {
            return Err(ReelError::validation(format!(
                "media index {index} out of range (len {})",
                self.media.len()
            )));
        }
        Ok(self.media.remove(index))
    }

    /// Import an uploaded narration file, probing its duration.
    pub fn upload_narration(&mut self, file_name: &str, bytes: &[u8]) -> ReelResult<&NarrationTrack> {
        let path = self.store.import_bytes(file_name, bytes)?;
        let track = NarrationTrack::from_file(path, NarrationSource::Uploaded);
        Ok(&*self.narration.insert(track))
    }

    /// Synthesize narration from script text into the session store.
    pub fn synthesize_narration(
        &mut self,
        synthesizer: &dyn SpeechSynthesizer,
        text: &str,
        language: &str,
        rate: f64,
    ) -> ReelResult<&NarrationTrack> {
        let path = self.store.path_for("narration.wav")?;
        synthesizer.synthesize(text, language, rate, &path)?;
        let track = NarrationTrack::from_file(path, NarrationSource::Synthesized);
        Ok(&*self.narration.insert(track))
    }

    /// Attach a narration track directly (already on disk, duration known).
    pub fn set_narration(&mut self, track: NarrationTrack) {
        self.narration = Some(track);
    }

    /// Detach the narration track.
    pub fn clear_narration(&mut self) {
        self.narration = None;
    }

    /// (Re)generate the timeline from the current media and narration.
    ///
    /// Replaces any existing scene list wholesale, discarding per-scene edits.
    pub fn generate_timeline(&mut self) -> ReelResult<&Timeline> {
        let timeline = Timeline::generate(&self.media, self.narration.as_ref(), &self.settings)?;
        Ok(&*self.timeline.insert(timeline))
    }

    /// Render the current timeline to an MP4 under `out_dir`.
    ///
    /// Always returns the recorded job; inspect its status for the outcome.
    /// A failed render records the error detail and leaves no artifact.
    pub fn render(
        &mut self,
        out_dir: &Path,
        on_progress: Option<&mut dyn FnMut(f32)>,
    ) -> &RenderJob {
        let scenes = self
            .timeline
            .as_ref()
            .map(|t| t.scenes().to_vec())
            .unwrap_or_default();
        let out_path = timestamped_output_path(out_dir, "storyreel");
        let mut job = RenderJob::pending(
            scenes.clone(),
            self.narration.as_ref().map(|t| t.path.clone()),
            self.settings.clone(),
            out_path.clone(),
        );

        match render_to_mp4_at(
            &scenes,
            self.narration.as_ref(),
            &self.settings,
            &out_path,
            on_progress,
        ) {
            Ok(stats) => {
                job.mark_succeeded();
                self.videos_created += 1;
                info!(
                    path = %out_path.display(),
                    secs = stats.output_secs,
                    videos_created = self.videos_created,
                    "render job succeeded"
                );
            }
            Err(e) => job.mark_failed(e.to_string()),
        }

        self.jobs.push(job);
        let idx = self.jobs.len() - 1;
        &self.jobs[idx]
    }

    /// Tear the session down, reclaiming all temp media.
    ///
    /// Dropping the project does the same; this just makes the lifecycle
    /// explicit at call sites.
    pub fn close(self) {
        self.store.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MediaOrigin;
    use crate::services::ImageHit;

    struct FixedSearch(Vec<ImageHit>);

    impl ImageSearchProvider for FixedSearch {
        fn search(&self, _query: &str, count: usize) -> ReelResult<Vec<ImageHit>> {
            Ok(self.0.iter().take(count).cloned().collect())
        }
    }

    #[test]
    fn upload_lands_in_store_with_origin() {
        let mut project = Project::new(ProjectSettings::default()).unwrap();
        let idx = project.import_upload("photo.png", b"not-a-real-png").unwrap();
        assert_eq!(project.media().len(), 1);
        assert_eq!(project.media()[idx].origin, MediaOrigin::UserUpload);
        assert!(project.media()[idx].path.starts_with(project.store_root()));
    }

    #[test]
    fn generate_requires_media() {
        let mut project = Project::new(ProjectSettings::default()).unwrap();
        assert!(matches!(
            project.generate_timeline().unwrap_err(),
            ReelError::EmptyProject
        ));
    }

    #[test]
    fn render_without_timeline_records_failed_job() {
        let mut project = Project::new(ProjectSettings::default()).unwrap();
        let out_dir = project.store_root().to_path_buf();

        let mut fractions = Vec::new();
        let mut cb = |f: f32| fractions.push(f);
        let job = project.render(&out_dir, Some(&mut cb));

        assert!(job.is_terminal());
        assert!(!job.succeeded());
        assert!(job.failure_detail().unwrap().contains("timeline is empty"));
        assert!(fractions.iter().all(|f| *f < 1.0));
        assert_eq!(project.videos_created(), 0);
    }

    #[test]
    fn render_with_all_missing_media_records_failure() {
        let mut project = Project::new(ProjectSettings::default()).unwrap();
        project.add_media(MediaItem::new("gone_a.png", MediaOrigin::UserUpload));
        project.add_media(MediaItem::new("gone_b.png", MediaOrigin::UserUpload));
        project.generate_timeline().unwrap();

        let out_dir = project.store_root().to_path_buf();
        let job = project.render(&out_dir, None);
        assert!(!job.succeeded());
        assert!(job.failure_detail().unwrap().contains("no clips"));
        // A failed job never points at a live artifact.
        assert!(!job.output_path.exists());
    }

    #[test]
    fn search_import_carries_credits() {
        // URLs are never fetched because the hit list is empty.
        let mut project = Project::new(ProjectSettings::default()).unwrap();
        let provider = FixedSearch(Vec::new());
        let imported = project.import_search_results(&provider, "sunsets", 4).unwrap();
        assert_eq!(imported, 0);
        assert!(project.media().is_empty());
    }
}
