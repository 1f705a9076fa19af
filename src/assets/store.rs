use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::foundation::error::{ReelError, ReelResult};

/// Session-scoped temporary media storage.
///
/// All downloaded search results, uploaded files, and synthesized narration
/// live under one unique directory that is reclaimed when the session ends.
/// Cleanup is best-effort: individual delete failures are logged and never
/// abort the rest of the sweep.
#[derive(Debug)]
pub struct SessionStore {
    root: PathBuf,
    counter: u64,
}

impl SessionStore {
    /// Create a store under the system temp directory.
    pub fn create() -> ReelResult<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a store under `parent`.
    pub fn create_in(parent: impl AsRef<Path>) -> ReelResult<Self> {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let root = parent
            .as_ref()
            .join(format!("storyreel_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&root).map_err(|e| {
            ReelError::validation(format!(
                "failed to create session store '{}': {e}",
                root.display()
            ))
        })?;
        debug!(root = %root.display(), "session store created");
        Ok(Self { root, counter: 0 })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a unique file name derived from `name`.
    ///
    /// Path separators and parent traversals in `name` are stripped so that
    /// everything stays inside the store root.
    pub fn import_bytes(&mut self, name: &str, bytes: &[u8]) -> ReelResult<PathBuf> {
        let safe = sanitize_file_name(name)?;
        self.counter += 1;
        let path = self.root.join(format!("{:04}_{safe}", self.counter));
        std::fs::write(&path, bytes).map_err(|e| {
            ReelError::validation(format!("failed to write '{}': {e}", path.display()))
        })?;
        Ok(path)
    }

    /// Reserve a path under the store root without creating the file.
    pub fn path_for(&mut self, name: &str) -> ReelResult<PathBuf> {
        let safe = sanitize_file_name(name)?;
        self.counter += 1;
        Ok(self.root.join(format!("{:04}_{safe}", self.counter)))
    }

    /// Best-effort sweep of the store root.
    ///
    /// Every entry is attempted; failures are logged as warnings and skipped.
    /// Idempotent: a second call on an already-removed root is a no-op.
    pub fn cleanup(&self) {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return, // already gone
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "failed to delete session file");
            }
        }

        if let Err(e) = std::fs::remove_dir(&self.root) {
            warn!(root = %self.root.display(), error = %e, "failed to remove session store root");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Reduce a user-supplied name to a single safe file name component.
fn sanitize_file_name(name: &str) -> ReelResult<String> {
    let base = name
        .replace('\\', "/")
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    if base.is_empty() || base == "." || base == ".." {
        return Err(ReelError::validation(format!(
            "'{name}' does not contain a usable file name"
        )));
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_writes_unique_paths() {
        let mut store = SessionStore::create().unwrap();
        let a = store.import_bytes("photo.png", b"aa").unwrap();
        let b = store.import_bytes("photo.png", b"bb").unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(&a).unwrap(), b"aa");
        assert_eq!(std::fs::read(&b).unwrap(), b"bb");
        store.cleanup();
        assert!(!store.root().exists());
    }

    #[test]
    fn import_strips_directory_components() {
        let mut store = SessionStore::create().unwrap();
        let path = store.import_bytes("../../etc/passwd", b"x").unwrap();
        assert!(path.starts_with(store.root()));
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("passwd"));
        assert!(store.import_bytes("..", b"x").is_err());
        assert!(store.import_bytes("dir/", b"x").is_err());
    }

    #[test]
    fn cleanup_is_idempotent() {
        let store = SessionStore::create().unwrap();
        store.cleanup();
        store.cleanup();
        assert!(!store.root().exists());
    }
}
