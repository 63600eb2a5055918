//! Scoped temporary files.
//!
//! Both pipeline halves funnel transient archive bytes through a uniquely
//! named file that must not outlive the request that created it. The
//! [`ScratchFile`] guard owns that invariant: callers remove it explicitly on
//! the happy path, and the `Drop` impl is the backstop for every early return
//! and error path. Removal is best-effort: a failed delete is logged, never
//! escalated past the operation's own result.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A uniquely named temporary file with guaranteed best-effort removal.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    /// A scratch file at `dir/file_name`. The caller supplies a name that is
    /// already unique (e.g. carries a fresh uuid).
    pub fn in_dir(dir: &Path, file_name: impl AsRef<str>) -> Self {
        Self {
            path: dir.join(file_name.as_ref()),
            armed: true,
        }
    }

    /// A scratch file at `dir/<prefix>_<uuid>.<extension>`.
    pub fn unique_in_dir(dir: &Path, prefix: &str, extension: &str) -> Self {
        let file_name = format!("{prefix}_{}.{extension}", Uuid::new_v4());
        Self::in_dir(dir, file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::write(&self.path, bytes).await
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Remove the file now and disarm the guard.
    pub async fn remove(mut self) {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove scratch file");
            }
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to remove scratch file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::in_dir(dir.path(), "artifact.gz");
        scratch.write(b"payload").await.unwrap();

        let path = scratch.path().to_path_buf();
        assert!(path.exists());

        scratch.remove().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn drop_removes_the_file_on_error_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path;
        {
            let scratch = ScratchFile::in_dir(dir.path(), "artifact.gz");
            scratch.write(b"payload").await.unwrap();
            path = scratch.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn dropping_without_a_file_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchFile::unique_in_dir(dir.path(), "upload", "gz");
        assert!(!scratch.exists().await);
        drop(scratch);
    }

    #[test]
    fn unique_paths_do_not_collide() {
        let dir = std::env::temp_dir();
        let a = ScratchFile::unique_in_dir(&dir, "upload", "gz");
        let b = ScratchFile::unique_in_dir(&dir, "upload", "gz");
        assert_ne!(a.path(), b.path());
    }
}
