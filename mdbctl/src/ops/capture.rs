//! Backup capture: dump a database to a compressed archive and hand the
//! bytes back to the caller.

use crate::config::Config;
use crate::ops::command::{self, ToolError, ToolRunner};
use crate::ops::scratch::ScratchFile;
use crate::types::{BackupId, DatabaseName};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// A completed snapshot: the archive bytes plus the identifier used to name
/// them. Owned by the HTTP response; never persisted server-side.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    pub content: Bytes,
    pub id: BackupId,
}

#[derive(Error, Debug)]
pub enum BackupError {
    /// The dump tool exited cleanly but left no archive behind.
    #[error("backup failed: the dump tool reported success but produced no archive")]
    NotProduced,

    #[error("backup failed: {stderr}")]
    DumpFailed { stderr: String },

    #[error("backup failed: {0}")]
    Tool(#[from] ToolError),

    #[error("backup failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Captures snapshots by invoking the external dump tool against the
/// configured instance.
pub struct BackupCapture {
    runner: Arc<dyn ToolRunner>,
    uri: String,
    auth_database: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl BackupCapture {
    pub fn new(config: &Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            uri: config.mongo.uri.clone(),
            auth_database: config.mongo.auth_database.clone(),
            scratch_dir: config.backup.scratch_dir.clone(),
            timeout: config.backup.timeout,
        }
    }

    /// Dump `database` into a scratch archive, read it back, and return the
    /// bytes.
    ///
    /// The scratch file is removed on every exit path: explicitly after a
    /// successful read, and by the [`ScratchFile`] guard on all failures.
    ///
    /// # Errors
    ///
    /// [`BackupError::NotProduced`] when the tool exits zero without writing
    /// the archive; [`BackupError::DumpFailed`] with the diagnostic text on a
    /// non-zero exit; spawn failures, timeouts and read errors are wrapped.
    pub async fn capture(&self, database: &DatabaseName) -> Result<BackupArtifact, BackupError> {
        let id = Uuid::new_v4();
        let scratch = ScratchFile::in_dir(&self.scratch_dir, format!("{database}_{id}.gz"));

        tracing::info!(database = %database, backup_id = %id, "capturing backup");

        let dump = command::mongodump_archive(&self.uri, database, scratch.path(), &self.auth_database);
        let output = self.runner.run(&dump, self.timeout).await?;

        if !output.success {
            return Err(BackupError::DumpFailed { stderr: output.stderr });
        }

        // The dump tool can exit zero without writing anything; the archive's
        // existence is the success signal we actually trust.
        if !scratch.exists().await {
            return Err(BackupError::NotProduced);
        }

        let content = scratch.read().await?;
        scratch.remove().await;

        tracing::info!(database = %database, backup_id = %id, bytes = content.len(), "backup captured");

        Ok(BackupArtifact {
            content: Bytes::from(content),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::command::ToolOutput;
    use crate::test_utils::{archive_path, test_config, StubRunner};

    fn capture_service(dir: &std::path::Path, runner: Arc<StubRunner>) -> BackupCapture {
        BackupCapture::new(&test_config(dir), runner)
    }

    fn db(name: &str) -> DatabaseName {
        DatabaseName::new(name).unwrap()
    }

    #[tokio::test]
    async fn capture_returns_bytes_and_removes_the_scratch_file() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.enqueue(|command| {
            let path = archive_path(command).expect("dump command must carry --archive");
            std::fs::write(path, [0u8; 10]).unwrap();
            Ok(ToolOutput::succeeded())
        });

        let service = capture_service(dir.path(), runner.clone());
        let artifact = service.capture(&db("orders_db")).await.unwrap();

        assert_eq!(artifact.content.len(), 10);
        assert!(!artifact.id.is_nil());
        assert_eq!(runner.call_count(), 1);

        // scratch directory is empty again
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn silent_tool_failure_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        // Exit status says success, but no archive is written.
        runner.enqueue(|_| Ok(ToolOutput::succeeded()));

        let service = capture_service(dir.path(), runner);
        let err = service.capture(&db("orders_db")).await.unwrap_err();

        assert!(matches!(err, BackupError::NotProduced));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn dump_failure_carries_diagnostics_and_leaves_no_residue() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.enqueue(|command| {
            // A partial archive written before the tool died must be cleaned up.
            let path = archive_path(command).unwrap();
            std::fs::write(path, b"partial").unwrap();
            Ok(ToolOutput::failed(1, "Failed: connection refused"))
        });

        let service = capture_service(dir.path(), runner);
        let err = service.capture(&db("orders_db")).await.unwrap_err();

        match err {
            BackupError::DumpFailed { stderr } => assert!(stderr.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn timeout_is_wrapped_and_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(StubRunner::new());
        runner.enqueue(|command| {
            let path = archive_path(command).unwrap();
            std::fs::write(path, b"partial").unwrap();
            Err(ToolError::TimedOut {
                program: "mongodump".to_string(),
                timeout: Duration::from_secs(1),
            })
        });

        let service = capture_service(dir.path(), runner);
        let err = service.capture(&db("orders_db")).await.unwrap_err();

        assert!(matches!(err, BackupError::Tool(ToolError::TimedOut { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
