//! Restore pipeline: copy a local archive into the execution context and
//! apply it to the target database.

use crate::config::Config;
use crate::ops::command::{self, ToolError, ToolRunner};
use crate::types::DatabaseName;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Bound on the `docker cp` step. Copying a local file into a container is
/// fast; a copy that takes this long is stuck.
const COPY_TIMEOUT: Duration = Duration::from_secs(120);

/// Bound on the remote cleanup step.
const CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum RestoreError {
    #[error("backup archive not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("restore failed: could not copy archive into the container: {stderr}")]
    CopyFailed { stderr: String },

    #[error("restore failed: {stderr}")]
    Failed { stderr: String },

    /// The restore tool exited zero but its diagnostic stream carried an
    /// error marker.
    #[error("restore reported errors: {diagnostics}")]
    ReportedFailure { diagnostics: String },

    #[error("restore failed: {0}")]
    Tool(#[from] ToolError),
}

/// Applies uploaded archives to a database running inside a container.
///
/// The capture side talks to the instance from the host, the restore tool
/// runs inside the container and sees the instance through the container's
/// own network namespace. That is why the two sides carry separate
/// connection URIs in the configuration.
pub struct RestorePipeline {
    runner: Arc<dyn ToolRunner>,
    container: String,
    uri: String,
    auth_database: String,
    remote_scratch_dir: String,
    timeout: Duration,
}

impl RestorePipeline {
    pub fn new(config: &Config, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            container: config.restore.container.clone(),
            uri: config.restore.uri.clone(),
            auth_database: config.restore.auth_database.clone(),
            remote_scratch_dir: config.restore.remote_scratch_dir.clone(),
            timeout: config.restore.timeout,
        }
    }

    /// Restore `database` from the local archive at `archive`, replacing its
    /// existing collections.
    ///
    /// Steps run strictly in order: copy into the container, invoke the
    /// restore tool there, remove the copied archive. A failed copy is
    /// fail-fast: nothing was placed in the container, so neither of the
    /// later steps runs. Once the copy succeeded, the remote cleanup is
    /// attempted even when the invocation failed; its own failure is logged
    /// and never overrides the pipeline result.
    ///
    /// The local archive is the caller's to clean up; this pipeline only
    /// guarantees that nothing is left behind inside the container.
    pub async fn restore(&self, database: &DatabaseName, archive: &Path) -> Result<(), RestoreError> {
        if !tokio::fs::try_exists(archive).await.unwrap_or(false) {
            return Err(RestoreError::ArchiveNotFound(archive.to_path_buf()));
        }

        let remote_path = self.remote_path(archive);
        tracing::info!(database = %database, remote_path = %remote_path, "restoring backup");

        let copy = command::container_copy(&self.container, archive, &remote_path);
        let copied = self.runner.run(&copy, COPY_TIMEOUT).await?;
        if !copied.success {
            return Err(RestoreError::CopyFailed { stderr: copied.stderr });
        }

        let invoke = command::container_restore(&self.container, &self.uri, database, &remote_path, &self.auth_database);
        let invoked = self.runner.run(&invoke, self.timeout).await;

        // The archive made it into the container, so it gets removed no
        // matter how the invocation went.
        self.remove_remote(&remote_path).await;

        let output = invoked?;
        if !output.success {
            return Err(RestoreError::Failed { stderr: output.stderr });
        }

        // The tool exits zero even when its log stream reports partial
        // failures; the diagnostic scan is the check we actually trust.
        if contains_error_marker(&output.stderr) {
            return Err(RestoreError::ReportedFailure {
                diagnostics: output.stderr,
            });
        }

        tracing::info!(database = %database, "restore completed");
        tracing::debug!(stdout = %output.stdout, "restore tool output");
        Ok(())
    }

    /// Unique path for the archive copy inside the container: millisecond
    /// timestamp plus the upload's original extension.
    fn remote_path(&self, archive: &Path) -> String {
        let extension = archive
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        format!(
            "{}/restore_{}{}",
            self.remote_scratch_dir.trim_end_matches('/'),
            Utc::now().timestamp_millis(),
            extension
        )
    }

    async fn remove_remote(&self, remote_path: &str) {
        let remove = command::container_remove(&self.container, remote_path);
        match self.runner.run(&remove, CLEANUP_TIMEOUT).await {
            Ok(output) if output.success => {}
            Ok(output) => {
                tracing::warn!(path = %remote_path, stderr = %output.stderr, "failed to remove archive copy from container");
            }
            Err(error) => {
                tracing::warn!(path = %remote_path, error = %error, "failed to remove archive copy from container");
            }
        }
    }
}

/// Case-insensitive scan of the diagnostic stream for an error marker.
fn contains_error_marker(diagnostics: &str) -> bool {
    diagnostics.to_ascii_lowercase().contains("error")
}
