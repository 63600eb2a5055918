//! Test utilities: a scripted tool runner and helpers for building test
//! configurations and in-memory test servers.

use crate::config::Config;
use crate::ops::command::{ToolCommand, ToolError, ToolOutput, ToolRunner};
use async_trait::async_trait;
use axum_test::TestServer;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A config pointing scratch storage at `scratch_dir` with short timeouts.
pub fn test_config(scratch_dir: &Path) -> Config {
    let mut config = Config::default();
    config.backup.scratch_dir = scratch_dir.to_path_buf();
    config.backup.timeout = Duration::from_secs(5);
    config.restore.container = "test-mongo".to_string();
    config.restore.timeout = Duration::from_secs(5);
    config
}

/// Build a [`TestServer`] over the real router with an injected runner.
pub fn test_app(config: Config, runner: Arc<dyn ToolRunner>) -> TestServer {
    crate::Application::with_runner(config, runner)
        .expect("Failed to create application")
        .into_test_server()
}

type Behavior = Box<dyn Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync>;

/// Scripted [`ToolRunner`] recording every command it is asked to run.
///
/// Behaviors are consumed in FIFO order; once the script is exhausted, every
/// further command succeeds with empty output.
#[derive(Default)]
pub struct StubRunner {
    behaviors: Mutex<VecDeque<Behavior>>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl StubRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, behavior: impl Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync + 'static) {
        self.behaviors.lock().unwrap().push_back(Box::new(behavior));
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolRunner for StubRunner {
    async fn run(&self, command: &ToolCommand, _timeout: Duration) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push(command.clone());
        let behavior = self.behaviors.lock().unwrap().pop_front();
        match behavior {
            Some(behavior) => behavior(command),
            None => Ok(ToolOutput::succeeded()),
        }
    }
}

/// The `--archive=` path of a recorded dump command.
pub fn archive_path(command: &ToolCommand) -> Option<PathBuf> {
    command
        .args()
        .iter()
        .find_map(|arg| arg.strip_prefix("--archive="))
        .map(PathBuf::from)
}
