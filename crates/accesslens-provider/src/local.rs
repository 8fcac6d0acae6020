//! Local subprocess provider - one process per invocation, JSON over stdio

use crate::ProviderExecutor;
use accesslens_core::{DescribeResponse, Error, LoadResponse, ProviderRequest, Result, Task};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

const DEFAULT_COMMAND: &str = "./provider";

/// Runs a provider implementation from a local directory.
///
/// Each invocation launches `command` (via the shell, so `python3 provider.py`
/// works) in `dir`, writes a single JSON request to its stdin, and reads a
/// single JSON response from its stdout. Anything on stderr is captured and
/// attached to the error on failure.
pub struct LocalProvider {
    dir: PathBuf,
    command: String,
    timeout: Option<Duration>,
}

impl LocalProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            command: DEFAULT_COMMAND.to_string(),
            timeout: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Kill an invocation that runs longer than this. Default: no timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn invoke(&self, request: &ProviderRequest) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(request)?;
        debug!(command = %self.command, dir = %self.dir.display(), "invoking provider");

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::executor(format!("failed to spawn {}: {}", self.command, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .await
                .map_err(|e| Error::executor(format!("failed to write provider request: {}", e)))?;
            // closes the pipe so the provider sees EOF
        }

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    Error::executor(format!(
                        "provider timed out after {}s",
                        timeout.as_secs()
                    ))
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| Error::executor(format!("failed to wait for provider: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(Error::executor_with_stderr(
                format!(
                    "provider exited with code {}",
                    output.status.code().unwrap_or(-1)
                ),
                stderr,
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait::async_trait]
impl ProviderExecutor for LocalProvider {
    async fn describe(&self) -> Result<DescribeResponse> {
        let stdout = self.invoke(&ProviderRequest::Describe).await?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::executor(format!("invalid describe response: {}", e)))
    }

    async fn load_resources(&self, task: Task) -> Result<LoadResponse> {
        let stdout = self.invoke(&ProviderRequest::load(task)).await?;
        serde_json::from_slice(&stdout)
            .map_err(|e| Error::executor(format!("invalid load response: {}", e)))
    }
}
