use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("container command is empty")]
    EmptyCommand,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for engine: {0}")]
    Wait(#[source] std::io::Error),

    #[error("engine did not finish within {0:?}")]
    Timeout(Duration),
}

/// A host directory bind-mounted into the container.
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
}

/// One engine run: mounts, environment, image and entry arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInvocation {
    pub mounts: Vec<Mount>,
    pub env: Vec<(String, String)>,
    pub image: String,
    pub args: Vec<String>,
}

impl EngineInvocation {
    /// Invocation that runs `driver_file` (a file in the scratch directory)
    /// with the project root and scratch directory mounted.
    pub fn new(
        config: &EngineConfig,
        project_root: &Path,
        scratch_dir: &Path,
        driver_file: &str,
    ) -> Self {
        Self {
            mounts: vec![
                Mount {
                    host: project_root.to_path_buf(),
                    container: config.project_mount.clone(),
                },
                Mount {
                    host: scratch_dir.to_path_buf(),
                    container: config.work_mount.clone(),
                },
            ],
            env: vec![(
                config.engine_output_env.clone(),
                config.work_path(&config.engine_output_file),
            )],
            image: config.image.clone(),
            args: vec![config.engine_entry.clone(), config.work_path(driver_file)],
        }
    }

    /// Host directory mounted at `container_path`, if any.
    pub fn host_path(&self, container_path: &str) -> Option<&Path> {
        self.mounts
            .iter()
            .find(|m| m.container == container_path)
            .map(|m| m.host.as_path())
    }

    /// Arguments for `docker`: `run --rm -v HOST:CONTAINER... -e K=V... IMAGE ARGS...`.
    pub fn docker_args(&self) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        for mount in &self.mounts {
            args.push("-v".to_string());
            args.push(format!("{}:{}", mount.host.display(), mount.container));
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(self.image.clone());
        args.extend(self.args.iter().cloned());
        args
    }
}

/// Exit state of a finished engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    /// Exit code; None when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl EngineExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for EngineExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Runs the engine and waits for it to exit.
#[async_trait]
pub trait EngineRunner: Send + Sync {
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, RunnerError>;
}

/// Runs the engine as a container through the docker CLI.
pub struct DockerRunner {
    command: Vec<String>,
    timeout: Option<Duration>,
}

impl DockerRunner {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            command: config
                .docker_command
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            timeout: config.timeout(),
        }
    }

    /// Full command line, for logging.
    pub fn command_line(&self, invocation: &EngineInvocation) -> String {
        let mut parts = self.command.clone();
        parts.extend(invocation.docker_args());
        parts.join(" ")
    }
}

#[async_trait]
impl EngineRunner for DockerRunner {
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineExit, RunnerError> {
        let (program, leading) = self.command.split_first().ok_or(RunnerError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(leading)
            .args(invocation.docker_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(command = %self.command_line(invocation), "running engine");
        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = child.stdout.take().map(|s| tokio::spawn(forward_lines(s, "stdout")));
        let stderr = child.stderr.take().map(|s| tokio::spawn(forward_lines(s, "stderr")));

        let status = match self.timeout {
            None => child.wait().await.map_err(RunnerError::Wait)?,
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status.map_err(RunnerError::Wait)?,
                    Err(_) => {
                        if let Err(e) = child.kill().await {
                            warn!(error = %e, "failed to kill timed-out engine");
                        }
                        return Err(RunnerError::Timeout(limit));
                    }
                }
            }
        };

        // Drain whatever the engine wrote before it exited.
        for task in [stdout, stderr].into_iter().flatten() {
            if let Err(e) = task.await {
                warn!(error = %e, "engine output forwarder failed");
            }
        }

        let exit = EngineExit::from(status);
        debug!(code = ?exit.code, "engine exited");
        Ok(exit)
    }
}

async fn forward_lines<R>(reader: R, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => info!(target: "engine", stream, "{line}"),
            Ok(None) => break,
            Err(e) => {
                warn!(stream, error = %e, "stopped reading engine output");
                break;
            }
        }
    }
}
