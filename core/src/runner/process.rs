use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

use super::exit::normalize_exit;
use super::types::ProcessSpec;

pub const CHILD_TARGET: &str = "vlmrun::child";

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `spec` to completion and returns its normalized exit code.
    async fn run(&self, spec: &ProcessSpec) -> Result<i32, RunnerError>;
}

/// Spawns real processes and routes every output line through `tracing`, so
/// the console and the run log see the child's output with the same framing
/// as the driver's own lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: &ProcessSpec) -> Result<i32, RunnerError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        tracing::debug!(program = %spec.program, pid = ?child.id(), "child spawned");

        let out_task = child.stdout.take().map(|s| pump(s, Stream::Stdout));
        let err_task = child.stderr.take().map(|s| pump(s, Stream::Stderr));

        let status = child.wait().await.map_err(|source| RunnerError::Wait {
            program: spec.program.clone(),
            source,
        })?;

        for task in [out_task, err_task].into_iter().flatten() {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "child output stream ended with an error"),
                Err(e) => tracing::warn!(error = %e, "child output pump panicked"),
            }
        }

        let code = normalize_exit(status);
        tracing::debug!(program = %spec.program, code, "child exited");
        Ok(code)
    }
}

fn pump<R>(reader: R, stream: Stream) -> JoinHandle<Result<(), RunnerError>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| RunnerError::StreamIo {
                    stream: stream.name(),
                    source,
                })?;
            if n == 0 {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            match stream {
                Stream::Stdout => tracing::info!(target: CHILD_TARGET, "{line}"),
                Stream::Stderr => tracing::warn!(target: CHILD_TARGET, "{line}"),
            }
        }
    })
}
