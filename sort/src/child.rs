use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::SortSpec;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("failed to spawn `sort` child: {0}")]
    Spawn(std::io::Error),
    #[error("failed to write to `sort` stdin: {0}")]
    Write(std::io::Error),
    #[error("failed to read from `sort` stdout: {0}")]
    Read(std::io::Error),
    #[error("failed to wait for `sort` child: {0}")]
    Wait(std::io::Error),
}

/// Owns the `sort` child process's stdin/stdout pipes for one writer.
pub struct SortChild {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    terminated: bool,
}

impl SortChild {
    /// Spawn `sort` with `-n -u` plus per-key `-kN,N` flags (and `-r` if
    /// descending), environment `LC_ALL=C`.
    pub fn spawn(spec: &SortSpec) -> Result<Self, SortError> {
        let mut cmd = Command::new("sort");
        cmd.args(spec.argv())
        .env("LC_ALL", "C")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(SortError::Spawn)?;
        let stdin = child.stdin.take();
        let stdout = child.stdout.take().expect("stdout was piped");

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            terminated: false,
        })
    }

    /// Write one already-prefixed line (plus its trailing newline) to the
    /// child's stdin. The sort child buffers internally and cannot emit
    /// anything before EOF, so this never risks deadlock against
    /// `drain_line`.
    pub async fn feed_line(&mut self, line: &str) -> Result<(), SortError> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        stdin.write_all(line.as_bytes()).await.map_err(SortError::Write)?;
        stdin.write_all(b"\n").await.map_err(SortError::Write)?;
        Ok(())
    }

    /// Close stdin once every fetch on the owning query has finished,
    /// unblocking the sort child's output.
    pub fn close_input(&mut self) {
        self.stdin = None;
    }

    /// Read the next sorted, deduplicated line (prefix still attached), or
    /// `None` at EOF.
    pub async fn drain_line(&mut self) -> Result<Option<String>, SortError> {
        let mut line = String::new();
        let n = self
        .stdout
        .read_line(&mut line)
        .await
        .map_err(SortError::Read)?;
        if n == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Send a terminate signal once, to stop the child without triggering a
    /// SIGPIPE on our end when the output limit has already been reached.
    pub fn terminate_once(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        #[cfg(unix)]
        {
            if let Some(pid) = self.child.id() {
                unsafe {
                    libc::kill(pid as i32, libc::SIGTERM);
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = self.child.start_kill();
        }
    }

    /// Wait for the child to exit, reaping it.
    pub async fn wait(mut self) -> Result<std::process::ExitStatus, SortError> {
        self.stdin = None;
        self.child.wait().await.map_err(SortError::Wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsdbq_types::SortKey;

    #[tokio::test]
    async fn sorts_and_dedups_numeric_prefix() {
        let spec = SortSpec::new(vec![SortKey::Count], false);
        let mut child = SortChild::spawn(&spec).expect("sort must be on PATH for this test");

        for line in ["3 a", "1 a", "2 a", "1 a"] {
            child.feed_line(line).await.unwrap();
        }
        child.close_input();

        let mut out = Vec::new();
        while let Some(line) = child.drain_line().await.unwrap() {
            out.push(line);
        }
        child.wait().await.unwrap();

        assert_eq!(out, vec!["1 a", "2 a", "3 a"]);
    }

    #[tokio::test]
    async fn terminate_once_is_idempotent() {
        let spec = SortSpec::new(vec![SortKey::First], false);
        let mut child = SortChild::spawn(&spec).unwrap();
        child.terminate_once();
        child.terminate_once();
        child.close_input();
        while child.drain_line().await.unwrap().is_some() {}
        let _ = child.wait().await;
    }
}

