//! Post-success shell command.

use log::debug;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::error_handling::types::{ExitReason, HookError};

/// Shell command run once every volume has been processed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionHook {
    command: String,
}

impl CompletionHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Runs the command through `bash -c` and waits for it to exit.
    ///
    /// Output is streamed line by line to the debug log while the command
    /// runs; nothing is kept in memory.
    pub async fn run(&self) -> Result<(), HookError> {
        debug!("Running success command: {}", self.command);
        let mut child = Command::new("bash")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (status, _, _) = tokio::join!(
            child.wait(),
            log_lines(stdout, "stdout"),
            log_lines(stderr, "stderr"),
        );
        let status = status?;

        if status.success() {
            return Ok(());
        }
        Err(HookError::Failed(match status.code() {
            Some(code) => ExitReason::Code(code),
            None => ExitReason::Signal,
        }))
    }
}

async fn log_lines<R: AsyncRead + Unpin>(stream: Option<R>, name: &str) {
    let Some(stream) = stream else {
        return;
    };
    let mut reader = BufReader::new(stream).lines();
    while let Ok(Some(line)) = reader.next_line().await {
        debug!("[success-command][{}] {}", name, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_successful_command_runs_to_completion() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("done");
        let hook = CompletionHook::new(format!("echo ok > '{}'", marker.display()));

        hook.run().await.unwrap();

        assert_eq!(std::fs::read_to_string(&marker).unwrap().trim(), "ok");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_error() {
        let err = CompletionHook::new("echo boom >&2; exit 3")
            .run()
            .await
            .unwrap_err();

        match err {
            HookError::Failed(reason) => assert_eq!(reason, ExitReason::Code(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_large_output_does_not_block_the_command() {
        // Well past a pipe buffer on both streams
        CompletionHook::new("seq 1 200000; seq 1 200000 >&2")
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_command_does_not_read_our_stdin() {
        // `cat` sees end of input right away instead of waiting on the terminal
        CompletionHook::new("cat").run().await.unwrap();
    }

    #[tokio::test]
    async fn test_signal_termination_is_an_error() {
        let err = CompletionHook::new("kill -9 $$").run().await.unwrap_err();

        assert!(matches!(err, HookError::Failed(ExitReason::Signal)));
    }
}
