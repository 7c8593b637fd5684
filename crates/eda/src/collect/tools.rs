//! Running external command-line tools with a time limit.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{EdaError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run `program` with `args` and return its standard output.
///
/// A non-zero exit status, a spawn failure or running longer than `timeout`
/// is an [`EdaError::ExternalTool`] naming `path`; the message carries the
/// tool's standard error.
pub fn run_tool(program: &str, args: &[&str], path: &Path, timeout: Duration) -> Result<String> {
    let failure = |message: String| EdaError::ExternalTool {
        tool: program.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failure(format!("could not start: {}", e)))?;

    // Drain both pipes on their own threads so a chatty tool cannot block.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if started.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(failure(format!("timed out after {}s", timeout.as_secs())));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(failure(e.to_string())),
        }
    };

    let stdout = stdout.and_then(|h| h.join().ok()).unwrap_or_default();
    let stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();

    debug!(
        tool = program,
        path = %path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tool finished"
    );

    if !status.success() {
        let message = String::from_utf8_lossy(&stderr).trim().to_string();
        return Err(failure(if message.is_empty() {
            status.to_string()
        } else {
            message
        }));
    }

    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

fn drain(mut pipe: impl Read + Send + 'static) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        buffer
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = run_tool("echo", &["hello"], Path::new("x"), Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_missing_program() {
        let result = run_tool(
            "eda-no-such-tool",
            &[],
            Path::new("x"),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(EdaError::ExternalTool { .. })));
    }

    #[test]
    fn test_non_zero_exit() {
        let result = run_tool("false", &[], Path::new("x"), Duration::from_secs(5));
        assert!(matches!(result, Err(EdaError::ExternalTool { .. })));
    }

    #[test]
    fn test_timeout() {
        let result = run_tool("sleep", &["5"], Path::new("x"), Duration::from_millis(100));
        match result {
            Err(EdaError::ExternalTool { message, .. }) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
