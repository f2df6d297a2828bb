//! Child-process plumbing shared by the ffmpeg-family adapters.

use mixr_core::engine::EngineError;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

const STDERR_TAIL_LINES: usize = 6;

/// Runs `program` with `args`, bounded by `timeout_secs`.
///
/// A missing executable maps to `ToolMissing`; a non-zero exit keeps the
/// last few stderr lines as the failure reason.
pub(crate) async fn run_tool(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<Output, EngineError> {
    tracing::debug!(program, ?args, "[FfmpegEngine] Spawning");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EngineError::ToolMissing {
                tool: program.to_string(),
            },
            _ => EngineError::Spawn {
                message: format!("{}: {}", program, e),
            },
        })?;

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
        .await
        .map_err(|_| EngineError::Timeout {
            seconds: timeout_secs,
        })?
        .map_err(|e| EngineError::Spawn {
            message: format!("{}: {}", program, e),
        })?;

    if !output.status.success() {
        return Err(EngineError::NonZeroExit {
            status: output.status.code().unwrap_or(-1),
            stderr: stderr_tail(&output.stderr),
        });
    }

    Ok(output)
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr = (1..=10)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let tail = stderr_tail(stderr.as_bytes());
        assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
        assert!(tail.ends_with("line 10"));
        assert!(tail.starts_with("line 5"));
    }

    #[tokio::test]
    async fn test_missing_tool_reported() {
        let err = run_tool("mixr-no-such-binary", &[], 5).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::ToolMissing {
                tool: "mixr-no-such-binary".to_string()
            }
        );
    }
}
