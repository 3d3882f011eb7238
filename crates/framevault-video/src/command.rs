//! Subprocess execution helpers shared by mux, probe, and extract.

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use framevault_core::{Error, Result};

/// Run a command that writes its result to files rather than stdout.
pub(crate) async fn run_status(cmd: &mut Command, timeout_secs: u64) -> Result<()> {
    run_inner(cmd, timeout_secs).await.map(|_| ())
}

/// Run a command and return its stdout.
pub(crate) async fn run_capture(cmd: &mut Command, timeout_secs: u64) -> Result<Vec<u8>> {
    run_inner(cmd, timeout_secs).await.map(|out| out.stdout)
}

async fn run_inner(cmd: &mut Command, timeout_secs: u64) -> Result<Output> {
    let program = cmd.as_std().get_program().to_string_lossy().to_string();

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| {
            Error::EncoderFailed(format!("{} timed out after {}s", program, timeout_secs))
        })?
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::EncoderNotFound(program.clone())
            } else {
                Error::Io(e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::EncoderFailed(format!(
            "{} failed (exit {}): {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}

/// Check whether the ffmpeg binary is installed and responding.
pub async fn ffmpeg_available() -> bool {
    match Command::new("ffmpeg").arg("-version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

/// Check whether the ffprobe binary is installed and responding.
pub async fn ffprobe_available() -> bool {
    match Command::new("ffprobe").arg("-version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
