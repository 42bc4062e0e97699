// SPDX-License-Identifier: MIT
// gocode binary resolution, cursor byte-offset computation, and subprocess
// invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use super::AdapterError;

/// Name searched on $PATH when no explicit binary path is configured.
pub const GOCODE_NAME: &str = "gocode";

/// Resolve the gocode executable.
///
/// A configured path wins when it points at a regular file; otherwise every
/// `$PATH` component is searched for an executable named `gocode`.
pub fn resolve_binary(configured: Option<&Path>) -> Result<PathBuf, AdapterError> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
    }
    find_in_path(GOCODE_NAME).ok_or(AdapterError::BinaryNotFound)
}

/// Search `$PATH` (platform separator) for an executable file.
fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Absolute byte offset of the cursor within the joined buffer text.
///
/// The editor reports character positions; gocode wants bytes. The offset is
/// the byte length of every line above the cursor (newlines included) plus
/// the byte length of the first `column` characters of the current line's
/// input — multi-byte text before the cursor shifts the offset by more than
/// the column count.
pub fn cursor_byte_offset(
    lines: &[String],
    cursor_line: usize,
    input: &str,
    column: usize,
) -> usize {
    let line_start: usize = lines
        .iter()
        .take(cursor_line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    let typed: usize = input.chars().take(column).map(char::len_utf8).sum();
    line_start + typed
}

/// Run `gocode -f=json autocomplete <file> <offset>` with the buffer piped
/// to stdin, and return its raw stdout.
///
/// The child runs in its own process group so signals aimed at the parent's
/// group cannot kill it mid-communication. Both output streams are drained
/// to completion; there is no timeout — superseding a stale request is the
/// host's job.
pub async fn invoke(
    binary: &Path,
    buffer_name: &str,
    offset: usize,
    source: &str,
) -> Result<Vec<u8>> {
    let mut cmd = Command::new(binary);
    cmd.arg("-f=json")
        .arg("autocomplete")
        .arg(buffer_name)
        .arg(offset.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {}", binary.display()))?;

    let mut stdin = child.stdin.take().context("no stdin")?;

    // gocode reads stdin to EOF before writing results, but feed stdin and
    // drain the output pipes concurrently anyway — a child that fills a pipe
    // buffer before consuming its input must not deadlock the request.
    let feed = async move {
        if let Err(e) = stdin.write_all(source.as_bytes()).await {
            debug!(err = %e, "gocode stopped reading stdin early");
        }
        // Closing the stream signals end of buffer.
        drop(stdin);
    };
    let (_, output) = tokio::join!(feed, child.wait_with_output());
    let output = output.context("failed to wait for gocode")?;

    if !output.stderr.is_empty() {
        trace!(target: "gocode_stderr", "{}", String::from_utf8_lossy(&output.stderr));
    }
    debug!(status = ?output.status, bytes = output.stdout.len(), "gocode exited");

    Ok(output.stdout)
}
