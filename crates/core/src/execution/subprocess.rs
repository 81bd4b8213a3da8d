//! Subprocess spawning with combined output capture.
//!
//! [`run_command`] spawns a prepared [`tokio::process::Command`], funnels its
//! stdout and stderr into one buffer in the order chunks arrive, and enforces
//! an optional timeout. Output collection never outlives the child by more
//! than [`OUTPUT_DRAIN_GRACE`], even if a background process inherited the
//! pipes.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use super::executor::{ExecutionError, ExecutionResult};

/// Maximum combined output captured per run (10 MiB).
///
/// Output past this limit is drained and discarded so the child never blocks
/// on a full pipe.
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

const READ_CHUNK_BYTES: usize = 8 * 1024;

/// How long output may keep arriving after the child has exited.
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Stream reader tasks, aborted when dropped so a pipe held open by a
/// grandchild cannot keep them alive.
struct StreamReaders(Vec<JoinHandle<()>>);

impl Drop for StreamReaders {
    fn drop(&mut self) {
        for reader in &self.0 {
            reader.abort();
        }
    }
}

/// Spawn `cmd`, capture combined stdout/stderr, and wait for it to exit.
///
/// The caller sets program and arguments. Stdin is closed. With a `timeout`,
/// a child still running when it fires is killed (`kill_on_drop`) and
/// [`ExecutionError::Timeout`] is returned. Once the child exits, output is
/// collected for at most [`OUTPUT_DRAIN_GRACE`]. A non-zero exit is NOT an
/// error here; inspect [`ExecutionResult::success`].
pub async fn run_command(
    cmd: &mut Command,
    timeout: Option<Duration>,
) -> Result<ExecutionResult, ExecutionError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    // Both streams feed one channel so the buffer keeps arrival order.
    let (tx, rx) = mpsc::channel::<Vec<u8>>(64);
    let mut readers = StreamReaders(Vec::with_capacity(2));
    if let Some(stdout) = child.stdout.take() {
        readers.0.push(tokio::spawn(forward_stream(stdout, tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.0.push(tokio::spawn(forward_stream(stderr, tx.clone())));
    }
    drop(tx);
    let collector = tokio::spawn(collect_output(rx));

    let status = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(status) => status?,
            Err(_elapsed) => {
                // `child` drops on return and is killed; `readers` are aborted.
                return Err(ExecutionError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            }
        },
        None => child.wait().await?,
    };

    let output = drain_output(collector, readers).await;

    Ok(ExecutionResult {
        output,
        exit_code: status.code().unwrap_or(-1),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Wait up to [`OUTPUT_DRAIN_GRACE`] for the pipes to close, then abort the
/// readers and keep whatever was collected.
async fn drain_output(mut collector: JoinHandle<Vec<u8>>, readers: StreamReaders) -> Vec<u8> {
    match tokio::time::timeout(OUTPUT_DRAIN_GRACE, &mut collector).await {
        Ok(joined) => output_or_empty(joined),
        Err(_elapsed) => {
            tracing::warn!(
                grace_ms = OUTPUT_DRAIN_GRACE.as_millis() as u64,
                "Output pipes still open after exit, abandoning readers",
            );
            drop(readers);
            output_or_empty(collector.await)
        }
    }
}

fn output_or_empty(joined: Result<Vec<u8>, JoinError>) -> Vec<u8> {
    joined.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Output collector failed, returning empty output");
        Vec::new()
    })
}

async fn forward_stream<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = vec![0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn collect_output(mut rx: mpsc::Receiver<Vec<u8>>) -> Vec<u8> {
    let mut output = Vec::new();
    while let Some(chunk) = rx.recv().await {
        let room = MAX_OUTPUT_BYTES.saturating_sub(output.len());
        output.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    output
}
