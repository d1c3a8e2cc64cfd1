//! Local process spawning using `tokio::process`

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, instrument};

use crate::error::ExecError;
use crate::traits::{ProcessEvent, ProcessHandle, ProcessSpawner};

/// Buffer depth for the merged event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Local process spawner
///
/// Spawns processes with `tokio::process::Command` and forwards their
/// stdout/stderr line by line as [`ProcessEvent`]s.
#[derive(Debug, Clone)]
pub struct TokioSpawner;

impl TokioSpawner {
    /// Create a new local spawner
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioSpawner {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward lines from a child stream into the event channel
async fn forward_lines<R>(
    reader: R,
    tx: mpsc::Sender<ProcessEvent>,
    make_event: fn(String) -> ProcessEvent,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(make_event(line)).await.is_err() {
            // Receiver dropped, stop reading
            break;
        }
    }
}

#[async_trait]
impl ProcessSpawner for TokioSpawner {
    #[instrument(skip(self), level = "debug")]
    async fn spawn(&self, program: &str, args: &[String]) -> Result<ProcessHandle, ExecError> {
        debug!(program = %program, ?args, "spawning process");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecError::SpawnError(e.to_string()))?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let stdout_task = child
            .stdout
            .take()
            .map(|out| tokio::spawn(forward_lines(out, tx.clone(), ProcessEvent::Stdout)));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| tokio::spawn(forward_lines(err, tx.clone(), ProcessEvent::Stderr)));

        tokio::spawn(async move {
            let status = child.wait().await;

            // Drain both streams before signaling termination so every
            // buffered chunk precedes the close event.
            if let Some(task) = stdout_task {
                let _ = task.await;
            }
            if let Some(task) = stderr_task {
                let _ = task.await;
            }

            match status {
                Ok(status) => {
                    debug!(code = ?status.code(), "process exited");
                    let _ = tx.send(ProcessEvent::Closed(status.code())).await;
                }
                Err(e) => {
                    // No close event follows; the stream ends after this.
                    error!(error = %e, "failed waiting for process");
                    let _ = tx.send(ProcessEvent::Error(e.to_string())).await;
                }
            }
        });

        Ok(ProcessHandle::new(rx))
    }

    fn spawner_type(&self) -> &'static str {
        "local"
    }
}
